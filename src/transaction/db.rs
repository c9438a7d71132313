//! Database operations for transactions.

use rusqlite::{Connection, Row, params_from_iter};
use time::Date;

use crate::{
    Error,
    category::CategoryType,
    database_id::{CategoryId, TransactionId},
    db::get_timestamp,
    transaction::{
        NewTransaction, Summary, Transaction,
        query::{SELECT_TRANSACTIONS, TransactionFilter, build_transaction_query},
    },
};

/// Create a new transaction in the database.
///
/// The returned transaction includes its category's name and type.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id: TransactionId = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, description, category_id, transaction_date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )?
        .query_row(
            (
                transaction.amount,
                &transaction.description,
                transaction.category_id,
                transaction.transaction_date,
            ),
            |row| row.get(0),
        )
        .map_err(|error| map_category_error(error, transaction.category_id))?;

    get_transaction(id, connection)
}

/// Replace every editable field of the transaction with the ID `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET amount = ?1, description = ?2, category_id = ?3, transaction_date = ?4,
                 updated_at = unixepoch()
             WHERE id = ?5",
            (
                transaction.amount,
                &transaction.description,
                transaction.category_id,
                transaction.transaction_date,
                id,
            ),
        )
        .map_err(|error| map_category_error(error, transaction.category_id))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the transaction with the ID `id`.
///
/// Deleting a transaction that does not exist is not an error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    Ok(())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTIONS} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions matching `filter` in the filter's sort order.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let query = build_transaction_query(filter);

    connection
        .prepare(&query.sql)?
        .query_map(params_from_iter(query.params.iter()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Total the income and expenses for transactions dated from `start` to `end` inclusive.
///
/// Returns zeros if no transactions fall in the range.
pub fn get_summary(start: Date, end: Date, connection: &Connection) -> Result<Summary, Error> {
    let totals = connection
        .prepare(
            "SELECT c.type, COALESCE(SUM(t.amount), 0)
             FROM \"transaction\" t
             JOIN category c ON t.category_id = c.id
             WHERE t.transaction_date BETWEEN ?1 AND ?2
             GROUP BY c.type",
        )?
        .query_map((start, end), |row| {
            let category_type: String = row.get(0)?;
            let total: f64 = row.get(1)?;

            Ok((category_type, total))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    for (category_type, total) in totals {
        match category_type.parse::<CategoryType>() {
            Ok(CategoryType::Income) => total_income += total,
            Ok(CategoryType::Expense) => total_expense += total,
            Err(error) => tracing::warn!("Ignoring total for unknown category type: {error}"),
        }
    }

    Ok(Summary::new(total_income, total_expense))
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// The category table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category_id INTEGER NOT NULL REFERENCES category(id),
            transaction_date TEXT NOT NULL,
            created_at INTEGER NOT NULL DEFAULT (unixepoch()),
            updated_at INTEGER NOT NULL DEFAULT (unixepoch())
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(transaction_date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a row selected with [SELECT_TRANSACTIONS] to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let category_id = row.get(3)?;
    let category_name = row.get(4)?;
    let category_type = row.get(5)?;
    let transaction_date = row.get(6)?;
    let created_at = get_timestamp(row, 7)?;
    let updated_at = get_timestamp(row, 8)?;

    Ok(Transaction {
        id,
        amount,
        description,
        category_id,
        category_name,
        category_type,
        transaction_date,
        created_at,
        updated_at,
    })
}

fn map_category_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}
