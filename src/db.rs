//! Database set-up and helpers shared by the category and transaction stores.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    transaction::create_transaction_table,
};

/// Create the tables for the domain models and insert the default categories.
///
/// Foreign key enforcement is switched on for `connection`, so this function
/// should be called once for every new connection.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, otherwise SQLite ignores it.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a Unix timestamp in seconds from column `index` of `row`.
pub(crate) fn get_timestamp(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let seconds: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp(seconds).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}
