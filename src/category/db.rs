//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName, CategoryType, NewCategory},
    database_id::CategoryId,
    db::get_timestamp,
};

/// The categories inserted into an empty database.
const DEFAULT_CATEGORIES: [(&str, CategoryType); 9] = [
    ("Salary", CategoryType::Income),
    ("Freelance", CategoryType::Income),
    ("Other Income", CategoryType::Income),
    ("Groceries", CategoryType::Expense),
    ("Rent", CategoryType::Expense),
    ("Utilities", CategoryType::Expense),
    ("Transport", CategoryType::Expense),
    ("Entertainment", CategoryType::Expense),
    ("Other Expense", CategoryType::Expense),
];

/// Create a category and return it with its generated ID and timestamps.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, type) VALUES (?1, ?2)
             RETURNING id, name, type, created_at, updated_at",
        )?
        .query_row(
            (category.name.as_ref(), category.category_type),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single category by ID.
///
/// # Errors
/// Returns [Error::NotFound] if `category_id` does not refer to a category.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type, created_at, updated_at FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, type, created_at, updated_at FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories of one type ordered alphabetically by name.
pub fn get_categories_by_type(
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, created_at, updated_at FROM category
             WHERE type = ?1 ORDER BY name ASC;",
        )?
        .query_map([category_type], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace a category's name and type.
///
/// # Errors
/// Returns [Error::NotFound] if no category has the ID `category_id`.
pub fn update_category(
    category_id: CategoryId,
    category: NewCategory,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2, updated_at = unixepoch() WHERE id = ?3",
        (category.name.as_ref(), category.category_type, category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// Deleting a category that does not exist is not an error.
///
/// # Errors
/// Returns an [Error::SqlError] if any transaction still belongs to the category.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            created_at INTEGER NOT NULL DEFAULT (unixepoch()),
            updated_at INTEGER NOT NULL DEFAULT (unixepoch())
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// Insert the default categories if the category table is empty.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM category;", [], |row| {
        row.get(0)
    })?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection.prepare("INSERT INTO category (name, type) VALUES (?1, ?2)")?;

    for (name, category_type) in DEFAULT_CATEGORIES {
        statement.execute((name, category_type))?;
    }

    tracing::info!("Inserted {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let category_type = row.get(2)?;
    let created_at = get_timestamp(row, 3)?;
    let updated_at = get_timestamp(row, 4)?;

    Ok(Category {
        id,
        name,
        category_type,
        created_at,
        updated_at,
    })
}
