//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction row.
pub type TransactionId = DatabaseId;

/// The ID of a category row.
pub type CategoryId = DatabaseId;
