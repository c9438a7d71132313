//! Builds the SQL for listing transactions from a [TransactionFilter].
//!
//! Filter values are always bound as parameters. The sort column and
//! direction come from closed enums, so no user input is ever spliced into
//! the query text.

use rusqlite::{ToSql, types::ToSqlOutput};
use time::Date;

use crate::{category::CategoryType, database_id::CategoryId};

/// Selects every transaction joined with its category.
///
/// The column order must match [crate::transaction::map_transaction_row].
pub(crate) const SELECT_TRANSACTIONS: &str = "SELECT t.id, t.amount, t.description, \
    t.category_id, c.name, c.type, t.transaction_date, t.created_at, t.updated_at \
    FROM \"transaction\" t JOIN category c ON t.category_id = c.id";

/// The column to order transactions by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    Amount,
    Category,
    #[default]
    Date,
}

impl SortBy {
    /// Parse the `sort_by` query parameter.
    ///
    /// Unknown values fall back to sorting by date.
    pub fn from_query(value: &str) -> Self {
        match value {
            "amount" => SortBy::Amount,
            "category" => SortBy::Category,
            _ => SortBy::Date,
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            SortBy::Amount => "amount",
            SortBy::Category => "category",
            SortBy::Date => "date",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Amount => "Amount",
            SortBy::Category => "Category",
            SortBy::Date => "Date",
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortBy::Amount => "t.amount",
            SortBy::Category => "c.name",
            SortBy::Date => "t.transaction_date",
        }
    }
}

/// The direction to order transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse the `sort_dir` query parameter.
    ///
    /// Only the exact string "ASC" sorts ascending, anything else sorts descending.
    pub fn from_query(value: &str) -> Self {
        if value == "ASC" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    /// The SQL keyword, which is also the query parameter value.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Optional criteria and sort order for listing transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions in this category. Ignored unless positive.
    pub category_id: Option<CategoryId>,
    /// Only include income or only include expenses.
    pub category_type: Option<CategoryType>,
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    /// The most rows to return.
    pub limit: Option<u32>,
}

/// A value bound to a placeholder in a [TransactionQuery].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
    Date(Date),
}

impl ToSql for FilterValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FilterValue::Integer(value) => value.to_sql(),
            FilterValue::Text(value) => value.to_sql(),
            FilterValue::Date(value) => value.to_sql(),
        }
    }
}

/// SQL text with numbered placeholders and the values to bind to them.
///
/// The value at index `i` of `params` binds to the placeholder `?{i + 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub sql: String,
    pub params: Vec<FilterValue>,
}

struct Predicate {
    column: &'static str,
    operator: &'static str,
    value: FilterValue,
}

/// Translate `filter` into a parameterized query.
///
/// Predicates are added in the order category ID, category type, start date
/// and end date. Equal sort keys are ordered by transaction ID in the same
/// direction so that pages are stable between requests.
pub fn build_transaction_query(filter: &TransactionFilter) -> TransactionQuery {
    let mut predicates = Vec::new();

    if let Some(category_id) = filter.category_id.filter(|id| *id > 0) {
        predicates.push(Predicate {
            column: "t.category_id",
            operator: "=",
            value: FilterValue::Integer(category_id),
        });
    }

    if let Some(category_type) = filter.category_type {
        predicates.push(Predicate {
            column: "c.type",
            operator: "=",
            value: FilterValue::Text(category_type.as_str().to_owned()),
        });
    }

    if let Some(start_date) = filter.start_date {
        predicates.push(Predicate {
            column: "t.transaction_date",
            operator: ">=",
            value: FilterValue::Date(start_date),
        });
    }

    if let Some(end_date) = filter.end_date {
        predicates.push(Predicate {
            column: "t.transaction_date",
            operator: "<=",
            value: FilterValue::Date(end_date),
        });
    }

    let mut sql = format!("{SELECT_TRANSACTIONS} WHERE 1=1");
    let mut params = Vec::with_capacity(predicates.len() + 1);

    for predicate in predicates {
        params.push(predicate.value);
        sql.push_str(&format!(
            " AND {} {} ?{}",
            predicate.column,
            predicate.operator,
            params.len()
        ));
    }

    let direction = filter.sort_direction.as_sql();
    sql.push_str(&format!(
        " ORDER BY {} {direction}, t.id {direction}",
        filter.sort_by.column()
    ));

    if let Some(limit) = filter.limit {
        params.push(FilterValue::Integer(i64::from(limit)));
        sql.push_str(&format!(" LIMIT ?{}", params.len()));
    }

    TransactionQuery { sql, params }
}
