//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    database_id::CategoryId,
    validator::{Validator, max_chars, not_blank},
};

/// The most characters a category name may have.
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Whether money in a category is earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl CategoryType {
    /// The lowercase name used in forms, query strings and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    /// The capitalised name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            CategoryType::Income => "Income",
            CategoryType::Expense => "Expense",
        }
    }
}

/// The error returned when parsing a string that is not a category type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a category type, expected \"income\" or \"expense\"")]
pub struct ParseCategoryTypeError(String);

impl FromStr for CategoryType {
    type Err = ParseCategoryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(ParseCategoryTypeError(other.to_owned())),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated, non-blank category name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not blank and has at most
    /// [CATEGORY_NAME_MAX_CHARS] characters, e.g. via [CategoryDraft::finalize].
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of transactions, e.g. 'Groceries' or 'Salary'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub category_type: CategoryType,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The fields needed to insert or replace a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub category_type: CategoryType,
}

/// Raw form data for category creation.
///
/// Missing fields are treated the same as empty strings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// A category as entered by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub category_type: String,
}

impl From<CategoryFormData> for CategoryDraft {
    fn from(form: CategoryFormData) -> Self {
        Self {
            name: form.name.unwrap_or_default(),
            category_type: form.category_type.unwrap_or_default(),
        }
    }
}

impl CategoryDraft {
    /// Check the draft against the category rules.
    pub fn validate(&self) -> Validator {
        let mut validator = Validator::new();

        validator.check(not_blank(&self.name), "name", "Category name is required");
        validator.check(
            max_chars(&self.name, CATEGORY_NAME_MAX_CHARS),
            "name",
            "Category name cannot exceed 100 characters",
        );
        validator.check(
            not_blank(&self.category_type),
            "type",
            "Category type is required",
        );
        validator.check(
            self.category_type.parse::<CategoryType>().is_ok(),
            "type",
            "Category type must be either 'income' or 'expense'",
        );

        validator
    }

    /// Convert the draft into a [NewCategory].
    ///
    /// # Errors
    /// Returns the [Validator] holding the field errors if any rule fails.
    pub fn finalize(self) -> Result<NewCategory, Validator> {
        let validator = self.validate();

        match self.category_type.parse::<CategoryType>() {
            Ok(category_type) if validator.is_valid() => Ok(NewCategory {
                name: CategoryName::new_unchecked(self.name.trim()),
                category_type,
            }),
            _ => Err(validator),
        }
    }
}
