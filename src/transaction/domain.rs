//! Core transaction domain types and the rules a transaction must follow.

use time::{Date, OffsetDateTime};

use crate::{
    category::CategoryType,
    database_id::{CategoryId, TransactionId},
    validator::{Validator, max_chars},
};

/// The most characters a transaction description may have.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The category name and type are read from the category table and are never
/// written through a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The name of the category the transaction belongs to.
    pub category_name: String,
    /// Whether the transaction is income or an expense.
    pub category_type: CategoryType,
    /// When the transaction happened.
    pub transaction_date: Date,
    /// When the transaction was first saved.
    pub created_at: OffsetDateTime,
    /// When the transaction was last saved.
    pub updated_at: OffsetDateTime,
}

/// The validated fields needed to insert or replace a transaction.
///
/// Use [TransactionDraft::finalize] to create one from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub transaction_date: Date,
}

/// A transaction with typed fields that has not been checked against the
/// transaction rules yet.
///
/// Missing numbers are zero and a missing date is `None` so that validation
/// can report them per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub id: Option<TransactionId>,
    pub amount: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub transaction_date: Option<Date>,
}

impl TransactionDraft {
    /// Check the draft against the transaction rules.
    ///
    /// `today` is the current date in the user's timezone. Dates up to one
    /// day after `today` are accepted.
    pub fn validate(&self, today: Date) -> Validator {
        let mut validator = Validator::new();

        validator.check(
            self.amount > 0.0,
            "amount",
            "Amount must be greater than zero",
        );
        validator.check(
            max_chars(&self.description, DESCRIPTION_MAX_CHARS),
            "description",
            "Description cannot exceed 500 characters",
        );
        validator.check(
            self.category_id > 0,
            "category_id",
            "Please select a valid category",
        );

        match self.transaction_date {
            None => validator.add_error("transaction_date", "Transaction date is required"),
            Some(date) => validator.check(
                today.next_day().is_none_or(|latest_date| date <= latest_date),
                "transaction_date",
                "Transaction date cannot be in the future",
            ),
        }

        validator
    }

    /// Convert the draft into a [NewTransaction].
    ///
    /// # Errors
    /// Returns the [Validator] holding the field errors if any rule fails.
    pub fn finalize(self, today: Date) -> Result<NewTransaction, Validator> {
        let validator = self.validate(today);

        match self.transaction_date {
            Some(transaction_date) if validator.is_valid() => Ok(NewTransaction {
                amount: self.amount,
                description: self.description,
                category_id: self.category_id,
                transaction_date,
            }),
            _ => Err(validator),
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: Some(transaction.id),
            amount: transaction.amount,
            description: transaction.description.clone(),
            category_id: transaction.category_id,
            transaction_date: Some(transaction.transaction_date),
        }
    }
}

/// Income, expense and balance totals over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl Summary {
    /// Create a summary where the balance is income minus expenses.
    pub fn new(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}
