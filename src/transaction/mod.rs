//! Transactions: money earned or spent on a given date in a category.
//!
//! This module contains:
//! - The `Transaction` model and the `TransactionDraft` used to validate user input
//! - Database functions for storing, querying and totalling transactions
//! - The filter and query builder behind the transactions page
//! - View handlers for the transaction pages and endpoints

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod form_view;
mod list;
mod query;
mod view;

pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use db::{
    count_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_summary, get_transaction, get_transactions, map_transaction_row, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{DESCRIPTION_MAX_CHARS, NewTransaction, Summary, Transaction, TransactionDraft};
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use form::{TransactionFormData, parse_transaction_form};
pub use form_view::TransactionFormState;
pub use list::{TransactionsQuery, get_transactions_page};
pub use query::{SortBy, SortDirection, TransactionFilter};
pub use view::{summary_view, transactions_table};
