//! Ledgerline is a web app for tracking personal income and expenses.
//!
//! This library provides an HTTP server that directly serves HTML pages: a
//! dashboard with the current month's totals, a filterable and sortable list
//! of transactions, and forms for recording transactions and categories.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod dashboard;
mod database_id;
mod date_range;
mod db;
mod endpoints;
mod error_page;
mod html;
mod logging;
mod navigation;
mod routing;
mod timezone;
mod transaction;
mod validator;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    Category, CategoryName, CategoryType, NewCategory, create_category, delete_category,
    get_all_categories, get_categories_by_type, get_category, update_category,
};
pub use database_id::{CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    NewTransaction, SortBy, SortDirection, Summary, Transaction, TransactionFilter,
    count_transactions, create_transaction, delete_transaction, get_summary, get_transaction,
    get_transactions, update_transaction,
};

use crate::error_page::ErrorPage;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for ctrl+c: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The submitted form could not be converted into typed values, e.g. a
    /// non-numeric amount or a date that is not formatted as YYYY-MM-DD.
    ///
    /// The string is shown to the client.
    #[error("{0}")]
    InvalidForm(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows or when
    /// an update does not affect any rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The category ID used to write a transaction does not refer to a
    /// category in the database.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidForm(message) => ErrorPage {
                status_code: StatusCode::BAD_REQUEST,
                description: "The form could not be read.",
                fix: &message,
            }
            .into_response(),
            // Missing records are reported as server errors, the same as
            // any other persistence failure.
            Error::NotFound => ErrorPage {
                status_code: StatusCode::INTERNAL_SERVER_ERROR,
                description: "The requested record could not be found.",
                fix: "Check that the link is correct or go back to the transactions page.",
            }
            .into_response(),
            Error::InvalidCategory(category_id) => ErrorPage {
                status_code: StatusCode::INTERNAL_SERVER_ERROR,
                description: "Invalid category.",
                fix: &format!("Could not find a category with the ID {category_id}."),
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage {
                status_code: StatusCode::INTERNAL_SERVER_ERROR,
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::default().into_response()
            }
        }
    }
}
