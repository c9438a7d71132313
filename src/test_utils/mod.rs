#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{db::initialize, transaction::TransactionFormState};

pub(crate) use form::{
    assert_field_error, assert_form_action, assert_form_input, assert_form_input_with_value,
    assert_form_select, assert_form_submit_button, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_text};
pub(crate) use http::{assert_content_type, assert_redirect};

/// An in-memory database with the tables and default categories.
pub(crate) fn test_connection() -> Arc<Mutex<Connection>> {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

/// Form state backed by [test_connection] in the UTC timezone.
pub(crate) fn transaction_form_state() -> TransactionFormState {
    TransactionFormState {
        local_timezone: "Etc/UTC".to_owned(),
        db_connection: test_connection(),
    }
}
