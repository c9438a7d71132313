//! The new transaction page and the endpoint that saves its form.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use time::Date;

use crate::{
    Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{
        TransactionDraft, TransactionFormData, create_transaction,
        form_view::{CategoryOptions, TransactionFormState, transaction_form_fields},
        parse_transaction_form,
    },
    validator::Validator,
};

/// Renders the page for creating a transaction.
///
/// The date input defaults to today in the configured timezone.
pub async fn get_new_transaction_page(
    State(state): State<TransactionFormState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        CategoryOptions::load(&connection).inspect_err(|error| {
            tracing::error!("could not load categories for the new transaction page: {error}")
        })?
    };

    let draft = TransactionDraft {
        transaction_date: Some(today),
        ..Default::default()
    };

    Ok(new_transaction_view(&draft, &categories, today, &Validator::new()).into_response())
}

/// A route handler for creating a new transaction.
///
/// Redirects to the transactions page on success. If the form fails
/// validation, the form is shown again with an error under each invalid field.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Form(form): Form<TransactionFormData>,
) -> Result<Response, Error> {
    let draft = parse_transaction_form(&form)
        .inspect_err(|error| tracing::debug!("rejected transaction form: {error}"))?;
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = match draft.clone().finalize(today) {
        Ok(new_transaction) => new_transaction,
        Err(validator) => {
            let categories = CategoryOptions::load(&connection)?;
            return Ok(new_transaction_view(&draft, &categories, today, &validator).into_response());
        }
    };

    create_transaction(new_transaction, &connection).inspect_err(|error| {
        tracing::error!("An unexpected error occurred while creating a transaction: {error}")
    })?;

    Ok(Redirect::to(endpoints::TRANSACTIONS_VIEW).into_response())
}

fn new_transaction_view(
    draft: &TransactionDraft,
    categories: &CategoryOptions,
    today: Date,
    validator: &Validator,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let fields = transaction_form_fields(draft, categories, today, validator);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(endpoints::TRANSACTIONS_VIEW)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (fields)

                @if categories.income.is_empty() && categories.expense.is_empty() {
                    p class="text-sm"
                    {
                        "There are no categories yet. "
                        (link(endpoints::NEW_CATEGORY_VIEW, "Create a category"))
                        " first."
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
            }
        }
    };

    base("Create Transaction", &content)
}
