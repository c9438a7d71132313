//! The edit transaction page and the endpoint that saves its form.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{
        TransactionDraft, TransactionFormData,
        form_view::{CategoryOptions, TransactionFormState, transaction_form_fields},
        get_transaction, parse_transaction_form, update_transaction,
    },
    validator::Validator,
};

/// Renders the page for editing the transaction `transaction_id`.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::error!("could not get transaction {transaction_id}: {error}")
    })?;
    let categories = CategoryOptions::load(&connection)?;

    let draft = TransactionDraft::from(&transaction);

    Ok(edit_transaction_view(
        transaction_id,
        &draft,
        &categories,
        today,
        &Validator::new(),
    )
    .into_response())
}

/// A route handler for replacing the fields of the transaction `transaction_id`.
///
/// The ID in the path is authoritative, any ID in the form body is ignored.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Result<Response, Error> {
    let draft = TransactionDraft {
        id: Some(transaction_id),
        ..parse_transaction_form(&form)
            .inspect_err(|error| tracing::debug!("rejected transaction form: {error}"))?
    };
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
            return Ok(
                edit_transaction_view(transaction_id, &draft, &categories, today, &validator)
                    .into_response(),
            );
        }
    };

    update_transaction(transaction_id, new_transaction, &connection).inspect_err(|error| {
        tracing::error!("could not update transaction {transaction_id}: {error}")
    })?;

    Ok(Redirect::to(endpoints::TRANSACTIONS_VIEW).into_response())
}

fn edit_transaction_view(
    transaction_id: TransactionId,
    draft: &TransactionDraft,
    categories: &CategoryOptions,
    today: Date,
    validator: &Validator,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let fields = transaction_form_fields(draft, categories, today, validator);
    let update_url = format_endpoint(endpoints::PUT_TRANSACTION, transaction_id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(update_url)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                input type="hidden" name="id" value=(transaction_id);

                (fields)

                div class="flex gap-4"
                {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Transaction" }
                }
            }
        }
    };

    base("Edit Transaction", &content)
}
