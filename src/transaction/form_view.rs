//! The form fields and state shared by the create and edit transaction pages.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    AppState, Error,
    category::{Category, CategoryType, get_categories_by_type},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error},
    transaction::TransactionDraft,
    validator::Validator,
};

/// The state needed by the pages and endpoints that show a transaction form.
#[derive(Debug, Clone)]
pub struct TransactionFormState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accessing transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The categories offered in the category drop-down, grouped by type.
#[derive(Debug, Clone, Default)]
pub struct CategoryOptions {
    pub income: Vec<Category>,
    pub expense: Vec<Category>,
}

impl CategoryOptions {
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            income: get_categories_by_type(CategoryType::Income, connection)?,
            expense: get_categories_by_type(CategoryType::Expense, connection)?,
        })
    }
}

/// The amount, date, description and category inputs.
///
/// `draft` fills in the inputs and `validator` adds an error message under
/// each invalid input.
pub fn transaction_form_fields(
    draft: &TransactionDraft,
    categories: &CategoryOptions,
    today: Date,
    validator: &Validator,
) -> Markup {
    let max_date = today + Duration::days(1);
    // Shown unrounded so that saving the form unchanged keeps the stored amount.
    let amount = if draft.amount == 0.0 {
        String::new()
    } else {
        draft.amount.to_string()
    };
    let transaction_date = draft
        .transaction_date
        .map(|date| date.to_string())
        .unwrap_or_default();

    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="any"
                min="0"
                placeholder="0.00"
                value=(amount)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(validator, "amount"))
        }

        div
        {
            label
                for="transaction_date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="transaction_date"
                id="transaction_date"
                type="date"
                max=(max_date)
                value=(transaction_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(validator, "transaction_date"))
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                maxlength="500"
                placeholder="Description"
                value=(draft.description)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(validator, "description"))
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for (label, group) in [("Income", &categories.income), ("Expense", &categories.expense)] {
                    @if !group.is_empty() {
                        optgroup label=(label)
                        {
                            @for category in group {
                                option
                                    value=(category.id)
                                    selected[category.id == draft.category_id]
                                {
                                    (category.name)
                                }
                            }
                        }
                    }
                }
            }

            (field_error(validator, "category_id"))
        }
    }
}
