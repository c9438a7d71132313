//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryDraft, CategoryFormData, CategoryType, create_category},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        field_error,
    },
    navigation::NavBar,
    validator::Validator,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page() -> Response {
    new_category_view(&CategoryDraft::default(), &Validator::new()).into_response()
}

/// Handle category creation form submission.
///
/// Redirects to the new transaction page on success so the new category can
/// be used straight away.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Form(form): Form<CategoryFormData>,
) -> Result<Response, Error> {
    let draft = CategoryDraft::from(form);

    let new_category = match draft.clone().finalize() {
        Ok(new_category) => new_category,
        Err(validator) => return Ok(new_category_view(&draft, &validator).into_response()),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_category(new_category, &connection).inspect_err(|error| {
        tracing::error!("An unexpected error occurred while creating a category: {error}")
    })?;

    Ok(Redirect::to(endpoints::NEW_TRANSACTION_VIEW).into_response())
}

fn new_category_view(draft: &CategoryDraft, validator: &Validator) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let form = new_category_form_view(draft, validator);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &content)
}

fn new_category_form_view(draft: &CategoryDraft, validator: &Validator) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::POST_CATEGORY)
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Category" }

            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(draft.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(validator, "name"))
            }

            div
            {
                label
                    for="type"
                    class=(FORM_LABEL_STYLE)
                {
                    "Type"
                }

                select
                    id="type"
                    name="type"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a type" }

                    @for category_type in [CategoryType::Income, CategoryType::Expense] {
                        option
                            value=(category_type.as_str())
                            selected[draft.category_type == category_type.as_str()]
                        {
                            (category_type.label())
                        }
                    }
                }

                (field_error(validator, "type"))
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
        }
    }
}
