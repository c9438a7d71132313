//! Categories group transactions and mark them as income or expense.

mod create;
mod db;
mod domain;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories,
    get_categories_by_type, get_category, seed_default_categories, update_category,
};
pub use domain::{
    CATEGORY_NAME_MAX_CHARS, Category, CategoryDraft, CategoryFormData, CategoryName, CategoryType,
    NewCategory, ParseCategoryTypeError,
};
