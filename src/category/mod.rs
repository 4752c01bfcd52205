//! Categories group a user's transactions of one type.

mod create;
mod db;
mod delete;
mod domain;
mod list;
mod resolve;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
};
pub(crate) use db::map_category_row;
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, NewCategory};
pub use list::{get_categories_endpoint, get_category_endpoint};
pub use resolve::{CategorySelection, InlineCategory, resolve_category};
