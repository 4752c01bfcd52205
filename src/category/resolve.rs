//! Finding or creating the category of a new transaction.

use rusqlite::Connection;
use uuid::Uuid;

use crate::{
    Error,
    category::{Category, CategoryName, NewCategory, create_category, get_category},
    money::TransactionType,
    user::UserID,
};

/// A category that is created together with a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineCategory {
    /// When `None`, the category takes the type of the transaction.
    pub category_type: Option<TransactionType>,
    pub name: CategoryName,
    pub note: String,
}

/// How a new transaction refers to its category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategorySelection {
    /// The raw ID of an existing category, as sent by the client.
    Existing(String),
    /// A category to create.
    Inline(InlineCategory),
}

/// Get the category for a transaction of `transaction_type`, creating it if
/// it was given inline.
///
/// # Errors
///
/// Returns a:
/// - [Error::CategoryNotFound] if an existing category was selected that
///   does not exist, belongs to another user or whose ID is malformed,
/// - [Error::TypeMismatch] if the category's type is not `transaction_type`.
pub fn resolve_category(
    selection: CategorySelection,
    transaction_type: TransactionType,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    match selection {
        CategorySelection::Existing(raw_id) => {
            let category_id =
                Uuid::parse_str(raw_id.trim()).map_err(|_| Error::CategoryNotFound)?;
            let category = get_category(category_id, user_id, connection)?;

            if category.category_type != transaction_type {
                return Err(Error::TypeMismatch);
            }

            Ok(category)
        }
        CategorySelection::Inline(inline) => {
            let category_type = inline.category_type.unwrap_or(transaction_type);

            if category_type != transaction_type {
                return Err(Error::TypeMismatch);
            }

            create_category(
                NewCategory {
                    category_type,
                    name: inline.name,
                    note: inline.note,
                },
                user_id,
                connection,
            )
        }
    }
}
