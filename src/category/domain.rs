//! Core category domain types.

use std::fmt::Display;

use serde::Serialize;
use uuid::Uuid;

use crate::{Error, money::TransactionType, user::UserID};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = Uuid;

/// A user defined group of transactions of one type, e.g. 'Groceries' for
/// expenses or 'Salary' for incomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: CategoryId,
    /// Transactions in this category must have the same type.
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub name: CategoryName,
    pub note: String,
    #[serde(skip)]
    pub user_id: UserID,
}

/// The data for a category that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub category_type: TransactionType,
    pub name: CategoryName,
    pub note: String,
}
