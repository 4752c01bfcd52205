//! Core transaction domain types.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    calendar::Month,
    category::{Category, CategoryId},
    money::{Currency, TransactionType},
    user::UserID,
};

/// Database identifier for a transaction.
pub type TransactionId = Uuid;

/// An amount of money that came in, went out or was put aside in a given month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "transactionId")]
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Always greater than zero.
    pub amount: f64,
    pub currency: Currency,
    pub note: String,
    /// The day of the month, if known.
    pub day: Option<u8>,
    pub month: Month,
    pub year: i32,
    /// Pesos per unit of `currency`. Always present for dollars and euros.
    pub exchange_rate: Option<f64>,
    pub category_id: Option<CategoryId>,
    pub category: Option<Category>,
    #[serde(skip)]
    pub user_id: UserID,
}

/// The validated data for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub currency: Currency,
    pub note: String,
    pub day: Option<u8>,
    pub month: Month,
    pub year: i32,
    pub exchange_rate: Option<f64>,
}

impl Transaction {
    /// The amount converted to pesos, or `None` for a foreign currency
    /// without an exchange rate.
    pub fn amount_in_pesos(&self) -> Option<f64> {
        match self.currency {
            Currency::Uyu => Some(self.amount),
            Currency::Usd | Currency::Eur => self.exchange_rate.map(|rate| self.amount * rate),
        }
    }
}
