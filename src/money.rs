//! Transaction types, currencies and rounding of money amounts.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::UnknownVariant;

/// What kind of money movement a transaction or category represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Money put aside.
    Saving,
    /// A payment towards a purchase that is paid off over time.
    Installments,
}

impl TransactionType {
    /// Every transaction type, in the order they are listed to clients.
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Saving,
        TransactionType::Installments,
    ];

    /// The canonical upper case name, e.g. "INCOME".
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Saving => "SAVING",
            TransactionType::Installments => "INSTALLMENTS",
        }
    }

    /// The message shown when a value is not one of the transaction types.
    pub fn allowed_values_message() -> String {
        let names: Vec<_> = Self::ALL.iter().map(TransactionType::as_str).collect();

        format!("Allowed values: {}", names.join(", "))
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();

        Self::ALL
            .into_iter()
            .find(|transaction_type| transaction_type.as_str() == upper)
            .ok_or_else(|| UnknownVariant {
                kind: "transaction type",
                value: s.to_owned(),
            })
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The currencies that transactions can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollars.
    Usd,
    /// Uruguayan pesos, the currency that totals are expressed in.
    Uyu,
    /// Euros.
    Eur,
}

impl Currency {
    const ALL: [Currency; 3] = [Currency::Usd, Currency::Uyu, Currency::Eur];

    /// The ISO 4217 code, e.g. "USD".
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Uyu => "UYU",
            Currency::Eur => "EUR",
        }
    }

    /// Foreign currencies need an exchange rate to pesos.
    pub fn requires_exchange_rate(&self) -> bool {
        matches!(self, Currency::Usd | Currency::Eur)
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();

        Self::ALL
            .into_iter()
            .find(|currency| currency.as_str() == upper)
            .ok_or_else(|| UnknownVariant {
                kind: "currency",
                value: s.to_owned(),
            })
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Round `value` to two decimal places, with halves rounded away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
