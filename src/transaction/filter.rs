//! Narrowing down the transactions that are listed or summed.

use serde::Deserialize;

use crate::{Error, calendar::Month, money::TransactionType, transaction::validation::MIN_YEAR};

/// The raw query string of the list and balance endpoints.
///
/// Empty values are treated as if they were not given.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilterQuery {
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Conditions a transaction must meet, all of which must hold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub day: Option<u8>,
    pub month: Option<Month>,
    pub year: Option<i32>,
}

impl TryFrom<TransactionFilterQuery> for TransactionFilter {
    type Error = Error;

    /// # Errors
    ///
    /// Returns [Error::InvalidParams] naming the first invalid parameter.
    fn try_from(query: TransactionFilterQuery) -> Result<Self, Self::Error> {
        let mut filter = TransactionFilter::default();

        if let Some(raw_type) = non_empty(&query.transaction_type) {
            let transaction_type = raw_type
                .parse()
                .map_err(|_| Error::InvalidParams("Invalid transaction type".to_owned()))?;
            filter.transaction_type = Some(transaction_type);
        }

        if let Some(raw_month) = non_empty(&query.month) {
            let month = raw_month
                .parse()
                .map_err(|_| Error::InvalidParams("Invalid month".to_owned()))?;
            filter.month = Some(month);
        }

        if let Some(raw_day) = non_empty(&query.day) {
            let day = raw_day
                .parse::<u8>()
                .ok()
                .filter(|day| (1..=31).contains(day))
                .ok_or_else(|| Error::InvalidParams("Day must be between 1 and 31".to_owned()))?;
            filter.day = Some(day);
        }

        if let Some(raw_year) = non_empty(&query.year) {
            let year = raw_year
                .parse::<i32>()
                .ok()
                .filter(|&year| i64::from(year) >= MIN_YEAR)
                .ok_or_else(|| Error::InvalidParams("Year must be >= 2000".to_owned()))?;
            filter.year = Some(year);
        }

        Ok(filter)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
