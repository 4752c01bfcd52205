//! Checks the fields of transaction creation requests.
//!
//! Every field is checked, and the problems of every request in a batch are
//! collected, so the client can fix all of them at once.

use serde::Deserialize;

use crate::{
    Error, FieldIssue,
    calendar::{Month, days_in_month},
    category::{CategoryName, CategorySelection, InlineCategory},
    flexible,
    money::{Currency, TransactionType},
    transaction::NewTransaction,
};

/// The smallest year that a transaction can be recorded in.
pub const MIN_YEAR: i64 = 2000;

/// The body of a request to create a transaction, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_f64")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    pub day: Option<i64>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "flexible::option_f64")]
    pub exchange_rate: Option<f64>,
    /// The ID of an existing category. Blank IDs are ignored.
    #[serde(default)]
    pub category_id: Option<String>,
    /// A category to create along with the transaction.
    #[serde(default)]
    pub category: Option<InlineCategoryRequest>,
}

/// The fields of a category that is created along with a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InlineCategoryRequest {
    #[serde(default, rename = "type")]
    pub category_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub transaction: NewTransaction,
    pub category: CategorySelection,
}

/// Check every request of a batch before anything is stored.
///
/// # Errors
///
/// Returns [Error::ValidationFailed] with the issues of all requests, or
/// with a single issue if `requests` is empty.
pub fn validate_batch(
    requests: &[CreateTransactionRequest],
) -> Result<Vec<ValidatedTransaction>, Error> {
    if requests.is_empty() {
        return Err(Error::ValidationFailed(vec![FieldIssue::new(
            "transactions",
            "transactions are required",
        )]));
    }

    let mut validated = Vec::with_capacity(requests.len());
    let mut issues = Vec::new();

    for (index, request) in requests.iter().enumerate() {
        match validate_transaction(index, request) {
            Ok(transaction) => validated.push(transaction),
            Err(request_issues) => issues.extend(request_issues),
        }
    }

    if !issues.is_empty() {
        return Err(Error::ValidationFailed(issues));
    }

    Ok(validated)
}

/// Check a single request that is at `index` in its batch.
pub fn validate_transaction(
    index: usize,
    request: &CreateTransactionRequest,
) -> Result<ValidatedTransaction, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let raw_type = request.transaction_type.as_deref().unwrap_or_default();
    let transaction_type = raw_type.parse::<TransactionType>().ok();
    if transaction_type.is_none() {
        issues.push(FieldIssue::at(
            index,
            "type",
            TransactionType::allowed_values_message(),
        ));
    }

    let amount = request.amount.unwrap_or_default();
    if !amount.is_finite() || amount <= 0.0 {
        issues.push(FieldIssue::at(
            index,
            "amount",
            "Amount must be greater than zero",
        ));
    }

    let raw_currency = request.currency.as_deref().unwrap_or_default();
    let currency = raw_currency.parse::<Currency>().ok();
    if currency.is_none() {
        issues.push(FieldIssue::at(index, "currency", "Unsupported currency"));
    }

    let raw_month = request.month.as_deref().unwrap_or_default();
    let month = if raw_month.is_empty() {
        issues.push(FieldIssue::at(index, "month", "Month is required"));
        None
    } else {
        let month = raw_month.parse::<Month>().ok();
        if month.is_none() {
            issues.push(FieldIssue::at(index, "month", "Invalid month"));
        }
        month
    };

    let raw_year = request.year.unwrap_or_default();
    let year = if raw_year < MIN_YEAR {
        issues.push(FieldIssue::at(index, "year", "Year must be >= 2000"));
        None
    } else {
        let year = i32::try_from(raw_year).ok();
        if year.is_none() {
            issues.push(FieldIssue::at(index, "year", "Year is out of range"));
        }
        year
    };

    let day = match request.day {
        None => None,
        Some(raw_day) => {
            let max_day = month.map_or(31, |month| days_in_month(month, raw_year));

            if raw_day < 1 || raw_day > i64::from(max_day) {
                issues.push(FieldIssue::at(
                    index,
                    "day",
                    "Day is out of range for the provided month",
                ));
            }

            u8::try_from(raw_day).ok()
        }
    };

    if request
        .exchange_rate
        .is_some_and(|exchange_rate| !exchange_rate.is_finite())
    {
        issues.push(FieldIssue::at(
            index,
            "exchangeRate",
            "Exchange rate must be a finite number",
        ));
    } else if currency.is_some_and(|currency| currency.requires_exchange_rate())
        && request.exchange_rate.is_none()
    {
        issues.push(FieldIssue::at(
            index,
            "exchangeRate",
            "Exchange rate is required for USD/EUR",
        ));
    }

    let category = validate_category(index, request, &mut issues);

    match (transaction_type, currency, month, year, category) {
        (Some(transaction_type), Some(currency), Some(month), Some(year), Some(category))
            if issues.is_empty() =>
        {
            Ok(ValidatedTransaction {
                transaction: NewTransaction {
                    transaction_type,
                    amount,
                    currency,
                    note: request.note.as_deref().unwrap_or_default().trim().to_owned(),
                    day,
                    month,
                    year,
                    exchange_rate: request.exchange_rate,
                },
                category,
            })
        }
        _ => Err(issues),
    }
}

fn validate_category(
    index: usize,
    request: &CreateTransactionRequest,
    issues: &mut Vec<FieldIssue>,
) -> Option<CategorySelection> {
    let category_id = request
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match (category_id, &request.category) {
        (None, None) => {
            issues.push(FieldIssue::at(
                index,
                "category",
                "Either categoryId or category must be provided",
            ));
            None
        }
        (Some(_), Some(_)) => {
            issues.push(FieldIssue::at(
                index,
                "category",
                "Provide only categoryId or category",
            ));
            None
        }
        (Some(category_id), None) => Some(CategorySelection::Existing(category_id.to_owned())),
        (None, Some(inline)) => validate_inline_category(index, inline, issues),
    }
}

fn validate_inline_category(
    index: usize,
    inline: &InlineCategoryRequest,
    issues: &mut Vec<FieldIssue>,
) -> Option<CategorySelection> {
    let name = CategoryName::new(inline.name.as_deref().unwrap_or_default()).ok();
    if name.is_none() {
        issues.push(FieldIssue::at(
            index,
            "category.name",
            "Category name is required",
        ));
    }

    let category_type = match inline.category_type.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw_type) => raw_type.parse::<TransactionType>().map(Some),
    };
    if category_type.is_err() {
        issues.push(FieldIssue::at(
            index,
            "category.type",
            TransactionType::allowed_values_message(),
        ));
    }

    match (name, category_type) {
        (Some(name), Ok(category_type)) => Some(CategorySelection::Inline(InlineCategory {
            category_type,
            name,
            note: inline.note.as_deref().unwrap_or_default().trim().to_owned(),
        })),
        _ => None,
    }
}
