//! Totals of a user's transactions per type and currency.

use axum::{
    Extension,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    app_state::DatabaseState,
    db::lock_connection,
    money::{Currency, TransactionType, round_to_cents},
    response::ApiResponse,
    transaction::{Transaction, TransactionFilter, filter::TransactionFilterQuery, list_transactions},
    user::UserID,
};

/// The amounts of one group of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceSummary {
    /// Everything in pesos, converting foreign amounts with their exchange rate.
    pub total: f64,
    /// The sum of the amounts in pesos.
    pub uyu: f64,
    /// The sum of the amounts in dollars.
    pub usd: f64,
    /// The sum of the amounts in euros.
    pub eur: f64,
}

impl BalanceSummary {
    /// Add `transaction` and round every figure to cents.
    ///
    /// Foreign amounts without an exchange rate only count towards their
    /// currency's sum.
    fn add(&mut self, transaction: &Transaction) {
        match transaction.currency {
            Currency::Uyu => self.uyu += transaction.amount,
            Currency::Usd => self.usd += transaction.amount,
            Currency::Eur => self.eur += transaction.amount,
        }

        if let Some(amount_in_pesos) = transaction.amount_in_pesos() {
            self.total += amount_in_pesos;
        }

        self.total = round_to_cents(self.total);
        self.uyu = round_to_cents(self.uyu);
        self.usd = round_to_cents(self.usd);
        self.eur = round_to_cents(self.eur);
    }
}

/// The balances of a user's expenses, incomes and savings.
///
/// Installments count as expenses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct TransactionBalances {
    /// Expenses and installments.
    pub expenses: BalanceSummary,
    /// Incomes.
    pub incomes: BalanceSummary,
    /// Savings.
    pub savings: BalanceSummary,
}

/// Sum the transactions of `user_id` that match `filter`.
pub fn get_balances(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<TransactionBalances, Error> {
    let transactions = list_transactions(user_id, filter, connection)?;

    Ok(summarize(&transactions))
}

fn summarize(transactions: &[Transaction]) -> TransactionBalances {
    let mut balances = TransactionBalances::default();

    for transaction in transactions {
        let summary = match transaction.transaction_type {
            TransactionType::Expense | TransactionType::Installments => &mut balances.expenses,
            TransactionType::Income => &mut balances.incomes,
            TransactionType::Saving => &mut balances.savings,
        };

        summary.add(transaction);
    }

    balances
}

/// A route handler for the balances of the transactions matching the query string.
pub async fn get_balances_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<TransactionFilterQuery>, QueryRejection>,
) -> Response {
    let filter = match query
        .map_err(|rejection| Error::InvalidParams(rejection.body_text()))
        .and_then(|Query(query)| TransactionFilter::try_from(query))
    {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let balances = lock_connection(&state.db_connection)
        .and_then(|connection| get_balances(user_id, &filter, &connection));

    match balances {
        Ok(balances) => ApiResponse::success(balances).into_response(),
        Err(error) => error.into_response(),
    }
}
