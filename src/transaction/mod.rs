//! Transactions record money that came in, went out or was put aside.
//!
//! This module contains:
//! - The `Transaction` model and the validation of creation requests
//! - Database functions for storing, querying and deleting transactions
//! - The balance, month and savings summaries
//! - The JSON endpoints for all of the above

mod balance;
mod create;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod filter;
mod list_endpoint;
mod months;
mod savings;
mod validation;

pub use balance::{BalanceSummary, TransactionBalances, get_balances, get_balances_endpoint};
pub use create::create_transactions;
pub use create_endpoint::create_transactions_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    list_transactions,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use domain::{NewTransaction, Transaction, TransactionId};
pub use filter::TransactionFilter;
pub use list_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
pub use months::{get_months_by_year, get_months_by_year_endpoint};
pub use savings::{get_total_savings, get_total_savings_endpoint};
pub use validation::CreateTransactionRequest;
