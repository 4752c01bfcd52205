//! Storing a batch of new transactions as a single unit.

use rusqlite::Connection;

use crate::{
    Error,
    category::resolve_category,
    transaction::{
        Transaction, create_transaction,
        validation::{CreateTransactionRequest, validate_batch},
    },
    user::UserID,
};

/// Validate and store `requests` for `user_id`, in order.
///
/// Every request is validated before anything is written. The categories
/// are then resolved and the transactions inserted inside one database
/// transaction, so either all transactions (and their inline categories)
/// are stored or none are.
///
/// # Errors
///
/// Returns a:
/// - [Error::ValidationFailed] if `requests` is empty or any request is invalid,
/// - [Error::CategoryNotFound] if a request refers to an unknown category,
/// - [Error::TypeMismatch] if a category's type differs from its transaction's type.
pub fn create_transactions(
    requests: &[CreateTransactionRequest],
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let validated = validate_batch(requests)?;

    let db_transaction = connection.unchecked_transaction()?;
    let mut transactions = Vec::with_capacity(validated.len());

    for request in validated {
        let category = resolve_category(
            request.category,
            request.transaction.transaction_type,
            user_id,
            &db_transaction,
        )?;
        let transaction =
            create_transaction(request.transaction, Some(category), user_id, &db_transaction)?;
        transactions.push(transaction);
    }

    db_transaction.commit()?;

    tracing::debug!(
        "Created {} transactions for user {user_id}",
        transactions.len()
    );

    Ok(transactions)
}
