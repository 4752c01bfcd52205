//! Database operations for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    category::{Category, map_category_row},
    transaction::{NewTransaction, Transaction, TransactionFilter, TransactionId},
    user::UserID,
};

/// Selects the transaction columns followed by the columns of its category.
const SELECT_TRANSACTION_WITH_CATEGORY: &str = "SELECT t.id, t.type, t.amount, t.currency, \
    t.note, t.day, t.month, t.year, t.exchange_rate, t.category_id, t.user_id, \
    c.id, c.type, c.name, c.note, c.user_id \
    FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id";

/// The column that the category columns start at.
const CATEGORY_OFFSET: usize = 11;

/// Store a validated transaction for `user_id` in `category`.
///
/// The category is expected to belong to `user_id` and to have the same type
/// as the transaction.
pub fn create_transaction(
    new_transaction: NewTransaction,
    category: Option<Category>,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = Transaction {
        id: Uuid::new_v4(),
        transaction_type: new_transaction.transaction_type,
        amount: new_transaction.amount,
        currency: new_transaction.currency,
        note: new_transaction.note,
        day: new_transaction.day,
        month: new_transaction.month,
        year: new_transaction.year,
        exchange_rate: new_transaction.exchange_rate,
        category_id: category.as_ref().map(|category| category.id),
        category,
        user_id,
    };

    connection.execute(
        "INSERT INTO \"transaction\" (id, type, amount, currency, note, day, month, year, \
            exchange_rate, category_id, user_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        (
            transaction.id,
            transaction.transaction_type,
            transaction.amount,
            transaction.currency,
            &transaction.note,
            transaction.day,
            transaction.month,
            transaction.year,
            transaction.exchange_rate,
            transaction.category_id,
            user_id.as_uuid(),
            OffsetDateTime::now_utc(),
        ),
    )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id`, with its category.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if the transaction does not exist or
/// belongs to another user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION_WITH_CATEGORY} WHERE t.id = :id AND t.user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_uuid())],
            map_transaction_row,
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::TransactionNotFound,
            error => error,
        })
}

/// Retrieve the transactions of `user_id` that match `filter`, newest first.
pub fn list_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clause_parts = vec!["t.user_id = ?1".to_owned()];
    let mut query_parameters = vec![Value::Blob(user_id.as_uuid().as_bytes().to_vec())];

    if let Some(transaction_type) = filter.transaction_type {
        query_parameters.push(Value::Text(transaction_type.as_str().to_owned()));
        where_clause_parts.push(format!("t.type = ?{}", query_parameters.len()));
    }

    if let Some(day) = filter.day {
        query_parameters.push(Value::Integer(i64::from(day)));
        where_clause_parts.push(format!("t.day = ?{}", query_parameters.len()));
    }

    if let Some(month) = filter.month {
        query_parameters.push(Value::Text(month.as_str().to_owned()));
        where_clause_parts.push(format!("t.month = ?{}", query_parameters.len()));
    }

    if let Some(year) = filter.year {
        query_parameters.push(Value::Integer(i64::from(year)));
        where_clause_parts.push(format!("t.year = ?{}", query_parameters.len()));
    }

    let query_string = format!(
        "{SELECT_TRANSACTION_WITH_CATEGORY} WHERE {} ORDER BY t.created_at DESC, t.rowid DESC",
        where_clause_parts.join(" AND ")
    );
    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if no transaction was deleted.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_uuid()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Create the transaction table and its indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id BLOB PRIMARY KEY,
            type TEXT NOT NULL,
            amount REAL NOT NULL,
            currency TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            day INTEGER,
            month TEXT NOT NULL,
            year INTEGER NOT NULL,
            exchange_rate REAL,
            category_id BLOB,
            user_id BLOB NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_created
            ON \"transaction\"(user_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a row selected with its category columns to a [Transaction].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let joined_category_id: Option<Uuid> = row.get(CATEGORY_OFFSET)?;
    let category = match joined_category_id {
        Some(_) => Some(map_category_row(row, CATEGORY_OFFSET)?),
        None => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        note: row.get(4)?,
        day: row.get(5)?,
        month: row.get(6)?,
        year: row.get(7)?,
        exchange_rate: row.get(8)?,
        category_id: row.get(9)?,
        category,
        user_id: UserID::new(row.get(10)?),
    })
}
