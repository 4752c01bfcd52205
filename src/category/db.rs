//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, NewCategory},
    user::UserID,
};

/// Create a category for `user_id` and return it with its generated ID.
pub fn create_category(
    new_category: NewCategory,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = Category {
        id: Uuid::new_v4(),
        category_type: new_category.category_type,
        name: new_category.name,
        note: new_category.note,
        user_id,
    };

    connection.execute(
        "INSERT INTO category (id, type, name, note, user_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            category.id,
            category.category_type,
            category.name.as_ref(),
            &category.note,
            user_id.as_uuid(),
            OffsetDateTime::now_utc(),
        ),
    )?;

    Ok(category)
}

/// Retrieve a single category owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or
/// belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, type, name, note, user_id FROM category
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_uuid())],
            |row| map_category_row(row, 0),
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::CategoryNotFound,
            error => error,
        })
}

/// Retrieve all of the categories owned by `user_id`, newest first.
pub fn get_all_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, type, name, note, user_id FROM category
            WHERE user_id = :user_id
            ORDER BY created_at DESC, rowid DESC;",
        )?
        .query_map(&[(":user_id", &user_id.as_uuid())], |row| {
            map_category_row(row, 0)
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category owned by `user_id`.
///
/// A category that still has transactions is only deleted when
/// `delete_transactions` is set, in which case its transactions are deleted
/// as well. Either everything is deleted or nothing is.
///
/// # Errors
///
/// Returns a:
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user,
/// - [Error::CategoryHasTransactions] if the category has transactions and
///   `delete_transactions` is false.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    delete_transactions: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    get_category(category_id, user_id, &transaction)?;

    let transaction_count: i64 = transaction.query_row(
        "SELECT COUNT(*) FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_uuid()),
        |row| row.get(0),
    )?;

    if transaction_count > 0 {
        if !delete_transactions {
            return Err(Error::CategoryHasTransactions);
        }

        transaction.execute(
            "DELETE FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2",
            (category_id, user_id.as_uuid()),
        )?;
        tracing::debug!("Deleted {transaction_count} transactions of category {category_id}");
    }

    transaction.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_uuid()),
    )?;

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id BLOB PRIMARY KEY,
            type TEXT NOT NULL,
            name TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            user_id BLOB NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Map the five category columns `id, type, name, note, user_id` that start
/// at column `offset`.
pub(crate) fn map_category_row(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(offset + 2)?;

    Ok(Category {
        id: row.get(offset)?,
        category_type: row.get(offset + 1)?,
        name: CategoryName::new_unchecked(&raw_name),
        note: row.get(offset + 3)?,
        user_id: UserID::new(row.get(offset + 4)?),
    })
}
