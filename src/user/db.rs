//! Code for creating the user table and fetching users from the database.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    user::{NewUser, PasswordHash, User, UserID, normalize_email},
};

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id BLOB PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUser] if a user with the same email already exists,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let user = User {
        id: UserID::new_v4(),
        email: normalize_email(&new_user.email),
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        password_hash: new_user.password_hash,
    };

    connection.execute(
        "INSERT INTO user (id, email, first_name, last_name, password, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            user.id.as_uuid(),
            &user.email,
            &user.first_name,
            &user.last_name,
            user.password_hash.as_ref(),
            OffsetDateTime::now_utc(),
        ),
    )?;

    Ok(user)
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user ([Error::UserNotFound]).
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, email, first_name, last_name, password
            FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_uuid())], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Get the user whose email matches `email`, ignoring letter case.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if no user has the email.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, email, first_name, last_name, password
            FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", &normalize_email(email))], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if there is no such user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_uuid()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(4)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        user::{NewUser, PasswordHash, UserID, create_user, get_user_by_email, get_user_by_id},
    };

    use super::{create_user_table, update_password};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_owned(),
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    #[test]
    fn insert_user_stores_lower_case_email() {
        let db_connection = get_db_connection();

        let inserted_user = create_user(new_user("Jane@Example.com"), &db_connection).unwrap();

        assert_eq!(inserted_user.email, "jane@example.com");
        assert_eq!(inserted_user.first_name, "Jane");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email_in_other_case() {
        let db_connection = get_db_connection();
        create_user(new_user("jane@example.com"), &db_connection).unwrap();

        let duplicate = create_user(new_user("JANE@example.com"), &db_connection);

        assert_eq!(duplicate, Err(Error::DuplicateUser));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        assert_eq!(
            get_user_by_id(UserID::new_v4(), &db_connection),
            Err(Error::UserNotFound)
        );
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("jane@example.com"), &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("jane@example.com"), &db_connection).unwrap();

        let retrieved_user = get_user_by_email(" Jane@EXAMPLE.com", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_email_fails_for_unknown_email() {
        let db_connection = get_db_connection();

        assert_eq!(
            get_user_by_email("nobody@example.com", &db_connection),
            Err(Error::UserNotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("jane@example.com"), &db_connection).unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(test_user.id, &new_hash, &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(retrieved_user.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_for_unknown_user() {
        let db_connection = get_db_connection();

        let result = update_password(
            UserID::new_v4(),
            &PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::UserNotFound));
    }
}
