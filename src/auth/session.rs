//! Server-side sessions that tie a session token to a user.

use rusqlite::{Connection, Row};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, user::UserID};

/// A logged in session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The opaque token that is stored in the session cookie.
    pub token: String,
    pub user_id: UserID,
    pub expires_at: OffsetDateTime,
}

/// Create the session table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS session (
            token TEXT PRIMARY KEY,
            user_id BLOB NOT NULL,
            expires_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_session_user_id ON session(user_id);",
    )?;

    Ok(())
}

/// Start a new session for `user_id` that lasts for `duration`.
///
/// # Errors
///
/// Returns an [Error::SessionExpiryError] if the expiry overflows.
pub fn create_session(
    user_id: UserID,
    duration: Duration,
    connection: &Connection,
) -> Result<Session, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::SessionExpiryError)?;

    let session = Session {
        token: Uuid::new_v4().to_string(),
        user_id,
        expires_at,
    };

    connection.execute(
        "INSERT INTO session (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        (&session.token, session.user_id.as_uuid(), session.expires_at),
    )?;

    Ok(session)
}

/// Find the user that owns the session `token`.
///
/// Expired sessions are deleted when they are found.
///
/// # Errors
///
/// Returns [Error::NotLoggedIn] if there is no such session or it has expired.
pub fn get_session_user(token: &str, connection: &Connection) -> Result<UserID, Error> {
    let session = connection
        .prepare("SELECT token, user_id, expires_at FROM session WHERE token = :token")?
        .query_row(&[(":token", token)], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::NotLoggedIn,
            error => error,
        })?;

    if session.expires_at <= OffsetDateTime::now_utc() {
        tracing::debug!("Session for user {} has expired", session.user_id);
        delete_session(token, connection)?;
        return Err(Error::NotLoggedIn);
    }

    Ok(session.user_id)
}

/// Delete the session `token`. Deleting a session that does not exist is not
/// an error.
pub fn delete_session(token: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM session WHERE token = ?1", [token])?;

    Ok(())
}

/// Delete every session that has expired, including ones whose token is
/// never presented again.
///
/// Returns the number of sessions deleted.
pub fn delete_expired_sessions(connection: &Connection) -> Result<usize, Error> {
    let deleted = connection.execute(
        "DELETE FROM session WHERE expires_at <= ?1",
        [OffsetDateTime::now_utc()],
    )?;

    if deleted > 0 {
        tracing::debug!("Deleted {deleted} expired sessions");
    }

    Ok(deleted)
}

fn map_row(row: &Row) -> Result<Session, rusqlite::Error> {
    Ok(Session {
        token: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        expires_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        test_utils::{get_test_connection, insert_test_user},
    };

    use super::{create_session, delete_expired_sessions, delete_session, get_session_user};

    #[test]
    fn created_session_resolves_to_user() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection);

        let session = create_session(user.id, Duration::hours(1), &connection).unwrap();

        assert_eq!(get_session_user(&session.token, &connection), Ok(user.id));
        assert!(session.expires_at > OffsetDateTime::now_utc());
    }

    #[test]
    fn each_session_has_a_new_token() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection);

        let first = create_session(user.id, Duration::hours(1), &connection).unwrap();
        let second = create_session(user.id, Duration::hours(1), &connection).unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn unknown_token_is_not_logged_in() {
        let connection = get_test_connection();

        assert_eq!(
            get_session_user("not-a-token", &connection),
            Err(Error::NotLoggedIn)
        );
    }

    #[test]
    fn expired_session_is_deleted() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection);
        let session = create_session(user.id, Duration::seconds(-1), &connection).unwrap();

        assert_eq!(
            get_session_user(&session.token, &connection),
            Err(Error::NotLoggedIn)
        );

        let remaining: i64 = connection
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn stale_sessions_are_deleted_without_being_presented() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection);
        let stale = create_session(user.id, Duration::seconds(-1), &connection).unwrap();
        let live = create_session(user.id, Duration::hours(1), &connection).unwrap();

        assert_eq!(delete_expired_sessions(&connection), Ok(1));

        let tokens: Vec<String> = connection
            .prepare("SELECT token FROM session")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tokens, [live.token]);
        assert_ne!(stale.token, tokens[0]);
    }

    #[test]
    fn deleted_session_is_not_logged_in() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection);
        let session = create_session(user.id, Duration::hours(1), &connection).unwrap();

        delete_session(&session.token, &connection).unwrap();

        assert_eq!(
            get_session_user(&session.token, &connection),
            Err(Error::NotLoggedIn)
        );
    }
}
