//! Handles log-in requests by checking the user's credentials and starting a session.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    Error,
    auth::{
        AuthState,
        cookie::{get_session_token, set_session_cookie},
        session::{create_session, delete_expired_sessions, delete_session},
    },
    db::lock_connection,
    response::{ApiResponse, parse_json},
    user::get_user_by_email,
};

/// The credentials sent by the client to log in.
///
/// The password is a plain string. There is no need for validation here since
/// it is only compared against the stored hash.
#[derive(Debug, Default, Deserialize)]
pub struct LogInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A route handler for logging in a user.
///
/// On success the response sets the session cookie and contains the user.
/// Any session referenced by an existing cookie is ended first.
pub async fn post_log_in(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LogInRequest>, JsonRejection>,
) -> Response {
    let request = match parse_json(payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().map(str::trim).unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Error::InvalidParams("Email and password are required".to_owned())
            .into_response();
    }

    let user = match lock_connection(&state.db_connection)
        .and_then(|connection| get_user_by_email(email, &connection))
    {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    match user.password_hash.verify(password) {
        Ok(true) => {}
        Ok(false) => return Error::InvalidCredentials.into_response(),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return Error::HashingError(error.to_string()).into_response();
        }
    }

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    if let Some(previous_token) = get_session_token(&jar, &state.session.cookie_name)
        && let Err(error) = delete_session(&previous_token, &connection)
    {
        return error.into_response();
    }

    if let Err(error) = delete_expired_sessions(&connection) {
        return error.into_response();
    }

    let session = match create_session(user.id, state.session.duration, &connection) {
        Ok(session) => session,
        Err(error) => return error.into_response(),
    };

    tracing::info!("User {} logged in", user.id);

    let jar = set_session_cookie(jar, &session, &state.session);

    (jar, ApiResponse::success(user)).into_response()
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::DEFAULT_SESSION_COOKIE_NAME,
        auth::create_session,
        endpoints,
        test_utils::{
            TEST_EMAIL, TEST_PASSWORD, get_test_app_state, get_test_server, insert_test_user,
        },
    };

    fn get_server_with_user() -> axum_test::TestServer {
        let state = get_test_app_state();
        insert_test_user(&state.db_connection.lock().unwrap());

        get_test_server(state)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_server_with_user();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["result"], true);
        assert_eq!(body["data"]["email"], TEST_EMAIL);

        let cookie = response.cookie(DEFAULT_SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.expires_datetime().is_some());
    }

    #[tokio::test]
    async fn log_in_ignores_email_case_and_whitespace() {
        let server = get_server_with_user();

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": format!("  {}  ", TEST_EMAIL.to_uppercase()),
                "password": format!(" {TEST_PASSWORD} ")
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_server_with_user();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": TEST_EMAIL, "password": "wrongpassword"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errorCode"], 1002);
        assert_eq!(body["showMessage"]["EN"], "Incorrect email/password");
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_server_with_user();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "nobody@example.com", "password": TEST_PASSWORD}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["errorCode"], 3001);
    }

    #[tokio::test]
    async fn log_in_requires_email_and_password() {
        let server = get_server_with_user();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "   "}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errorCode"], 2002);
        assert_eq!(body["data"], "Email and password are required");
    }

    #[tokio::test]
    async fn log_in_replaces_previous_session() {
        let state = get_test_app_state();
        insert_test_user(&state.db_connection.lock().unwrap());
        let connection = state.db_connection.clone();
        let server = get_test_server(state);
        let credentials = json!({"email": TEST_EMAIL, "password": TEST_PASSWORD});

        let first = server.post(endpoints::LOG_IN).json(&credentials).await;
        let first_cookie = first.cookie(DEFAULT_SESSION_COOKIE_NAME);
        server
            .post(endpoints::LOG_IN)
            .add_cookie(first_cookie.clone())
            .json(&credentials)
            .await
            .assert_status_ok();

        let session_count: i64 = connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap();
        assert_eq!(session_count, 1);

        server
            .get(endpoints::USERS)
            .add_cookie(first_cookie)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_removes_expired_sessions() {
        let state = get_test_app_state();
        let connection = state.db_connection.clone();
        let user = insert_test_user(&connection.lock().unwrap());
        create_session(user.id, Duration::seconds(-1), &connection.lock().unwrap()).unwrap();
        let server = get_test_server(state);

        server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
            .await
            .assert_status_ok();

        let expired_count: i64 = connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM session WHERE expires_at <= ?1",
                [OffsetDateTime::now_utc()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(expired_count, 0);
    }
}
