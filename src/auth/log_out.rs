//! Log-out route handler that ends the session and invalidates the session cookie.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{
        AuthState,
        cookie::{get_session_token, invalidate_session_cookie},
        session::delete_session,
    },
    db::lock_connection,
    response::ApiResponse,
};

/// Delete the current session and invalidate the session cookie.
pub async fn delete_log_out(State(state): State<AuthState>, jar: PrivateCookieJar) -> Response {
    if let Some(token) = get_session_token(&jar, &state.session.cookie_name) {
        let result = lock_connection(&state.db_connection)
            .and_then(|connection| delete_session(&token, &connection));

        if let Err(error) = result {
            return error.into_response();
        }
    }

    let jar = invalidate_session_cookie(jar, &state.session);

    (jar, ApiResponse::empty()).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::Duration;

    use crate::{
        app_state::DEFAULT_SESSION_COOKIE_NAME,
        endpoints,
        test_utils::{LoggedInApp, get_logged_in_server},
    };

    #[tokio::test]
    async fn log_out_ends_session_and_expires_cookie() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .delete(endpoints::LOG_OUT)
            .add_cookie(cookie.clone())
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({"result": true}));
        let expired_cookie = response.cookie(DEFAULT_SESSION_COOKIE_NAME);
        assert_eq!(expired_cookie.max_age(), Some(Duration::ZERO));

        server
            .get(endpoints::USERS)
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_out_requires_session() {
        let LoggedInApp { server, .. } = get_logged_in_server().await;

        server
            .delete(endpoints::LOG_OUT)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
