use std::sync::{Arc, Mutex, MutexGuard};

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    app_state::SessionSettings,
    auth::{Session, set_session_cookie},
    endpoints,
    routing::build_router,
    test_utils::{TEST_EMAIL, TEST_PASSWORD, insert_test_user},
    user::User,
};

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "42", SessionSettings::default())
        .expect("Could not create app state.")
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// The encrypted session cookie that a client receives for `session`.
pub(crate) fn session_cookie(state: &AppState, session: &Session) -> Cookie<'static> {
    let jar = set_session_cookie(
        PrivateCookieJar::new(state.cookie_key.clone()),
        session,
        &state.session,
    );
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .expect("Could not convert Set-Cookie header to str");

    Cookie::parse(set_cookie.to_owned()).expect("Could not parse session cookie.")
}

/// A test server with a registered user who has logged in.
pub(crate) struct LoggedInApp {
    pub server: TestServer,
    /// The session cookie of `user`.
    pub cookie: Cookie<'static>,
    pub user: User,
    pub connection: Arc<Mutex<Connection>>,
}

impl LoggedInApp {
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().expect("Could not lock database.")
    }
}

pub(crate) async fn get_logged_in_server() -> LoggedInApp {
    let state = get_test_app_state();
    let connection = state.db_connection.clone();
    let user = insert_test_user(&connection.lock().expect("Could not lock database."));
    let cookie_name = state.session.cookie_name.clone();
    let server = get_test_server(state);

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
        .await;
    response.assert_status_ok();
    let cookie = response.cookie(&cookie_name);

    LoggedInApp {
        server,
        cookie,
        user,
        connection,
    }
}
