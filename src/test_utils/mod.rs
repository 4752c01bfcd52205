#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod server;

pub(crate) use fixtures::{
    TEST_EMAIL, TEST_PASSWORD, get_test_connection, insert_test_category,
    insert_test_transaction, insert_test_user, insert_user_with_email,
};
pub(crate) use server::{
    LoggedInApp, get_logged_in_server, get_test_app_state, get_test_server, session_cookie,
};
