//! Defines functions for storing the session token in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{app_state::SessionSettings, auth::Session};

/// Add the session cookie to the cookie jar, indicating that a user is logged in.
///
/// The cookie expires together with `session`.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
    settings: &SessionSettings,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((settings.cookie_name.clone(), session.token.clone()))
            .expires(session.expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(settings.secure_cookie),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(
    jar: PrivateCookieJar,
    settings: &SessionSettings,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((settings.cookie_name.clone(), "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(settings.secure_cookie),
    )
}

/// Get the session token from the cookie jar, if there is one.
pub(crate) fn get_session_token(jar: &PrivateCookieJar, cookie_name: &str) -> Option<String> {
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_owned())
}
