//! Sessions, the session cookie and the endpoints for logging in and out.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod session;

pub use log_in::post_log_in;
pub use log_out::delete_log_out;
pub use middleware::{AuthState, auth_guard};
pub use session::{Session, create_session_table};

#[cfg(test)]
pub(crate) use cookie::set_session_cookie;
#[cfg(test)]
pub use session::create_session;
