//! Users of the application: registration, lookup and password management.

mod current_user;
mod db;
mod domain;
mod password;
mod register;

pub use current_user::get_current_user;
pub use db::{create_user, create_user_table, get_user_by_email, get_user_by_id, update_password};
pub use domain::{NewUser, User, UserID, normalize_email};
pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, ValidatedPassword};
pub use register::register_user;
