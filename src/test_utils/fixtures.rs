use rusqlite::Connection;

use crate::{
    calendar::Month,
    category::{Category, CategoryName, NewCategory, create_category},
    db::initialize,
    money::{Currency, TransactionType},
    transaction::{NewTransaction, Transaction, create_transaction},
    user::{NewUser, PasswordHash, User, UserID, create_user},
};

pub(crate) const TEST_EMAIL: &str = "test@example.com";
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest cost bcrypt allows, to keep the tests fast.
const TEST_HASH_COST: u32 = 4;

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

#[track_caller]
pub(crate) fn insert_test_user(connection: &Connection) -> User {
    insert_user_with_email(TEST_EMAIL, connection)
}

#[track_caller]
pub(crate) fn insert_user_with_email(email: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            email: email.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            password_hash: PasswordHash::from_raw_password(TEST_PASSWORD, TEST_HASH_COST)
                .expect("Could not hash password."),
        },
        connection,
    )
    .expect("Could not create test user.")
}

#[track_caller]
pub(crate) fn insert_test_category(
    category_type: TransactionType,
    user_id: UserID,
    connection: &Connection,
) -> Category {
    create_category(
        NewCategory {
            category_type,
            name: CategoryName::new_unchecked(&format!("Test {category_type}")),
            note: String::new(),
        },
        user_id,
        connection,
    )
    .expect("Could not create test category.")
}

/// Insert a transaction of the same type and user as `category`.
#[track_caller]
pub(crate) fn insert_test_transaction(category: &Category, connection: &Connection) -> Transaction {
    create_transaction(
        NewTransaction {
            transaction_type: category.category_type,
            amount: 42.5,
            currency: Currency::Uyu,
            note: "Test transaction".to_owned(),
            day: Some(1),
            month: Month::January,
            year: 2024,
            exchange_rate: None,
        },
        Some(category.clone()),
        category.user_id,
        connection,
    )
    .expect("Could not create test transaction.")
}
