//! The months that a user has transactions in, grouped by year.

use std::collections::BTreeMap;

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    Error, app_state::DatabaseState, calendar::Month, db::lock_connection,
    response::ApiResponse, user::UserID,
};

/// Get the months that `user_id` has transactions in.
///
/// The years are in ascending order and the months of each year are in
/// calendar order, without duplicates.
pub fn get_months_by_year(
    user_id: UserID,
    connection: &Connection,
) -> Result<BTreeMap<i32, Vec<Month>>, Error> {
    let pairs = connection
        .prepare("SELECT DISTINCT year, month FROM \"transaction\" WHERE user_id = :user_id")?
        .query_map(&[(":user_id", &user_id.as_uuid())], |row| {
            Ok((row.get::<_, i32>(0)?, row.get::<_, Month>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group_by_year(pairs))
}

fn group_by_year(pairs: impl IntoIterator<Item = (i32, Month)>) -> BTreeMap<i32, Vec<Month>> {
    let mut months_by_year: BTreeMap<i32, Vec<Month>> = BTreeMap::new();

    for (year, month) in pairs {
        months_by_year.entry(year).or_default().push(month);
    }

    for months in months_by_year.values_mut() {
        months.sort();
        months.dedup();
    }

    months_by_year
}

/// A route handler for the months that the user has transactions in.
pub async fn get_months_by_year_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let months_by_year = lock_connection(&state.db_connection)
        .and_then(|connection| get_months_by_year(user_id, &connection));

    match months_by_year {
        Ok(months_by_year) => ApiResponse::success(months_by_year).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::{Value, json};

    use crate::{
        calendar::Month,
        endpoints,
        test_utils::{LoggedInApp, get_logged_in_server},
    };

    use super::group_by_year;

    #[test]
    fn months_are_in_calendar_order_without_duplicates() {
        let months_by_year = group_by_year([
            (2024, Month::March),
            (2023, Month::December),
            (2024, Month::January),
            (2024, Month::March),
        ]);

        assert_eq!(
            months_by_year,
            BTreeMap::from([
                (2023, vec![Month::December]),
                (2024, vec![Month::January, Month::March]),
            ])
        );
    }

    #[tokio::test]
    async fn endpoint_groups_months_by_year() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;
        let transaction = |month: &str, year: i32| {
            json!({
                "type": "SAVING",
                "amount": 10,
                "currency": "UYU",
                "month": month,
                "year": year,
                "category": {"name": "Rainy day"}
            })
        };
        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({"transactions": [
                transaction("MARCH", 2024),
                transaction("january", 2024),
                transaction("MARCH", 2024),
                transaction("JULY", 2022),
            ]}))
            .await;

        let response = server
            .get(endpoints::MONTHS_BY_YEAR)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "result": true,
                "data": {"2022": ["JULY"], "2024": ["JANUARY", "MARCH"]}
            })
        );
    }

    #[tokio::test]
    async fn endpoint_returns_empty_object_without_transactions() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .get(endpoints::MONTHS_BY_YEAR)
            .add_cookie(cookie)
            .await;

        assert_eq!(response.json::<Value>(), json!({"result": true, "data": {}}));
    }
}
