//! Transaction creation endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error,
    app_state::DatabaseState,
    db::lock_connection,
    response::{ApiResponse, parse_json},
    transaction::{CreateTransactionRequest, create_transactions},
    user::UserID,
};

/// `{"transactions": [...]}`
#[derive(Debug, Deserialize)]
struct BatchBody {
    transactions: Vec<CreateTransactionRequest>,
}

/// Read a creation request body: a batch when it has a `transactions` key,
/// otherwise the fields of a single transaction.
fn parse_requests(body: Value) -> Result<Vec<CreateTransactionRequest>, Error> {
    let is_batch = body
        .as_object()
        .is_some_and(|object| object.contains_key("transactions"));

    let requests = if is_batch {
        serde_json::from_value::<BatchBody>(body).map(|batch| batch.transactions)
    } else {
        serde_json::from_value::<CreateTransactionRequest>(body).map(|request| vec![request])
    };

    requests.map_err(|error| {
        tracing::debug!("Rejected transaction body: {error}");
        Error::InvalidParams(error.to_string())
    })
}

/// A route handler for creating one or more transactions.
///
/// Responds with 201 and the created transaction, or an array of them when
/// more than one was created.
pub async fn create_transactions_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let requests = match parse_json(payload).and_then(parse_requests) {
        Ok(requests) => requests,
        Err(error) => return error.into_response(),
    };

    let transactions = lock_connection(&state.db_connection)
        .and_then(|connection| create_transactions(&requests, user_id, &connection));

    match transactions {
        Ok(mut transactions) if transactions.len() == 1 => {
            let transaction = transactions.remove(0);
            tracing::info!("Created transaction {}", transaction.id);
            (StatusCode::CREATED, ApiResponse::success(transaction)).into_response()
        }
        Ok(transactions) => {
            tracing::info!("Created {} transactions", transactions.len());
            (StatusCode::CREATED, ApiResponse::success(transactions)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        money::TransactionType,
        test_utils::{LoggedInApp, get_logged_in_server, insert_test_category},
    };

    #[tokio::test]
    async fn creates_single_transaction() {
        let app = get_logged_in_server().await;
        let category =
            insert_test_category(TransactionType::Expense, app.user.id, &app.connection());
        let LoggedInApp { server, cookie, .. } = app;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "type": "expense",
                "amount": "99.90",
                "currency": "uyu",
                "note": "  Groceries ",
                "day": 29,
                "month": "february",
                "year": "2024",
                "categoryId": category.id.to_string()
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let data = &body["data"];
        assert_eq!(body["result"], true);
        assert_eq!(data["type"], "EXPENSE");
        assert_eq!(data["amount"], 99.9);
        assert_eq!(data["currency"], "UYU");
        assert_eq!(data["note"], "Groceries");
        assert_eq!(data["day"], 29);
        assert_eq!(data["month"], "FEBRUARY");
        assert_eq!(data["year"], 2024);
        assert_eq!(data["exchangeRate"], Value::Null);
        assert_eq!(data["categoryId"], category.id.to_string());
        assert_eq!(data["category"]["categoryId"], category.id.to_string());
        assert!(data["transactionId"].is_string());
    }

    #[tokio::test]
    async fn creates_batch_in_order() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({"transactions": [
                {
                    "type": "INCOME",
                    "amount": 1500,
                    "currency": "USD",
                    "exchangeRate": 39.5,
                    "month": "MAY",
                    "year": 2024,
                    "category": {"name": "Salary", "type": "INCOME"}
                },
                {
                    "type": "SAVING",
                    "amount": 200,
                    "currency": "EUR",
                    "exchangeRate": "43.1",
                    "month": "MAY",
                    "year": 2024,
                    "category": {"name": "Emergency fund"}
                }
            ]}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let data = response.json::<Value>()["data"].clone();
        assert_eq!(data.as_array().map(Vec::len), Some(2));
        assert_eq!(data[0]["type"], "INCOME");
        assert_eq!(data[0]["category"]["name"], "Salary");
        assert_eq!(data[1]["type"], "SAVING");
        assert_eq!(data[1]["exchangeRate"], 43.1);
        assert_eq!(data[1]["category"]["type"], "SAVING");
    }

    #[tokio::test]
    async fn reports_issues_of_every_item() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({"transactions": [
                {
                    "type": "EXPENSE",
                    "amount": -3,
                    "currency": "UYU",
                    "month": "MAY",
                    "year": 2024,
                    "category": {"name": "Food"}
                },
                {
                    "type": "EXPENSE",
                    "amount": 3,
                    "currency": "USD",
                    "month": "MAY",
                    "year": 2024,
                    "category": {"name": "Food"}
                }
            ]}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errorCode"], 2002);
        assert_eq!(
            body["data"],
            json!([
                {"field": "transactions[0].amount", "msg": "Amount must be greater than zero"},
                {"field": "transactions[1].exchangeRate", "msg": "Exchange rate is required for USD/EUR"}
            ])
        );

        let response = server
            .get(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .await;
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }

    #[tokio::test]
    async fn malformed_batch_item_is_a_parse_error() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({"transactions": [{
                "type": "EXPENSE",
                "amount": "abc",
                "currency": "UYU",
                "month": "MAY",
                "year": 2024,
                "category": {"name": "Food"}
            }]}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errorCode"], 2002);
        let detail = body["data"].as_str().unwrap_or_default();
        assert!(detail.contains("abc"), "unexpected error detail {body}");
    }

    #[tokio::test]
    async fn non_finite_numbers_are_rejected() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "type": "INCOME",
                "amount": "inf",
                "currency": "USD",
                "exchangeRate": "NaN",
                "month": "MAY",
                "year": 2024,
                "category": {"name": "Salary"}
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errorCode"], 2002);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await;
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let LoggedInApp { server, cookie, .. } = get_logged_in_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({"transactions": []}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["data"],
            json!([{"field": "transactions", "msg": "transactions are required"}])
        );
    }

    #[tokio::test]
    async fn category_type_mismatch_is_conflict() {
        let app = get_logged_in_server().await;
        let category =
            insert_test_category(TransactionType::Expense, app.user.id, &app.connection());
        let LoggedInApp { server, cookie, .. } = app;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "type": "INCOME",
                "amount": 10,
                "currency": "UYU",
                "month": "MAY",
                "year": 2024,
                "categoryId": category.id.to_string()
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["errorCode"], 4002);
    }

    #[tokio::test]
    async fn requires_session() {
        let LoggedInApp { server, .. } = get_logged_in_server().await;

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
