//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    AppState, Error,
    auth::{auth_guard, delete_log_out, post_log_in},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint,
    },
    endpoints,
    health::get_health,
    transaction::{
        create_transactions_endpoint, delete_transaction_endpoint, get_balances_endpoint,
        get_months_by_year_endpoint, get_total_savings_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
    user::{get_current_user, register_user},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_guard);

    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::LOG_IN, post(post_log_in))
        // Registering does not need a session, getting the current user does.
        .route(
            endpoints::USERS,
            post(register_user).merge(get(get_current_user).route_layer(auth.clone())),
        );

    let protected_routes = Router::new()
        .route(endpoints::LOG_OUT, delete(delete_log_out))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transactions_endpoint),
        )
        .route(endpoints::BALANCE, get(get_balances_endpoint))
        .route(endpoints::MONTHS_BY_YEAR, get(get_months_by_year_endpoint))
        .route(endpoints::TOTAL_SAVING, get(get_total_savings_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route_layer(auth);

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Build the CORS layer for the allowed `origins`.
///
/// The origin "*" allows every origin by mirroring the request's origin,
/// since browsers reject a wildcard when credentials are allowed.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if allows_any_origin(origins) {
        tracing::warn!(
            "CORS allows every origin with credentials. Set CORS_ORIGINS to the client's origin \
             to restrict cross-site requests."
        );
        AllowOrigin::mirror_request()
    } else {
        let origins = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(error) => {
                    tracing::warn!("Ignoring invalid CORS origin {origin:?}: {error}");
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
}

fn allows_any_origin(origins: &[String]) -> bool {
    origins.iter().any(|origin| origin.trim() == "*")
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
