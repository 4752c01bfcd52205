//! Category creation endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error, FieldIssue,
    app_state::DatabaseState,
    category::{CategoryName, NewCategory, create_category},
    db::lock_connection,
    money::TransactionType,
    response::{ApiResponse, parse_json},
    user::UserID,
};

/// The request body for creating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default, rename = "type")]
    pub category_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = Error;

    fn try_from(request: CreateCategoryRequest) -> Result<Self, Self::Error> {
        let mut issues = Vec::new();

        let category_type = match request.category_type.as_deref().map(str::trim) {
            None | Some("") => {
                issues.push(FieldIssue::new("type", "Type is required"));
                None
            }
            Some(raw_type) => match raw_type.parse::<TransactionType>() {
                Ok(category_type) => Some(category_type),
                Err(_) => {
                    issues.push(FieldIssue::new(
                        "type",
                        TransactionType::allowed_values_message(),
                    ));
                    None
                }
            },
        };

        let name = match CategoryName::new(request.name.as_deref().unwrap_or_default()) {
            Ok(name) => Some(name),
            Err(_) => {
                issues.push(FieldIssue::new("name", "Name is required"));
                None
            }
        };

        match (category_type, name) {
            (Some(category_type), Some(name)) => Ok(NewCategory {
                category_type,
                name,
                note: request.note.unwrap_or_default().trim().to_owned(),
            }),
            _ => Err(Error::ValidationFailed(issues)),
        }
    }
}

/// A route handler for creating a category, responds with 201 and the new category.
pub async fn create_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Response {
    let new_category = match parse_json(payload).and_then(NewCategory::try_from) {
        Ok(new_category) => new_category,
        Err(error) => return error.into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_category(new_category, user_id, &connection) {
        Ok(category) => (StatusCode::CREATED, ApiResponse::success(category)).into_response(),
        Err(error) => {
            tracing::error!("could not create category: {error}");
            error.into_response()
        }
    }
}
