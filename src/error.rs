use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::notes::client::ClientError;

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    NotFound,
    PageNotFound,
    Upstream(ClientError),
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A missing resource upstream is still an upstream failure here; handlers
/// that look up a single note map `ClientError::NotFound` themselves.
impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        ApiError::Upstream(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "BAD_REQUEST",
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: "UNPROCESSABLE_ENTITY",
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "NOT FOUND",
                    message: "Resource not found".to_string(),
                }),
            )
                .into_response(),
            ApiError::PageNotFound => (
                StatusCode::NOT_FOUND,
                Html(crate::pages::views::not_found_page()),
            )
                .into_response(),
            ApiError::Upstream(e) => {
                tracing::error!("notes service error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorBody {
                        error: "UPSTREAM",
                        message: "Notes service is unavailable".to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "INTERNAL",
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
