//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use genaxis_core::RepoError;
use log::error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Handler failure carrying its status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{entity} not found"),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Maps a repository error raised while serving `resource`.
    ///
    /// A missing `resource` is 404. A missing referenced record (for example
    /// the gene of a new edit) is a bad request.
    pub fn from_repo(resource: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, .. } if entity == resource => Self::not_found(entity),
            RepoError::NotFound { entity, id } => {
                Self::bad_request(format!("referenced {entity} does not exist: {id}"))
            }
            RepoError::Validation(err) => Self::bad_request(err.to_string()),
            RepoError::Constraint(message) => Self::bad_request(message),
            other @ (RepoError::Db(_) | RepoError::InvalidData(_)) => {
                error!("event=api_storage module=api status=error resource={resource} error={other}");
                Self::internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(&self.message))).into_response()
    }
}
