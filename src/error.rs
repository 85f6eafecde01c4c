use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::actions::ActionError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    AuthError(String),
    Forbidden,
    DocumentNotFoundError(String),
    ServiceUnavailable(String),
    UnexpectedError,
}

impl From<ActionError> for ApiError {
    fn from(error: ActionError) -> Self {
        match error {
            ActionError::NotFound(room_id) => Self::DocumentNotFoundError(room_id),
            ActionError::PermissionDenied => Self::Forbidden,
            ActionError::Transient(reason) => Self::ServiceUnavailable(reason),
            ActionError::InvalidResponse(_) => Self::UnexpectedError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, format!("Bad request: {}", e)),
            Self::AuthError(e) => (
                StatusCode::UNAUTHORIZED,
                format!("Authorization error: {}", e),
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have access to this document".to_string(),
            ),
            Self::DocumentNotFoundError(doc_id) => (
                StatusCode::NOT_FOUND,
                format!("Document {} could not be found for user", doc_id),
            ),
            Self::ServiceUnavailable(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Room service unavailable: {}", e),
            ),
            Self::UnexpectedError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error has occured".to_string(),
            ),
        }
        .into_response()
    }
}
