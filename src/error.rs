// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::database::StoreError;

/// Resource a handler is working on; selects the wording of error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Category,
    Post,
}

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Category => "Category",
            Entity::Post => "Post",
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed, `allow` is the value of the Allow header
    MethodNotAllowed { allow: &'static str },

    // 500 Internal Server Error
    InternalServerError(String),

    // Extractor rejection passed through with its own status (e.g. 413 Payload Too Large)
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    /// Get client-facing error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed { .. } => "Method Not Allowed",
            ApiError::InternalServerError(msg) => msg,
            ApiError::Rejected { message, .. } => message,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    /// Translate a store failure into the response for `entity`'s routes
    pub fn from_store(entity: Entity, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => {
                tracing::debug!("{} lookup found no record", entity.name());
                ApiError::not_found(format!("{} not found", entity.name()))
            }
            StoreError::UniqueViolation { field } => {
                tracing::debug!("{} unique constraint failed on {}", entity.name(), field);
                ApiError::bad_request(format!("{} with this name already exists", entity.name()))
            }
            StoreError::ForeignKeyViolation => ApiError::bad_request("Category not found"),
            StoreError::Other(msg) => {
                tracing::error!("{} store error: {}", entity.name(), msg);
                if msg.is_empty() {
                    ApiError::internal_server_error("Server error")
                } else {
                    ApiError::internal_server_error(msg)
                }
            }
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(allow: &'static str) -> Self {
        ApiError::MethodNotAllowed { allow }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn invalid_id() -> Self {
        ApiError::bad_request("Invalid id")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::MethodNotAllowed { allow } => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow)],
                "Method Not Allowed",
            )
                .into_response(),
            other => (other.status_code(), Json(other.to_json())).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = ApiError::from_store(Entity::Post, StoreError::NotFound);
        assert_eq!(err, ApiError::not_found("Post not found"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unique_violation_is_bad_request() {
        let err = ApiError::from_store(
            Entity::Category,
            StoreError::UniqueViolation { field: "name".into() },
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Category with this name already exists");
    }

    #[test]
    fn foreign_key_violation_reports_missing_category() {
        let err = ApiError::from_store(Entity::Post, StoreError::ForeignKeyViolation);
        assert_eq!(err, ApiError::bad_request("Category not found"));
    }

    #[test]
    fn other_errors_pass_message_through() {
        let err = ApiError::from_store(Entity::Post, StoreError::Other("connection reset".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_json(), json!({"error": "connection reset"}));

        let err = ApiError::from_store(Entity::Post, StoreError::Other(String::new()));
        assert_eq!(err.message(), "Server error");
    }

    #[test]
    fn rejection_keeps_its_status() {
        let err = ApiError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_json(), json!({"error": "length limit exceeded"}));
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = ApiError::method_not_allowed("GET, POST").into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    }
}
