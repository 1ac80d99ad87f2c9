use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::StateError;

/// Error shape of the dashboard API: a status code plus an `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<StateError> for ApiError {
    fn from(error: StateError) -> Self {
        let status = match &error {
            StateError::Validation(_) => StatusCode::BAD_REQUEST,
            StateError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::state::StateError;

    use super::ApiError;

    #[test]
    fn state_errors_map_to_http_statuses() {
        let validation = ApiError::from(StateError::Validation("Task text required".into()));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let not_found = ApiError::from(StateError::NotFound("Task 7 not found".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let io = ApiError::from(StateError::Io(std::io::Error::other("disk gone")));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let closed = ApiError::from(StateError::ServiceClosed);
        assert_eq!(closed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
