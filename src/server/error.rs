//! Error types for the server

use crate::error::AgrifertError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AgrifertError> for ServerError {
    fn from(err: AgrifertError) -> Self {
        match err {
            // Caller-correctable inputs map to 400
            AgrifertError::UnknownCategory { .. } | AgrifertError::InvalidInput(_) => {
                ServerError::BadRequest(err.to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_maps_to_bad_request() {
        let err: ServerError = AgrifertError::UnknownCategory {
            column: "soil type".to_string(),
            value: "Chalky".to_string(),
        }
        .into();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[test]
    fn test_data_error_maps_to_internal() {
        let err: ServerError = AgrifertError::DataError("broken".to_string()).into();
        assert!(matches!(err, ServerError::Internal(_)));
    }
}
