use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const INVALID_PHONE_NUMBER: &str =
    "Invalid phone number format. Please provide 10-15 digits only.";

/// Every way a send can end short of success. All are terminal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("Field required: {0}")]
    MissingParameter(&'static str),

    /// Query string could not be decoded.
    #[error("{0}")]
    InvalidQuery(String),

    #[error("{}", INVALID_PHONE_NUMBER)]
    Validation,

    #[error(
        "WhatsApp API token is not configured. Please set the WHAPI_TOKEN environment variable."
    )]
    Configuration,

    /// Gateway was unreachable (connect, DNS, TLS, timeout).
    #[error("Error communicating with WhatsApp API: {0}")]
    Transport(String),

    /// Gateway answered with a non-200 status.
    #[error("WhatsApp API error: {message}")]
    Upstream { status: u16, message: String },
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter(_) | RelayError::InvalidQuery(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RelayError::Validation => StatusCode::BAD_REQUEST,
            RelayError::Configuration | RelayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_match_the_public_contract() {
        assert_eq!(
            RelayError::Validation.to_string(),
            "Invalid phone number format. Please provide 10-15 digits only."
        );
        assert_eq!(
            RelayError::Configuration.to_string(),
            "WhatsApp API token is not configured. Please set the WHAPI_TOKEN environment variable."
        );
        assert_eq!(
            RelayError::Transport("connection refused".to_owned()).to_string(),
            "Error communicating with WhatsApp API: connection refused"
        );
        assert_eq!(
            RelayError::Upstream {
                status: 401,
                message: "invalid token".to_owned()
            }
            .to_string(),
            "WhatsApp API error: invalid token"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(RelayError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::Configuration.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Transport(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::MissingParameter("phone_number").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RelayError::InvalidQuery("duplicate field `phone_number`".to_owned()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RelayError::Upstream {
                status: 429,
                message: String::new()
            }
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        // Outside the range an HTTP response can carry.
        assert_eq!(
            RelayError::Upstream {
                status: 42,
                message: String::new()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
