use serde::{Deserialize, Serialize};

pub const DEFAULT_MESSAGE: &str = "Hello, this message was sent via API!";
pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const UNKNOWN_MESSAGE_ID: &str = "unknown";

/// Query string of `GET /send_message`.
#[derive(Debug, Deserialize)]
pub struct SendQuery {
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub phone_number: String,
    pub message: String,
}

impl SendRequest {
    pub fn new(phone_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendResult {
    pub success: bool,
    pub message: String,
    pub message_id: Option<String>,
}

impl SendResult {
    pub fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message: SENT_MESSAGE.to_string(),
            message_id: Some(message_id),
        }
    }
}

/// Body POSTed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundPayload {
    pub to: String,
    pub body: String,
}

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}
