//! Relay layer: validates a send, forwards it to the gateway, and maps the
//! gateway's answer onto a [`SendResult`] or a [`RelayError`].

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::RelayError;
use crate::types::{OutboundPayload, SendRequest, SendResult, UNKNOWN_MESSAGE_ID};

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A fully built gateway call. The transport only has to put it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub authorization: String,
    pub payload: OutboundPayload,
}

impl OutboundRequest {
    fn new(url: &str, token: &str, request: &SendRequest) -> Self {
        Self {
            url: url.to_owned(),
            authorization: format!("Bearer {token}"),
            payload: OutboundPayload {
                to: request.phone_number.clone(),
                body: request.message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

pub trait GatewayTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<GatewayResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client settings for gateway calls. Redirects are not followed: a 3xx
    /// is the gateway's answer and the token must not leave for another host.
    pub fn client_builder() -> reqwest::ClientBuilder {
        reqwest::Client::builder().redirect(Policy::none())
    }
}

impl GatewayTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<GatewayResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&request.url)
                .header(AUTHORIZATION, &request.authorization)
                .header(CONTENT_TYPE, "application/json")
                .json(&request.payload)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(GatewayResponse { status, body })
        })
    }
}

/// Accepts exactly 10 to 15 ASCII digits and nothing else. A leading `+` is
/// rejected.
pub fn validate_phone_number(phone_number: &str) -> Result<(), RelayError> {
    let len_ok = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&phone_number.len());
    if len_ok && phone_number.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(RelayError::Validation)
    }
}

/// Returns the bearer token, or [`RelayError::Configuration`] if it is unset or empty.
pub fn check_credential(config: &GatewayConfig) -> Result<&str, RelayError> {
    match config.bearer_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(RelayError::Configuration),
    }
}

#[derive(Clone)]
pub struct MessageRelay {
    config: GatewayConfig,
    http: Arc<dyn GatewayTransport>,
}

impl MessageRelay {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = ReqwestTransport::client_builder().build()?;
        Ok(Self::with_transport(config, ReqwestTransport::new(client)))
    }

    pub fn with_transport(config: GatewayConfig, transport: impl GatewayTransport + 'static) -> Self {
        Self {
            config,
            http: Arc::new(transport),
        }
    }

    /// Validate, check the credential, then make exactly one gateway call.
    ///
    /// Validation and configuration failures return before any network I/O.
    pub async fn send_message(&self, request: &SendRequest) -> Result<SendResult, RelayError> {
        validate_phone_number(&request.phone_number)?;
        let token = check_credential(&self.config)?;

        let outbound = OutboundRequest::new(&self.config.endpoint_url, token, request);
        let response = self
            .http
            .post_json(&outbound)
            .await
            .map_err(|err| RelayError::Transport(error_chain(&*err)))?;

        debug!("Gateway responded with status {}", response.status);
        interpret_response(response)
    }
}

fn interpret_response(response: GatewayResponse) -> Result<SendResult, RelayError> {
    if response.status == 200 {
        let message_id = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|value| value.get("id").and_then(message_id_text))
            .unwrap_or_else(|| UNKNOWN_MESSAGE_ID.to_owned());
        return Ok(SendResult::sent(message_id));
    }

    Err(RelayError::Upstream {
        status: response.status,
        message: derive_error_message(response.status, &response.body),
    })
}

fn message_id_text(id: &Value) -> Option<String> {
    match id {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Prefer the gateway's own `message`, then the whole JSON object, then a
/// generic status line when the body is not a JSON object.
fn derive_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let message = match map.get("message") {
                Some(Value::String(message)) => Some(message.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            };
            message.unwrap_or_else(|| Value::Object(map).to_string())
        }
        _ => format!("Error status code: {status}"),
    }
}

/// Flattens an error and its sources into one line, skipping sources whose
/// text is already included.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
