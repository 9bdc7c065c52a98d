use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use log::{info, warn};

use crate::error::RelayError;
use crate::relay::MessageRelay;
use crate::types::{RootResponse, SendQuery, SendRequest, DEFAULT_MESSAGE};

pub struct AppState {
    pub relay: MessageRelay,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/send_message", get(send_message))
        .with_state(state)
}

pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "WhatsApp Messaging API is running. Use /send_message endpoint to send messages."
            .to_string(),
    })
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SendQuery>, QueryRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let Query(query) =
        query.map_err(|rejection| RelayError::InvalidQuery(rejection.body_text()))?;
    let phone_number = query
        .phone_number
        .ok_or(RelayError::MissingParameter("phone_number"))?;
    let message = query.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let request = SendRequest::new(phone_number, message);

    info!("Sending message to {}", request.phone_number);

    match state.relay.send_message(&request).await {
        Ok(result) => {
            info!(
                "Message to {} accepted as {}",
                request.phone_number,
                result.message_id.as_deref().unwrap_or_default()
            );
            Ok(Json(result))
        }
        Err(err) => {
            warn!("Message to {} failed: {}", request.phone_number, err);
            Err(err)
        }
    }
}
