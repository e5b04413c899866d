//! Chat handler
//!
//! Stateless: each message is forwarded on its own, no history is kept.

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use super::validation_error;
use crate::AppState;
use paperscope_common::errors::{AppError, Result};
use paperscope_common::metrics;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Validate)]
struct ChatMessage {
    #[validate(length(min = 1, max = 4000))]
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatRequest {
    fn into_message(self) -> Result<ChatMessage> {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| AppError::MissingField {
                field: "message".into(),
            })?;

        let message = ChatMessage { message };
        message.validate().map_err(validation_error)?;
        Ok(message)
    }
}

/// `POST /api/chat` - `{message}` in, `{reply}` out
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;
    let message = request.into_message()?;

    let start = Instant::now();
    let result = state.chat.complete(&message.message).await;
    let elapsed = start.elapsed();

    metrics::record_chat(elapsed.as_secs_f64(), state.chat.provider(), result.is_ok());

    let reply = result?;
    tracing::info!(
        provider = state.chat.provider(),
        message_chars = message.message.chars().count(),
        reply_chars = reply.chars().count(),
        latency_ms = elapsed.as_millis() as u64,
        "Chat completed"
    );

    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message() {
        for message in [None, Some(String::new()), Some(" \n".to_string())] {
            let err = ChatRequest { message }.into_message().unwrap_err();
            assert!(matches!(err, AppError::MissingField { ref field } if field == "message"));
        }
    }

    #[test]
    fn test_message_length_limit() {
        let long = ChatRequest {
            message: Some("x".repeat(4001)),
        };
        assert!(matches!(long.into_message(), Err(AppError::Validation { .. })));

        let ok = ChatRequest {
            message: Some("What is a transformer?".into()),
        };
        assert_eq!(ok.into_message().unwrap().message, "What is a transformer?");
    }
}
