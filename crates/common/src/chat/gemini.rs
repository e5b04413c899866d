//! Google Gemini `generateContent` client

use super::{build_client, request_error, ChatCompleter};
use crate::config::ChatConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiCompleter {
    client: reqwest::Client,
    url: String,
    api_key: String,
    system_prompt: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiCompleter {
    /// Create a new completer
    pub fn new(config: &ChatConfig, api_key: String) -> Result<Self> {
        let url = match config.endpoint {
            Some(ref endpoint) => endpoint.clone(),
            None => {
                let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
                format!("{}/{}:generateContent", DEFAULT_BASE, model)
            }
        };

        Ok(Self {
            client: build_client(config)?,
            url,
            api_key,
            system_prompt: config.system_prompt.clone(),
        })
    }

    fn build_request<'a>(&'a self, message: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: message }],
            }],
            system_instruction: self.system_prompt.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
        }
    }
}

#[async_trait]
impl ChatCompleter for GeminiCompleter {
    async fn complete(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(message))
            .send()
            .await
            .map_err(|e| request_error("gemini", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Chat {
                message: format!("gemini API error {}: {}", status, body),
            });
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| AppError::Chat {
            message: format!("Failed to parse gemini response: {}", e),
        })?;

        extract_reply(generated)
    }

    fn provider(&self) -> &str {
        "gemini"
    }
}

/// Concatenate the text parts of the first candidate
fn extract_reply(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(AppError::Chat {
            message: "Empty response from gemini".to_string(),
        });
    }
    Ok(text)
}
