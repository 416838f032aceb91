//! Conversational API client
//!
//! One blocking chat-completions request per call, OpenRouter-compatible.
//! Always called as `(prompt, model)`.

use crate::config::AppConfig;
use crate::error::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Single request/response chat call
pub trait ChatClient: Send + Sync {
    fn ask(&self, prompt: &str, model: &str) -> ChatResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenRouter chat-completions client
pub struct OpenRouterClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> ChatResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            api_key: api_key.to_string(),
            referer: String::new(),
            title: String::new(),
        })
    }

    /// Build from config, reading the key from the configured env var
    pub fn from_config(config: &AppConfig) -> ChatResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ChatError::Config(format!("Missing {} in environment", config.api_key_env))
        })?;
        let mut client = Self::new(&config.api_url, &api_key, config.request_timeout())?;
        client.referer = config.http_referer.clone();
        client.title = config.app_title.clone();
        Ok(client)
    }
}

impl ChatClient for OpenRouterClient {
    fn ask(&self, prompt: &str, model: &str) -> ChatResult<String> {
        let request = ChatRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut builder = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request);
        if !self.referer.is_empty() {
            builder = builder.header("HTTP-Referer", &self.referer);
        }
        if !self.title.is_empty() {
            builder = builder.header("X-Title", &self.title);
        }

        let response = builder
            .send()
            .map_err(|e| ChatError::Client(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ChatError::Client(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ChatError::Client(format!(
                "API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        debug!("🧠 Chat response: {} bytes", body.len());
        parse_answer(&body)
    }
}

/// Extract `choices[0].message.content`, trimmed
pub fn parse_answer(body: &str) -> ChatResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::Client(format!("malformed response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ChatError::Client("malformed response: no choices".to_string()))
}
