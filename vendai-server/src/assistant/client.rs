//! Assistant backend client
//!
//! Thin reqwest client for an Anthropic-style Messages API: streaming chat
//! completion for Vi and a single-shot vision call for photo analysis.
//! Every call is a single attempt — failures are terminal for that user
//! action, retrying is up to the human.

use serde_json::json;
use shared::models::ChatMessage;
use tokio::sync::mpsc;

use crate::assistant::stream::{SseParser, StreamEvent};
use crate::utils::{AppError, AppResult, ErrorCode};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Assistant backend configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Missing key = assistant endpoints answer AssistantNotConfigured
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl AssistantConfig {
    /// Load from environment
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | ANTHROPIC_API_KEY | (必填，缺省时助手不可用) |
    /// | ANTHROPIC_BASE_URL | https://api.anthropic.com |
    /// | VI_MODEL | claude-sonnet-4-6 |
    /// | VI_MAX_TOKENS | 512 |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".into()),
            model: std::env::var("VI_MODEL").unwrap_or_else(|_| "claude-sonnet-4-6".into()),
            max_tokens: std::env::var("VI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(512),
        }
    }
}

/// Client for the text-generation backend
#[derive(Debug, Clone)]
pub struct AssistantClient {
    config: AssistantConfig,
    http: reqwest::Client,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::new(ErrorCode::AssistantNotConfigured))
    }

    /// Start a streaming completion. Returns a channel of text deltas in
    /// strict arrival order; the channel closes on `message_stop`, an
    /// `Err` item signals a mid-stream transport failure.
    pub async fn stream_chat(
        &self,
        system: String,
        messages: &[ChatMessage],
    ) -> AppResult<mpsc::Receiver<AppResult<String>>> {
        let key = self.api_key()?.to_string();

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "stream": true,
            "messages": messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect::<Vec<_>>(),
        });

        let resp = self
            .http
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::AssistantRequestFailed,
                    format!("Completion request failed: {e}"),
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::AssistantRequestFailed,
                format!("Completion backend returned {}", resp.status()),
            ));
        }

        let (tx, rx) = mpsc::channel::<AppResult<String>>(32);

        tokio::spawn(async move {
            use futures::StreamExt;

            let mut body = resp.bytes_stream();
            let mut decoder = Utf8Decoder::new();
            let mut parser = SseParser::new();

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        let text = decoder.push(&bytes);
                        for event in parser.push(&text) {
                            match event {
                                StreamEvent::Text(delta) => {
                                    if tx.send(Ok(delta)).await.is_err() {
                                        // Receiver gone: caller abandoned the stream
                                        return;
                                    }
                                }
                                StreamEvent::Done => return,
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Err(AppError::with_message(
                                ErrorCode::AssistantRequestFailed,
                                format!("Stream interrupted: {e}"),
                            )))
                            .await;
                        return;
                    }
                }
            }
            // Body ended without message_stop — treat as a normal close
        });

        Ok(rx)
    }

    /// Single non-streaming vision call: base64 JPEG images + instruction
    /// prompt, returns the raw reply text.
    pub async fn analyze_images(&self, images: &[String], prompt: &str) -> AppResult<String> {
        let key = self.api_key()?.to_string();

        let mut content: Vec<serde_json::Value> = images
            .iter()
            .map(|data| {
                json!({
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": "image/jpeg",
                        "data": data,
                    }
                })
            })
            .collect();
        content.push(json!({"type": "text", "text": prompt}));

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{"role": "user", "content": content}],
        });

        let resp = self
            .http
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::AssistantRequestFailed,
                    format!("Analysis request failed: {e}"),
                )
            })?;

        if !resp.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::AssistantRequestFailed,
                format!("Analysis backend returned {}", resp.status()),
            ));
        }

        let reply: serde_json::Value = resp.json().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::AssistantInvalidReply,
                format!("Analysis reply was not JSON: {e}"),
            )
        })?;

        let text = reply
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            })
            .and_then(|b| b.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AssistantInvalidReply,
                    "Analysis reply carried no text block",
                )
            })?;

        Ok(text.to_string())
    }
}

/// Incremental UTF-8 decoder: transport chunks can split multibyte
/// characters (accents, emoji), so the incomplete tail is buffered until
/// the next chunk completes it.
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn new() -> Self {
        Self { pending: Vec::new() }
    }

    fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let out = s.to_string();
                self.pending.clear();
                out
            }
            Err(e) => {
                let valid = e.valid_up_to();
                let out = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_decoder_handles_split_characters() {
        let mut decoder = Utf8Decoder::new();
        let text = "Olá! 👋";
        let bytes = text.as_bytes();

        // Split in the middle of the emoji
        let mut out = String::new();
        out.push_str(&decoder.push(&bytes[..7]));
        out.push_str(&decoder.push(&bytes[7..]));
        assert_eq!(out, text);
    }

    #[test]
    fn test_utf8_decoder_byte_at_a_time() {
        let mut decoder = Utf8Decoder::new();
        let text = "Vestido Açucena 💕";
        let mut out = String::new();
        for b in text.as_bytes() {
            out.push_str(&decoder.push(&[*b]));
        }
        assert_eq!(out, text);
    }

    #[test]
    fn test_unconfigured_client() {
        let client = AssistantClient::new(AssistantConfig {
            api_key: None,
            base_url: "https://api.anthropic.com".into(),
            model: "claude-sonnet-4-6".into(),
            max_tokens: 512,
        });
        assert!(!client.is_configured());
        assert_eq!(
            client.api_key().unwrap_err().code,
            ErrorCode::AssistantNotConfigured
        );
    }
}
