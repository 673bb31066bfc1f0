//! LLM collaborator client.
//!
//! One request/response contract: a text prompt, up to five inline images,
//! a temperature, and a plain-text reply. Provider and endpoint come from
//! config; the wire shape is the chat endpoint the default provider speaks.
//! Failed calls never propagate as errors — after bounded retries the
//! client returns an `Error: ...` marker string the caller must check for.

use crate::config::OttoConfig;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Client-side request timeout.
const LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Retry attempts after the first failure.
const LLM_RETRIES: u32 = 2;

/// Most images attached to a single request.
pub const MAX_VISION_IMAGES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

/// Client for the configured text/vision completion endpoint.
pub struct LlmClient {
    http: reqwest::Client,
    provider: String,
    model: String,
    api_base: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(config: &OttoConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(LLM_TIMEOUT)
                .build()
                .unwrap_or_default(),
            provider: config.provider.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            temperature: config.temperature,
        }
    }

    /// Text-only completion.
    pub async fn complete(&self, prompt: &str) -> String {
        self.complete_with_images(prompt, &[]).await
    }

    /// Completion with inline vision input. Missing image files are skipped
    /// with a warning; at most [`MAX_VISION_IMAGES`] are attached.
    pub async fn complete_with_images(&self, prompt: &str, images: &[PathBuf]) -> String {
        let encoded = encode_images(images);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
                images: if encoded.is_empty() { None } else { Some(encoded) },
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };
        let url = format!("{}/api/chat", self.api_base);

        for attempt in 0..=LLM_RETRIES {
            match self.http.post(&url).json(&request).send().await {
                Ok(resp) if resp.status().is_success() => {
                    match resp.json::<ChatResponse>().await {
                        Ok(body) => {
                            let content = strip_think_tags(&body.message.content);
                            debug!("LLM reply ({} chars)", content.len());
                            return content;
                        }
                        Err(e) => {
                            warn!("Unparseable LLM response: {}", e);
                            if attempt < LLM_RETRIES {
                                tokio::time::sleep(Duration::from_secs(1)).await;
                                continue;
                            }
                            return format!("Error: {}", e);
                        }
                    }
                }
                Ok(resp) => {
                    let status = resp.status();
                    warn!("LLM request failed with status {}", status);
                    if attempt < LLM_RETRIES {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return format!("Error: LLM request failed ({})", status);
                }
                Err(e) if e.is_connect() => {
                    warn!(
                        "Connection to {} failed, retrying ({}/{})",
                        self.provider,
                        attempt + 1,
                        LLM_RETRIES + 1
                    );
                    if attempt < LLM_RETRIES {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        continue;
                    }
                    return format!("Error: Cannot connect to {}", self.provider);
                }
                Err(e) if e.is_timeout() => {
                    warn!("LLM request timed out, retrying ({}/{})", attempt + 1, LLM_RETRIES + 1);
                    if attempt < LLM_RETRIES {
                        continue;
                    }
                    return "Error: Request timed out".to_string();
                }
                Err(e) => {
                    warn!("LLM error: {}", e);
                    if attempt < LLM_RETRIES {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return format!("Error: {}", e);
                }
            }
        }

        "Error: Failed after retries".to_string()
    }
}

/// Callers must treat replies with this marker as a failed LLM call.
pub fn is_llm_error(reply: &str) -> bool {
    reply.starts_with("Error:")
}

fn encode_images(paths: &[PathBuf]) -> Vec<String> {
    let mut encoded = Vec::new();
    for path in paths.iter().take(MAX_VISION_IMAGES) {
        match std::fs::read(path) {
            Ok(bytes) => encoded.push(BASE64.encode(bytes)),
            Err(_) => warn!("Image not found, skipping: {}", path.display()),
        }
    }
    encoded
}

static THINK_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

/// Remove any `<think>...</think>` reasoning trace from a model reply.
pub fn strip_think_tags(reply: &str) -> String {
    THINK_TAGS.replace_all(reply, "").trim().to_string()
}

/// Remove Markdown code-fence wrapping around a JSON reply.
pub fn strip_json_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Language of a generated code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLang {
    Python,
    Bash,
}

/// Pull the first ```python / ```bash / ```sh block out of a reply.
pub fn extract_code_block(reply: &str) -> Option<(CodeLang, String)> {
    for (marker, lang) in [
        ("```python", CodeLang::Python),
        ("```bash", CodeLang::Bash),
        ("```sh", CodeLang::Bash),
    ] {
        if let Some(rest) = reply.split(marker).nth(1) {
            let code = rest.split("```").next().unwrap_or("").trim();
            if !code.is_empty() {
                return Some((lang, code.to_string()));
            }
        }
    }
    None
}
