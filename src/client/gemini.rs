// File: ./src/client/gemini.rs
//! REST client for the Generative Language API.
use crate::client::sse::SseDecoder;
use crate::client::{ModelBackend, TextStream};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    message: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Result<String> {
        if let Some(err) = self.error {
            anyhow::bail!("Model API error ({}): {}", err.code, err.message);
        }
        Ok(self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("teamsync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            temperature: config.temperature,
        })
    }

    /// Resolves the credential from the config; fails when none is available.
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config.resolve_api_key()?;
        Self::new(key, config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(&self, url: &str, prompt: &str) -> Result<reqwest::Response> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to model API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Model API returned {}", status);
            anyhow::bail!("Model API error ({status}): {error_text}");
        }
        Ok(response)
    }
}

/// Decodes one SSE payload into its text fragment; empty fragments are skipped.
fn fragment(payload: &str) -> Option<Result<String>> {
    let parsed: GenerateResponse = match serde_json::from_str(payload) {
        Ok(p) => p,
        Err(e) => return Some(Err(anyhow::Error::new(e).context("Malformed stream chunk"))),
    };
    match parsed.into_text() {
        Ok(text) if text.is_empty() => None,
        other => Some(other),
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        log::debug!("Invoking {} ({} prompt chars)", self.model, prompt.len());
        let response = self.post(&self.endpoint("generateContent"), prompt).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse model response")?;
        body.into_text()
    }

    async fn stream(&self, prompt: &str) -> Result<TextStream> {
        log::debug!("Streaming from {}", self.model);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, prompt).await?;

        struct State {
            bytes: futures::stream::BoxStream<'static, reqwest::Result<Vec<u8>>>,
            decoder: SseDecoder,
            ready: VecDeque<Result<String>>,
            done: bool,
        }

        let state = State {
            bytes: response
                .bytes_stream()
                .map(|chunk| chunk.map(|b| b.to_vec()))
                .boxed(),
            decoder: SseDecoder::new(),
            ready: VecDeque::new(),
            done: false,
        };

        let stream = futures::stream::unfold(state, |mut st| async move {
            loop {
                if let Some(item) = st.ready.pop_front() {
                    return Some((item, st));
                }
                if st.done {
                    return None;
                }
                match st.bytes.next().await {
                    Some(Ok(chunk)) => {
                        for payload in st.decoder.push(&chunk) {
                            st.ready.extend(fragment(&payload));
                        }
                    }
                    Some(Err(e)) => {
                        st.done = true;
                        st.ready
                            .push_back(Err(anyhow::Error::new(e).context("Model stream interrupted")));
                    }
                    None => {
                        st.done = true;
                        if let Some(payload) = st.decoder.finish() {
                            st.ready.extend(fragment(&payload));
                        }
                    }
                }
            }
        });

        Ok(stream.boxed())
    }
}
