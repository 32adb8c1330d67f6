//! Gemini REST API client.
//!
//! One explicitly constructed client per caller, carrying its own key and
//! HTTP pool. Requests authenticate with the `x-goog-api-key` header;
//! asset downloads append the key as a `key` query parameter.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::backend::{ContentGenerator, VideoGenerator};
use crate::error::{GenAiError, GenAiResult};
use crate::retry::{with_retry, RetryConfig};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Operation, PredictLongRunningRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

// =============================================================================
// Configuration
// =============================================================================

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Scheme and host, without the API version
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
    pub image_model: String,
    pub text_model: String,
    pub video_model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("video_model", &self.video_model)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with default endpoints and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| GenAiError::config("GEMINI_API_KEY or API_KEY must be set"))?;

        if api_key.trim().is_empty() {
            return Err(GenAiError::config("GEMINI_API_KEY cannot be empty"));
        }

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        let mut config = Self::new(api_key.trim());
        config.timeout = Duration::from_secs(timeout_secs);
        config.retry = RetryConfig::from_env();

        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_VIDEO_MODEL") {
            config.video_model = model;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// Gemini / Veo REST client.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(config: GeminiConfig) -> GenAiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GenAiError::config("API key is empty"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("jstudio-genai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GenAiError::Network)?;

        let base_url = format!("{}/{}", config.base_url.trim_end_matches('/'), API_VERSION);

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.trim_start_matches("models/");
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// Attach the API key as a `key` query parameter.
    fn with_key_param(&self, uri: &str) -> GenAiResult<Url> {
        let mut url = Url::parse(uri)
            .map_err(|e| GenAiError::invalid_response(format!("bad asset URI {}: {}", uri, e)))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> GenAiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;
        parse_json(url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> GenAiResult<T> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(map_send_error)?;
        parse_json(url, response).await
    }

    async fn timed<T, F>(&self, operation: &str, model: &str, fut: F) -> GenAiResult<T>
    where
        F: std::future::Future<Output = GenAiResult<T>>,
    {
        let span = info_span!("genai_request", operation = %operation, model = %model);
        let start = Instant::now();
        let result = fut.instrument(span).await;
        debug!(
            operation = %operation,
            model = %model,
            latency_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Backend call finished"
        );
        result
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenAiResult<GenerateContentResponse> {
        let url = self.model_url(model, "generateContent");
        self.timed(
            "generate_content",
            model,
            with_retry(&self.config.retry, "generate_content", || {
                self.post_json(&url, request)
            }),
        )
        .await
    }
}

#[async_trait]
impl VideoGenerator for GeminiClient {
    async fn start_video(
        &self,
        model: &str,
        request: &PredictLongRunningRequest,
    ) -> GenAiResult<Operation> {
        let url = self.model_url(model, "predictLongRunning");
        self.timed("start_video", model, self.post_json(&url, request))
            .await
    }

    async fn get_operation(&self, name: &str) -> GenAiResult<Operation> {
        let url = format!("{}/{}", self.base_url, name.trim_start_matches('/'));
        self.timed("get_operation", name, self.get_json(&url)).await
    }

    async fn download_video(&self, uri: &str) -> GenAiResult<Vec<u8>> {
        let url = self.with_key_param(uri)?;
        self.timed(
            "download_video",
            "",
            with_retry(&self.config.retry, "download_video", || async {
                let response = self
                    .http
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(map_send_error)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(error_from_response(response).await);
                }
                Ok(response.bytes().await?.to_vec())
            }),
        )
        .await
    }
}

fn map_send_error(e: reqwest::Error) -> GenAiError {
    if e.is_timeout() {
        GenAiError::Timeout(e.to_string())
    } else {
        GenAiError::Network(e)
    }
}

async fn parse_json<T: DeserializeOwned>(url: &str, response: Response) -> GenAiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let err = error_from_response(response).await;
        debug!(url = %redact(url), status = status.as_u16(), "Backend returned error status");
        return Err(err);
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn error_from_response(response: Response) -> GenAiError {
    let status = response.status().as_u16();
    let retry_after_ms = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let body = response.text().await.unwrap_or_default();

    match GenAiError::from_http_status(status, body) {
        GenAiError::RateLimited { .. } => GenAiError::RateLimited { retry_after_ms },
        other => other,
    }
}

/// Strip the query string so keys never reach logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
