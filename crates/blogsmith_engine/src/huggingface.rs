use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use engine_logging::{engine_debug, engine_warn};

use crate::inference::{InferenceClient, InferenceError, InferenceFailureKind};
use crate::{ApiToken, InferenceSettings};

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    repetition_penalty: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The endpoint answers with a list for text-generation models, but some
/// deployments return a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the Hugging Face hosted inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: Url,
    settings: InferenceSettings,
    token: ApiToken,
}

impl HuggingFaceClient {
    /// Builds a client; the token is required up front so no call can be made without it.
    pub fn new(settings: InferenceSettings, token: ApiToken) -> Result<Self, InferenceError> {
        let endpoint = settings.model_url().map_err(|err| {
            InferenceError::new(InferenceFailureKind::Configuration, err.to_string())
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| {
                InferenceError::new(InferenceFailureKind::Configuration, err.to_string())
            })?;

        Ok(Self {
            http,
            endpoint,
            settings,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                temperature: self.settings.temperature,
                max_new_tokens: self.settings.max_new_tokens,
                repetition_penalty: self.settings.repetition_penalty,
                return_full_text: false,
            },
        }
    }
}

#[async_trait::async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        engine_debug!(
            "inference request model={} prompt_len={}",
            self.settings.model_id,
            prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.token.expose())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let err = status_error(status, &body);
            engine_warn!("inference request failed: {}", err);
            return Err(err);
        }

        let text = parse_generated_text(&body)?;
        engine_debug!("inference response len={}", text.len());
        Ok(text)
    }
}

fn status_error(status: StatusCode, body: &str) -> InferenceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| status.to_string());
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InferenceFailureKind::Auth,
        StatusCode::TOO_MANY_REQUESTS => InferenceFailureKind::RateLimited,
        other => InferenceFailureKind::HttpStatus(other.as_u16()),
    };
    InferenceError::new(kind, message)
}

fn parse_generated_text(body: &str) -> Result<String, InferenceError> {
    let parsed: GenerationResponse = serde_json::from_str(body)
        .map_err(|err| InferenceError::new(InferenceFailureKind::InvalidResponse, err.to_string()))?;
    let text = match parsed {
        GenerationResponse::Many(items) => items.into_iter().next().map(|item| item.generated_text),
        GenerationResponse::One(item) => Some(item.generated_text),
    };
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(InferenceError::new(
            InferenceFailureKind::EmptyResponse,
            "the model returned no text",
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        return InferenceError::new(InferenceFailureKind::Timeout, err.to_string());
    }
    InferenceError::new(InferenceFailureKind::Transport, err.to_string())
}
