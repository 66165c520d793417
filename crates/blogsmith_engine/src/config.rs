use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the inference credential.
pub const TOKEN_ENV_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";

const MODEL_ENV_VAR: &str = "BLOGSMITH_MODEL";
const ENDPOINT_ENV_VAR: &str = "BLOGSMITH_ENDPOINT";
const SECTION_WORKERS_ENV_VAR: &str = "BLOGSMITH_SECTION_WORKERS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not set; add it to the environment or a .env file")]
    MissingCredential { var: String },
    #[error("{var} has an invalid value '{value}': {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}

/// Bearer token for the inference endpoint. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingCredential {
                var: TOKEN_ENV_VAR.to_string(),
            });
        }
        Ok(Self(token))
    }

    /// Reads the token through `lookup`, which is `std::env::var` in the app.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(TOKEN_ENV_VAR) {
            Some(value) => Self::new(value),
            None => Err(ConfigError::MissingCredential {
                var: TOKEN_ENV_VAR.to_string(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    pub base_url: String,
    pub model_id: String,
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub repetition_penalty: f32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            model_id: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            temperature: 0.7,
            max_new_tokens: 2000,
            repetition_penalty: 1.1,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl InferenceSettings {
    /// Applies `BLOGSMITH_MODEL` and `BLOGSMITH_ENDPOINT` on top of the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(model) = lookup(MODEL_ENV_VAR).filter(|value| !value.trim().is_empty()) {
            settings.model_id = model.trim().to_string();
        }
        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR) {
            let endpoint = endpoint.trim();
            Url::parse(endpoint).map_err(|err| ConfigError::InvalidValue {
                var: ENDPOINT_ENV_VAR.to_string(),
                value: endpoint.to_string(),
                reason: err.to_string(),
            })?;
            settings.base_url = endpoint.to_string();
        }
        Ok(settings)
    }

    /// `{base_url}/models/{model_id}`.
    pub fn model_url(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}/models/{}", self.model_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Pause after every section call, a fixed self-imposed rate limit.
    pub section_pause: Duration,
    /// Section calls allowed in flight at once; 1 keeps the calls sequential.
    pub section_workers: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            section_pause: Duration::from_secs(1),
            section_workers: 1,
        }
    }
}

impl PipelineSettings {
    /// Applies `BLOGSMITH_SECTION_WORKERS` on top of the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(raw) = lookup(SECTION_WORKERS_ENV_VAR) {
            let workers = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|workers| (1..=8).contains(workers))
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: SECTION_WORKERS_ENV_VAR.to_string(),
                    value: raw.clone(),
                    reason: "expected a number between 1 and 8".to_string(),
                })?;
            settings.section_workers = workers;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_or_blank_token_is_rejected() {
        assert_eq!(
            ApiToken::from_lookup(lookup(&[])),
            Err(ConfigError::MissingCredential {
                var: TOKEN_ENV_VAR.to_string()
            })
        );
        assert!(ApiToken::from_lookup(lookup(&[(TOKEN_ENV_VAR, "   ")])).is_err());
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = ApiToken::new("hf_secret").unwrap();
        assert_eq!(token.expose(), "hf_secret");
        assert!(!format!("{token:?}").contains("hf_secret"));
    }

    #[test]
    fn model_url_joins_base_and_model() {
        let settings = InferenceSettings::from_lookup(lookup(&[
            ("BLOGSMITH_ENDPOINT", "http://127.0.0.1:9000/"),
            ("BLOGSMITH_MODEL", "org/model"),
        ]))
        .unwrap();
        assert_eq!(
            settings.model_url().unwrap().as_str(),
            "http://127.0.0.1:9000/models/org/model"
        );
    }

    #[test]
    fn invalid_endpoint_is_reported() {
        let err = InferenceSettings::from_lookup(lookup(&[("BLOGSMITH_ENDPOINT", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn section_workers_are_bounded() {
        let settings =
            PipelineSettings::from_lookup(lookup(&[("BLOGSMITH_SECTION_WORKERS", "3")])).unwrap();
        assert_eq!(settings.section_workers, 3);
        assert_eq!(settings.section_pause, Duration::from_secs(1));

        assert!(PipelineSettings::from_lookup(lookup(&[("BLOGSMITH_SECTION_WORKERS", "0")])).is_err());
        assert!(PipelineSettings::from_lookup(lookup(&[("BLOGSMITH_SECTION_WORKERS", "x")])).is_err());
    }
}
