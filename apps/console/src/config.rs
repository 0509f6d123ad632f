use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_SSE_TIMEOUT: Duration = Duration::from_secs(30);
const MIN_SSE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Values captured by the compiler. The browser build has no process
/// environment, so these are all it ever sees.
const BUILD_ENV: [(&str, Option<&str>); 7] = [
    ("LEGALFLOW_API_BASE_URL", option_env!("LEGALFLOW_API_BASE_URL")),
    ("LEGALFLOW_STREAM_BASE_URL", option_env!("LEGALFLOW_STREAM_BASE_URL")),
    ("LEGALFLOW_FIRM_ID", option_env!("LEGALFLOW_FIRM_ID")),
    ("LEGALFLOW_AUTH_TOKEN", option_env!("LEGALFLOW_AUTH_TOKEN")),
    ("LEGALFLOW_PROFILE", option_env!("LEGALFLOW_PROFILE")),
    ("LEGALFLOW_SSE_TIMEOUT_MS", option_env!("LEGALFLOW_SSE_TIMEOUT_MS")),
    ("LEGALFLOW_REQUEST_TIMEOUT_SECS", option_env!("LEGALFLOW_REQUEST_TIMEOUT_SECS")),
];

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppProfile {
    #[default]
    Dev,
    Prod,
}

impl AppProfile {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Separate host for the roster stream. Falls back to `api_base_url`.
    pub stream_base_url: Option<String>,
    pub firm_id: Option<String>,
    pub auth_token: Option<String>,
    pub profile: AppProfile,
    /// Longest silence tolerated on the roster stream before reconnecting.
    pub sse_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stream_base_url: None,
            firm_id: None,
            auth_token: None,
            profile: AppProfile::Dev,
            sse_timeout: DEFAULT_SSE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        load_dotenv();

        Self::from_lookup(|key| {
            std::env::var(key).ok().or_else(|| {
                BUILD_ENV
                    .iter()
                    .find(|(name, _)| *name == key)
                    .and_then(|(_, value)| value.map(str::to_owned))
            })
        })
    }

    /// Builds the config from any key lookup. Blank, unset or unparsable
    /// values keep their defaults and timeouts are held above a floor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vars = Vars(lookup);
        let defaults = Self::default();

        Self {
            api_base_url: vars.text("LEGALFLOW_API_BASE_URL").unwrap_or(defaults.api_base_url),
            stream_base_url: vars.text("LEGALFLOW_STREAM_BASE_URL"),
            firm_id: vars.text("LEGALFLOW_FIRM_ID"),
            auth_token: vars.text("LEGALFLOW_AUTH_TOKEN"),
            profile: vars
                .text("LEGALFLOW_PROFILE")
                .map_or(defaults.profile, |value| AppProfile::parse(&value)),
            sse_timeout: vars
                .number("LEGALFLOW_SSE_TIMEOUT_MS")
                .map_or(defaults.sse_timeout, |ms| {
                    Duration::from_millis(ms).max(MIN_SSE_TIMEOUT)
                }),
            request_timeout: vars
                .number("LEGALFLOW_REQUEST_TIMEOUT_SECS")
                .map_or(defaults.request_timeout, |secs| {
                    Duration::from_secs(secs).max(MIN_REQUEST_TIMEOUT)
                }),
        }
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.auth_token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    pub fn stream_endpoint(&self) -> String {
        self.stream_base_url
            .clone()
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn text(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn number(&self, key: &str) -> Option<u64> {
        let raw = self.text(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%key, value = %raw, "ignoring non-numeric setting");
                None
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("failed to load .env: {err}"),
    }
}
