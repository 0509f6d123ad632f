use std::sync::Arc;

use anyhow::Context;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::StaffRecord;
use crate::session::SessionUser;

pub type ClientResult<T> = Result<T, ClientError>;

const FIRM_HEADER: &str = "X-Firm-Id";

/// HTTP client for the LegalFlow practice API.
#[derive(Clone)]
pub struct LegalFlowClient {
    http: reqwest::Client,
    config: Arc<AppConfig>,
    base_url: String,
}

impl LegalFlowClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let base_url = trim_trailing_slashes(&config.api_base_url);

        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(config.request_timeout);
        }
        let http = builder
            .build()
            .context("failed to build the LegalFlow HTTP client")?;

        Ok(Self {
            http,
            config: Arc::new(config),
            base_url,
        })
    }

    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    pub async fn update_staff(&self, record: &StaffRecord) -> ClientResult<ApiEnvelope<StaffRecord>> {
        let path = format!("staff/{}", record.id);
        self.send(self.request(Method::PUT, &path).json(record)).await
    }

    pub async fn create_staff(&self, record: &StaffRecord) -> ClientResult<ApiEnvelope<StaffRecord>> {
        self.send(self.request(Method::POST, "staff").json(record)).await
    }

    pub async fn current_user(&self) -> ClientResult<ApiEnvelope<SessionUser>> {
        self.send(self.request(Method::GET, "session/me")).await
    }

    /// EventSource cannot carry headers, so the firm scope travels as a
    /// query parameter.
    pub fn roster_stream_url(&self) -> String {
        let base = trim_trailing_slashes(&self.config.stream_endpoint());
        match self.config.firm_id.as_deref() {
            Some(firm) => format!("{base}/staff/stream?firm={firm}"),
            None => format!("{base}/staff/stream"),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.join_path(path));
        if let Some(token) = self.config.bearer_token() {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        if let Some(firm) = self.config.firm_id.as_deref() {
            builder = builder.header(FIRM_HEADER, firm);
        }
        builder
    }

    fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_envelope(status, &body)
    }
}

/// Splits a response into data or a typed failure. A 2xx without
/// `success: true` still counts as a failure.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ClientResult<ApiEnvelope<T>> {
    if body.is_empty() {
        return Err(ClientError::EmptyResponse(status));
    }

    let envelope: ApiEnvelope<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ClientError::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            })
        }
        Err(err) => return Err(err.into()),
    };

    if status.is_success() && envelope.success {
        return Ok(envelope);
    }
    match envelope.error {
        Some(error) => Err(ClientError::Api(ApiFailure { status, error })),
        None => Err(ClientError::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

fn trim_trailing_slashes(input: &str) -> String {
    input.trim_end_matches('/').to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default = "Option::default")]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub error: ApiErrorBody,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to the practice API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("practice API sent an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("practice API rejected the request ({}): {}", .0.status, .0.error)]
    Api(ApiFailure),
    #[error("practice API answered {0} with no body")]
    EmptyResponse(StatusCode),
    #[error("practice API answered {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error(transparent)]
    Setup(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(failure) => Some(failure.status),
            Self::EmptyResponse(status) | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) | Self::Setup(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: AppConfig) -> LegalFlowClient {
        LegalFlowClient::new(config).expect("client builds")
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = AppConfig {
            api_base_url: "http://localhost:8080/api/".into(),
            ..AppConfig::default()
        };
        let client = client(config);
        assert_eq!(client.join_path("/staff/4"), "http://localhost:8080/api/staff/4");
    }

    #[test]
    fn roster_stream_url_carries_firm_scope() {
        let config = AppConfig {
            api_base_url: "http://api.local/v1".into(),
            stream_base_url: Some("http://stream.local/v1/".into()),
            firm_id: Some("firm-9".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            client(config).roster_stream_url(),
            "http://stream.local/v1/staff/stream?firm=firm-9"
        );
    }

    #[test]
    fn error_envelope_becomes_api_failure_with_status() {
        let body = br#"{"success":false,"error":{"code":"not_found","message":"no such staff"}}"#;
        let err = decode_envelope::<StaffRecord>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        match err {
            ClientError::Api(failure) => {
                assert_eq!(failure.error.to_string(), "not_found: no such staff")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn success_flag_is_required_even_on_2xx() {
        let err = decode_envelope::<StaffRecord>(StatusCode::OK, br#"{"success":false}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedStatus { .. }));
    }

    #[test]
    fn non_json_error_pages_keep_their_text() {
        let err = decode_envelope::<StaffRecord>(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        match err {
            ClientError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_bodies_are_reported() {
        let err = decode_envelope::<StaffRecord>(StatusCode::NO_CONTENT, b"").unwrap_err();
        assert!(matches!(err, ClientError::EmptyResponse(StatusCode::NO_CONTENT)));
    }

    #[test]
    fn successful_envelope_carries_data() {
        let body = br#"{"success":true,"data":{"name":"Jordan Avery","role":"Office Manager"},"requestId":"r-1"}"#;
        let envelope = decode_envelope::<SessionUser>(StatusCode::OK, body).unwrap();
        assert_eq!(envelope.request_id.as_deref(), Some("r-1"));
        assert_eq!(envelope.data.map(|user| user.name).as_deref(), Some("Jordan Avery"));
    }

    #[test]
    fn saved_staff_record_decodes_from_the_envelope() {
        let body = br#"{"success":true,"data":{"id":"4","firstName":"Ana","lastName":"Ruiz","role":"Senior_Lawyer"}}"#;
        let envelope = decode_envelope::<StaffRecord>(StatusCode::OK, body).unwrap();
        let record = envelope.data.expect("record present");
        assert_eq!(record.id, "4");
        assert_eq!(record.first_name, "Ana");
        assert!(envelope.error.is_none());
        assert!(envelope.request_id.is_none());
    }

    #[test]
    fn successful_envelope_may_omit_data() {
        let envelope = decode_envelope::<StaffRecord>(StatusCode::ACCEPTED, br#"{"success":true}"#).unwrap();
        assert!(envelope.data.is_none());
    }
}
