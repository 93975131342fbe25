use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use timehook_core::{PollState, WebhookStatus};
use timehook_logging::{hook_debug, hook_info};
use url::Url;

use crate::{
    ApiError, ApiRequest, ApiResponse, RegistrationRequest, RegistrationResult, Transport,
};

pub const DEFAULT_BASE_URL: &str = "https://api.timehook.io";

const WEBHOOK_HEADER: &str = "x-webhook";
const SECONDS_HEADER: &str = "x-seconds";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
}

impl ApiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateResponse {
    id: String,
    #[serde(default)]
    registered_at: Option<String>,
    #[serde(default)]
    scheduled_at: Option<String>,
    #[serde(default)]
    awaiting_clock_at: Option<String>,
    #[serde(default)]
    sending_http_at: Option<String>,
    #[serde(default)]
    succeeded_at: Option<String>,
    #[serde(default)]
    failed_at: Option<String>,
    status: String,
}

impl From<StateResponse> for PollState {
    fn from(wire: StateResponse) -> Self {
        PollState {
            id: wire.id,
            registered_at: wire.registered_at,
            scheduled_at: wire.scheduled_at,
            awaiting_clock_at: wire.awaiting_clock_at,
            sending_at: wire.sending_http_at,
            succeeded_at: wire.succeeded_at,
            failed_at: wire.failed_at,
            status: WebhookStatus::from_wire(&wire.status),
        }
    }
}

/// Talks to the timehook API: builds requests, attaches credentials and turns
/// status codes into typed results.
#[derive(Clone)]
pub struct Gateway {
    settings: ApiSettings,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(settings: ApiSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Registers the webhook; the API answers 201 with the new webhook id.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResult, ApiError> {
        let mut api_request = self.build(Method::POST, &["webhooks"], request.body.clone())?;
        let headers = &mut api_request.headers;
        headers.insert(
            HeaderName::from_static(WEBHOOK_HEADER),
            header_value(&request.target_url)?,
        );
        headers.insert(
            HeaderName::from_static(SECONDS_HEADER),
            HeaderValue::from(request.delay_seconds),
        );

        let response = self.execute(api_request, 201).await?;
        let registered: RegisterResponse = decode(&response)?;
        hook_info!("Registered webhook {}", registered.id);
        Ok(RegistrationResult { id: registered.id })
    }

    /// Reads the current state of a registered webhook; the API answers 200.
    pub async fn poll_state(&self, id: &str) -> Result<PollState, ApiError> {
        let api_request = self.build(Method::GET, &["states", id], Bytes::new())?;
        let response = self.execute(api_request, 200).await?;
        let state: StateResponse = decode(&response)?;
        Ok(state.into())
    }

    fn build(
        &self,
        method: Method,
        segments: &[&str],
        body: Bytes,
    ) -> Result<ApiRequest, ApiError> {
        let base = &self.settings.base_url;
        let mut url =
            Url::parse(base).map_err(|err| ApiError::InvalidRequest(format!("{base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("{base} can not be a base")))?
            .pop_if_empty()
            .extend(segments);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.settings.api_key))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }

    async fn execute(&self, request: ApiRequest, wanted: u16) -> Result<ApiResponse, ApiError> {
        let response = self.transport.execute(request).await?;
        hook_debug!("API answered {} (wanted {})", response.status, wanted);
        match response.status {
            401 => Err(ApiError::Unauthorized),
            429 => Err(ApiError::RateLimited),
            status if status != wanted => Err(ApiError::UnexpectedStatus {
                status,
                body: response.body_text(),
            }),
            _ => Ok(response),
        }
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(raw)
        .map_err(|err| ApiError::InvalidRequest(format!("invalid header value {raw:?}: {err}")))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|err| ApiError::Decode {
        body: response.body_text(),
        message: err.to_string(),
    })
}
