use std::fmt;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use thiserror::Error;
use timehook_core::FailureClass;
use url::Url;

/// What the user asked to schedule. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub target_url: String,
    pub body: Bytes,
    pub delay_seconds: u32,
}

impl RegistrationRequest {
    pub fn new(target_url: impl Into<String>, body: impl Into<Bytes>, delay_seconds: u32) -> Self {
        Self {
            target_url: target_url.into(),
            body: body.into(),
            delay_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResult {
    pub id: String,
}

/// A fully built request, ready for a [`crate::Transport`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub(crate) fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::Connect => write!(f, "connection failed"),
            TransportFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            TransportFailure::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("can not build request: {0}")]
    InvalidRequest(String),
    #[error("can not execute request: {0}")]
    Transport(#[from] TransportError),
    #[error("server responded 401 unauthorized request")]
    Unauthorized,
    #[error("server responded 429 too many requests")]
    RateLimited,
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("can not parse response {body}: {message}")]
    Decode { body: String, message: String },
}

impl ApiError {
    /// How the progress emitter should treat this error during polling.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            ApiError::RateLimited => FailureClass::RateLimited,
            ApiError::Transport(_) => FailureClass::Transient,
            ApiError::Unauthorized => FailureClass::Unauthorized,
            ApiError::InvalidRequest(_)
            | ApiError::UnexpectedStatus { .. }
            | ApiError::Decode { .. } => FailureClass::Fatal,
        }
    }
}
