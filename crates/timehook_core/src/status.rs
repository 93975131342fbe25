use std::fmt;

/// Server-side lifecycle of a registered webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookStatus {
    Registered,
    AwaitingClock,
    SendingHttp,
    Succeeded,
    Failed,
    Timeout,
    /// Any value the client does not recognise, kept verbatim.
    Unknown(String),
}

impl WebhookStatus {
    /// Maps the wire value (`"awaitingClock"`, `"sendingHttp"`, ...) to a status.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "registered" => WebhookStatus::Registered,
            "awaitingClock" => WebhookStatus::AwaitingClock,
            "sendingHttp" => WebhookStatus::SendingHttp,
            "succeeded" => WebhookStatus::Succeeded,
            "failed" => WebhookStatus::Failed,
            "timeout" => WebhookStatus::Timeout,
            other => WebhookStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            WebhookStatus::Registered => "registered",
            WebhookStatus::AwaitingClock => "awaitingClock",
            WebhookStatus::SendingHttp => "sendingHttp",
            WebhookStatus::Succeeded => "succeeded",
            WebhookStatus::Failed => "failed",
            WebhookStatus::Timeout => "timeout",
            WebhookStatus::Unknown(raw) => raw,
        }
    }

    /// Succeeded, failed, timeout and unknown all end polling.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            WebhookStatus::Registered | WebhookStatus::AwaitingClock | WebhookStatus::SendingHttp
        )
    }

    /// True once the webhook has at least started its HTTP call.
    pub(crate) fn is_past_clock(&self) -> bool {
        matches!(
            self,
            WebhookStatus::SendingHttp
                | WebhookStatus::Succeeded
                | WebhookStatus::Failed
                | WebhookStatus::Timeout
        )
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One poll's view of the webhook. Timestamps stay as the raw wire strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub id: String,
    pub registered_at: Option<String>,
    pub scheduled_at: Option<String>,
    pub awaiting_clock_at: Option<String>,
    pub sending_at: Option<String>,
    pub succeeded_at: Option<String>,
    pub failed_at: Option<String>,
    pub status: WebhookStatus,
}

impl PollState {
    /// A state with only an id and a status; timestamps are filled in by the caller.
    pub fn new(id: impl Into<String>, status: WebhookStatus) -> Self {
        Self {
            id: id.into(),
            registered_at: None,
            scheduled_at: None,
            awaiting_clock_at: None,
            sending_at: None,
            succeeded_at: None,
            failed_at: None,
            status,
        }
    }
}
