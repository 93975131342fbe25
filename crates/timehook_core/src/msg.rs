use crate::PollState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The run is about to contact the API.
    Connect,
    /// A poll returned the current webhook state.
    StateObserved(PollState),
    /// A poll failed before producing a state.
    RequestFailed { class: FailureClass, message: String },
    /// Registration failed; there is nothing to poll.
    RegistrationFailed { message: String },
    /// The caller asked the run to stop at the next tick boundary.
    Cancelled,
}

/// How a failed poll affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// HTTP 429; shown as a progress tick, polling continues.
    RateLimited,
    /// Network-level failure; reported, polling continues.
    Transient,
    /// HTTP 401; reported, the run ends.
    Unauthorized,
    /// Anything else; reported, the run ends.
    Fatal,
}

impl FailureClass {
    pub fn is_terminal(self) -> bool {
        matches!(self, FailureClass::Unauthorized | FailureClass::Fatal)
    }
}
