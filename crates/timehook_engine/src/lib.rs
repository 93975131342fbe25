//! Timehook engine: API gateway, HTTP transport and the register-and-poll runner.
mod gateway;
mod runner;
mod transport;
mod types;

pub use gateway::{ApiSettings, Gateway, DEFAULT_BASE_URL};
pub use runner::{spawn_run, RunEvent, RunHandle, RunSettings};
pub use transport::{ReqwestTransport, Transport, TransportSettings};
pub use types::{
    ApiError, ApiRequest, ApiResponse, RegistrationRequest, RegistrationResult, TransportError,
    TransportFailure,
};
