//! Timehook core: the pure progress state machine for one webhook run.
mod effect;
mod elapsed;
mod msg;
mod state;
mod status;
mod update;

pub use effect::{Effect, Line};
pub use elapsed::{elapsed_seconds, TIMESTAMP_FORMAT};
pub use msg::{FailureClass, Msg};
pub use state::{Checkpoints, EmitterState, ProcessOutcome};
pub use status::{PollState, WebhookStatus};
pub use update::{update, EmitterError, CONNECTING_MESSAGE};
