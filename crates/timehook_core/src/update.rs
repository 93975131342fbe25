use thiserror::Error;
use timehook_logging::{hook_debug, hook_warn};

use crate::{
    elapsed_seconds, Effect, EmitterState, FailureClass, Line, Msg, PollState, ProcessOutcome,
    WebhookStatus,
};

pub const CONNECTING_MESSAGE: &str = "Connecting to timehook.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmitterError {
    #[error("progress emitter already finished (succeeded: {})", .0.succeeded)]
    AlreadyFinished(ProcessOutcome),
}

/// Pure update function: applies a message to the emitter state and returns the
/// lines to show plus, at most once per run, the final outcome.
///
/// Milestones skipped between two polls are announced in order, so a run that
/// first observes `succeeded` still prints connecting, scheduled and sending.
pub fn update(
    mut state: EmitterState,
    msg: Msg,
) -> Result<(EmitterState, Vec<Effect>), EmitterError> {
    if let Some(outcome) = state.outcome() {
        hook_warn!("Rejected {:?} after the run finished", msg);
        return Err(EmitterError::AlreadyFinished(outcome));
    }

    let mut effects = Vec::new();
    match msg {
        Msg::Connect => connect(&mut state, &mut effects),
        Msg::StateObserved(poll) => observe(&mut state, &poll, &mut effects),
        Msg::RequestFailed { class, message } => match class {
            FailureClass::RateLimited => effects.push(Effect::Emit(Line::progress("."))),
            FailureClass::Transient => effects.push(error_line(&message)),
            FailureClass::Unauthorized | FailureClass::Fatal => {
                effects.push(error_line(&message));
                finish(&mut state, ProcessOutcome::failure(), &mut effects);
            }
        },
        Msg::RegistrationFailed { message } => {
            effects.push(error_line(&message));
            finish(&mut state, ProcessOutcome::failure(), &mut effects);
        }
        Msg::Cancelled => {
            effects.push(error_line("run cancelled"));
            finish(&mut state, ProcessOutcome::failure(), &mut effects);
        }
    }

    Ok((state, effects))
}

fn connect(state: &mut EmitterState, effects: &mut Vec<Effect>) {
    let checkpoints = state.checkpoints_mut();
    if !checkpoints.connected {
        checkpoints.connected = true;
        effects.push(Effect::Emit(Line::progress(CONNECTING_MESSAGE)));
    }
}

fn observe(state: &mut EmitterState, poll: &PollState, effects: &mut Vec<Effect>) {
    hook_debug!("Observed webhook {} in status {}", poll.id, poll.status);
    connect(state, effects);

    if let WebhookStatus::Unknown(raw) = &poll.status {
        effects.push(Effect::Emit(Line::progress(format!(
            "\nUnknown status {raw}"
        ))));
        finish(state, ProcessOutcome::failure(), effects);
        return;
    }

    let registered_at = poll.registered_at.as_deref();
    let checkpoints = state.checkpoints_mut();

    if !checkpoints.scheduled {
        checkpoints.scheduled = true;
        effects.push(Effect::Emit(Line::progress(format!(
            "\n[0s] Webhook scheduled at {}",
            show(&poll.scheduled_at)
        ))));
    }

    if poll.status == WebhookStatus::AwaitingClock {
        effects.push(Effect::Emit(Line::progress(".")));
    }

    if poll.status.is_past_clock() && !checkpoints.sending {
        checkpoints.sending = true;
        let secs = elapsed_seconds(registered_at, poll.sending_at.as_deref());
        effects.push(Effect::Emit(Line::progress(format!(
            "\n[{secs}s] Sending webhook at {}",
            show(&poll.sending_at)
        ))));
    }

    if checkpoints.finalized {
        return;
    }
    let (text, outcome) = match poll.status {
        WebhookStatus::Succeeded => {
            let secs = elapsed_seconds(registered_at, poll.succeeded_at.as_deref());
            (
                format!(
                    "\n[{secs}s] Webhook succeeded at {}\n\n",
                    show(&poll.succeeded_at)
                ),
                ProcessOutcome::success(),
            )
        }
        WebhookStatus::Failed => {
            let secs = elapsed_seconds(registered_at, poll.failed_at.as_deref());
            (
                format!("\n[{secs}s] Webhook failed at {}\n\n", show(&poll.failed_at)),
                ProcessOutcome::failure(),
            )
        }
        WebhookStatus::Timeout => {
            let secs = elapsed_seconds(registered_at, poll.failed_at.as_deref());
            (
                format!(
                    "\n[{secs}s] Webhook failed due timeout at {}\n\n",
                    show(&poll.failed_at)
                ),
                ProcessOutcome::failure(),
            )
        }
        _ => return,
    };
    checkpoints.finalized = true;
    effects.push(Effect::Emit(Line::progress(text)));
    finish(state, outcome, effects);
}

fn finish(state: &mut EmitterState, outcome: ProcessOutcome, effects: &mut Vec<Effect>) {
    let outcome = state.finish(outcome);
    hook_debug!("Run finished: {:?}", outcome);
    effects.push(Effect::Finish(outcome));
}

fn error_line(message: &str) -> Effect {
    Effect::Emit(Line::error(format!("\n[ERROR] {message}")))
}

fn show(timestamp: &Option<String>) -> &str {
    timestamp.as_deref().unwrap_or("")
}
