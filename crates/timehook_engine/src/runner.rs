use std::time::Duration;

use timehook_core::{update, Effect, EmitterState, Line, Msg, ProcessOutcome};
use timehook_logging::{hook_debug, hook_error, hook_info, hook_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{Gateway, RegistrationRequest};

#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Time between two polls; the first poll happens one interval after registration.
    pub poll_interval: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Registering,
    Polling,
    Finished,
}

/// What the caller receives, in emission order. `Finished` is always last and is
/// followed by the channel closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Line(Line),
    Finished(ProcessOutcome),
}

/// Caller side of a running register-and-poll task.
///
/// Dropping the handle cancels the run at its next tick boundary.
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<RunEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Next event, or `None` once the run is over and every event was delivered.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Asks the run to stop. Honoured between polls, never during a request.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drains the run and returns every line with the final outcome.
    pub async fn collect(mut self) -> (Vec<Line>, ProcessOutcome) {
        let mut lines = Vec::new();
        let mut outcome = ProcessOutcome::default();
        while let Some(event) = self.next_event().await {
            match event {
                RunEvent::Line(line) => lines.push(line),
                RunEvent::Finished(finished) => outcome = finished,
            }
        }
        if let Err(err) = (&mut self.task).await {
            hook_error!("Run task ended abnormally: {}", err);
        }
        (lines, outcome)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts the register-and-poll lifecycle for one webhook on the current tokio runtime.
pub fn spawn_run(
    gateway: Gateway,
    request: RegistrationRequest,
    settings: RunSettings,
) -> RunHandle {
    let (event_tx, events) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let runner = Runner {
        gateway,
        settings,
        state: EmitterState::new(),
        phase: Phase::NotStarted,
        outcome: None,
        event_tx,
    };
    let task = tokio::spawn(runner.run(request, cancel.clone()));
    RunHandle {
        events,
        cancel,
        task,
    }
}

struct Runner {
    gateway: Gateway,
    settings: RunSettings,
    state: EmitterState,
    phase: Phase,
    outcome: Option<ProcessOutcome>,
    event_tx: mpsc::UnboundedSender<RunEvent>,
}

impl Runner {
    async fn run(mut self, request: RegistrationRequest, cancel: CancellationToken) {
        self.dispatch(Msg::Connect);

        self.set_phase(Phase::Registering);
        let registered = self.gateway.register(&request).await;
        let registration = match registered {
            Ok(registration) => registration,
            Err(err) => {
                hook_warn!("Registration failed: {}", err);
                self.dispatch(Msg::RegistrationFailed {
                    message: err.to_string(),
                });
                self.close();
                return;
            }
        };

        self.set_phase(Phase::Polling);
        let period = self.settings.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.phase == Phase::Polling {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    hook_info!("Run for webhook {} cancelled", registration.id);
                    self.dispatch(Msg::Cancelled);
                }
                _ = ticker.tick() => {
                    let msg = match self.gateway.poll_state(&registration.id).await {
                        Ok(state) => Msg::StateObserved(state),
                        Err(err) => {
                            hook_debug!("Poll of {} failed: {}", registration.id, err);
                            Msg::RequestFailed {
                                class: err.failure_class(),
                                message: err.to_string(),
                            }
                        }
                    };
                    self.dispatch(msg);
                }
            }
        }

        self.close();
    }

    /// Runs one message through the emitter and forwards its lines before returning.
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        match update(state, msg) {
            Ok((state, effects)) => {
                self.state = state;
                for effect in effects {
                    match effect {
                        Effect::Emit(line) => {
                            let _ = self.event_tx.send(RunEvent::Line(line));
                        }
                        Effect::Finish(outcome) => {
                            self.outcome = Some(outcome);
                            self.set_phase(Phase::Finished);
                        }
                    }
                }
            }
            Err(err) => {
                hook_error!("{}", err);
                self.set_phase(Phase::Finished);
            }
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            hook_debug!("Run phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Sends the single outcome event; dropping `self` then closes the channel.
    fn close(mut self) {
        self.set_phase(Phase::Finished);
        let outcome = self.outcome.unwrap_or_else(ProcessOutcome::failure);
        hook_info!("Run finished (succeeded: {})", outcome.succeeded);
        let _ = self.event_tx.send(RunEvent::Finished(outcome));
    }
}
