/// Which milestones have been announced. Flags only ever go from false to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkpoints {
    pub connected: bool,
    pub scheduled: bool,
    pub sending: bool,
    pub finalized: bool,
}

/// Terminal verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessOutcome {
    pub finished: bool,
    pub succeeded: bool,
}

impl ProcessOutcome {
    pub fn success() -> Self {
        Self {
            finished: true,
            succeeded: true,
        }
    }

    pub fn failure() -> Self {
        Self {
            finished: true,
            succeeded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmitterState {
    checkpoints: Checkpoints,
    outcome: Option<ProcessOutcome>,
}

impl EmitterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoints(&self) -> Checkpoints {
        self.checkpoints
    }

    /// `None` while the run is still going.
    pub fn outcome(&self) -> Option<ProcessOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_succeeded(&self) -> bool {
        self.outcome.is_some_and(|outcome| outcome.succeeded)
    }

    pub(crate) fn checkpoints_mut(&mut self) -> &mut Checkpoints {
        &mut self.checkpoints
    }

    /// Write-once: the first outcome wins.
    pub(crate) fn finish(&mut self, outcome: ProcessOutcome) -> ProcessOutcome {
        *self.outcome.get_or_insert(outcome)
    }
}
