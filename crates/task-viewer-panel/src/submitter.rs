/*
[INPUT]:  Outcome clicks (task id + outcome label), confirmation and cancel events
[OUTPUT]: Validated submission state transitions and the pending outcome to send
[POS]:    Panel core - two-phase outcome write-back state machine
[UPDATE]: When submission states or transition rules change
*/

use task_viewer_adapter::TaskViewerError;
use thiserror::Error;

use crate::store::TaskStore;

/// Lifecycle of a single outcome submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Confirming,
    Submitting,
    Success,
    Failed,
}

/// Events that move the submission state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Request,
    Confirm,
    Cancel,
    Succeed,
    Fail,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Task {task_id} was not found")]
    NotFound { task_id: String },

    #[error("Task {task_id} has no assignment to complete")]
    NoAssignment { task_id: String },

    #[error("No outcome is waiting for confirmation")]
    NothingPending,

    #[error("An outcome is already being submitted")]
    Busy,

    #[error("Outcome submission failed: {0}")]
    Api(#[from] TaskViewerError),
}

/// Outcome chosen for a task, waiting for the user to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOutcome {
    pub task_id: String,
    pub task_name: String,
    pub assignment_id: String,
    pub outcome: String,
}

impl PendingOutcome {
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to complete the task with the outcome of {}?",
            self.outcome
        )
    }
}

/// One submission at a time; a new request replaces one still being confirmed
#[derive(Debug, Default)]
pub struct OutcomeSubmitter {
    state: SubmissionState,
    pending: Option<PendingOutcome>,
}

impl OutcomeSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingOutcome> {
        self.pending.as_ref()
    }

    pub fn can_transition(&self, action: SubmitAction) -> bool {
        match (self.state, action) {
            (SubmissionState::Submitting, SubmitAction::Request) => false,
            (_, SubmitAction::Request) => true,
            (SubmissionState::Confirming, SubmitAction::Confirm) => true,
            (SubmissionState::Confirming, SubmitAction::Cancel) => true,
            (SubmissionState::Submitting, SubmitAction::Succeed) => true,
            (SubmissionState::Submitting, SubmitAction::Fail) => true,
            _ => false,
        }
    }

    fn transition(&mut self, action: SubmitAction) -> Result<(), SubmitError> {
        if !self.can_transition(action) {
            return Err(match self.state {
                SubmissionState::Submitting => SubmitError::Busy,
                _ => SubmitError::NothingPending,
            });
        }

        self.state = match action {
            SubmitAction::Request => SubmissionState::Confirming,
            SubmitAction::Confirm => SubmissionState::Submitting,
            SubmitAction::Cancel => SubmissionState::Idle,
            SubmitAction::Succeed => SubmissionState::Success,
            SubmitAction::Fail => SubmissionState::Failed,
        };
        Ok(())
    }

    /// Resolve the clicked task and ask for confirmation. No network I/O.
    pub fn request(
        &mut self,
        store: &TaskStore,
        task_id: &str,
        outcome: &str,
        task_name: &str,
    ) -> Result<&PendingOutcome, SubmitError> {
        if self.state == SubmissionState::Submitting {
            return Err(SubmitError::Busy);
        }

        let task = store.get(task_id).ok_or_else(|| SubmitError::NotFound {
            task_id: task_id.to_string(),
        })?;
        let assignment = task
            .first_assignment()
            .filter(|a| !a.id.is_empty())
            .ok_or_else(|| SubmitError::NoAssignment {
                task_id: task_id.to_string(),
            })?;

        if let Some(previous) = &self.pending {
            tracing::debug!(task_id = %previous.task_id, "replacing pending outcome");
        }

        let task_name = if task_name.is_empty() { task.name.as_str() } else { task_name };
        let pending = PendingOutcome {
            task_id: task.id.clone(),
            task_name: task_name.to_string(),
            assignment_id: assignment.id.clone(),
            outcome: outcome.to_string(),
        };

        self.transition(SubmitAction::Request)?;
        Ok(&*self.pending.insert(pending))
    }

    /// Move the pending outcome into flight and hand it to the caller to send
    pub fn begin_submit(&mut self) -> Result<PendingOutcome, SubmitError> {
        let pending = match (&self.pending, self.state) {
            (Some(pending), SubmissionState::Confirming) => pending.clone(),
            (_, SubmissionState::Submitting) => return Err(SubmitError::Busy),
            _ => return Err(SubmitError::NothingPending),
        };
        self.transition(SubmitAction::Confirm)?;
        Ok(pending)
    }

    /// Drop the pending outcome. Returns false when nothing was being confirmed.
    pub fn cancel(&mut self) -> bool {
        if self.transition(SubmitAction::Cancel).is_err() {
            return false;
        }
        self.pending = None;
        true
    }

    /// Record the result of the in-flight submission
    pub fn finish(&mut self, succeeded: bool) -> Result<PendingOutcome, SubmitError> {
        let action = if succeeded { SubmitAction::Succeed } else { SubmitAction::Fail };
        self.transition(action)?;
        self.pending.take().ok_or(SubmitError::NothingPending)
    }
}
