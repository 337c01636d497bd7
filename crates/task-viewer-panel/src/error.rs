/*
[INPUT]:  Adapter, submission and configuration failures
[OUTPUT]: PanelError with user-facing messages
[POS]:    Error handling layer - panel orchestration errors
[UPDATE]: When adding new failure surfaces to the panel
*/

use task_viewer_adapter::TaskViewerError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::submitter::SubmitError;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Unable to load tasks: {0}")]
    Fetch(#[from] TaskViewerError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PanelError {
    /// Text shown in place of the task list or confirmation dialog
    pub fn user_message(&self) -> String {
        match self {
            PanelError::Fetch(err) => format!(
                "Unable to load tasks. {err}. Please ensure that the panel is configured correctly."
            ),
            PanelError::Submit(err) => format!("Unable to complete the task. {err}."),
            PanelError::Config(err) => {
                format!("{err}. Please ensure that the panel is configured correctly.")
            }
        }
    }
}
