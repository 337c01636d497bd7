/*
[INPUT]:  Panel controller events
[OUTPUT]: Callbacks into whatever renders the panel
[POS]:    Presentation contract - boundary between core and rendering
[UPDATE]: When the controller raises new events
*/

use task_viewer_adapter::Task;

use crate::error::PanelError;
use crate::submitter::PendingOutcome;

/// Receives panel events. Called from the controller's async tasks.
pub trait PanelListener: Send + Sync {
    fn on_fetch_started(&self) {}

    /// A fetch replaced the task store; `tasks` is in display order
    fn on_fetch_complete(&self, tasks: &[Task]);

    fn on_fetch_error(&self, error: &PanelError);

    fn on_confirmation_requested(&self, _pending: &PendingOutcome) {}

    fn on_submit_complete(&self, pending: &PendingOutcome);

    fn on_submit_error(&self, _pending: &PendingOutcome, _error: &PanelError) {}
}

/// Listener that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl PanelListener for NoopListener {
    fn on_fetch_complete(&self, _tasks: &[Task]) {}

    fn on_fetch_error(&self, _error: &PanelError) {}

    fn on_submit_complete(&self, _pending: &PendingOutcome) {}
}
