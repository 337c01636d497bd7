/*
[INPUT]:  Public API exports for the task-viewer-panel crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod listener;
pub mod scheduler;
pub mod store;
pub mod submitter;
pub mod view;

// Re-export main types for convenience
pub use self::config::{ConfigError, PanelConfig};
pub use controller::{FetchOutcome, TaskPanelController};
pub use error::PanelError;
pub use filters::{DateRange, FilterChange, PanelFilters, TaskView};
pub use listener::{NoopListener, PanelListener};
pub use scheduler::AutoRefreshScheduler;
pub use store::TaskStore;
pub use submitter::{OutcomeSubmitter, PendingOutcome, SubmissionState, SubmitError};
pub use view::{ConsoleView, render_task_list};
