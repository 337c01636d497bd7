/*
[INPUT]:  Task lists and panel events
[OUTPUT]: Terminal rendering of the panel
[POS]:    Presentation layer - console listener used by the binary
[UPDATE]: When changing what a task row shows
*/

use std::fmt::Write as _;

use console::style;
use task_viewer_adapter::{Task, TaskAction, TaskStatus};

use crate::error::PanelError;
use crate::listener::PanelListener;
use crate::submitter::PendingOutcome;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the task list the way the panel shows it
pub fn render_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!("{}\n", style("No tasks found").yellow());
    }

    let mut out = String::new();
    for task in tasks {
        render_task(&mut out, task);
    }
    out
}

fn render_task(out: &mut String, task: &Task) {
    let status = match task.status {
        TaskStatus::Active => style(task.status.label()).green(),
        TaskStatus::Complete => style(task.status.label()).cyan(),
        _ => style(task.status.label()).dim(),
    };
    let created = task
        .created_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());

    let _ = writeln!(out, "{} [{}] {}", style(&task.name).bold(), status, created);
    if !task.workflow_name.is_empty() {
        let _ = writeln!(out, "    workflow: {}", task.workflow_name);
    }
    let _ = writeln!(out, "    id: {}", style(&task.id).dim());
    if !task.assignee_email.is_empty() {
        let _ = writeln!(out, "    assigned to: {}", task.assignee_email);
    }
    if !task.completed_by.is_empty() {
        let completed = task
            .date_completed
            .map(|d| format!(" on {}", d.format(DATE_FORMAT)))
            .unwrap_or_default();
        let _ = writeln!(out, "    completed by: {}{}", task.completed_by, completed);
    }
    if !task.message.is_empty() {
        let _ = writeln!(out, "    {}", task.message);
    }

    match task.action() {
        TaskAction::Open(url) => {
            let _ = writeln!(out, "    open: {}", style(url).underlined());
        }
        TaskAction::ChooseOutcome(outcomes) => {
            let _ = writeln!(out, "    outcomes: {}", outcomes.join(" | "));
        }
        TaskAction::None => {}
    }
}

/// Prints panel events to stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleView {
    /// Reprint the list on every fetch, not only when asked
    pub redraw: bool,
}

impl PanelListener for ConsoleView {
    fn on_fetch_started(&self) {
        tracing::debug!("loading tasks");
    }

    fn on_fetch_complete(&self, tasks: &[Task]) {
        if !self.redraw {
            return;
        }
        println!(
            "{} {}",
            style(format!("{} task(s)", tasks.len())).bold(),
            style(chrono::Local::now().format("%H:%M:%S")).dim()
        );
        print!("{}", render_task_list(tasks));
    }

    fn on_fetch_error(&self, error: &PanelError) {
        eprintln!("{}", style(error.user_message()).red());
    }

    fn on_confirmation_requested(&self, pending: &PendingOutcome) {
        tracing::debug!(task_id = %pending.task_id, outcome = %pending.outcome, "confirmation requested");
    }

    fn on_submit_complete(&self, pending: &PendingOutcome) {
        println!(
            "{} {} -> {}",
            style("Completed").green(),
            pending.task_name,
            style(&pending.outcome).bold()
        );
    }

    fn on_submit_error(&self, _pending: &PendingOutcome, error: &PanelError) {
        eprintln!("{}", style(error.user_message()).red());
    }
}
