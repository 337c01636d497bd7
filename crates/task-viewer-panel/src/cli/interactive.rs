/*
[INPUT]:  Task id, optional outcome, user confirmation via CLI
[OUTPUT]: Submitted outcome or a cancelled confirmation
[POS]:    CLI interactive flow - outcome selection and confirmation
[UPDATE]: When the outcome submission flow changes
*/

use anyhow::{Context, Result, anyhow};
use console::style;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use task_viewer_adapter::TaskAction;
use task_viewer_panel::TaskPanelController;

pub async fn run_complete(
    controller: &TaskPanelController,
    task_id: &str,
    outcome: Option<String>,
    assume_yes: bool,
) -> Result<()> {
    controller.refresh().await.context("load tasks")?;

    let task = controller
        .task(task_id)
        .await
        .ok_or_else(|| anyhow!("task {task_id} not found with the current filters"))?;

    let outcomes = match task.action() {
        TaskAction::ChooseOutcome(outcomes) => outcomes.to_vec(),
        TaskAction::Open(url) => {
            println!(
                "{} {}",
                style("This task is completed through its form:").yellow(),
                style(url).underlined()
            );
            return Ok(());
        }
        TaskAction::None => {
            println!("{}", style("This task has no outcomes to choose from.").yellow());
            return Ok(());
        }
    };

    let theme = ColorfulTheme::default();
    let outcome = match outcome {
        Some(outcome) if task.has_outcome(&outcome) => outcome,
        Some(outcome) => {
            return Err(anyhow!(
                "outcome {outcome} is not offered by this task (choose from: {})",
                outcomes.join(", ")
            ));
        }
        None => {
            let selection = Select::with_theme(&theme)
                .with_prompt(format!("Outcome for {}", task.name))
                .items(&outcomes)
                .default(0)
                .interact()?;
            outcomes[selection].clone()
        }
    };

    let pending = controller
        .request_outcome(task_id, &outcome, &task.name)
        .await
        .context("request outcome")?;

    let confirmed = assume_yes
        || Confirm::with_theme(&theme)
            .with_prompt(pending.prompt())
            .default(false)
            .interact()?;

    if !confirmed {
        controller.cancel_outcome();
        println!("{}", style("Cancelled.").yellow());
        return Ok(());
    }

    controller
        .confirm_outcome()
        .await
        .context("submit outcome")?;
    Ok(())
}
