/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML panel configuration file
[POS]:    CLI initialization layer
[UPDATE]: When PanelConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use std::path::Path;

use task_viewer_adapter::Region;
use task_viewer_panel::PanelConfig;
use task_viewer_panel::config::{MAX_REFRESH_INTERVAL_SECONDS, MIN_REFRESH_INTERVAL_SECONDS};

const REGIONS: [Region; 5] = [Region::Us, Region::Eu, Region::Au, Region::Ca, Region::Uk];

pub fn run_init(output: &Path) -> Result<()> {
    println!("{}", style("Task Viewer configuration").bold().cyan());
    println!(
        "{}",
        style("This will guide you through connecting the panel to your tenancy.").dim()
    );

    let theme = ColorfulTheme::default();

    println!("\n{}", style("--- Connection ---").bold());
    let client_id: String = Input::with_theme(&theme)
        .with_prompt("Client ID")
        .interact_text()?;

    let client_secret = Password::with_theme(&theme)
        .with_prompt("Client secret")
        .interact()?;

    let region_codes: Vec<&str> = REGIONS.iter().map(|r| r.code()).collect();
    let region_selection = Select::with_theme(&theme)
        .with_prompt("Tenancy region")
        .items(&region_codes)
        .default(0)
        .interact()?;

    println!("\n{}", style("--- Filters ---").bold());
    let workflow_name: String = Input::with_theme(&theme)
        .with_prompt("Workflow name (blank for all workflows)")
        .allow_empty(true)
        .interact_text()?;

    let assignee_email: String = Input::with_theme(&theme)
        .with_prompt("Assignee email (blank for the signed-in user)")
        .allow_empty(true)
        .interact_text()?;

    let user_email: String = Input::with_theme(&theme)
        .with_prompt("Your email")
        .allow_empty(true)
        .interact_text()?;

    println!("\n{}", style("--- Auto refresh ---").bold());
    let auto_refresh_enabled = Confirm::with_theme(&theme)
        .with_prompt("Refresh tasks automatically?")
        .default(false)
        .interact()?;

    let mut config = PanelConfig::new(client_id, client_secret);
    config.tenancy_region = REGIONS[region_selection];
    config.workflow_name = non_empty(workflow_name);
    config.assignee_email = non_empty(assignee_email);
    config.user_email = non_empty(user_email);
    config.auto_refresh_enabled = auto_refresh_enabled;

    if auto_refresh_enabled {
        config.auto_refresh_interval_seconds = Input::with_theme(&theme)
            .with_prompt(format!(
                "Interval in seconds ({MIN_REFRESH_INTERVAL_SECONDS}-{MAX_REFRESH_INTERVAL_SECONDS})"
            ))
            .default(60u64)
            .validate_with(|value: &u64| {
                if (MIN_REFRESH_INTERVAL_SECONDS..=MAX_REFRESH_INTERVAL_SECONDS).contains(value) {
                    Ok(())
                } else {
                    Err("interval out of range")
                }
            })
            .interact_text()?;
    }

    config.validate().context("invalid configuration")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    std::fs::write(output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Configuration written to: {}", style(output.display()).cyan());

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
