/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Task list output, outcome submissions, auto refreshing watch mode
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or shutdown handling
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use task_viewer_adapter::{StatusFilter, build_query};
use task_viewer_panel::{
    ConsoleView, DateRange, FilterChange, PanelConfig, PanelFilters, TaskPanelController, TaskView,
    render_task_list,
};

#[derive(Parser, Debug)]
#[command(name = "task-viewer", version, about = "Workflow task viewer panel")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = "task-viewer.yaml")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Validate configuration and print the task query without calling the API
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = "task-viewer.yaml")]
        output: PathBuf,
    },
    /// Show tasks and keep them refreshed until interrupted
    Watch,
    /// Print tasks once
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Newest first
        #[arg(long)]
        descending: bool,
        #[arg(long)]
        json: bool,
    },
    /// Complete a task with one of its outcomes
    Complete {
        task_id: String,
        /// Outcome label; prompts when omitted
        outcome: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// active, expired, complete, overridden, terminated or all
    #[arg(long)]
    status: Option<StatusFilter>,
    /// Show every assignee's tasks
    #[arg(long)]
    all: bool,
    /// last90, last180, this-year or this-and-last-year
    #[arg(long)]
    range: Option<DateRange>,
    #[arg(long = "instance", value_name = "WORKFLOW_INSTANCE_ID")]
    workflow_instance_id: Option<String>,
}

impl FilterArgs {
    fn changes(&self) -> Vec<FilterChange> {
        let mut changes = Vec::new();
        if let Some(status) = self.status {
            changes.push(FilterChange::Status(status));
        }
        if self.all {
            changes.push(FilterChange::View(TaskView::AllTasks));
        }
        if let Some(range) = self.range {
            changes.push(FilterChange::DateRange(range));
        }
        if let Some(id) = &self.workflow_instance_id {
            changes.push(FilterChange::WorkflowInstance(Some(id.clone())));
        }
        changes
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    if let Some(Command::Init { output }) = &args.command {
        return cli::init::run_init(output);
    }

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting task-viewer"
    );

    let config = load_config(&args.config_path)?;
    info!(region = %config.tenancy_region, "configuration loaded");

    let command = args.command.unwrap_or(Command::Watch);

    if args.dry_run {
        let today = chrono::Local::now().date_naive();
        let mut filters = PanelFilters::new(&config, today);
        if let Command::List { filters: filter_args, .. }
        | Command::Complete { filters: filter_args, .. } = &command
        {
            for change in filter_args.changes() {
                filters.apply(change, &config, today);
            }
        }
        info!("dry-run requested; configuration validated");
        println!(
            "GET {}/workflows/v2/tasks?{}",
            config.tenancy_region.base_url(),
            build_query(filters.state())
        );
        return Ok(());
    }

    match command {
        Command::Init { .. } => Ok(()),
        Command::Watch => run_watch(config).await,
        Command::List {
            filters,
            descending,
            json,
        } => run_list(config, &filters, descending, json).await,
        Command::Complete {
            task_id,
            outcome,
            yes,
            filters,
        } => {
            let controller = TaskPanelController::new(config, Arc::new(ConsoleView::default()))
                .context("create panel")?;
            for change in filters.changes() {
                controller.set_filter(change);
            }
            cli::interactive::run_complete(&controller, &task_id, outcome, yes).await
        }
    }
}

async fn run_list(config: PanelConfig, filters: &FilterArgs, descending: bool, json: bool) -> Result<()> {
    let controller = TaskPanelController::new(config, Arc::new(ConsoleView::default()))
        .context("create panel")?;
    for change in filters.changes() {
        controller.set_filter(change);
    }
    controller.set_sort_ascending(!descending).await;

    controller.refresh().await.context("load tasks")?;
    let tasks = controller.tasks().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&tasks).context("serialize tasks")?
        );
    } else {
        print!("{}", render_task_list(&tasks));
    }
    Ok(())
}

async fn run_watch(config: PanelConfig) -> Result<()> {
    let auto_refresh = config.refresh_interval_seconds();
    let mut controller =
        TaskPanelController::new(config, Arc::new(ConsoleView { redraw: true })).context("create panel")?;

    // errors are shown by the view; keep watching
    if let Err(err) = controller.start().await {
        warn!(error = %err, "initial load failed");
    }

    if auto_refresh.is_none() {
        info!("auto refresh disabled; nothing to watch");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    shutdown.cancelled().await;
    info!("shutdown signal received");

    controller.stop().await;
    info!("auto refresh stopped");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &Path) -> Result<PanelConfig> {
    PanelConfig::load(path).with_context(|| format!("load config {}", path.display()))
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
