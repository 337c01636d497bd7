/*
[INPUT]:  Panel configuration, user filter actions, today's date
[OUTPUT]: The panel's single FilterState
[POS]:    Panel core - filter presets (view, date range, status)
[UPDATE]: When adding filter presets or changing assignee resolution
*/

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use task_viewer_adapter::{FilterState, StatusFilter};

use crate::config::PanelConfig;

/// Whose tasks the panel lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskView {
    #[default]
    MyTasks,
    AllTasks,
}

impl FromStr for TaskView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mine" | "my" | "mytasks" | "my-tasks" => Ok(TaskView::MyTasks),
            "all" | "alltasks" | "all-tasks" => Ok(TaskView::AllTasks),
            other => Err(format!("unknown task view: {other}")),
        }
    }
}

/// Preset windows for the `from` filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    Last90Days,
    Last180Days,
    ThisYear,
    ThisAndLastYear,
}

impl DateRange {
    /// First day included by this range
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            DateRange::Last90Days => today.checked_sub_days(Days::new(90)).unwrap_or(today),
            DateRange::Last180Days => today.checked_sub_days(Days::new(180)).unwrap_or(today),
            DateRange::ThisYear => first_of_year(today.year()).unwrap_or(today),
            DateRange::ThisAndLastYear => first_of_year(today.year() - 1).unwrap_or(today),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last90Days => "Last 90 days",
            DateRange::Last180Days => "Last 180 days",
            DateRange::ThisYear => "This calendar year",
            DateRange::ThisAndLastYear => "This year and last year",
        }
    }
}

fn first_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last90" | "90d" => Ok(DateRange::Last90Days),
            "last180" | "180d" => Ok(DateRange::Last180Days),
            "this-year" | "thisyear" => Ok(DateRange::ThisYear),
            "this-and-last-year" | "thisandlastyear" => Ok(DateRange::ThisAndLastYear),
            other => Err(format!("unknown date range: {other}")),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single user filter action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    View(TaskView),
    DateRange(DateRange),
    Status(StatusFilter),
    WorkflowInstance(Option<String>),
}

/// Filter presets plus the FilterState they produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFilters {
    view: TaskView,
    date_range: DateRange,
    state: FilterState,
}

impl PanelFilters {
    /// Initial filters: my tasks, last 90 days, active only
    pub fn new(config: &PanelConfig, today: NaiveDate) -> Self {
        let mut filters = Self {
            view: TaskView::default(),
            date_range: DateRange::default(),
            state: FilterState::default(),
        };
        filters.state.from = Some(format_date(filters.date_range.start_date(today)));
        filters.sync_with_config(config);
        filters
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn view(&self) -> TaskView {
        self.view
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn apply(&mut self, change: FilterChange, config: &PanelConfig, today: NaiveDate) {
        match change {
            FilterChange::View(view) => {
                self.view = view;
                self.state.assignee = resolve_assignee(view, config);
            }
            FilterChange::DateRange(range) => {
                self.date_range = range;
                self.state.from = Some(format_date(range.start_date(today)));
            }
            FilterChange::Status(status) => self.state.status = status,
            FilterChange::WorkflowInstance(id) => self.state.workflow_instance_id = id,
        }
    }

    /// Re-derive the config-driven fields (workflow name, assignee)
    pub fn sync_with_config(&mut self, config: &PanelConfig) {
        self.state.workflow_name = non_empty(config.workflow_name.as_deref());
        self.state.assignee = resolve_assignee(self.view, config);
    }
}

/// My tasks: the configured assignee if set, else the signed-in user. All tasks: nobody.
fn resolve_assignee(view: TaskView, config: &PanelConfig) -> Option<String> {
    match view {
        TaskView::AllTasks => None,
        TaskView::MyTasks => non_empty(config.assignee_email.as_deref())
            .or_else(|| non_empty(config.user_email.as_deref())),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
