/*
[INPUT]:  PanelConfig, PanelListener, user events (filters, sort, outcomes)
[OUTPUT]: Task fetches, outcome submissions and listener callbacks
[POS]:    Panel core - orchestration of fetch, submit and auto refresh
[UPDATE]: When adding panel events or changing fetch/submit sequencing
*/

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{Local, NaiveDate};
use task_viewer_adapter::{Task, TaskApiClient};
use tokio::sync::{RwLock as AsyncRwLock, RwLockWriteGuard};

use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::filters::{FilterChange, PanelFilters};
use crate::listener::PanelListener;
use crate::scheduler::AutoRefreshScheduler;
use crate::store::TaskStore;
use crate::submitter::{OutcomeSubmitter, PendingOutcome, SubmissionState, SubmitError};

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The store now holds this many tasks
    Applied { count: usize },
    /// A newer fetch started while this one was in flight; result dropped
    Stale,
}

struct PanelShared {
    client: RwLock<TaskApiClient>,
    config: RwLock<PanelConfig>,
    filters: RwLock<PanelFilters>,
    /// Fixed API base, replaces the region URL (mock servers, proxies)
    base_url: Option<String>,
    store: AsyncRwLock<TaskStore>,
    submitter: Mutex<OutcomeSubmitter>,
    fetch_seq: AtomicU64,
    loading: AtomicUsize,
    listener: Arc<dyn PanelListener>,
}

struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn build_client(config: &PanelConfig, base_url: Option<&str>) -> Result<TaskApiClient, PanelError> {
    let client = match base_url {
        Some(base_url) => TaskApiClient::with_config_and_base_url(
            config.client_config(),
            base_url,
            config.credentials(),
        )?,
        None => TaskApiClient::with_config(
            config.client_config(),
            config.tenancy_region,
            config.credentials(),
        )?,
    };
    Ok(client)
}

impl PanelShared {
    fn client(&self) -> TaskApiClient {
        self.client.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn config(&self) -> PanelConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn filters(&self) -> PanelFilters {
        self.filters.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn submitter(&self) -> MutexGuard<'_, OutcomeSubmitter> {
        self.submitter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn refresh(&self) -> Result<FetchOutcome, PanelError> {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let client = self.client();
        let filter = self.filters().state().clone();

        self.listener.on_fetch_started();
        let result = {
            let _loading = LoadingGuard::enter(&self.loading);
            client.fetch_tasks(&filter).await
        };

        let store = self.store.write().await;
        let latest = self.fetch_seq.load(Ordering::SeqCst);
        if latest != seq {
            tracing::debug!(seq, latest, ok = result.is_ok(), "discarding stale fetch result");
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(tasks) => Ok(self.apply_tasks(store, tasks)),
            Err(err) => {
                drop(store);
                let err = PanelError::from(err);
                tracing::warn!(seq, error = %err, "task fetch failed");
                self.listener.on_fetch_error(&err);
                Err(err)
            }
        }
    }

    fn apply_tasks(&self, mut store: RwLockWriteGuard<'_, TaskStore>, tasks: Vec<Task>) -> FetchOutcome {
        store.replace_all(tasks);
        let store = store.downgrade();
        let count = store.len();
        self.listener.on_fetch_complete(store.all());
        FetchOutcome::Applied { count }
    }
}

/// One panel instance: filters, task store, outcome submitter and auto refresh
pub struct TaskPanelController {
    shared: Arc<PanelShared>,
    scheduler: AutoRefreshScheduler,
}

impl std::fmt::Debug for TaskPanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPanelController")
            .field("config", &self.shared.config())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl TaskPanelController {
    /// Panel talking to the configured tenancy region
    pub fn new(config: PanelConfig, listener: Arc<dyn PanelListener>) -> Result<Self, PanelError> {
        Self::build(config, None, listener)
    }

    /// Panel talking to a fixed API base URL instead of the region host
    pub fn with_base_url(
        config: PanelConfig,
        base_url: impl Into<String>,
        listener: Arc<dyn PanelListener>,
    ) -> Result<Self, PanelError> {
        Self::build(config, Some(base_url.into()), listener)
    }

    fn build(
        config: PanelConfig,
        base_url: Option<String>,
        listener: Arc<dyn PanelListener>,
    ) -> Result<Self, PanelError> {
        config.validate()?;
        let client = build_client(&config, base_url.as_deref())?;
        let filters = PanelFilters::new(&config, today());

        Ok(Self {
            shared: Arc::new(PanelShared {
                client: RwLock::new(client),
                config: RwLock::new(config),
                filters: RwLock::new(filters),
                base_url,
                store: AsyncRwLock::new(TaskStore::new()),
                submitter: Mutex::new(OutcomeSubmitter::new()),
                fetch_seq: AtomicU64::new(0),
                loading: AtomicUsize::new(0),
                listener,
            }),
            scheduler: AutoRefreshScheduler::new(),
        })
    }

    /// Initial load, then auto refresh when enabled
    pub async fn start(&mut self) -> Result<FetchOutcome, PanelError> {
        let result = self.refresh().await;
        self.restart_scheduler();
        result
    }

    pub async fn stop(&mut self) {
        self.scheduler.stop_and_wait().await;
    }

    fn restart_scheduler(&mut self) {
        self.scheduler.stop();
        let Some(interval_seconds) = self.shared.config().refresh_interval_seconds() else {
            return;
        };

        let shared = Arc::clone(&self.shared);
        self.scheduler.start(interval_seconds, move || {
            let shared = Arc::clone(&shared);
            async move {
                // failures already reach the listener
                let _ = shared.refresh().await;
            }
        });
    }

    /// Fetch with the current filters; the latest started fetch wins the store
    pub async fn refresh(&self) -> Result<FetchOutcome, PanelError> {
        self.shared.refresh().await
    }

    /// True while any fetch is waiting on the network
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst) > 0
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn config(&self) -> PanelConfig {
        self.shared.config()
    }

    pub fn filters(&self) -> PanelFilters {
        self.shared.filters()
    }

    /// Apply a user filter action without fetching
    pub fn set_filter(&self, change: FilterChange) {
        let config = self.shared.config();
        self.shared
            .filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(change, &config, today());
    }

    /// Apply a user filter action and fetch again
    pub async fn update_filter(&self, change: FilterChange) -> Result<FetchOutcome, PanelError> {
        self.set_filter(change);
        self.refresh().await
    }

    /// Flip the created-date order without fetching. Returns true for ascending.
    pub async fn toggle_sort(&self) -> bool {
        self.shared.store.write().await.toggle_sort()
    }

    pub async fn set_sort_ascending(&self, ascending: bool) {
        self.shared.store.write().await.set_sort_ascending(ascending);
    }

    /// Snapshot of the store in display order
    pub async fn tasks(&self) -> Vec<Task> {
        self.shared.store.read().await.all().to_vec()
    }

    pub async fn task(&self, task_id: &str) -> Option<Task> {
        self.shared.store.read().await.get(task_id).cloned()
    }

    /// Start confirming an outcome for a task in the store
    pub async fn request_outcome(
        &self,
        task_id: &str,
        outcome: &str,
        task_name: &str,
    ) -> Result<PendingOutcome, PanelError> {
        let store = self.shared.store.read().await;
        let pending = self
            .shared
            .submitter()
            .request(&store, task_id, outcome, task_name)
            .cloned();
        drop(store);

        match pending {
            Ok(pending) => {
                tracing::info!(task_id, outcome, "outcome awaiting confirmation");
                self.shared.listener.on_confirmation_requested(&pending);
                Ok(pending)
            }
            Err(err) => {
                tracing::warn!(task_id, outcome, error = %err, "outcome request rejected");
                Err(err.into())
            }
        }
    }

    /// Send the pending outcome. On success the task list is fetched exactly once.
    pub async fn confirm_outcome(&self) -> Result<PendingOutcome, PanelError> {
        let pending = self.shared.submitter().begin_submit()?;
        let client = self.shared.client();

        let result = client
            .submit_outcome(&pending.task_id, &pending.assignment_id, &pending.outcome)
            .await;
        self.shared.submitter().finish(result.is_ok())?;

        match result {
            Ok(()) => {
                self.shared.listener.on_submit_complete(&pending);
                // failures already reach the listener
                let _ = self.refresh().await;
                Ok(pending)
            }
            Err(err) => {
                let err = PanelError::from(SubmitError::from(err));
                tracing::error!(
                    task_id = %pending.task_id,
                    outcome = %pending.outcome,
                    error = %err,
                    "outcome submission failed"
                );
                self.shared.listener.on_submit_error(&pending, &err);
                Err(err)
            }
        }
    }

    /// Close the confirmation without sending anything
    pub fn cancel_outcome(&self) -> bool {
        self.shared.submitter().cancel()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.shared.submitter().state()
    }

    pub fn pending_outcome(&self) -> Option<PendingOutcome> {
        self.shared.submitter().pending().cloned()
    }

    /// Apply edited settings, restart auto refresh if its settings moved, then fetch once
    pub async fn apply_config(&mut self, config: PanelConfig) -> Result<FetchOutcome, PanelError> {
        config.validate()?;
        let previous = self.shared.config();

        if previous.connection_changed(&config) {
            let client = build_client(&config, self.shared.base_url.as_deref())?;
            *self.shared.client.write().unwrap_or_else(PoisonError::into_inner) = client;
            tracing::info!(region = %config.tenancy_region, "API client rebuilt");
        }

        if previous.filters_changed(&config) {
            self.shared
                .filters
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .sync_with_config(&config);
        }

        let refresh_changed = previous.refresh_interval_seconds() != config.refresh_interval_seconds();
        *self.shared.config.write().unwrap_or_else(PoisonError::into_inner) = config;

        if refresh_changed {
            self.restart_scheduler();
        }

        self.refresh().await
    }
}
