use crate::core::render::ResultRenderer;
use crate::domain::model::{FilterField, FormState, SearchCriteria, SearchOutcome, TherapistRecord};
use crate::domain::ports::{DirectoryClient, ResultsView};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// What happened to a search trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    Completed(SearchOutcome),
    /// 已有搜尋進行中，這次觸發被丟棄
    Skipped,
    /// 觸發策略決定不搜尋
    NotTriggered,
}

/// Decides whether a filter change submits a search on its own.
pub trait TriggerPolicy: Send + Sync {
    fn should_search(&self, form: &FormState, changed: FilterField) -> bool;
}

/// Auto-search as soon as at least one filter has a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSearchWhenCriteriaPresent;

impl TriggerPolicy for AutoSearchWhenCriteriaPresent {
    fn should_search(&self, form: &FormState, _changed: FilterField) -> bool {
        form.has_criteria()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ManualOnly;

impl TriggerPolicy for ManualOnly {
    fn should_search(&self, _form: &FormState, _changed: FilterField) -> bool {
        false
    }
}

/// Clears the loading flag on every exit path.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SearchController<D: DirectoryClient> {
    client: D,
    renderer: ResultRenderer,
    view: Mutex<Box<dyn ResultsView>>,
    form: Mutex<FormState>,
    policy: Box<dyn TriggerPolicy>,
    loading: AtomicBool,
    last_criteria: Mutex<Option<SearchCriteria>>,
    clock: fn() -> DateTime<Utc>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<D: DirectoryClient> SearchController<D> {
    pub fn new(client: D, view: Box<dyn ResultsView>) -> Self {
        Self {
            client,
            renderer: ResultRenderer::new(),
            view: Mutex::new(view),
            form: Mutex::new(FormState::default()),
            policy: Box::new(AutoSearchWhenCriteriaPresent),
            loading: AtomicBool::new(false),
            last_criteria: Mutex::new(None),
            clock: Utc::now,
        }
    }

    pub fn with_trigger_policy(mut self, policy: Box<dyn TriggerPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_form(self, form: FormState) -> Self {
        *lock(&self.form) = form;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn form(&self) -> FormState {
        lock(&self.form).clone()
    }

    pub fn last_criteria(&self) -> Option<SearchCriteria> {
        lock(&self.last_criteria).clone()
    }

    /// Updates one filter and lets the trigger policy decide whether to search.
    pub async fn on_filter_changed(
        &self,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<SubmitStatus> {
        let should_search = {
            let mut form = lock(&self.form);
            form.set(field, value);
            self.policy.should_search(&form, field)
        };

        if should_search {
            self.submit_search().await
        } else {
            Ok(SubmitStatus::NotTriggered)
        }
    }

    /// Runs one search from the current form state; a no-op while another is in flight.
    ///
    /// Search failures are part of the returned outcome. `Err` means the
    /// rendered output could not be shown.
    pub async fn submit_search(&self) -> Result<SubmitStatus> {
        let Some(_guard) = LoadingGuard::acquire(&self.loading) else {
            tracing::debug!("⏸️ Search already in flight, ignoring trigger");
            return Ok(SubmitStatus::Skipped);
        };

        lock(&self.view).set_loading(true);

        let outcome = SearchOutcome::from(
            self.run_search()
                .await
                .inspect(|records| tracing::info!("✅ Found {} therapists", records.len()))
                .inspect_err(|e| tracing::error!("❌ Search failed: {}", e)),
        );

        let html = self.renderer.render_at(&outcome, (self.clock)());
        let mut view = lock(&self.view);
        view.set_loading(false);
        view.show(&html)?;
        if outcome.is_success() {
            view.scroll_to_results();
        }

        Ok(SubmitStatus::Completed(outcome))
    }

    async fn run_search(&self) -> Result<Vec<TherapistRecord>> {
        let criteria = lock(&self.form).criteria()?;
        *lock(&self.last_criteria) = Some(criteria.clone());

        tracing::info!("🔍 Searching with params: {:?}", criteria.query_string());
        self.client.search(&criteria).await
    }

    /// Clears the form and the results view.
    pub fn reset(&self) -> Result<()> {
        lock(&self.form).reset();
        lock(&self.view).clear()
    }
}
