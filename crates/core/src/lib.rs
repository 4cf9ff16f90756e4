pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{NaiveDate, Utc};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};
use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::DashboardSummary,
    bill::Bill,
    budget::Budget,
    category::Category,
    goal::{NewGoal, SavingsGoal},
    insight::Insight,
    ledger::Ledger,
    outcome::Outcome,
    persona::{PersonaUpdate, UserPersona},
    settings::Settings,
    snapshot::AdviceSnapshot,
    task::ExpenseTask,
    transaction::Transaction,
};
use providers::traits::AdviceProvider;
use services::{
    advice_service::{AdviceService, CommitStatus, InsightBoard, RefreshRequest, RefreshResponse},
    analytics_service::AnalyticsService,
    ledger_service::LedgerService,
    refresh_scheduler::RefreshScheduler,
};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG`
/// (default `wealthflow_core=info`). Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("wealthflow_core=info"));

        // Another subscriber may already be installed by the host.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Main entry point for the WealthFlow core library.
///
/// Owns the ledger and every service that operates on it. All mutation
/// goes through the transition-rule methods below; each returns an
/// [`Outcome`] describing what was committed or why nothing was.
#[must_use]
pub struct WealthFlow {
    ledger: Ledger,
    settings: Settings,
    ledger_service: LedgerService,
    analytics_service: AnalyticsService,
    advice_service: Arc<AdviceService>,
    board: InsightBoard,
    scheduler: RefreshScheduler,
}

impl std::fmt::Debug for WealthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WealthFlow")
            .field("transactions", &self.ledger.transactions.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("goals", &self.ledger.goals.len())
            .field("bills", &self.ledger.bills.len())
            .field("active_task", &self.ledger.active_task.as_ref().map(|t| t.id))
            .field("insights", &self.board.insights().len())
            .field("advisor", &self.advice_service.provider_name())
            .finish()
    }
}

impl WealthFlow {
    /// Start a session over `ledger`, picking the advice provider from
    /// `settings` (Gemini when an API key is configured).
    pub fn new(ledger: Ledger, settings: Settings) -> Result<Self, CoreError> {
        let provider = providers::provider_from_settings(&settings.advisor);
        Self::with_provider(ledger, settings, provider)
    }

    /// Start a session with an explicit advice provider.
    ///
    /// Fails with [`CoreError::Configuration`] when the settings are out of
    /// range or the ledger holds more than one budget per category.
    pub fn with_provider(
        ledger: Ledger,
        settings: Settings,
        provider: Box<dyn AdviceProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        ledger.validate()?;

        Ok(Self {
            ledger_service: LedgerService::new(settings.task_category, settings.emergency_allocation_ratio),
            analytics_service: AnalyticsService::new(),
            advice_service: Arc::new(AdviceService::new(provider)),
            board: InsightBoard::new(),
            scheduler: RefreshScheduler::new(Duration::from_millis(settings.refresh_debounce_ms)),
            ledger,
            settings,
        })
    }

    /// The demo household with default settings.
    pub fn demo() -> Result<Self, CoreError> {
        Self::new(Ledger::demo(), Settings::default())
    }

    // ── Expense tasks ───────────────────────────────────────────────

    /// Open a shopping task with the given budget. Replaces (and loses)
    /// any task that is already active.
    pub fn start_task(&mut self, name: &str, budget: f64) -> Outcome {
        let outcome = self.ledger_service.start_task(&mut self.ledger, name, budget);
        self.track(outcome)
    }

    /// Record an item bought during the active task.
    pub fn add_task_item(&mut self, amount: f64, description: &str) -> Outcome {
        let outcome = self.ledger_service.add_item(&mut self.ledger, amount, description);
        self.track(outcome)
    }

    /// Book the active task and move any surplus to the top-priority goal.
    pub fn complete_task(&mut self) -> Outcome {
        let outcome = self.ledger_service.complete_task(&mut self.ledger);
        self.track(outcome)
    }

    /// Drop the active task without recording anything.
    pub fn cancel_task(&mut self) -> Outcome {
        let outcome = self.ledger_service.cancel_task(&mut self.ledger);
        self.track(outcome)
    }

    // ── Goals, bills, budgets, income, profile ──────────────────────

    pub fn add_goal(&mut self, goal: NewGoal) -> Outcome {
        let outcome = self.ledger_service.add_goal(&mut self.ledger, goal);
        self.track(outcome)
    }

    pub fn contribute(&mut self, goal_id: Uuid, amount: f64) -> Outcome {
        let outcome = self.ledger_service.contribute(&mut self.ledger, goal_id, amount);
        self.track(outcome)
    }

    pub fn pay_bill(&mut self, bill_id: Uuid) -> Outcome {
        let outcome = self.ledger_service.pay_bill(&mut self.ledger, bill_id);
        self.track(outcome)
    }

    pub fn update_budget_limit(&mut self, category: Category, new_limit: f64) -> Outcome {
        let outcome = self
            .ledger_service
            .update_budget_limit(&mut self.ledger, category, new_limit);
        self.track(outcome)
    }

    /// Record income and route the configured share to the emergency fund.
    pub fn receive_income(&mut self, amount: f64) -> Outcome {
        let outcome = self.ledger_service.receive_income(&mut self.ledger, amount);
        self.track(outcome)
    }

    pub fn update_persona(&mut self, update: PersonaUpdate) -> Outcome {
        let outcome = self.ledger_service.update_persona(&mut self.ledger, update);
        self.track(outcome)
    }

    /// Start the auto-refresh quiet period if the outcome changed
    /// anything the advisor looks at.
    fn track(&mut self, outcome: Outcome) -> Outcome {
        if outcome.touches_advised_state() {
            self.scheduler.record_change(Instant::now());
        }
        outcome
    }

    // ── Read access ─────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All transactions, newest first.
    #[must_use]
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.ledger.transactions_newest_first().collect()
    }

    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    #[must_use]
    pub fn budget(&self, category: Category) -> Option<&Budget> {
        self.ledger.budget(category)
    }

    #[must_use]
    pub fn goals(&self) -> &[SavingsGoal] {
        &self.ledger.goals
    }

    #[must_use]
    pub fn goal(&self, goal_id: Uuid) -> Option<&SavingsGoal> {
        self.ledger.goal(goal_id)
    }

    /// Goals ordered highest priority first.
    #[must_use]
    pub fn goals_by_priority(&self) -> Vec<&SavingsGoal> {
        self.ledger.goals_by_priority()
    }

    #[must_use]
    pub fn bills(&self) -> &[Bill] {
        &self.ledger.bills
    }

    #[must_use]
    pub fn unpaid_bills(&self) -> Vec<&Bill> {
        self.ledger.unpaid_bills()
    }

    #[must_use]
    pub fn active_task(&self) -> Option<&ExpenseTask> {
        self.ledger.active_task.as_ref()
    }

    #[must_use]
    pub fn persona(&self) -> &UserPersona {
        &self.ledger.persona
    }

    #[must_use]
    pub fn insights(&self) -> &[Insight] {
        self.board.insights()
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Dashboard numbers as of `date`.
    #[must_use]
    pub fn dashboard(&self, date: NaiveDate) -> DashboardSummary {
        self.analytics_service.summarize(&self.ledger, date)
    }

    /// Dashboard numbers for today (UTC).
    #[must_use]
    pub fn dashboard_today(&self) -> DashboardSummary {
        self.dashboard(Utc::now().date_naive())
    }

    // ── Advice ──────────────────────────────────────────────────────

    /// What the advisor would be shown right now.
    #[must_use]
    pub fn advice_snapshot(&self) -> AdviceSnapshot {
        AdviceSnapshot::capture(&self.ledger, self.settings.recent_transaction_limit)
    }

    /// Shared handle to the advice service, for hosts that run requests
    /// on their own tasks and commit the responses later.
    pub fn advice_service(&self) -> Arc<AdviceService> {
        Arc::clone(&self.advice_service)
    }

    /// Issue a refresh: a new token (superseding all earlier ones) plus a
    /// snapshot of the ledger. Clears any pending automatic refresh,
    /// since this snapshot already includes those changes.
    pub fn prepare_refresh(&mut self) -> RefreshRequest {
        self.scheduler.clear();
        RefreshRequest {
            token: self.board.issue(),
            snapshot: self.advice_snapshot(),
        }
    }

    /// Commit a response if it belongs to the newest refresh.
    pub fn commit_refresh(&mut self, response: RefreshResponse) -> CommitStatus {
        self.board.commit(response)
    }

    /// Manual refresh: issue, fetch and commit in one call.
    pub async fn refresh_insights(&mut self) -> CommitStatus {
        let request = self.prepare_refresh();
        let service = self.advice_service();
        let response = service.fetch(request).await;
        self.commit_refresh(response)
    }

    /// Time left before the pending automatic refresh is due, if any.
    #[must_use]
    pub fn time_until_auto_refresh(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    /// If the quiet period after the last change has elapsed and the
    /// session already has insights, issue a refresh request.
    pub fn poll_auto_refresh(&mut self, now: Instant) -> Option<RefreshRequest> {
        if self.scheduler.take_due(now, self.board.has_insights()) {
            Some(self.prepare_refresh())
        } else {
            None
        }
    }

    /// Poll and, when due, run the automatic refresh to completion.
    pub async fn run_auto_refresh(&mut self, now: Instant) -> Option<CommitStatus> {
        let request = self.poll_auto_refresh(now)?;
        let service = self.advice_service();
        let response = service.fetch(request).await;
        Some(self.commit_refresh(response))
    }
}
