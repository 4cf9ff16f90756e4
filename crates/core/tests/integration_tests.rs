// ═══════════════════════════════════════════════════════════════════
// Integration Tests — WealthFlow facade end to end
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use wealthflow_core::errors::CoreError;
use wealthflow_core::models::category::Category;
use wealthflow_core::models::goal::NewGoal;
use wealthflow_core::models::insight::{Insight, InsightKind, Severity, ADVISOR_OFFLINE_TITLE};
use wealthflow_core::models::ledger::Ledger;
use wealthflow_core::models::outcome::Rejection;
use wealthflow_core::models::persona::PersonaUpdate;
use wealthflow_core::models::settings::Settings;
use wealthflow_core::models::snapshot::AdviceSnapshot;
use wealthflow_core::models::transaction::TransactionType;
use wealthflow_core::providers::traits::AdviceProvider;
use wealthflow_core::services::advice_service::CommitStatus;
use wealthflow_core::WealthFlow;

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Returns one insight whose title is the call number, so tests can tell
/// which request produced the committed result.
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AdviceProvider for CountingProvider {
    fn name(&self) -> &str {
        "Counting"
    }

    async fn generate_insights(&self, snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![Insight::new(
            InsightKind::Advice,
            format!("call {n}"),
            format!("{} transactions", snapshot.recent_transactions.len()),
            Severity::Low,
        )])
    }
}

fn app() -> (WealthFlow, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: Arc::clone(&calls),
    };
    let app = WealthFlow::with_provider(Ledger::demo(), Settings::default(), Box::new(provider)).unwrap();
    (app, calls)
}

fn quiet(app: &WealthFlow) -> Duration {
    Duration::from_millis(app.settings().refresh_debounce_ms)
}

// ═══════════════════════════════════════════════════════════════════
//  Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;
    use wealthflow_core::models::budget::Budget;

    #[test]
    fn rejects_out_of_range_allocation_ratio() {
        let settings = Settings {
            emergency_allocation_ratio: 5.0,
            ..Settings::default()
        };
        let result = WealthFlow::new(Ledger::demo(), settings);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn rejects_zero_advisor_timeout() {
        let mut settings = Settings::default();
        settings.advisor.timeout_secs = 0;
        let result = WealthFlow::new(Ledger::demo(), settings);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn rejects_duplicate_budget_categories() {
        let mut ledger = Ledger::demo();
        ledger.budgets.push(Budget::new(Category::Groceries, 50.0));
        let result = WealthFlow::new(ledger, Settings::default());
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn valid_ratio_routes_its_share_of_income() {
        let settings = Settings {
            emergency_allocation_ratio: 0.5,
            ..Settings::default()
        };
        let mut app = WealthFlow::new(Ledger::demo(), settings).unwrap();
        let before = app.goals_by_priority()[0].current;
        assert!(app.receive_income(1000.0).is_applied());
        assert_eq!(app.goals_by_priority()[0].current - before, 500.0);
    }

    #[test]
    fn task_spend_lands_on_the_single_category_budget() {
        let (mut app, _) = app();
        let before = app.budget(Category::Groceries).unwrap().spent;
        let _ = app.start_task("Run", 50.0);
        let _ = app.add_task_item(20.0, "Milk");
        let _ = app.complete_task();

        let groceries: Vec<&Budget> = app
            .budgets()
            .iter()
            .filter(|b| b.category == Category::Groceries)
            .collect();
        assert_eq!(groceries.len(), 1);
        assert_eq!(groceries[0].spent, before + 20.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transition rules through the facade
// ═══════════════════════════════════════════════════════════════════

mod rules {
    use super::*;

    #[test]
    fn shopping_run_moves_surplus_to_emergency_fund() {
        let (mut app, _) = app();
        let fund_before = app.goals_by_priority()[0].current;
        let groceries_before = app.budget(Category::Groceries).unwrap().spent;

        assert!(app.start_task("Grocery Run", 100.0).is_applied());
        assert!(app.add_task_item(42.5, "Produce").is_applied());
        assert!(app.add_task_item(17.5, "Dairy").is_applied());
        assert_eq!(app.active_task().unwrap().spent(), 60.0);
        assert!(app.complete_task().is_applied());

        assert!(app.active_task().is_none());
        assert_eq!(app.goals_by_priority()[0].current, fund_before + 40.0);
        assert_eq!(app.budget(Category::Groceries).unwrap().spent, groceries_before + 60.0);

        let newest = app.transactions();
        assert_eq!(newest.len(), 4);
        assert_eq!(newest[0].description, "Surplus flow from Grocery Run");
        assert_eq!(newest[1].description, "Task: Grocery Run");
    }

    #[test]
    fn income_and_bills() {
        let (mut app, _) = app();
        let fund_before = app.goals_by_priority()[0].current;

        assert!(app.receive_income(1000.0).is_applied());
        assert!((app.goals_by_priority()[0].current - (fund_before + 200.0)).abs() < 1e-9);

        let bill_id = app.unpaid_bills()[0].id;
        assert!(app.pay_bill(bill_id).is_applied());
        assert_eq!(app.unpaid_bills().len(), 1);
        assert_eq!(app.budget(Category::Utilities).unwrap().spent, 75.0);
        assert_eq!(
            app.pay_bill(bill_id).rejection(),
            Some(&Rejection::BillAlreadyPaid(bill_id))
        );

        let newest = app.transactions();
        assert_eq!(newest[0].description, "Paid Bill: Fast Fiber Internet");
        assert_eq!(newest[2].transaction_type, TransactionType::Income);
    }

    #[test]
    fn goals_persona_and_budgets() {
        let (mut app, _) = app();
        assert!(app.add_goal(NewGoal::new("New Car", 12000.0, 4)).is_applied());
        assert!(!app.add_goal(NewGoal::new("", 500.0, 1)).is_applied());
        assert!(!app.add_goal(NewGoal::new("X", 0.0, 1)).is_applied());
        assert_eq!(app.goals().len(), 4);

        let car = app.goals().iter().find(|g| g.name == "New Car").unwrap().id;
        assert!(app.contribute(car, 250.0).is_applied());
        assert_eq!(app.goal(car).unwrap().current, 250.0);

        assert!(app.update_budget_limit(Category::Travel, 900.0).is_applied());
        assert_eq!(app.budget(Category::Travel).unwrap().limit, 900.0);

        let update = PersonaUpdate {
            family_size: Some(4),
            ..Default::default()
        };
        assert!(app.update_persona(update).is_applied());
        assert_eq!(app.persona().family_size, 4);
        assert_eq!(app.persona().name, "Alex Johnson");
    }

    #[test]
    fn cancel_leaves_ledger_untouched() {
        let (mut app, _) = app();
        let txs = app.transactions().len();
        let _ = app.start_task("Impulse", 30.0);
        let _ = app.add_task_item(12.0, "Gadget");
        assert!(app.cancel_task().is_applied());
        assert!(app.active_task().is_none());
        assert_eq!(app.transactions().len(), txs);
    }

    #[test]
    fn dashboard_reflects_rules() {
        let (mut app, _) = app();
        let before = app.dashboard_today();
        let bill_id = app.unpaid_bills()[0].id;
        let _ = app.pay_bill(bill_id);
        let after = app.dashboard_today();

        assert!((before.unpaid_bills_total - after.unpaid_bills_total - 75.0).abs() < 1e-9);
        assert!((before.total_balance - after.total_balance - 75.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Advice refresh through the facade
// ═══════════════════════════════════════════════════════════════════

mod refresh {
    use super::*;

    #[tokio::test]
    async fn manual_refresh_commits() {
        let (mut app, calls) = app();
        assert_eq!(app.refresh_insights().await, CommitStatus::Committed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.insights().len(), 1);
        assert_eq!(app.insights()[0].content, "2 transactions");
    }

    #[tokio::test]
    async fn only_newest_request_commits() {
        let (mut app, _) = app();
        let first = app.prepare_refresh();
        let second = app.prepare_refresh();

        let service = app.advice_service();
        let first_resp = service.fetch(first).await;
        let second_resp = service.fetch(second).await;

        assert_eq!(app.commit_refresh(second_resp), CommitStatus::Committed);
        assert_eq!(app.commit_refresh(first_resp), CommitStatus::Stale);
        assert_eq!(app.insights()[0].title, "call 2");
    }

    #[tokio::test]
    async fn request_snapshot_is_detached_from_later_changes() {
        let (mut app, _) = app();
        let request = app.prepare_refresh();
        let _ = app.receive_income(500.0);

        let resp = app.advice_service().fetch(request).await;
        assert_eq!(app.commit_refresh(resp), CommitStatus::Committed);
        assert_eq!(app.insights()[0].content, "2 transactions");
    }

    #[test]
    fn no_auto_refresh_before_first_insights() {
        let (mut app, _) = app();
        let q = quiet(&app);
        let _ = app.receive_income(100.0);
        let later = Instant::now() + q * 2;
        assert!(app.poll_auto_refresh(later).is_none());
        // The pending change was consumed; nothing fires afterwards either.
        assert!(app.time_until_auto_refresh(later).is_none());
    }

    #[tokio::test]
    async fn auto_refresh_after_quiet_period() {
        let (mut app, calls) = app();
        let q = quiet(&app);
        let _ = app.refresh_insights().await;

        let _ = app.update_budget_limit(Category::Travel, 650.0);
        let changed = Instant::now();
        assert!(app.poll_auto_refresh(changed).is_none());

        let status = app.run_auto_refresh(changed + q * 2).await;
        assert_eq!(status, Some(CommitStatus::Committed));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(app.insights()[0].title, "call 2");

        // Fired once; no further refresh without another change.
        assert!(app.run_auto_refresh(changed + q * 4).await.is_none());
    }

    #[tokio::test]
    async fn untracked_changes_do_not_schedule_refresh() {
        let (mut app, _) = app();
        let _ = app.refresh_insights().await;

        let _ = app.start_task("Run", 40.0);
        let _ = app.add_task_item(5.0, "Bread");
        let _ = app.cancel_task();
        assert!(app.time_until_auto_refresh(Instant::now()).is_none());
    }

    #[tokio::test]
    async fn manual_refresh_clears_pending_auto_refresh() {
        let (mut app, _) = app();
        let _ = app.refresh_insights().await;
        let _ = app.receive_income(100.0);
        assert!(app.time_until_auto_refresh(Instant::now()).is_some());

        let _ = app.refresh_insights().await;
        assert!(app.time_until_auto_refresh(Instant::now()).is_none());
    }

    #[tokio::test]
    async fn unconfigured_advisor_reports_offline() {
        let mut app = WealthFlow::new(Ledger::demo(), Settings::default()).unwrap();
        assert_eq!(app.refresh_insights().await, CommitStatus::Committed);
        assert_eq!(app.insights().len(), 1);
        assert_eq!(app.insights()[0].title, ADVISOR_OFFLINE_TITLE);
    }
}
