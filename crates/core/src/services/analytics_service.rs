use chrono::{Datelike, NaiveDate};

use crate::models::analytics::{BudgetStatus, DashboardSummary, GoalProgress};
use crate::models::budget::Budget;
use crate::models::ledger::Ledger;

/// Derived dashboard numbers: balances, burn rates, goal progress.
///
/// Read-only over the ledger; nothing here is stored.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Build the full dashboard summary as of `date`.
    pub fn summarize(&self, ledger: &Ledger, date: NaiveDate) -> DashboardSummary {
        let total_balance: f64 = ledger.transactions.iter().map(|t| t.signed_amount()).sum();
        let monthly_expenses = self.monthly_expenses(ledger, date);

        let total_budgeted: f64 = ledger.budgets.iter().map(|b| b.limit).sum();
        let total_budget_spent: f64 = ledger.budgets.iter().map(|b| b.spent).sum();
        let unpaid_bills_total: f64 = ledger.unpaid_bills().iter().map(|b| b.amount).sum();

        let budgets: Vec<BudgetStatus> = ledger.budgets.iter().map(Self::budget_status).collect();
        let over_limit_categories = budgets
            .iter()
            .filter(|b| b.is_over_limit)
            .map(|b| b.category)
            .collect();

        DashboardSummary {
            as_of_date: date,
            total_balance,
            monthly_expenses,
            total_budgeted,
            total_budget_spent,
            budget_utilization_pct: pct(total_budget_spent, total_budgeted),
            unpaid_bills_total,
            unallocated_salary: ledger.persona.salary - total_budgeted - unpaid_bills_total,
            savings_progress_pct: self.savings_progress_pct(ledger),
            over_limit_categories,
            budgets,
            goals: self.goal_progress(ledger),
        }
    }

    /// Sum of expenses recorded in the same calendar month as `date` (UTC).
    pub fn monthly_expenses(&self, ledger: &Ledger, date: NaiveDate) -> f64 {
        ledger
            .transactions
            .iter()
            .filter(|t| t.is_expense())
            .filter(|t| {
                let d = t.timestamp.date_naive();
                d.year() == date.year() && d.month() == date.month()
            })
            .map(|t| t.amount)
            .sum()
    }

    /// Total saved over total targeted across all goals, as a percentage.
    pub fn savings_progress_pct(&self, ledger: &Ledger) -> f64 {
        let current: f64 = ledger.goals.iter().map(|g| g.current).sum();
        let target: f64 = ledger.goals.iter().map(|g| g.target).sum();
        pct(current, target)
    }

    /// Progress of every goal, highest priority first.
    pub fn goal_progress(&self, ledger: &Ledger) -> Vec<GoalProgress> {
        ledger
            .goals_by_priority()
            .into_iter()
            .map(|g| GoalProgress {
                goal_id: g.id,
                name: g.name.clone(),
                priority: g.priority,
                current: g.current,
                target: g.target,
                progress_pct: g.progress_pct().clamp(0.0, 100.0),
                remaining: (g.target - g.current).max(0.0),
            })
            .collect()
    }

    pub fn budget_status(budget: &Budget) -> BudgetStatus {
        BudgetStatus {
            category: budget.category,
            limit: budget.limit,
            spent: budget.spent,
            remaining: budget.remaining(),
            utilization_pct: pct(budget.spent, budget.limit),
            is_over_limit: budget.is_over_limit(),
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
