use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// Headline numbers for the dashboard at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Date this summary was computed for
    pub as_of_date: NaiveDate,

    /// All income minus all expenses ever recorded
    pub total_balance: f64,

    /// Expenses whose timestamp falls in the month of `as_of_date`
    pub monthly_expenses: f64,

    /// Sum of all budget limits
    pub total_budgeted: f64,

    /// Sum of all budget spend
    pub total_budget_spent: f64,

    /// total_budget_spent / total_budgeted * 100 (0 when nothing is budgeted)
    pub budget_utilization_pct: f64,

    /// Sum of bills not yet paid
    pub unpaid_bills_total: f64,

    /// Salary left after budgets and unpaid bills (may be negative)
    pub unallocated_salary: f64,

    /// Sum of goal balances over sum of goal targets, * 100
    pub savings_progress_pct: f64,

    /// Categories whose spend exceeds the limit
    pub over_limit_categories: Vec<Category>,

    pub budgets: Vec<BudgetStatus>,

    /// Goals in priority order
    pub goals: Vec<GoalProgress>,
}

/// Burn status of a single budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,

    /// limit - spent (negative when over)
    pub remaining: f64,

    /// spent / limit * 100; 0 for a zero limit
    pub utilization_pct: f64,

    pub is_over_limit: bool,
}

/// Progress of a single savings goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub name: String,
    pub priority: u32,
    pub current: f64,
    pub target: f64,

    /// Display percentage, clamped to 0..=100. Overfunded goals read 100;
    /// the raw figure is [`SavingsGoal::progress_pct`](crate::models::goal::SavingsGoal::progress_pct).
    pub progress_pct: f64,

    /// target - current, floored at 0
    pub remaining: f64,
}
