use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::bill::Bill;
use super::budget::Budget;
use super::category::Category;
use super::goal::SavingsGoal;
use super::persona::UserPersona;
use super::task::ExpenseTask;
use super::transaction::Transaction;

/// The household's complete financial state.
///
/// Transactions are stored oldest-first and only ever appended; readers
/// that want the conventional newest-first view use
/// [`Ledger::transactions_newest_first`]. Budgets are keyed by category.
/// The builder methods keep that key unique, and deserialization or
/// [`Ledger::validate`] rejects a ledger where it is not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredLedger")]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<SavingsGoal>,
    pub bills: Vec<Bill>,
    pub persona: UserPersona,

    /// The single in-progress expense task, if any.
    #[serde(default)]
    pub active_task: Option<ExpenseTask>,
}

#[derive(Deserialize)]
struct StoredLedger {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<SavingsGoal>,
    bills: Vec<Bill>,
    persona: UserPersona,
    #[serde(default)]
    active_task: Option<ExpenseTask>,
}

impl TryFrom<StoredLedger> for Ledger {
    type Error = CoreError;

    fn try_from(stored: StoredLedger) -> Result<Self, Self::Error> {
        let ledger = Self {
            transactions: stored.transactions,
            budgets: stored.budgets,
            goals: stored.goals,
            bills: stored.bills,
            persona: stored.persona,
            active_task: stored.active_task,
        };
        ledger.validate()?;
        Ok(ledger)
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the invariants the public fields can't enforce on their own.
    /// Currently: at most one budget per category.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (i, budget) in self.budgets.iter().enumerate() {
            if self.budgets[..i].iter().any(|b| b.category == budget.category) {
                return Err(CoreError::Configuration(format!(
                    "duplicate budget for category {}",
                    budget.category
                )));
            }
        }
        Ok(())
    }

    /// The household the dashboard starts with: a configured persona,
    /// five budgets, three goals (emergency fund first) and two unpaid
    /// utility bills.
    pub fn demo() -> Self {
        let persona = UserPersona {
            name: "Alex Johnson".into(),
            salary: 6500.0,
            family_size: 3,
            total_loans: 15000.0,
            investment_niche: "SGB & Tech Stocks".into(),
            is_setup: true,
        };

        let goal = |name: &str, target: f64, current: f64, priority: u32| SavingsGoal {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            current,
            priority,
            is_emergency_fund: false,
            category_preference: None,
        };

        let mut emergency = goal("Emergency Fund", 20000.0, 4500.0, 1);
        emergency.is_emergency_fund = true;
        let mut gold = goal("Gold Reserve (SGB)", 8000.0, 1200.0, 2);
        gold.category_preference = Some("SGB".into());
        let vacation = goal("Family Vacation", 3500.0, 400.0, 3);

        let due = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

        Self::new()
            .with_persona(persona)
            .with_transaction(Transaction::income(6500.0, Category::Other, "Monthly Salary"))
            .with_transaction(Transaction::expense(1500.0, Category::Housing, "Rent Payment"))
            .with_budget(Budget::new(Category::Groceries, 800.0).with_spent(350.0))
            .with_budget(Budget::new(Category::Entertainment, 400.0).with_spent(120.0))
            .with_budget(Budget::new(Category::Housing, 2000.0).with_spent(1500.0))
            .with_budget(Budget::new(Category::Utilities, 300.0))
            .with_budget(Budget::new(Category::Travel, 500.0))
            .with_goal(emergency)
            .with_goal(gold)
            .with_goal(vacation)
            .with_bill(Bill::new("Fast Fiber Internet", 75.0, due(2024, 5, 28), Category::Utilities))
            .with_bill(Bill::new("Smart Grid Electric", 120.0, due(2024, 5, 30), Category::Utilities))
    }

    // ── Builders ────────────────────────────────────────────────────

    /// Add a budget, replacing any existing budget for the same category.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        match self.budgets.iter_mut().find(|b| b.category == budget.category) {
            Some(existing) => *existing = budget,
            None => self.budgets.push(budget),
        }
        self
    }

    pub fn with_goal(mut self, goal: SavingsGoal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn with_bill(mut self, bill: Bill) -> Self {
        self.bills.push(bill);
        self
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn with_persona(mut self, persona: UserPersona) -> Self {
        self.persona = persona;
        self
    }

    // ── Lookups ─────────────────────────────────────────────────────

    /// Transactions, most recent first.
    pub fn transactions_newest_first(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev()
    }

    /// The `limit` most recent transactions, newest first.
    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        self.transactions_newest_first().take(limit).collect()
    }

    pub fn budget(&self, category: Category) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub(crate) fn budget_mut(&mut self, category: Category) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|b| b.category == category)
    }

    pub fn goal(&self, goal_id: Uuid) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub(crate) fn goal_mut(&mut self, goal_id: Uuid) -> Option<&mut SavingsGoal> {
        self.goals.iter_mut().find(|g| g.id == goal_id)
    }

    pub fn bill(&self, bill_id: Uuid) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == bill_id)
    }

    pub fn unpaid_bills(&self) -> Vec<&Bill> {
        self.bills.iter().filter(|b| !b.is_paid).collect()
    }

    /// Goals sorted for display, highest priority (lowest number) first.
    /// The sort is stable, so equal priorities keep collection order.
    pub fn goals_by_priority(&self) -> Vec<&SavingsGoal> {
        let mut goals: Vec<&SavingsGoal> = self.goals.iter().collect();
        goals.sort_by_key(|g| g.priority);
        goals
    }
}
