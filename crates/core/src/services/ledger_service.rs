use tracing::debug;
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::goal::NewGoal;
use crate::models::ledger::Ledger;
use crate::models::outcome::{Effect, Outcome, Rejection};
use crate::models::persona::PersonaUpdate;
use crate::models::task::ExpenseTask;
use crate::models::transaction::Transaction;
use crate::services::allocation::{emergency_fund_goal, highest_priority_goal};

/// The transition rules: every way the ledger is allowed to change.
///
/// Pure business logic, no I/O. Each rule runs to completion against a
/// `&mut Ledger` and reports what it did as an [`Outcome`]; a rejected
/// rule leaves the ledger exactly as it found it.
pub struct LedgerService {
    task_category: Category,
    emergency_allocation_ratio: f64,
}

impl LedgerService {
    pub fn new(task_category: Category, emergency_allocation_ratio: f64) -> Self {
        Self {
            task_category,
            emergency_allocation_ratio,
        }
    }

    // ── Expense tasks ───────────────────────────────────────────────

    /// Open a new expense task. Any task already active is dropped
    /// without being logged; guarding against that is the caller's job.
    pub fn start_task(&self, ledger: &mut Ledger, name: &str, budget: f64) -> Outcome {
        let task = ExpenseTask::new(name, budget);
        let task_id = task.id;
        let mut effects = Vec::new();

        if let Some(previous) = ledger.active_task.replace(task) {
            debug!(task = %previous.id, "Discarding active task without logging it");
            effects.push(Effect::TaskDiscarded(previous.id));
        }
        effects.push(Effect::TaskStarted(task_id));

        debug!(task = %task_id, task_name = name, budget, "Task started");
        Outcome::Applied(effects)
    }

    /// Add an item to the active task. Amounts are not validated.
    pub fn add_item(&self, ledger: &mut Ledger, amount: f64, description: &str) -> Outcome {
        let Some(task) = ledger.active_task.as_mut() else {
            return reject(Rejection::NoActiveTask);
        };

        let item_id = task.push_item(description, amount);
        debug!(task = %task.id, amount, spent = task.spent(), "Task item added");
        Outcome::Applied(vec![Effect::TaskItemAdded {
            task_id: task.id,
            item_id,
            amount,
        }])
    }

    /// Close the active task: book its spend, then route any surplus to
    /// the highest-priority goal.
    ///
    /// The whole rule commits under one `&mut Ledger` borrow, so no
    /// caller can observe the budget updated without the surplus moved.
    pub fn complete_task(&self, ledger: &mut Ledger) -> Outcome {
        let Some(task) = ledger.active_task.take() else {
            return reject(Rejection::NoActiveTask);
        };

        let spent = task.spent();
        let surplus = task.surplus();
        let mut effects = Vec::new();

        let expense = Transaction::expense(spent, self.task_category, format!("Task: {}", task.name))
            .for_task(task.id);
        effects.push(Effect::TransactionRecorded(expense.id));
        ledger.transactions.push(expense);

        effects.push(self.add_budget_spend(ledger, self.task_category, spent));

        if surplus > 0.0 {
            match highest_priority_goal(&ledger.goals).map(|g| g.id) {
                Some(goal_id) => {
                    if let Some(goal) = ledger.goal_mut(goal_id) {
                        goal.current += surplus;
                    }
                    effects.push(Effect::GoalCredited {
                        goal_id,
                        amount: surplus,
                    });

                    let flow = Transaction::expense(
                        surplus,
                        Category::Other,
                        format!("Surplus flow from {}", task.name),
                    )
                    .for_task(task.id);
                    effects.push(Effect::TransactionRecorded(flow.id));
                    ledger.transactions.push(flow);
                    debug!(task = %task.id, goal = %goal_id, surplus, "Surplus redirected");
                }
                None => {
                    debug!(task = %task.id, surplus, "No savings goal; surplus dropped");
                    effects.push(Effect::SurplusDropped { amount: surplus });
                }
            }
        }

        effects.push(Effect::TaskCleared(task.id));
        debug!(task = %task.id, spent, surplus, "Task completed");
        Outcome::Applied(effects)
    }

    /// Drop the active task. Nothing is logged and no budget moves.
    pub fn cancel_task(&self, ledger: &mut Ledger) -> Outcome {
        match ledger.active_task.take() {
            Some(task) => {
                debug!(task = %task.id, items = task.items().len(), "Task cancelled");
                Outcome::Applied(vec![Effect::TaskCleared(task.id)])
            }
            None => reject(Rejection::NoActiveTask),
        }
    }

    // ── Savings goals ───────────────────────────────────────────────

    pub fn add_goal(&self, ledger: &mut Ledger, new_goal: NewGoal) -> Outcome {
        if new_goal.name.trim().is_empty() {
            return reject(Rejection::EmptyGoalName);
        }
        if new_goal.target <= 0.0 || new_goal.target.is_nan() {
            return reject(Rejection::NonPositiveTarget(new_goal.target));
        }

        let goal = new_goal.into_goal();
        let goal_id = goal.id;
        debug!(goal = %goal_id, name = %goal.name, priority = goal.priority, "Goal created");
        ledger.goals.push(goal);
        Outcome::Applied(vec![Effect::GoalCreated(goal_id)])
    }

    /// Move `amount` into a goal and log it as an expense.
    pub fn contribute(&self, ledger: &mut Ledger, goal_id: Uuid, amount: f64) -> Outcome {
        if amount <= 0.0 || amount.is_nan() {
            return reject(Rejection::NonPositiveAmount(amount));
        }
        let Some(goal) = ledger.goal_mut(goal_id) else {
            return reject(Rejection::GoalNotFound(goal_id));
        };

        goal.current += amount;
        let description = format!("Direct Contribution: {}", goal.name);

        let tx = Transaction::expense(amount, Category::Other, description);
        let tx_id = tx.id;
        ledger.transactions.push(tx);

        debug!(goal = %goal_id, amount, "Contribution recorded");
        Outcome::Applied(vec![
            Effect::GoalCredited { goal_id, amount },
            Effect::TransactionRecorded(tx_id),
        ])
    }

    // ── Bills & budgets ─────────────────────────────────────────────

    /// Mark a bill paid, log it, and charge its budget.
    ///
    /// A missing budget doesn't stop the payment: the bill is still
    /// marked paid and logged, and the outcome carries
    /// [`Effect::BudgetMissing`].
    pub fn pay_bill(&self, ledger: &mut Ledger, bill_id: Uuid) -> Outcome {
        let Some(bill) = ledger.bills.iter_mut().find(|b| b.id == bill_id) else {
            return reject(Rejection::BillNotFound(bill_id));
        };
        if bill.is_paid {
            return reject(Rejection::BillAlreadyPaid(bill_id));
        }

        bill.is_paid = true;
        let (amount, category) = (bill.amount, bill.category);
        let tx = Transaction::expense(amount, category, format!("Paid Bill: {}", bill.name));
        let tx_id = tx.id;
        ledger.transactions.push(tx);

        let budget_effect = self.add_budget_spend(ledger, category, amount);
        debug!(bill = %bill_id, amount, %category, "Bill paid");
        Outcome::Applied(vec![
            Effect::BillPaid(bill_id),
            Effect::TransactionRecorded(tx_id),
            budget_effect,
        ])
    }

    /// Replace a budget's limit. The sign is not checked.
    pub fn update_budget_limit(&self, ledger: &mut Ledger, category: Category, new_limit: f64) -> Outcome {
        let Some(budget) = ledger.budget_mut(category) else {
            return reject(Rejection::BudgetNotFound(category));
        };

        let old = std::mem::replace(&mut budget.limit, new_limit);
        debug!(%category, old, new = new_limit, "Budget limit updated");
        Outcome::Applied(vec![Effect::BudgetLimitChanged {
            category,
            old,
            new: new_limit,
        }])
    }

    // ── Income & profile ────────────────────────────────────────────

    /// Log income, then contribute the configured share of it to the
    /// emergency fund (if one exists).
    pub fn receive_income(&self, ledger: &mut Ledger, amount: f64) -> Outcome {
        if amount <= 0.0 || amount.is_nan() {
            return reject(Rejection::NonPositiveAmount(amount));
        }

        let tx = Transaction::income(amount, Category::Other, "Extra Income");
        let mut effects = vec![Effect::TransactionRecorded(tx.id)];
        ledger.transactions.push(tx);

        let allocation = amount * self.emergency_allocation_ratio;
        match emergency_fund_goal(&ledger.goals).map(|g| g.id) {
            Some(goal_id) if allocation > 0.0 => {
                effects.extend_from_slice(self.contribute(ledger, goal_id, allocation).effects());
            }
            _ => {
                debug!(allocation, "No emergency fund allocation made");
                effects.push(Effect::EmergencyAllocationSkipped { amount: allocation });
            }
        }

        debug!(amount, allocation, "Income received");
        Outcome::Applied(effects)
    }

    pub fn update_persona(&self, ledger: &mut Ledger, update: PersonaUpdate) -> Outcome {
        update.apply_to(&mut ledger.persona);
        debug!(name = %ledger.persona.name, "Persona updated");
        Outcome::Applied(vec![Effect::PersonaUpdated])
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn add_budget_spend(&self, ledger: &mut Ledger, category: Category, amount: f64) -> Effect {
        match ledger.budget_mut(category) {
            Some(budget) => {
                budget.spent += amount;
                Effect::BudgetSpent { category, amount }
            }
            None => {
                debug!(%category, amount, "No budget for category; spend not tracked");
                Effect::BudgetMissing { category, amount }
            }
        }
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(Category::Groceries, 0.2)
    }
}

fn reject(reason: Rejection) -> Outcome {
    debug!(%reason, "Transition rejected");
    Outcome::Rejected(reason)
}
