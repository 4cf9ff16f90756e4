use thiserror::Error;
use uuid::Uuid;

use super::category::Category;

/// Why a transition rule left the ledger untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("No expense task is active")]
    NoActiveTask,

    #[error("Goal name must not be empty")]
    EmptyGoalName,

    #[error("Goal target must be positive, got {0}")]
    NonPositiveTarget(f64),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Savings goal not found: {0}")]
    GoalNotFound(Uuid),

    #[error("Bill not found: {0}")]
    BillNotFound(Uuid),

    #[error("Bill already paid: {0}")]
    BillAlreadyPaid(Uuid),

    #[error("No budget for category: {0}")]
    BudgetNotFound(Category),
}

/// One committed side effect of a transition rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    TaskStarted(Uuid),
    /// A previous active task was replaced without being logged.
    TaskDiscarded(Uuid),
    TaskItemAdded { task_id: Uuid, item_id: Uuid, amount: f64 },
    TaskCleared(Uuid),
    TransactionRecorded(Uuid),
    BudgetSpent { category: Category, amount: f64 },
    /// A spend had no budget to land in and was dropped.
    BudgetMissing { category: Category, amount: f64 },
    BudgetLimitChanged { category: Category, old: f64, new: f64 },
    GoalCreated(Uuid),
    GoalCredited { goal_id: Uuid, amount: f64 },
    /// A positive task surplus found no goal to go to.
    SurplusDropped { amount: f64 },
    /// Income arrived but no emergency-fund goal exists.
    EmergencyAllocationSkipped { amount: f64 },
    BillPaid(Uuid),
    PersonaUpdated,
}

impl Effect {
    /// Whether this effect touches state the advisor reasons about
    /// (persona, budgets, goals, transactions).
    pub fn touches_advised_state(&self) -> bool {
        matches!(
            self,
            Effect::TransactionRecorded(_)
                | Effect::BudgetSpent { .. }
                | Effect::BudgetLimitChanged { .. }
                | Effect::GoalCreated(_)
                | Effect::GoalCredited { .. }
                | Effect::PersonaUpdated
        )
    }
}

/// Result of applying a transition rule.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome {
    Applied(Vec<Effect>),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn effects(&self) -> &[Effect] {
        match self {
            Outcome::Applied(effects) => effects,
            Outcome::Rejected(_) => &[],
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }

    /// Ids of every transaction this outcome recorded, in recording order.
    pub fn recorded_transactions(&self) -> Vec<Uuid> {
        self.effects()
            .iter()
            .filter_map(|e| match e {
                Effect::TransactionRecorded(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn touches_advised_state(&self) -> bool {
        self.effects().iter().any(Effect::touches_advised_state)
    }
}

impl From<Rejection> for Outcome {
    fn from(reason: Rejection) -> Self {
        Outcome::Rejected(reason)
    }
}
