use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings target. `current` may exceed `target`; nothing clamps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target: f64,
    pub current: f64,

    /// 1 is the highest priority. Ties are allowed.
    pub priority: u32,

    pub is_emergency_fund: bool,

    /// Free-text asset class the user is saving towards (e.g. "Gold").
    /// Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_preference: Option<String>,
}

impl SavingsGoal {
    /// Fraction of the target reached, as a percentage. Not clamped.
    pub fn progress_pct(&self) -> f64 {
        if self.target > 0.0 {
            self.current / self.target * 100.0
        } else {
            0.0
        }
    }

    pub fn is_reached(&self) -> bool {
        self.current >= self.target
    }
}

/// User input for creating a goal. `id` and `current` are assigned by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target: f64,
    pub priority: u32,
    pub is_emergency_fund: bool,
    pub category_preference: Option<String>,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target: f64, priority: u32) -> Self {
        Self {
            name: name.into(),
            target,
            priority,
            is_emergency_fund: false,
            category_preference: None,
        }
    }

    pub fn emergency_fund(mut self) -> Self {
        self.is_emergency_fund = true;
        self
    }

    pub fn preferring(mut self, preference: impl Into<String>) -> Self {
        self.category_preference = Some(preference.into());
        self
    }

    pub(crate) fn into_goal(self) -> SavingsGoal {
        SavingsGoal {
            id: Uuid::new_v4(),
            name: self.name,
            target: self.target,
            current: 0.0,
            priority: self.priority,
            is_emergency_fund: self.is_emergency_fund,
            category_preference: self.category_preference,
        }
    }
}
