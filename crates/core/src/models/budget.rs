use serde::{Deserialize, Serialize};

use super::category::Category;

/// Monthly spending limit for one category.
///
/// `spent` is a running total; nothing resets it automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
}

impl Budget {
    pub fn new(category: Category, limit: f64) -> Self {
        Self {
            category,
            limit,
            spent: 0.0,
        }
    }

    pub fn with_spent(mut self, spent: f64) -> Self {
        self.spent = spent;
        self
    }

    /// Amount left before the limit is reached (negative when over).
    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit
    }
}
