use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// A recurring bill. Moves from unpaid to paid exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub category: Category,
    pub is_paid: bool,
}

impl Bill {
    pub fn new(name: impl Into<String>, amount: f64, due_date: NaiveDate, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            due_date,
            category,
            is_paid: false,
        }
    }
}
