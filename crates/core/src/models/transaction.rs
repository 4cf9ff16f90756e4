use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// A single entry in the append-only transaction log.
///
/// Transactions are never edited after creation. The amount is always
/// positive; `transaction_type` carries the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// The expense task this entry was booked from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
}

impl Transaction {
    pub fn expense(amount: f64, category: Category, description: impl Into<String>) -> Self {
        Self::new(TransactionType::Expense, amount, category, description)
    }

    pub fn income(amount: f64, category: Category, description: impl Into<String>) -> Self {
        Self::new(TransactionType::Income, amount, category, description)
    }

    fn new(
        transaction_type: TransactionType,
        amount: f64,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            description: description.into(),
            timestamp: Utc::now(),
            transaction_type,
            task_id: None,
        }
    }

    /// Attach the originating task.
    pub fn for_task(mut self, task_id: Uuid) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Override the timestamp (seed data and tests).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Signed contribution to the running balance.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}
