use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line in an expense task (e.g. a single grocery item).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
}

/// A bounded shopping session: the user sets a budget, adds items while
/// shopping, then completes or cancels.
///
/// `spent` is kept equal to the sum of `items`; items can only be added
/// through [`ExpenseTask::push_item`]. Deserialization ignores any stored
/// `spent` and recomputes it from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct ExpenseTask {
    pub id: Uuid,
    pub name: String,
    pub budget: f64,
    spent: f64,
    items: Vec<TaskItem>,
    pub is_active: bool,
}

/// Wire shape of a task as read back from storage.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: Uuid,
    name: String,
    budget: f64,
    #[serde(default)]
    items: Vec<TaskItem>,
    #[serde(default = "active_by_default")]
    is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<StoredTask> for ExpenseTask {
    fn from(stored: StoredTask) -> Self {
        let spent = sum_items(&stored.items);
        Self {
            id: stored.id,
            name: stored.name,
            budget: stored.budget,
            spent,
            items: stored.items,
            is_active: stored.is_active,
        }
    }
}

fn sum_items(items: &[TaskItem]) -> f64 {
    items.iter().map(|i| i.amount).sum()
}

impl ExpenseTask {
    pub fn new(name: impl Into<String>, budget: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            budget,
            spent: 0.0,
            items: Vec::new(),
            is_active: true,
        }
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    /// Budget minus spend. Negative when the task ran over.
    pub fn surplus(&self) -> f64 {
        self.budget - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }

    /// Append an item and return its id.
    pub(crate) fn push_item(&mut self, name: impl Into<String>, amount: f64) -> Uuid {
        let item = TaskItem {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
        };
        let id = item.id;
        self.items.push(item);
        // Recompute from the items rather than accumulating, so float
        // drift can't separate the two.
        self.spent = sum_items(&self.items);
        id
    }
}
