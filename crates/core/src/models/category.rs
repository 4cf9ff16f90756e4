use serde::{Deserialize, Serialize};

/// Spending category shared by transactions, budgets and bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Entertainment,
    Travel,
    Housing,
    Utilities,
    Health,
    Education,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Groceries,
        Category::Entertainment,
        Category::Travel,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Education,
        Category::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Groceries => write!(f, "Groceries"),
            Category::Entertainment => write!(f, "Entertainment"),
            Category::Travel => write!(f, "Travel"),
            Category::Housing => write!(f, "Housing"),
            Category::Utilities => write!(f, "Utilities"),
            Category::Health => write!(f, "Health"),
            Category::Education => write!(f, "Education"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive parse, used when reading configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
