use serde::{Deserialize, Serialize};

use super::bill::Bill;
use super::budget::Budget;
use super::goal::SavingsGoal;
use super::ledger::Ledger;
use super::persona::UserPersona;
use super::transaction::Transaction;

/// Everything the advisor is shown, detached from the live ledger so a
/// request can be in flight while the ledger keeps changing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceSnapshot {
    pub persona: UserPersona,
    pub budgets: Vec<Budget>,
    pub goals: Vec<SavingsGoal>,

    /// Newest first, at most the configured limit.
    pub recent_transactions: Vec<Transaction>,

    pub unpaid_bills: Vec<Bill>,
}

impl AdviceSnapshot {
    /// Copy the advisor-relevant parts of `ledger`.
    pub fn capture(ledger: &Ledger, transaction_limit: usize) -> Self {
        Self {
            persona: ledger.persona.clone(),
            budgets: ledger.budgets.clone(),
            goals: ledger.goals.clone(),
            recent_transactions: ledger
                .recent_transactions(transaction_limit)
                .into_iter()
                .cloned()
                .collect(),
            unpaid_bills: ledger.unpaid_bills().into_iter().cloned().collect(),
        }
    }

    pub fn unpaid_bills_total(&self) -> f64 {
        self.unpaid_bills.iter().map(|b| b.amount).sum()
    }
}
