//! Named selection policies for automatic money movements.
//!
//! Both functions pick a single goal out of the collection; keeping them
//! here gives the tie-break one documented home.

use crate::models::goal::SavingsGoal;

/// The goal that receives task surpluses: the smallest `priority` value.
///
/// On ties the goal that appears first in `goals` wins. Callers should
/// only rely on "some goal with the minimum priority is chosen".
pub fn highest_priority_goal(goals: &[SavingsGoal]) -> Option<&SavingsGoal> {
    goals.iter().min_by_key(|g| g.priority)
}

/// The goal that receives the automatic share of income: the first goal
/// flagged as an emergency fund. Nothing enforces there being only one.
pub fn emergency_fund_goal(goals: &[SavingsGoal]) -> Option<&SavingsGoal> {
    goals.iter().find(|g| g.is_emergency_fund)
}
