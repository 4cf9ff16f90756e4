use crate::errors::CoreError;
use crate::models::snapshot::AdviceSnapshot;

/// Render the advisor prompt for a snapshot.
///
/// Persona fields are spelled out in prose; the collections are embedded
/// as compact JSON so the model sees exact figures.
pub fn build_prompt(snapshot: &AdviceSnapshot) -> Result<String, CoreError> {
    let persona = &snapshot.persona;
    let budgets = to_json(&snapshot.budgets)?;
    let goals = to_json(&snapshot.goals)?;
    let transactions = to_json(&snapshot.recent_transactions)?;
    let bills = to_json(&snapshot.unpaid_bills)?;
    let bills_total = snapshot.unpaid_bills_total();

    Ok(format!(
        "You are a family financial advisor for {name}.\n\
         \n\
         HOUSEHOLD:\n\
         - Monthly salary: ${salary}\n\
         - Family size: {family} members\n\
         - Outstanding loans: ${loans}\n\
         - Investment interest: {niche}\n\
         \n\
         DATA:\n\
         - Budgets: {budgets}\n\
         - Savings goals: {goals}\n\
         - Recent transactions (newest first): {transactions}\n\
         - Unpaid bills: {bills}\n\
         \n\
         TASKS:\n\
         1. Assess the debt-to-income ratio and give a concrete repayment plan for the ${loans} in loans.\n\
         2. Flag spending that looks unusual for a family of {family}.\n\
         3. Suggest 2 specific investment steps in {niche} that fit a ${salary} salary and what is left over.\n\
         4. Warn if the unpaid bills (${bills_total}) threaten this month's budget.\n\
         \n\
         Reply with a JSON array of objects with fields \"type\" (alert|advice|investment), \
         \"title\", \"content\" and \"severity\" (low|medium|high).",
        name = persona.name,
        salary = persona.salary,
        family = persona.family_size,
        loans = persona.total_loans,
        niche = persona.investment_niche,
    ))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string(value).map_err(|e| CoreError::Serialization(e.to_string()))
}
