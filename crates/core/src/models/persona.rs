use serde::{Deserialize, Serialize};

/// The household profile the advisor reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPersona {
    pub name: String,
    /// Monthly salary.
    pub salary: f64,
    pub family_size: u32,
    pub total_loans: f64,
    /// Asset class the user wants investment suggestions for.
    pub investment_niche: String,
    pub is_setup: bool,
}

impl Default for UserPersona {
    fn default() -> Self {
        Self {
            name: String::new(),
            salary: 0.0,
            family_size: 1,
            total_loans: 0.0,
            investment_niche: String::new(),
            is_setup: false,
        }
    }
}

/// Partial update merged into the persona. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaUpdate {
    pub name: Option<String>,
    pub salary: Option<f64>,
    pub family_size: Option<u32>,
    pub total_loans: Option<f64>,
    pub investment_niche: Option<String>,
}

impl PersonaUpdate {
    /// Merge into `persona` and mark it configured.
    pub(crate) fn apply_to(self, persona: &mut UserPersona) {
        if let Some(name) = self.name {
            persona.name = name;
        }
        if let Some(salary) = self.salary {
            persona.salary = salary;
        }
        if let Some(family_size) = self.family_size {
            persona.family_size = family_size;
        }
        if let Some(total_loans) = self.total_loans {
            persona.total_loans = total_loans;
        }
        if let Some(niche) = self.investment_niche {
            persona.investment_niche = niche;
        }
        persona.is_setup = true;
    }
}
