use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::errors::CoreError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the hosted advice model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    /// API key for the generative model. Without one the advisor reports offline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier, e.g. "gemini-3-flash-preview".
    pub model: String,

    /// Base URL of the Generative Language API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// User-configurable settings for a WealthFlow session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub advisor: AdvisorSettings,

    /// Quiet period after the last tracked change before insights refresh
    /// on their own, in milliseconds.
    pub refresh_debounce_ms: u64,

    /// How many of the newest transactions the advisor gets to see.
    pub recent_transaction_limit: usize,

    /// Share of every income routed to the emergency fund (0.2 = 20%).
    pub emergency_allocation_ratio: f64,

    /// Category a completed expense task is booked against.
    pub task_category: Category,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            advisor: AdvisorSettings::default(),
            refresh_debounce_ms: 1000,
            recent_transaction_limit: 15,
            emergency_allocation_ratio: 0.2,
            task_category: Category::Groceries,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (normally the process environment):
    ///
    /// - `GEMINI_API_KEY`, falling back to `API_KEY`
    /// - `WEALTHFLOW_MODEL`, `WEALTHFLOW_BASE_URL`, `WEALTHFLOW_TIMEOUT_SECS`
    /// - `WEALTHFLOW_DEBOUNCE_MS`, `WEALTHFLOW_RECENT_TRANSACTIONS`
    /// - `WEALTHFLOW_EMERGENCY_RATIO`, `WEALTHFLOW_TASK_CATEGORY`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.advisor.api_key = Some(key);
        }
        if let Some(model) = non_empty("WEALTHFLOW_MODEL") {
            self.advisor.model = model;
        }
        if let Some(url) = non_empty("WEALTHFLOW_BASE_URL") {
            self.advisor.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty("WEALTHFLOW_TIMEOUT_SECS") {
            self.advisor.timeout_secs = parse_var("WEALTHFLOW_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = non_empty("WEALTHFLOW_DEBOUNCE_MS") {
            self.refresh_debounce_ms = parse_var("WEALTHFLOW_DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = non_empty("WEALTHFLOW_RECENT_TRANSACTIONS") {
            self.recent_transaction_limit = parse_var("WEALTHFLOW_RECENT_TRANSACTIONS", &v)?;
        }
        if let Some(v) = non_empty("WEALTHFLOW_EMERGENCY_RATIO") {
            self.emergency_allocation_ratio = parse_var("WEALTHFLOW_EMERGENCY_RATIO", &v)?;
        }
        if let Some(v) = non_empty("WEALTHFLOW_TASK_CATEGORY") {
            self.task_category = v
                .parse()
                .map_err(|e| CoreError::Configuration(format!("WEALTHFLOW_TASK_CATEGORY: {e}")))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values no session could work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.emergency_allocation_ratio) {
            return Err(CoreError::Configuration(format!(
                "emergency_allocation_ratio must be between 0 and 1, got {}",
                self.emergency_allocation_ratio
            )));
        }
        if self.advisor.model.trim().is_empty() {
            return Err(CoreError::Configuration("advisor model must not be empty".into()));
        }
        if self.advisor.timeout_secs == 0 {
            return Err(CoreError::Configuration("advisor timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CoreError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CoreError::Configuration(format!("{key}: {e}")))
}
