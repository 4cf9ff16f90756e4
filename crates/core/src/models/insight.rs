use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// What kind of guidance an insight carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Alert,
    Advice,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightKind::Alert => write!(f, "alert"),
            InsightKind::Advice => write!(f, "advice"),
            InsightKind::Investment => write!(f, "investment"),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A single piece of advisor output. The whole collection is replaced on
/// every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
    pub severity: Severity,
}

/// Title of the synthetic insight shown when the advisor cannot be reached.
pub const ADVISOR_OFFLINE_TITLE: &str = "Advisor Offline";

/// Body of the synthetic offline insight.
pub const ADVISOR_OFFLINE_MESSAGE: &str =
    "Could not sync with AI Advisor. Please verify your financial profile.";

impl Insight {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        content: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            severity,
        }
    }

    /// The fallback insight substituted for any advisor failure.
    pub fn advisor_offline() -> Self {
        Self::new(
            InsightKind::Alert,
            ADVISOR_OFFLINE_TITLE,
            ADVISOR_OFFLINE_MESSAGE,
            Severity::Medium,
        )
    }
}

/// Parse the advisor's reply: a JSON array of insight objects.
///
/// Models sometimes wrap JSON in a markdown code fence even when asked for
/// raw JSON, so a surrounding fence is stripped first. Blank text is an
/// empty list.
pub fn parse_insights(text: &str) -> Result<Vec<Insight>, CoreError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
