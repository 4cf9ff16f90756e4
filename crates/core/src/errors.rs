use thiserror::Error;

/// Unified error type for the fallible infrastructure of wealthflow-core
/// (advice providers, configuration, JSON handling).
///
/// Ledger transition rules never return this type; they report an
/// [`Outcome`](crate::models::outcome::Outcome) instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No API key configured for advice provider: {0}")]
    MissingApiKey(String),

    // ── Data ────────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors may embed the full request URL, and some providers
        // accept the key as a query parameter.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` so query parameters never reach logs.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
