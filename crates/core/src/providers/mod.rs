pub mod gemini;
pub mod prompt;
pub mod traits;
pub mod unconfigured;

use crate::models::settings::AdvisorSettings;
use gemini::GeminiProvider;
use traits::AdviceProvider;
use unconfigured::UnconfiguredProvider;

/// Pick the provider the settings allow: Gemini when an API key is set,
/// otherwise a stand-in that reports the advisor as offline.
pub fn provider_from_settings(settings: &AdvisorSettings) -> Box<dyn AdviceProvider> {
    match settings.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Box::new(GeminiProvider::new(
            key.to_string(),
            settings.model.clone(),
            settings.base_url.clone(),
            settings.timeout_secs,
        )),
        _ => Box::new(UnconfiguredProvider::new("Gemini")),
    }
}
