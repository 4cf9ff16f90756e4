use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::insight::Insight;
use crate::models::snapshot::AdviceSnapshot;
use super::traits::AdviceProvider;

/// Placeholder used when no API key is configured. Every request fails
/// with [`CoreError::MissingApiKey`].
pub struct UnconfiguredProvider {
    service: String,
}

impl UnconfiguredProvider {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

#[async_trait]
impl AdviceProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "Unconfigured"
    }

    async fn generate_insights(&self, _snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        Err(CoreError::MissingApiKey(self.service.clone()))
    }
}
