use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::insight::Insight;
use crate::models::snapshot::AdviceSnapshot;

/// Abstraction over the hosted text-generation service that writes
/// financial advice.
///
/// Implementations return errors freely; the advice service is the
/// boundary that turns them into the offline fallback.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Produce insights for the given snapshot.
    async fn generate_insights(&self, snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError>;
}
