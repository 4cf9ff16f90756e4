use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::insight::Insight;
use crate::models::snapshot::AdviceSnapshot;
use crate::providers::traits::AdviceProvider;

/// Identifies one advice refresh. Tokens increase monotonically; only the
/// newest issued token may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshToken(u64);

impl RefreshToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A refresh ready to be sent: its token and the ledger as it looked
/// when the refresh was issued.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub token: RefreshToken,
    pub snapshot: AdviceSnapshot,
}

/// Insights produced for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub insights: Vec<Insight>,
    /// The provider failed and `insights` holds the offline fallback.
    pub degraded: bool,
}

/// What came back for a request. `degraded` is set when the provider
/// failed and `insights` holds the offline fallback.
#[derive(Debug, Clone)]
pub struct RefreshResponse {
    pub token: RefreshToken,
    pub insights: Vec<Insight>,
    pub degraded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// The insights replaced the previous collection.
    Committed,
    /// A newer refresh was issued after this one; the result was dropped.
    Stale,
}

/// The session's current insights plus the refresh bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct InsightBoard {
    insights: Vec<Insight>,
    latest_issued: u64,
    committed: Option<RefreshToken>,
}

impl InsightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    pub fn has_insights(&self) -> bool {
        !self.insights.is_empty()
    }

    /// The token of the last committed refresh, if any.
    pub fn committed(&self) -> Option<RefreshToken> {
        self.committed
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&mut self) -> RefreshToken {
        self.latest_issued += 1;
        RefreshToken(self.latest_issued)
    }

    pub fn is_latest(&self, token: RefreshToken) -> bool {
        token.0 == self.latest_issued
    }

    /// Replace all insights with `response`, unless a newer refresh has
    /// been issued since.
    pub fn commit(&mut self, response: RefreshResponse) -> CommitStatus {
        if !self.is_latest(response.token) {
            warn!(
                token = response.token.value(),
                latest = self.latest_issued,
                "Discarding stale advice refresh"
            );
            return CommitStatus::Stale;
        }
        info!(
            token = response.token.value(),
            count = response.insights.len(),
            degraded = response.degraded,
            "Insights refreshed"
        );
        self.insights = response.insights;
        self.committed = Some(response.token);
        CommitStatus::Committed
    }
}

/// Talks to the advice provider and turns every failure into the
/// offline fallback insight.
pub struct AdviceService {
    provider: Box<dyn AdviceProvider>,
}

impl AdviceService {
    pub fn new(provider: Box<dyn AdviceProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the provider for insights. Never fails.
    pub async fn advise(&self, snapshot: &AdviceSnapshot) -> Advice {
        match self.request(snapshot).await {
            Ok(insights) => Advice {
                insights,
                degraded: false,
            },
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Advice request failed; advisor offline");
                Advice {
                    insights: vec![Insight::advisor_offline()],
                    degraded: true,
                }
            }
        }
    }

    /// Run one refresh request. The response still has to be committed
    /// to an [`InsightBoard`], which drops it if it has gone stale.
    pub async fn fetch(&self, request: RefreshRequest) -> RefreshResponse {
        debug!(token = request.token.value(), provider = self.provider.name(), "Requesting advice");
        let Advice { insights, degraded } = self.advise(&request.snapshot).await;
        RefreshResponse {
            token: request.token,
            insights,
            degraded,
        }
    }

    async fn request(&self, snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        self.provider.generate_insights(snapshot).await
    }
}
