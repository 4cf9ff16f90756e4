// ═══════════════════════════════════════════════════════════════════
// Advice Tests — AdviceService, InsightBoard, prompt building,
// provider selection, refresh tokens
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wealthflow_core::errors::CoreError;
use wealthflow_core::models::insight::{parse_insights, Insight, InsightKind, Severity};
use wealthflow_core::models::ledger::Ledger;
use wealthflow_core::models::settings::AdvisorSettings;
use wealthflow_core::models::snapshot::AdviceSnapshot;
use wealthflow_core::providers::prompt::build_prompt;
use wealthflow_core::providers::provider_from_settings;
use wealthflow_core::providers::traits::AdviceProvider;
use wealthflow_core::providers::unconfigured::UnconfiguredProvider;
use wealthflow_core::services::advice_service::{
    Advice, AdviceService, CommitStatus, InsightBoard, RefreshRequest, RefreshResponse,
};

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

const MOCK_RESPONSE: &str = r#"[
  {"type":"alert","title":"Utilities due","content":"$195 in bills this week","severity":"high"},
  {"type":"advice","title":"Loan plan","content":"Put $400/month towards the loan","severity":"medium"},
  {"type":"investment","title":"SGB","content":"Allocate 5% to the next tranche","severity":"low"}
]"#;

/// Replies with a fixed JSON body and remembers the snapshot it was given.
struct MockAdviceProvider {
    response: String,
    seen: Arc<Mutex<Vec<String>>>,
}

impl MockAdviceProvider {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl AdviceProvider for MockAdviceProvider {
    fn name(&self) -> &str {
        "MockAdvisor"
    }

    async fn generate_insights(&self, snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        // Serialize exactly what a real provider would send.
        let wire = serde_json::to_string(snapshot).map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.seen.lock().unwrap().push(wire);
        parse_insights(&self.response)
    }
}

/// A provider that always fails (for testing the offline fallback).
struct FailingMockProvider;

#[async_trait]
impl AdviceProvider for FailingMockProvider {
    fn name(&self) -> &str {
        "FailingMock"
    }

    async fn generate_insights(&self, _snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        Err(CoreError::Network("connection refused".into()))
    }
}

fn snapshot() -> AdviceSnapshot {
    AdviceSnapshot::capture(&Ledger::demo(), 15)
}

fn response(board: &mut InsightBoard, insights: Vec<Insight>) -> RefreshResponse {
    RefreshResponse {
        token: board.issue(),
        insights,
        degraded: false,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AdviceService
// ═══════════════════════════════════════════════════════════════════

mod service {
    use super::*;

    #[tokio::test]
    async fn round_trip_matches_mock_exactly() {
        let provider = MockAdviceProvider::new(MOCK_RESPONSE);
        let seen = Arc::clone(&provider.seen);
        let service = AdviceService::new(Box::new(provider));

        let snap = snapshot();
        let Advice { insights, degraded } = service.advise(&snap).await;
        assert!(!degraded);

        let expected: Vec<Insight> = serde_json::from_str(MOCK_RESPONSE).unwrap();
        assert_eq!(insights.len(), 3);
        assert_eq!(insights, expected);
        assert_eq!(insights[0].kind, InsightKind::Alert);
        assert_eq!(insights[1].title, "Loan plan");
        assert_eq!(insights[2].severity, Severity::Low);

        // The snapshot went over the wire and parses back unchanged.
        let wire = seen.lock().unwrap()[0].clone();
        let back: AdviceSnapshot = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, snap);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_offline_insight() {
        let service = AdviceService::new(Box::new(FailingMockProvider));
        let Advice { insights, degraded } = service.advise(&snapshot()).await;
        assert!(degraded);
        assert_eq!(insights, vec![Insight::advisor_offline()]);
    }

    #[tokio::test]
    async fn malformed_reply_degrades_to_offline_insight() {
        let service = AdviceService::new(Box::new(MockAdviceProvider::new("not json")));
        let Advice { insights, degraded } = service.advise(&snapshot()).await;
        assert!(degraded);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Medium);
    }

    #[tokio::test]
    async fn empty_reply_is_empty_not_degraded() {
        let service = AdviceService::new(Box::new(MockAdviceProvider::new("")));
        let Advice { insights, degraded } = service.advise(&snapshot()).await;
        assert!(!degraded);
        assert!(insights.is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_degrades_to_offline_insight() {
        let service = AdviceService::new(Box::new(UnconfiguredProvider::new("Gemini")));
        let Advice { insights, degraded } = service.advise(&snapshot()).await;
        assert!(degraded);
        assert_eq!(insights, vec![Insight::advisor_offline()]);
    }

    #[tokio::test]
    async fn fetch_carries_advice_fields_into_response() {
        let service = AdviceService::new(Box::new(FailingMockProvider));
        let advice = service.advise(&snapshot()).await;

        let mut board = InsightBoard::new();
        let token = board.issue();
        let resp = service
            .fetch(RefreshRequest {
                token,
                snapshot: snapshot(),
            })
            .await;
        assert_eq!(resp.insights, advice.insights);
        assert_eq!(resp.degraded, advice.degraded);
    }

    #[tokio::test]
    async fn fetch_keeps_request_token() {
        let mut board = InsightBoard::new();
        let token = board.issue();
        let service = AdviceService::new(Box::new(MockAdviceProvider::new(MOCK_RESPONSE)));
        let resp = service
            .fetch(RefreshRequest {
                token,
                snapshot: snapshot(),
            })
            .await;
        assert_eq!(resp.token, token);
        assert_eq!(resp.insights.len(), 3);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  InsightBoard
// ═══════════════════════════════════════════════════════════════════

mod board {
    use super::*;

    fn insight(title: &str) -> Insight {
        Insight::new(InsightKind::Advice, title, "body", Severity::Low)
    }

    #[test]
    fn tokens_increase() {
        let mut board = InsightBoard::new();
        let a = board.issue();
        let b = board.issue();
        assert!(b > a);
        assert!(board.is_latest(b));
        assert!(!board.is_latest(a));
    }

    #[test]
    fn latest_commit_replaces_everything() {
        let mut board = InsightBoard::new();
        let first = response(&mut board, vec![insight("a"), insight("b")]);
        assert_eq!(board.commit(first), CommitStatus::Committed);
        assert_eq!(board.insights().len(), 2);

        let second = response(&mut board, vec![insight("c")]);
        let token = second.token;
        assert_eq!(board.commit(second), CommitStatus::Committed);
        assert_eq!(board.insights(), &[insight("c")]);
        assert_eq!(board.committed(), Some(token));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut board = InsightBoard::new();
        let older = response(&mut board, vec![insight("old")]);
        let newer = response(&mut board, vec![insight("new")]);

        assert_eq!(board.commit(newer), CommitStatus::Committed);
        assert_eq!(board.commit(older), CommitStatus::Stale);
        assert_eq!(board.insights(), &[insight("new")]);
    }

    #[test]
    fn response_superseded_before_arrival_is_discarded() {
        let mut board = InsightBoard::new();
        let older = response(&mut board, vec![insight("old")]);
        let _pending = board.issue();

        assert_eq!(board.commit(older), CommitStatus::Stale);
        assert!(!board.has_insights());
        assert_eq!(board.committed(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Prompt & provider selection
// ═══════════════════════════════════════════════════════════════════

mod prompt {
    use super::*;

    #[test]
    fn prompt_mentions_household_and_data() {
        let prompt = build_prompt(&snapshot()).unwrap();
        assert!(prompt.contains("Alex Johnson"));
        assert!(prompt.contains("Family size: 3"));
        assert!(prompt.contains("$15000"));
        assert!(prompt.contains("SGB & Tech Stocks"));
        assert!(prompt.contains("($195)"));
        assert!(prompt.contains("Fast Fiber Internet"));
        assert!(prompt.contains("\"isEmergencyFund\":true"));
    }

    #[test]
    fn prompt_excludes_paid_bills() {
        let mut ledger = Ledger::demo();
        ledger.bills[0].is_paid = true;
        let prompt = build_prompt(&AdviceSnapshot::capture(&ledger, 15)).unwrap();
        assert!(!prompt.contains("Fast Fiber Internet"));
        assert!(prompt.contains("Smart Grid Electric"));
    }

    #[test]
    fn no_api_key_selects_unconfigured_provider() {
        let provider = provider_from_settings(&AdvisorSettings::default());
        assert_eq!(provider.name(), "Unconfigured");
    }

    #[test]
    fn blank_api_key_selects_unconfigured_provider() {
        let settings = AdvisorSettings {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(provider_from_settings(&settings).name(), "Unconfigured");
    }

    #[test]
    fn api_key_selects_gemini() {
        let settings = AdvisorSettings {
            api_key: Some("secret".into()),
            ..Default::default()
        };
        assert_eq!(provider_from_settings(&settings).name(), "Gemini");
    }
}
