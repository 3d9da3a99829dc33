//! Integration tests for the lending reputation engine
//!
//! These tests drive the engine end to end through an injected store,
//! covering the lending lifecycle, concurrent updates, badges, and
//! event replay.

use lending_reputation::{
    classify, replay, Badge, InMemoryStore, ReputationEngine, ReputationError, ReputationEvent,
    ReputationRecord, ReputationStore,
};
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_engine() -> ReputationEngine<InMemoryStore> {
    ReputationEngine::new(Arc::new(InMemoryStore::new()))
}

/// Register a user and apply a batch of return outcomes
async fn create_user_with_returns(
    engine: &ReputationEngine<InMemoryStore>,
    user_id: &str,
    on_time: u32,
    late: u32,
) -> ReputationRecord {
    engine.register(user_id).await.unwrap();
    for _ in 0..on_time {
        engine.record_return(user_id, true).await.unwrap();
    }
    for _ in 0..late {
        engine.record_return(user_id, false).await.unwrap();
    }
    engine.get_record(user_id).await.unwrap()
}

// ============================================================================
// Lending Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_user_starts_as_new_user() {
        let engine = create_test_engine();
        let record = engine.register("alice").await.unwrap();

        assert_eq!(record.trust_score(), 50);
        assert_eq!(record.badge(), Badge::NewUser);
        assert_eq!(record.counters().total_returns(), 0);
    }

    #[tokio::test]
    async fn test_reliable_borrower() {
        let engine = create_test_engine();
        let record = create_user_with_returns(&engine, "alice", 10, 0).await;

        assert_eq!(record.trust_score(), 82);
        assert_eq!(record.badge(), Badge::Reliable);
    }

    #[tokio::test]
    async fn test_elite_borrower() {
        let engine = create_test_engine();
        create_user_with_returns(&engine, "alice", 25, 0).await;
        for _ in 0..5 {
            engine.add_rating("alice", 5).await.unwrap();
        }

        // 50 + 30 + 15 + 5
        let summary = engine.summary("alice").await.unwrap();
        assert_eq!(summary.trust_score, 100);
        assert_eq!(summary.badge, Badge::Elite);
    }

    #[tokio::test]
    async fn test_disputes_drop_to_caution() {
        let engine = create_test_engine();
        engine.register("bob").await.unwrap();
        for _ in 0..3 {
            engine.record_dispute("bob").await.unwrap();
        }

        let record = engine.get_record("bob").await.unwrap();
        assert_eq!(record.trust_score(), 35);
        assert_eq!(record.badge(), Badge::Caution);
    }

    #[tokio::test]
    async fn test_late_returns_lower_score() {
        let engine = create_test_engine();
        let punctual = create_user_with_returns(&engine, "punctual", 5, 0).await;
        let tardy = create_user_with_returns(&engine, "tardy", 1, 4).await;

        // 50 + 30 + 1 vs 50 + 6 + 1
        assert_eq!(punctual.trust_score(), 81);
        assert_eq!(tardy.trust_score(), 57);
    }

    #[tokio::test]
    async fn test_apply_matches_direct_calls() {
        let engine = create_test_engine();
        engine.register("a").await.unwrap();
        engine.register("b").await.unwrap();

        engine.record_return("a", true).await.unwrap();
        engine.add_rating("a", 3).await.unwrap();
        engine.record_dispute("a").await.unwrap();

        engine
            .apply("b", ReputationEvent::ReturnRecorded { on_time: true })
            .await
            .unwrap();
        engine
            .apply("b", ReputationEvent::RatingSubmitted { rating: 3 })
            .await
            .unwrap();
        engine.apply("b", ReputationEvent::DisputeFiled).await.unwrap();

        let a = engine.get_record("a").await.unwrap();
        let b = engine.get_record("b").await.unwrap();
        assert_eq!(a.counters(), b.counters());
        assert_eq!(a.trust_score(), b.trust_score());
    }

    #[tokio::test]
    async fn test_deleted_user_cannot_receive_events() {
        let engine = create_test_engine();
        create_user_with_returns(&engine, "carol", 3, 0).await;

        engine.remove("carol").await.unwrap();
        let err = engine.record_return("carol", true).await.unwrap_err();
        assert_eq!(err, ReputationError::not_found("carol"));
        assert!(engine.store().get("carol").is_none());
    }
}

// ============================================================================
// Concurrency Tests
// ============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_events_are_not_lost() {
        let engine = Arc::new(create_test_engine());
        engine.register("busy").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..50u32 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                match i % 3 {
                    0 => engine.record_return("busy", true).await,
                    1 => engine.add_rating("busy", 4).await,
                    _ => engine.record_return("busy", false).await,
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = engine.get_record("busy").await.unwrap();
        let counters = record.counters();
        assert_eq!(counters.on_time_returns, 17);
        assert_eq!(counters.total_ratings, 17);
        assert_eq!(counters.rating_sum, 68);
        assert_eq!(counters.late_returns, 16);
        assert_eq!(
            record.trust_score(),
            lending_reputation::recompute_score(counters)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_users_are_independent() {
        let engine = Arc::new(create_test_engine());
        let users: Vec<String> = (0..8).map(|i| format!("user_{}", i)).collect();
        for user in &users {
            engine.register(user).await.unwrap();
        }

        let mut handles = Vec::new();
        for user in users.clone() {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    engine.record_return(&user, true).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for user in &users {
            assert_eq!(engine.get_record(user).await.unwrap().trust_score(), 82);
        }
    }
}

// ============================================================================
// Badge Tests
// ============================================================================

mod badge_tests {
    use super::*;

    #[test]
    fn test_classify_is_pure() {
        for score in 0..=100u8 {
            assert_eq!(classify(score), classify(score));
        }
    }

    #[test]
    fn test_badges_are_ordered_by_score() {
        let mut previous = classify(0);
        for score in 1..=100u8 {
            let badge = classify(score);
            assert!(badge >= previous, "badge regressed at score {}", score);
            previous = badge;
        }
    }
}

// ============================================================================
// Replay Tests
// ============================================================================

mod replay_tests {
    use super::*;

    #[tokio::test]
    async fn test_replay_builds_leaderboard() {
        let engine = create_test_engine();
        let events = [
            r#"{"type":"register","user_id":"lender"}"#,
            r#"{"type":"register","user_id":"borrower"}"#,
            r#"{"type":"return","user_id":"borrower","on_time":true}"#,
            r#"{"type":"rating","user_id":"borrower","rating":5}"#,
            r#"{"type":"rating","user_id":"lender","rating":2}"#,
            r#"{"type":"dispute","user_id":"lender"}"#,
        ]
        .join("\n");

        let stats = replay::replay(&engine, events.as_bytes(), true).await.unwrap();
        assert_eq!(stats.applied, 6);
        assert_eq!(stats.rejected, 0);

        let board = engine.leaderboard(10).await;
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "borrower");
        assert_eq!(board[0].trust_score, 95);
        assert_eq!(board[0].badge, Badge::Elite);
        // 50 + 6 - 5
        assert_eq!(board[1].user_id, "lender");
        assert_eq!(board[1].trust_score, 51);
    }

    #[tokio::test]
    async fn test_summary_json_shape() {
        let engine = create_test_engine();
        engine.register("alice").await.unwrap();
        engine.add_rating("alice", 4).await.unwrap();

        let summary = engine.summary("alice").await.unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["user_id"], "alice");
        assert_eq!(json["trust_score"], 62);
        assert_eq!(json["badge"], "New User");
        assert_eq!(json["total_ratings"], 1);
        assert_eq!(json["average_rating"], 4.0);
        assert!(json["on_time_ratio"].is_null());
    }
}
