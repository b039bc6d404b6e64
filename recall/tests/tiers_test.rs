//! Integration tests for policy routing and per-turn context assembly.

mod common;

use std::sync::Arc;

use common::{default_embedding, seed_trace, seed_turn, stores, MockEmbeddingService};
use recall::{Context, MemoryPolicy, RecallConfig, RecallEngine};
use recall_core::{ProfileFacet, ProfileFact, ProfileIncrement, StoreSet};

fn engine(stores: &StoreSet, embedding: Arc<MockEmbeddingService>) -> RecallEngine {
    RecallEngine::new(stores.clone(), embedding, RecallConfig::default())
}

async fn seed_profile(stores: &StoreSet, user_id: &str, facet: ProfileFacet, text: &str) {
    let mut increment = ProfileIncrement::new();
    increment.insert(facet, vec![ProfileFact::new(text, "session-0")]);
    stores.profiles.append_facts(user_id, &increment).await.unwrap();
}

fn line_count(context: &Context) -> usize {
    context.recent_messages.len() + context.retrieved.len()
}

#[tokio::test]
async fn test_no_retention_is_empty_regardless_of_history() {
    let stores = stores();
    for turn in 0..5 {
        seed_turn(&stores, "user-1", "session-1", turn, "hello", "hi").await;
    }
    seed_profile(&stores, "user-1", ProfileFacet::Preferences, "vegetarian").await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::NoRetention, 5, Some("session-1"), Some("hello"))
        .await
        .unwrap();

    assert!(context.is_empty());
    assert_eq!(context.render(), "");
    assert_eq!(context.metadata.message_count, 0);
}

#[tokio::test]
async fn test_bounded_recency_caps_at_window() {
    let stores = stores();
    for turn in 0..10 {
        seed_turn(
            &stores,
            "user-1",
            "session-1",
            turn,
            &format!("question {}", turn),
            &format!("answer {}", turn),
        )
        .await;
    }

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::BoundedRecency, 10, Some("session-1"), None)
        .await
        .unwrap();

    // Default window is 7 turns, two lines each, oldest first.
    assert_eq!(context.recent_messages.len(), 14);
    assert_eq!(context.recent_messages[0], "User: question 3");
    assert_eq!(context.recent_messages[13], "Assistant: answer 9");
    assert!(context.profile.is_none());
    assert!(context.retrieved.is_empty());
}

#[tokio::test]
async fn test_bounded_recency_excludes_current_turn() {
    let stores = stores();
    seed_turn(&stores, "user-1", "session-1", 0, "earlier", "noted").await;
    seed_turn(&stores, "user-1", "session-1", 1, "current question", "pending").await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::BoundedRecency, 1, Some("session-1"), None)
        .await
        .unwrap();

    assert_eq!(
        context.recent_messages,
        vec!["User: earlier".to_string(), "Assistant: noted".to_string()]
    );
}

#[tokio::test]
async fn test_profile_recency_includes_profile_and_narrow_window() {
    let stores = stores();
    seed_profile(&stores, "user-1", ProfileFacet::Preferences, "vegetarian").await;
    for turn in 0..5 {
        seed_turn(
            &stores,
            "user-1",
            "session-2",
            turn,
            &format!("question {}", turn),
            &format!("answer {}", turn),
        )
        .await;
    }

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::ProfileRecency, 5, Some("session-2"), None)
        .await
        .unwrap();

    assert_eq!(
        context.profile.as_deref(),
        Some("Preferences: vegetarian [session-0]")
    );
    // Profile recency carries only the narrow verbatim window of 3 turns.
    assert_eq!(context.recent_messages.len(), 6);
    assert_eq!(context.recent_messages[0], "User: question 2");
    assert!(context.retrieved.is_empty());
}

#[tokio::test]
async fn test_profile_recency_degrades_without_profile() {
    let stores = stores();
    seed_turn(&stores, "user-1", "session-1", 0, "hello", "hi").await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::ProfileRecency, 1, Some("session-1"), None)
        .await
        .unwrap();

    assert!(context.profile.is_none());
    assert_eq!(context.recent_messages.len(), 2);
    assert!(!context.is_empty());
}

#[tokio::test]
async fn test_hybrid_retrieval_includes_recalled_traces() {
    let stores = stores();
    seed_profile(&stores, "user-1", ProfileFacet::Goals, "learn violin").await;
    seed_turn(&stores, "user-1", "session-9", 3, "hello again", "welcome back").await;
    // Fresh trace from a past session, aligned with the default query vector.
    seed_trace(
        &stores,
        "user-1",
        "session-2",
        0,
        "I practice violin every morning",
        vec![1.0, 0.0, 0.0],
        0.8,
    )
    .await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context(
            "user-1",
            MemoryPolicy::HybridRetrieval,
            4,
            Some("session-9"),
            Some("how is my violin practice going?"),
        )
        .await
        .unwrap();

    assert!(context.profile.is_some());
    assert!(!context.recent_messages.is_empty());
    assert_eq!(context.retrieved.len(), 1);
    assert!(context.retrieved[0].starts_with("[session-2] (p="));
    assert!(context.retrieved[0].ends_with(") I practice violin every morning"));
}

#[tokio::test]
async fn test_hybrid_retrieval_degrades_with_empty_trace_pool() {
    let stores = stores();
    seed_turn(&stores, "user-1", "session-1", 0, "hello", "hi").await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context(
            "user-1",
            MemoryPolicy::HybridRetrieval,
            1,
            Some("session-1"),
            Some("hello"),
        )
        .await
        .unwrap();

    assert!(context.retrieved.is_empty());
    assert_eq!(context.recent_messages.len(), 2);
}

#[tokio::test]
async fn test_hybrid_retrieval_excludes_current_session_traces() {
    let stores = stores();
    seed_trace(
        &stores,
        "user-1",
        "session-1",
        0,
        "from the current session",
        vec![1.0, 0.0, 0.0],
        0.5,
    )
    .await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context(
            "user-1",
            MemoryPolicy::HybridRetrieval,
            5,
            Some("session-1"),
            Some("anything"),
        )
        .await
        .unwrap();

    assert!(context.retrieved.is_empty());
}

#[tokio::test]
async fn test_hybrid_retrieval_degrades_when_embedding_fails() {
    let stores = stores();
    seed_turn(&stores, "user-1", "session-9", 0, "hello", "hi").await;
    seed_trace(
        &stores,
        "user-1",
        "session-2",
        0,
        "old memory",
        vec![1.0, 0.0, 0.0],
        0.5,
    )
    .await;

    let engine = engine(&stores, Arc::new(MockEmbeddingService::failing()));
    let context = engine
        .get_context(
            "user-1",
            MemoryPolicy::HybridRetrieval,
            5,
            Some("session-9"),
            Some("hello"),
        )
        .await
        .unwrap();

    // Retrieval degrades to nothing; the rest of the context still builds.
    assert!(context.retrieved.is_empty());
    assert!(!context.recent_messages.is_empty());
}

#[tokio::test]
async fn test_context_renders_labeled_sections_in_order() {
    let stores = stores();
    seed_profile(&stores, "user-1", ProfileFacet::Preferences, "vegetarian").await;
    seed_turn(&stores, "user-1", "session-9", 0, "hello", "hi").await;

    let engine = engine(&stores, default_embedding());
    let context = engine
        .get_context("user-1", MemoryPolicy::ProfileRecency, 1, Some("session-9"), None)
        .await
        .unwrap();

    let rendered = context.render();
    let profile_at = rendered.find("[User profile]").unwrap();
    let recent_at = rendered.find("[Recent conversation]").unwrap();
    assert!(profile_at < recent_at);
    assert!(!rendered.contains("[Relevant history]"));
    assert_eq!(context.metadata.message_count, line_count(&context));
    assert!(context.metadata.total_tokens > 0);
}

#[tokio::test]
async fn test_memory_stats_counts_messages_and_turns() {
    let stores = stores();
    seed_turn(&stores, "user-1", "session-1", 0, "hello", "hi").await;
    seed_turn(&stores, "user-1", "session-1", 1, "more", "sure").await;
    seed_turn(&stores, "user-2", "session-1", 0, "other user", "hi").await;

    let engine = engine(&stores, default_embedding());
    let stats = engine.memory_stats("user-1").await.unwrap();

    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.total_turns, 2);
    assert_eq!(stats.user_messages, 2);
    assert_eq!(stats.assistant_messages, 2);
}
