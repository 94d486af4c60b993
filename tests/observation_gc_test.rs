//! Observation garbage collection: content goes, provenance stays.

mod common;

use std::collections::HashSet;

use common::{belief, memory_store, temp_db_path, test_config};
use comprehension::adapters::sqlite::{create_migrated_test_pool, SqliteObservationIndex};
use comprehension::domain::models::{ConfidenceLevel, EvidenceType, Observation, ObservationLifecycle, ObservationState};
use comprehension::{BeliefStore, DomainError, ObservationIndex};

#[tokio::test]
async fn test_prune_deletes_content_but_keeps_references() {
    let store = memory_store().await;
    store
        .save(&belief("comp-api-001", "api", "Pagination uses cursors", ConfidenceLevel::Low))
        .await
        .unwrap();

    let mut observation_ids = Vec::new();
    for i in 0..3 {
        let obs = Observation::new("agent/api", format!("cursor seen on page {i}"));
        store.record_observation(&obs).await.unwrap();
        store
            .incorporate("comp-api-001", &obs, EvidenceType::Confirming, None, None)
            .await
            .unwrap();
        observation_ids.push(obs.id);
    }

    let report = store.prune_observations().await.unwrap();
    assert_eq!(report.pruned, 3);
    assert_eq!(report.already_absent, 0);

    for id in &observation_ids {
        assert!(!store.is_content_available(id).await.unwrap());
        assert!(store.get_observation(id).await.unwrap().is_none());
    }
    assert_eq!(store.references_for_belief("comp-api-001").await.unwrap(), observation_ids);

    let stored = store.get("comp-api-001").await.unwrap().unwrap();
    assert_eq!(stored.observations, observation_ids);
    assert_eq!(stored.confidence(), ConfidenceLevel::High);
}

#[tokio::test]
async fn test_pending_observations_survive_prune() {
    let store = memory_store().await;
    store
        .save(&belief("comp-api-001", "api", "Pagination uses cursors", ConfidenceLevel::Low))
        .await
        .unwrap();

    let used = Observation::new("agent/api", "used");
    let waiting = Observation::new("agent/api", "not yet used");
    store.record_observation(&used).await.unwrap();
    store.record_observation(&waiting).await.unwrap();
    store
        .incorporate("comp-api-001", &used, EvidenceType::Confirming, None, None)
        .await
        .unwrap();

    assert_eq!(store.prunable_observations().await.unwrap(), HashSet::from([used.id.clone()]));
    store.prune_observations().await.unwrap();

    assert!(store.get_observation(&waiting.id).await.unwrap().is_some());
    assert_eq!(store.observation_state(&waiting.id).await.unwrap(), ObservationState::Pending);

    // Collected ids are no longer tracked.
    assert!(matches!(
        store.observation_state(&used.id).await,
        Err(DomainError::UnknownObservation(_))
    ));
    let stats = store.lifecycle_stats().await;
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.incorporated, 0);
}

#[tokio::test]
async fn test_get_prunable_is_incorporated_minus_pruned() {
    let pool = create_migrated_test_pool().await.unwrap();
    let index = SqliteObservationIndex::new(pool);

    let mut lifecycle = ObservationLifecycle::new();
    lifecycle.register("obs-p");
    lifecycle.mark_incorporated("obs-1");
    lifecycle.mark_incorporated("obs-2");
    lifecycle.mark_incorporated("obs-3");
    index.mark_content_pruned("obs-2").await.unwrap();

    let prunable = index.get_prunable(&lifecycle).await.unwrap();
    assert_eq!(prunable, HashSet::from(["obs-1".to_string(), "obs-3".to_string()]));
}

#[tokio::test]
async fn test_deleting_belief_removes_only_its_references() {
    let store = memory_store().await;
    store.save(&belief("comp-a", "api", "A", ConfidenceLevel::Low)).await.unwrap();
    store.save(&belief("comp-b", "database", "B", ConfidenceLevel::Low)).await.unwrap();

    let shared = Observation::new("agent/shared", "seen by both");
    store.incorporate("comp-a", &shared, EvidenceType::Confirming, None, None).await.unwrap();
    store.incorporate("comp-b", &shared, EvidenceType::Confirming, None, None).await.unwrap();
    assert_eq!(store.referencing_beliefs(&shared.id).await.unwrap(), vec!["comp-a", "comp-b"]);

    assert!(store.delete("comp-a").await.unwrap());
    assert_eq!(store.referencing_beliefs(&shared.id).await.unwrap(), vec!["comp-b"]);
}

#[tokio::test]
async fn test_pruned_markers_survive_restart() {
    let (_dir, db_path) = temp_db_path();
    let config = test_config(&db_path);
    let obs = Observation::new("agent/api", "rate limit header present");

    {
        let store = BeliefStore::open(&config).await.unwrap();
        store
            .save(&belief("comp-api-001", "api", "Responses carry rate limit headers", ConfidenceLevel::Low))
            .await
            .unwrap();
        store.record_observation(&obs).await.unwrap();
        store
            .incorporate("comp-api-001", &obs, EvidenceType::Confirming, None, None)
            .await
            .unwrap();
        assert_eq!(store.prune_observations().await.unwrap().pruned, 1);
    }

    let reopened = BeliefStore::open(&config).await.unwrap();
    assert!(!reopened.is_content_available(&obs.id).await.unwrap());
    assert_eq!(reopened.references_for_belief("comp-api-001").await.unwrap(), vec![obs.id.clone()]);

    let stored = reopened.get("comp-api-001").await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.confidence(), ConfidenceLevel::Medium);

    let stats = reopened.stats().await.unwrap();
    assert_eq!(stats.belief_count, 1);
    assert_eq!(stats.pruned_observations, 1);
    assert_eq!(stats.indexed_vectors, 1);

    // The in-process lifecycle starts empty after a restart.
    assert_eq!(reopened.lifecycle_stats().await.total, 0);
}

#[tokio::test]
async fn test_pruned_observation_cannot_be_stored_again() {
    let store = memory_store().await;
    store
        .save(&belief("comp-api-001", "api", "Pagination uses cursors", ConfidenceLevel::Low))
        .await
        .unwrap();

    let obs = Observation::new("agent/api", "next_cursor present");
    store.record_observation(&obs).await.unwrap();
    store
        .incorporate("comp-api-001", &obs, EvidenceType::Confirming, None, None)
        .await
        .unwrap();
    assert_eq!(store.prune_observations().await.unwrap().pruned, 1);

    let err = store.record_observation(&obs).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));
    assert!(store.get_observation(&obs.id).await.unwrap().is_none());

    // Re-applying it is a no-op on the belief and does not re-track it.
    let again = store
        .incorporate("comp-api-001", &obs, EvidenceType::Confirming, None, None)
        .await
        .unwrap();
    assert_eq!(again.version, 2);
    assert!(matches!(
        store.observation_state(&obs.id).await,
        Err(DomainError::UnknownObservation(_))
    ));
    assert_eq!(store.lifecycle_stats().await.total, 0);
    assert_eq!(store.prune_observations().await.unwrap().total(), 0);
    assert!(!store.is_content_available(&obs.id).await.unwrap());
}
