//! Client assignment tests
//!
//! Covers the stickiness invariant, the degraded storage mode, device
//! gating at the client level, and the analytics side channel.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use reparto::bucket::SequenceSampler;
use reparto::error::{Error, Result};
use reparto::events::{EventValue, MemorySink};
use reparto::experiment::{AssignmentSource, DeviceClass, Experiment, Subject, Variant};
use reparto::store::AssignmentStore;
use reparto::Client;

fn wave2() -> Experiment {
    Experiment::builder("wave2")
        .variant(Variant::new("a", 0.5))
        .variant(Variant::new("b", 0.5))
        .build()
        .unwrap()
}

/// Store whose every operation fails, modelling disabled cookies.
struct FailingStore;

impl AssignmentStore for FailingStore {
    fn get(&self, _key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send {
        async { Err(Error::Storage("cookies disabled".to_string())) }
    }

    fn set(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Err(Error::Storage("cookies disabled".to_string())) }
    }

    fn delete(&self, _key: &str) -> impl Future<Output = Result<()>> + Send {
        async { Err(Error::Storage("cookies disabled".to_string())) }
    }

    fn exists(&self, _key: &str) -> impl Future<Output = Result<bool>> + Send {
        async { Err(Error::Storage("cookies disabled".to_string())) }
    }
}

#[tokio::test]
async fn test_concrete_draw_scenario() {
    // Weights {a: 0.5, b: 0.5}, draws [0.3, 0.7] -> [a, b]
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3, 0.7]))
        .build();

    let first = client.assign("wave2", &Subject::new("v1")).await.unwrap();
    let second = client.assign("wave2", &Subject::new("v2")).await.unwrap();

    assert_eq!(first.variant(), "a");
    assert_eq!(second.variant(), "b");
    assert_eq!(first.source(), AssignmentSource::Fresh);
}

#[tokio::test]
async fn test_assignment_is_sticky() {
    // After persisting "a", every draw the sampler could make picks "b",
    // so any change of variant would be visible.
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3, 0.99, 0.99, 0.99]))
        .build();
    let subject = Subject::new("v1");

    let first = client.assign("wave2", &subject).await.unwrap();
    assert_eq!(first.variant(), "a");

    for _ in 0..3 {
        let repeat = client.assign("wave2", &subject).await.unwrap();
        assert_eq!(repeat.variant(), "a");
        assert_eq!(repeat.source(), AssignmentSource::Cached);
        assert_eq!(repeat.assigned_at(), first.assigned_at());
    }
}

#[tokio::test]
async fn test_distinct_experiments_are_independent() {
    let other = Experiment::builder("wave3")
        .variant(Variant::new("a", 0.5))
        .variant(Variant::new("b", 0.5))
        .build()
        .unwrap();
    let client = Client::builder()
        .experiment(wave2())
        .experiment(other)
        .sampler(SequenceSampler::new(vec![0.3, 0.7]))
        .build();
    let subject = Subject::new("v1");

    let wave2 = client.assign("wave2", &subject).await.unwrap();
    let wave3 = client.assign("wave3", &subject).await.unwrap();

    assert_eq!(wave2.variant(), "a");
    assert_eq!(wave3.variant(), "b");
}

#[tokio::test]
async fn test_unknown_experiment_is_an_error() {
    let client = Client::builder().build();
    let result = client.assign("missing", &Subject::new("v1")).await;
    assert!(matches!(result, Err(Error::UnknownExperiment(name)) if name == "missing"));
}

#[tokio::test]
async fn test_failing_store_degrades_to_ephemeral() {
    let client = Client::builder()
        .experiment(wave2())
        .store(FailingStore)
        .sampler(SequenceSampler::new(vec![0.3, 0.7]))
        .build();
    let subject = Subject::new("v1");

    // Never an error, but the subject re-randomizes on every call.
    let first = client.assign("wave2", &subject).await.unwrap();
    let second = client.assign("wave2", &subject).await.unwrap();

    assert_eq!(first.source(), AssignmentSource::Ephemeral);
    assert_eq!(second.source(), AssignmentSource::Ephemeral);
    assert_eq!(first.variant(), "a");
    assert_eq!(second.variant(), "b");
}

#[tokio::test]
async fn test_gated_variant_excluded_for_wrong_device() {
    let exp = Experiment::builder("hero")
        .variant(Variant::new("control", 0.1))
        .variant(Variant::new("mobile-hero", 0.9).gated(DeviceClass::Mobile))
        .build()
        .unwrap();
    let client = Client::builder()
        .experiment(exp)
        .sampler(SequenceSampler::new(vec![0.95]))
        .build();

    let desktop = Subject::new("d1");
    let mobile = Subject::new("m1").with_device(DeviceClass::Mobile);

    let a = client.assign("hero", &desktop).await.unwrap();
    let b = client.assign("hero", &mobile).await.unwrap();

    assert_eq!(a.variant(), "control");
    assert_eq!(b.variant(), "mobile-hero");
}

#[tokio::test]
async fn test_clear_assignment_allows_redraw() {
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3, 0.7]))
        .build();
    let subject = Subject::new("v1");

    let first = client.assign("wave2", &subject).await.unwrap();
    assert_eq!(first.variant(), "a");

    client.clear_assignment("wave2", &subject).await.unwrap();

    let second = client.assign("wave2", &subject).await.unwrap();
    assert_eq!(second.variant(), "b");
    assert_eq!(second.source(), AssignmentSource::Fresh);
}

#[tokio::test]
async fn test_expired_record_triggers_reassignment() {
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.7]))
        .build();
    let subject = Subject::new("v1");

    // Plant an already-expired record for "a" directly in the store.
    let stale = serde_json::to_vec(&reparto::experiment::Assignment::new("wave2", "a", "v1"))
        .unwrap();
    client
        .store()
        .set("ab::wave2::v1", stale, Duration::milliseconds(-1))
        .await
        .unwrap();

    let assignment = client.assign("wave2", &subject).await.unwrap();
    assert_eq!(assignment.variant(), "b");
    assert_eq!(assignment.source(), AssignmentSource::Fresh);
}

#[tokio::test]
async fn test_malformed_persisted_record_is_discarded() {
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3]))
        .build();

    client
        .store()
        .set("ab::wave2::v1", b"not json".to_vec(), Duration::days(1))
        .await
        .unwrap();

    let assignment = client.assign("wave2", &Subject::new("v1")).await.unwrap();
    assert_eq!(assignment.variant(), "a");
    assert_eq!(assignment.source(), AssignmentSource::Fresh);
}

#[tokio::test]
async fn test_persisted_variant_no_longer_configured_is_discarded() {
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3]))
        .build();

    // A record from an older config revision that still had variant "c".
    let stale = serde_json::to_vec(&reparto::experiment::Assignment::new("wave2", "c", "v1"))
        .unwrap();
    client
        .store()
        .set("ab::wave2::v1", stale, Duration::days(1))
        .await
        .unwrap();

    let assignment = client.assign("wave2", &Subject::new("v1")).await.unwrap();
    assert_eq!(assignment.variant(), "a");
    assert_eq!(assignment.source(), AssignmentSource::Fresh);
}

#[tokio::test]
async fn test_assignment_events_carry_cached_flag() {
    let sink = Arc::new(MemorySink::new());
    let client = Client::builder()
        .experiment(wave2())
        .sampler(SequenceSampler::new(vec![0.3]))
        .events(Arc::clone(&sink))
        .build();
    let subject = Subject::new("v1");

    client.assign("wave2", &subject).await.unwrap();
    client.assign("wave2", &subject).await.unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, reparto::ASSIGNMENT_EVENT);
    assert_eq!(events[0].params.get("cached"), Some(&EventValue::Bool(false)));
    assert_eq!(events[1].params.get("cached"), Some(&EventValue::Bool(true)));
    assert_eq!(
        events[1].params.get("variant"),
        Some(&EventValue::Str("a".to_string()))
    );
}
