//! # Reparto: Deterministic A/B Experiment Bucketing
//!
//! Reparto assigns subjects to weighted experiment variants, keeps those
//! assignments sticky through a pluggable TTL store, and turns them into
//! idempotent redirect decisions. Storage, randomness, and analytics are
//! injected seams, so every behavior is testable without a browser.
//!
//! ## Guarantees
//!
//! - **Stability**: once persisted, an assignment never changes for the
//!   lifetime of the record (the invariant valid A/B measurement needs).
//! - **Degraded mode**: a failing store never fails a call — the subject
//!   simply re-randomizes on every visit, flagged as `Ephemeral`.
//! - **No redirect loops**: routing on the variant resource is a no-op,
//!   and control assignments never redirect.
//!
//! ## Example
//!
//! ```rust
//! use reparto::experiment::{Experiment, Subject, Variant};
//! use reparto::Client;
//!
//! # async fn example() -> reparto::Result<()> {
//! let client = Client::builder()
//!     .experiment(
//!         Experiment::builder("wave2")
//!             .variant(Variant::new("control", 0.5))
//!             .variant(Variant::new("b", 0.5))
//!             .build()?,
//!     )
//!     .build();
//!
//! let subject = Subject::new("visitor-42");
//! let assignment = client.assign("wave2", &subject).await?;
//! let decision = client.route("wave2", &subject, "/index.html").await?;
//! # let _ = (assignment, decision);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod bucket;
pub mod error;
pub mod events;
pub mod experiment;
pub mod route;
pub mod store;

pub use error::{Error, Result};

use tracing::{debug, warn};

use bucket::{pick_variant, Sampler, ThreadRngSampler};
use events::{EventParams, EventSink, NullSink};
use experiment::{Assignment, AssignmentSource, Experiment, ExperimentRegistry, Subject};
use route::RouteDecision;
use store::{AssignmentStore, MemoryStore};

/// Event name emitted once per assignment call.
pub const ASSIGNMENT_EVENT: &str = "ab_assignment";

/// Bucketing client: registry + store + sampler + event sink.
///
/// Construct through [`Client::builder`]. All defaults are in-process
/// (in-memory store, thread RNG, null sink), which makes the zero-config
/// client behave like a browser with cookies enabled.
pub struct Client<S = MemoryStore, P = ThreadRngSampler, E = NullSink> {
    registry: ExperimentRegistry,
    store: S,
    sampler: P,
    events: E,
}

impl Client {
    /// Create a new client builder with default backends.
    #[must_use]
    pub fn builder() -> ClientBuilder<MemoryStore, ThreadRngSampler, NullSink> {
        ClientBuilder {
            registry: ExperimentRegistry::new(),
            store: MemoryStore::new(),
            sampler: ThreadRngSampler,
            events: NullSink,
        }
    }
}

impl<S, P, E> Client<S, P, E>
where
    S: AssignmentStore,
    P: Sampler,
    E: EventSink,
{
    /// Assign the subject to a variant of the named experiment.
    ///
    /// Replays a persisted assignment when one exists; otherwise draws,
    /// persists, and emits one analytics event. Storage failures degrade
    /// to a non-persistent [`AssignmentSource::Ephemeral`] assignment.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExperiment` if the experiment is not registered.
    /// Storage failures are never surfaced here.
    pub async fn assign(&self, experiment: &str, subject: &Subject) -> Result<Assignment> {
        let exp = self
            .registry
            .get(experiment)
            .ok_or_else(|| Error::UnknownExperiment(experiment.to_string()))?;
        let key = exp.storage_key(subject.id());

        let mut degraded = false;
        match self.store.get(&key).await {
            Ok(Some(bytes)) => {
                if let Some(cached) = Self::parse_persisted(exp, &bytes) {
                    debug!(
                        experiment = exp.name(),
                        variant = cached.variant(),
                        subject = subject.id(),
                        "replaying persisted assignment"
                    );
                    self.emit_assignment(&cached, true);
                    return Ok(cached);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    experiment = exp.name(),
                    subject = subject.id(),
                    error = %e,
                    "assignment store unavailable, degrading to ephemeral assignment"
                );
                degraded = true;
            }
        }

        let r = self.sampler.draw();
        let variant = pick_variant(exp, subject.device(), r);
        let mut assignment = Assignment::new(exp.name(), variant.name(), subject.id());
        debug!(
            experiment = exp.name(),
            variant = variant.name(),
            subject = subject.id(),
            draw = r,
            "drew fresh assignment"
        );

        if degraded {
            assignment = assignment.with_source(AssignmentSource::Ephemeral);
        } else {
            match serde_json::to_vec(&assignment) {
                Ok(bytes) => {
                    if let Err(e) = self.store.set(&key, bytes, exp.ttl()).await {
                        warn!(
                            experiment = exp.name(),
                            subject = subject.id(),
                            error = %e,
                            "failed to persist assignment, subject will re-randomize"
                        );
                        assignment = assignment.with_source(AssignmentSource::Ephemeral);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to serialize assignment");
                    assignment = assignment.with_source(AssignmentSource::Ephemeral);
                }
            }
        }

        self.emit_assignment(&assignment, false);
        Ok(assignment)
    }

    /// Assign and decide whether `current_path` should redirect to the
    /// variant resource.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExperiment` if the experiment is not registered.
    pub async fn route(
        &self,
        experiment: &str,
        subject: &Subject,
        current_path: &str,
    ) -> Result<RouteDecision> {
        let assignment = self.assign(experiment, subject).await?;
        let exp = self
            .registry
            .get(experiment)
            .ok_or_else(|| Error::UnknownExperiment(experiment.to_string()))?;
        Ok(route::decide(exp, &assignment, current_path))
    }

    /// Explicitly clear a subject's persisted assignment — the only
    /// sanctioned mutation of a live record.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExperiment` for unregistered experiments and
    /// propagates store failures (the caller asked for the side effect,
    /// so it learns when it did not happen).
    pub async fn clear_assignment(&self, experiment: &str, subject: &Subject) -> Result<()> {
        let exp = self
            .registry
            .get(experiment)
            .ok_or_else(|| Error::UnknownExperiment(experiment.to_string()))?;
        self.store.delete(&exp.storage_key(subject.id())).await
    }

    /// Access the experiment registry.
    #[must_use]
    pub const fn registry(&self) -> &ExperimentRegistry {
        &self.registry
    }

    /// Access the assignment store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// A persisted record is honored only if it parses and its variant is
    /// still configured; anything else is treated as absent.
    fn parse_persisted(exp: &Experiment, bytes: &[u8]) -> Option<Assignment> {
        match serde_json::from_slice::<Assignment>(bytes) {
            Ok(assignment) if exp.variant(assignment.variant()).is_some() => {
                Some(assignment.with_source(AssignmentSource::Cached))
            }
            Ok(assignment) => {
                warn!(
                    experiment = exp.name(),
                    variant = assignment.variant(),
                    "persisted variant no longer configured, reassigning"
                );
                None
            }
            Err(e) => {
                warn!(experiment = exp.name(), error = %e, "malformed persisted assignment, reassigning");
                None
            }
        }
    }

    fn emit_assignment(&self, assignment: &Assignment, cached: bool) {
        let mut params = EventParams::new();
        params.insert("experiment".to_string(), assignment.experiment().into());
        params.insert("variant".to_string(), assignment.variant().into());
        params.insert("subject_id".to_string(), assignment.subject_id().into());
        params.insert("cached".to_string(), cached.into());
        self.events.emit(ASSIGNMENT_EVENT, params);
    }
}

/// Builder for [`Client`]. Swapping a backend changes the corresponding
/// type parameter, so misuse is a compile error rather than a runtime one.
pub struct ClientBuilder<S, P, E> {
    registry: ExperimentRegistry,
    store: S,
    sampler: P,
    events: E,
}

impl<S, P, E> ClientBuilder<S, P, E> {
    /// Register one experiment.
    #[must_use]
    pub fn experiment(mut self, experiment: Experiment) -> Self {
        self.registry.add_experiment(experiment);
        self
    }

    /// Replace the whole registry (e.g., one loaded from JSON config).
    #[must_use]
    pub fn registry(mut self, registry: ExperimentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a custom assignment store.
    #[must_use]
    pub fn store<S2>(self, store: S2) -> ClientBuilder<S2, P, E> {
        ClientBuilder {
            registry: self.registry,
            store,
            sampler: self.sampler,
            events: self.events,
        }
    }

    /// Use a custom sampler.
    #[must_use]
    pub fn sampler<P2>(self, sampler: P2) -> ClientBuilder<S, P2, E> {
        ClientBuilder {
            registry: self.registry,
            store: self.store,
            sampler,
            events: self.events,
        }
    }

    /// Use a custom event sink.
    #[must_use]
    pub fn events<E2>(self, events: E2) -> ClientBuilder<S, P, E2> {
        ClientBuilder {
            registry: self.registry,
            store: self.store,
            sampler: self.sampler,
            events,
        }
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client<S, P, E> {
        Client {
            registry: self.registry,
            store: self.store,
            sampler: self.sampler,
            events: self.events,
        }
    }
}
