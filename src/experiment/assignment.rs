//! Assignment - the persisted subject-to-variant mapping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an assignment was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssignmentSource {
    /// Drawn on this call and persisted.
    #[default]
    Fresh,
    /// Replayed from the store unchanged.
    Cached,
    /// Drawn on this call but not persisted (storage unavailable).
    /// Ephemeral subjects re-randomize on every call.
    Ephemeral,
}

/// Assignment maps a subject to a variant for an experiment.
///
/// The serde representation is the persisted wire format: assignments are
/// stored as JSON under a key scoped to the experiment and subject. Once
/// written, a record is never mutated; it disappears only through the
/// store's TTL or an explicit cache clear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    experiment: String,
    variant: String,
    subject_id: String,
    assigned_at: DateTime<Utc>,
    #[serde(skip)]
    source: AssignmentSource,
}

impl Assignment {
    /// Create a new assignment with the current timestamp.
    #[must_use]
    pub fn new(
        experiment: impl Into<String>,
        variant: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            experiment: experiment.into(),
            variant: variant.into(),
            subject_id: subject_id.into(),
            assigned_at: Utc::now(),
            source: AssignmentSource::Fresh,
        }
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Get the assigned variant name.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Get the subject identifier.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Get the time the assignment was drawn.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Get how this assignment was obtained.
    #[must_use]
    pub const fn source(&self) -> AssignmentSource {
        self.source
    }

    /// Whether this assignment was replayed from the store.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.source == AssignmentSource::Cached
    }

    /// Mark the source (crate-internal; set when replaying or degrading).
    pub(crate) fn with_source(mut self, source: AssignmentSource) -> Self {
        self.source = source;
        self
    }
}
