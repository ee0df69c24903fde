//! Experiment - root entity for a bucketing space

use chrono::Duration;

use super::{DeviceClass, Variant};
use crate::{Error, Result};

/// Default assignment lifetime (matches the 30-day cookie observed in
/// production deployments).
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Experiment represents a named bucketing space with an ordered set of
/// variants, a designated control, and an assignment TTL.
///
/// Construction goes through [`ExperimentBuilder`], which validates the
/// configuration: at least one variant, unique names, finite non-negative
/// weights, a control that names an existing variant, and a positive TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    name: String,
    variants: Vec<Variant>,
    control: String,
    ttl: Duration,
}

impl Experiment {
    /// Create a builder for an experiment with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ExperimentBuilder {
        ExperimentBuilder::new(name)
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the ordered variant list.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Get the designated control variant.
    #[must_use]
    pub fn control(&self) -> &Variant {
        // Validated at build time: control always names an existing variant.
        self.variants
            .iter()
            .find(|v| v.name() == self.control)
            .unwrap_or(&self.variants[0])
    }

    /// Check whether a variant name is the control.
    #[must_use]
    pub fn is_control(&self, variant: &str) -> bool {
        self.control == variant
    }

    /// Look up a variant by name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name() == name)
    }

    /// Get the assignment TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Variants whose gate passes for the given device class, in
    /// configured order.
    #[must_use]
    pub fn eligible_variants(&self, device: DeviceClass) -> Vec<&Variant> {
        self.variants
            .iter()
            .filter(|v| v.eligible_for(device))
            .collect()
    }

    /// Storage key for a subject's assignment, scoped to this experiment.
    #[must_use]
    pub fn storage_key(&self, subject_id: &str) -> String {
        format!("ab::{}::{}", self.name, subject_id)
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    name: String,
    variants: Vec<Variant>,
    control: Option<String>,
    ttl: Duration,
}

impl ExperimentBuilder {
    /// Create a new builder with the experiment name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            control: None,
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }

    /// Append a variant. Order matters: the cumulative-weight walk visits
    /// variants in this order, and the first variant is the control unless
    /// one is designated explicitly.
    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Designate the control variant by name.
    #[must_use]
    pub fn control(mut self, name: impl Into<String>) -> Self {
        self.control = Some(name.into());
        self
    }

    /// Set the assignment TTL (default 30 days).
    #[must_use]
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Build the `Experiment`, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty variant set, duplicate variant
    /// names, an unknown control name, or a non-positive TTL, and
    /// `InvalidWeight` for negative or non-finite weights.
    pub fn build(self) -> Result<Experiment> {
        if self.variants.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "experiment '{}' has no variants",
                self.name
            )));
        }
        for (i, v) in self.variants.iter().enumerate() {
            if !v.weight().is_finite() || v.weight() < 0.0 {
                return Err(Error::InvalidWeight {
                    variant: v.name().to_string(),
                    weight: v.weight(),
                });
            }
            if self.variants[..i].iter().any(|prev| prev.name() == v.name()) {
                return Err(Error::InvalidConfig(format!(
                    "experiment '{}' has duplicate variant '{}'",
                    self.name,
                    v.name()
                )));
            }
        }
        let control = match self.control {
            Some(name) => {
                if !self.variants.iter().any(|v| v.name() == name) {
                    return Err(Error::InvalidConfig(format!(
                        "experiment '{}' control '{}' is not a configured variant",
                        self.name, name
                    )));
                }
                name
            }
            None => self.variants[0].name().to_string(),
        };
        if self.ttl <= Duration::zero() {
            return Err(Error::InvalidConfig(format!(
                "experiment '{}' TTL must be positive",
                self.name
            )));
        }
        Ok(Experiment {
            name: self.name,
            variants: self.variants,
            control,
            ttl: self.ttl,
        })
    }
}
