//! Experiment Registry - lookup table and declarative config loading
//!
//! The registry is the in-memory home of every experiment a client can
//! bucket into. It can be assembled programmatically through
//! [`Experiment::builder`] or loaded from a declarative JSON document:
//!
//! ```json
//! {
//!   "experiments": [
//!     {
//!       "name": "wave2",
//!       "control": "control",
//!       "ttl_days": 30,
//!       "variants": [
//!         { "name": "control", "weight": 0.5 },
//!         { "name": "b", "weight": 0.5 },
//!         { "name": "mobile-hero", "weight": 0.2, "gate": "mobile" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Every experiment is validated on load; a malformed document is rejected
//! as a whole rather than silently skipping entries.

use std::collections::HashMap;
use std::path::Path;

use chrono::Duration;
use serde::Deserialize;

use super::{DeviceClass, Experiment, Variant};
use crate::Result;

/// In-memory registry of experiments, keyed by name.
#[derive(Debug, Default)]
pub struct ExperimentRegistry {
    experiments: HashMap<String, Experiment>,
}

impl ExperimentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the registry has no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Get the number of registered experiments.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Add an experiment, replacing any previous experiment with the
    /// same name.
    pub fn add_experiment(&mut self, experiment: Experiment) {
        self.experiments
            .insert(experiment.name().to_string(), experiment);
    }

    /// Get an experiment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Experiment> {
        self.experiments.get(name)
    }

    /// Load a registry from a declarative JSON document.
    ///
    /// # Errors
    ///
    /// Returns a serde error for malformed JSON and validation errors for
    /// any experiment the document defines.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RegistryDoc = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for def in doc.experiments {
            registry.add_experiment(def.build()?);
        }
        Ok(registry)
    }

    /// Load a registry from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns IO errors for unreadable files plus everything
    /// [`Self::from_json`] returns.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDoc {
    experiments: Vec<ExperimentDef>,
}

#[derive(Debug, Deserialize)]
struct ExperimentDef {
    name: String,
    #[serde(default)]
    control: Option<String>,
    #[serde(default)]
    ttl_days: Option<i64>,
    variants: Vec<VariantDef>,
}

#[derive(Debug, Deserialize)]
struct VariantDef {
    name: String,
    weight: f64,
    #[serde(default)]
    gate: Option<DeviceClass>,
}

impl ExperimentDef {
    fn build(self) -> Result<Experiment> {
        let mut builder = Experiment::builder(self.name);
        for v in self.variants {
            let mut variant = Variant::new(v.name, v.weight);
            if let Some(gate) = v.gate {
                variant = variant.gated(gate);
            }
            builder = builder.variant(variant);
        }
        if let Some(control) = self.control {
            builder = builder.control(control);
        }
        if let Some(days) = self.ttl_days {
            builder = builder.ttl(Duration::days(days));
        }
        builder.build()
    }
}
