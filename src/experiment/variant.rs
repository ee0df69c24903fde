//! Variant - one arm of an experiment

use serde::{Deserialize, Serialize};

/// Device class used to gate variant eligibility.
///
/// A variant carrying a gate is only eligible for subjects whose device
/// class matches the gate; everyone else can never be bucketed into it,
/// regardless of the weighted draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Desktop browsers (default when nothing better is known).
    #[default]
    Desktop,
    /// Phones.
    Mobile,
    /// Tablets.
    Tablet,
}

impl DeviceClass {
    /// Get the device class name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
        }
    }
}

/// Variant represents one arm of an experiment.
///
/// The weight is a relative selection weight; weights across an
/// experiment's variants need not sum to 1.0 — the draw is scaled by the
/// actual total, so configured ratios always hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    name: String,
    weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gate: Option<DeviceClass>,
}

impl Variant {
    /// Create a new ungated variant.
    ///
    /// # Arguments
    ///
    /// * `name` - Variant name (e.g., "control", "b")
    /// * `weight` - Relative selection weight, finite and non-negative
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            gate: None,
        }
    }

    /// Restrict this variant to a device class.
    #[must_use]
    pub const fn gated(mut self, device: DeviceClass) -> Self {
        self.gate = Some(device);
        self
    }

    /// Get the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the relative selection weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Get the device gate, if any.
    #[must_use]
    pub const fn gate(&self) -> Option<DeviceClass> {
        self.gate
    }

    /// Check whether a subject on the given device passes this variant's gate.
    #[must_use]
    pub fn eligible_for(&self, device: DeviceClass) -> bool {
        self.gate.map_or(true, |g| g == device)
    }
}
