//! Weighted bucketing - the deterministic variant draw
//!
//! A single uniform draw in `[0,1)` is scaled by the total weight of the
//! eligible variants and walked against the cumulative weight sum. Scaling
//! by the actual total means weight vectors do not have to sum to 1.0:
//! the configured ratios hold exactly, instead of silently under- or
//! over-weighting the tail variants.
//!
//! Anything that falls outside the walk (empty eligible set, zero or
//! non-finite total, an out-of-range sampler value) resolves to the
//! experiment's control variant.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::experiment::{DeviceClass, Experiment, Variant};

/// Source of uniform draws in `[0,1)`.
///
/// Injected into [`crate::Client`] so bucketing is deterministic under
/// test. Values at or above 1.0 are not drawn by the provided
/// implementations; a misbehaving sampler falls through to the control
/// variant rather than panicking.
pub trait Sampler: Send + Sync {
    /// Draw one uniform value in `[0, 1)`.
    fn draw(&self) -> f64;
}

/// Default sampler backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic sampler that replays a fixed sequence of draws, cycling
/// when exhausted. Test and replay tool only.
#[derive(Debug)]
pub struct SequenceSampler {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceSampler {
    /// Create a sampler over the given draw sequence.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceSampler needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Sampler for SequenceSampler {
    fn draw(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

/// Pick a variant for the given device class and uniform draw `r`.
///
/// Gated variants failing the device precondition are excluded before the
/// walk, keeping their weight out of the total. Returns the control
/// variant whenever the walk cannot produce a winner.
#[must_use]
pub fn pick_variant<'a>(experiment: &'a Experiment, device: DeviceClass, r: f64) -> &'a Variant {
    let eligible = experiment.eligible_variants(device);
    let total: f64 = eligible.iter().map(|v| v.weight()).sum();
    if eligible.is_empty() || total <= 0.0 || !total.is_finite() {
        return experiment.control();
    }

    let scaled = r * total;
    let mut cumulative = 0.0;
    for variant in eligible {
        cumulative += variant.weight();
        if scaled < cumulative {
            return variant;
        }
    }
    // Floating-point edge (r ~ 1.0 and rounding) or sampler out of range.
    experiment.control()
}
