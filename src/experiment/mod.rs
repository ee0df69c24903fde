//! Experiment Model
//!
//! Record types for the bucketing domain and the registry that holds them.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRegistry (1) ──< Experiment (N)
//!                                 │
//!                                 ├──< Variant (N) [ordered, weighted]
//!                                 └──< Assignment (per subject, persisted)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use reparto::experiment::{Experiment, ExperimentRegistry, Variant};
//!
//! # fn main() -> reparto::Result<()> {
//! let experiment = Experiment::builder("wave2")
//!     .variant(Variant::new("control", 0.5))
//!     .variant(Variant::new("b", 0.5))
//!     .build()?;
//!
//! let mut registry = ExperimentRegistry::new();
//! registry.add_experiment(experiment);
//! assert!(registry.get("wave2").is_some());
//! # Ok(())
//! # }
//! ```

mod assignment;
mod definition;
mod registry;
mod subject;
mod variant;

pub use assignment::{Assignment, AssignmentSource};
pub use definition::{Experiment, ExperimentBuilder, DEFAULT_TTL_DAYS};
pub use registry::ExperimentRegistry;
pub use subject::Subject;
pub use variant::{DeviceClass, Variant};
