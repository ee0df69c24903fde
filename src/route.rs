//! Variant-aware routing
//!
//! Given the current resource path and a subject's assignment, decide
//! whether to navigate to the variant-specific resource. The decision is
//! idempotent: applied on the variant resource it yields [`RouteDecision::Stay`],
//! so there is no redirect loop, and control assignments never redirect.
//!
//! Path derivation is purely syntactic:
//!
//! | control path      | variant `b`           |
//! |-------------------|-----------------------|
//! | `/index.html`     | `/index-b.html`       |
//! | `/pricing/`       | `/pricing/b/`         |
//! | `/pricing`        | `/pricing-b`          |

use serde::Serialize;

use crate::experiment::{Assignment, Experiment};

/// Outcome of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RouteDecision {
    /// Serve the current path unchanged.
    Stay,
    /// Issue exactly one redirect to the variant path.
    Redirect(String),
}

impl RouteDecision {
    /// Get the redirect target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Stay => None,
            Self::Redirect(path) => Some(path),
        }
    }
}

/// Compute the variant-specific path for a control path.
#[must_use]
pub fn variant_path(control_path: &str, variant: &str) -> String {
    if let Some(stem) = control_path.strip_suffix(".html") {
        format!("{stem}-{variant}.html")
    } else if control_path.ends_with('/') {
        format!("{control_path}{variant}/")
    } else {
        format!("{control_path}-{variant}")
    }
}

/// Normalize a path back to its control form by stripping the suffix of
/// any configured non-control variant. A path not matching any variant
/// form is returned unchanged.
#[must_use]
pub fn control_path(path: &str, experiment: &Experiment) -> String {
    for variant in experiment.variants() {
        if experiment.is_control(variant.name()) {
            continue;
        }
        let name = variant.name();
        if let Some(stem) = path
            .strip_suffix(".html")
            .and_then(|s| s.strip_suffix(&format!("-{name}")))
        {
            return format!("{stem}.html");
        }
        if let Some(base) = path.strip_suffix(&format!("/{name}/")) {
            return format!("{base}/");
        }
        if let Some(base) = path.strip_suffix(&format!("-{name}")) {
            return base.to_string();
        }
    }
    path.to_string()
}

/// Decide whether the assignment calls for a redirect from `current_path`.
///
/// Control assignments stay put; non-control assignments redirect to the
/// variant path unless the subject is already on it.
#[must_use]
pub fn decide(experiment: &Experiment, assignment: &Assignment, current_path: &str) -> RouteDecision {
    if experiment.is_control(assignment.variant()) {
        return RouteDecision::Stay;
    }
    let base = control_path(current_path, experiment);
    let target = variant_path(&base, assignment.variant());
    if current_path == target {
        RouteDecision::Stay
    } else {
        RouteDecision::Redirect(target)
    }
}
