//! Subject - the entity being bucketed

use serde::{Deserialize, Serialize};

use super::DeviceClass;

/// Subject identifies a visitor plus the device class used for variant
/// gating. The id is whatever stable identifier the caller has (visitor
/// cookie, account id); reparto only requires it to be stable for the
/// stickiness guarantee to mean anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: String,
    device: DeviceClass,
}

impl Subject {
    /// Create a subject on the default (desktop) device class.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device: DeviceClass::Desktop,
        }
    }

    /// Set the device class.
    #[must_use]
    pub const fn with_device(mut self, device: DeviceClass) -> Self {
        self.device = device;
        self
    }

    /// Get the subject identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the device class.
    #[must_use]
    pub const fn device(&self) -> DeviceClass {
        self.device
    }
}
