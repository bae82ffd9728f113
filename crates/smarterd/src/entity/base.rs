use std::sync::Arc;

use crate::device::DeviceHandle;
use crate::device::StatusSubscription;
use crate::device_config::slugify;
use crate::device_config::EntityConfig;

/// Device registry metadata shared by every entity of one appliance.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: Option<String>,
    pub suggested_area: String,
}

pub const MANUFACTURER: &str = "Smarter";
pub const DOMAIN: &str = "smarter";

/// The `(device handle, entity configuration)` pair every adapter is built
/// around. Platform-specific adapters wrap this and add their own read/write
/// surface.
#[derive(Debug, Clone)]
pub struct EntityBase {
    device: DeviceHandle,
    config: Arc<EntityConfig>,
}

impl EntityBase {
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        Self { device, config }
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Stable unique identifier for this entity.
    ///
    /// Derived from the device id, the device family tag, and the entity's
    /// configuration id; never from registration order, so it survives
    /// restarts.
    pub fn unique_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.device.id(),
            self.device.device_type(),
            slugify(&self.config.config_id())
        )
    }

    /// An entity is available as long as it holds its device handle; cloud
    /// reachability is reported through status, not availability.
    pub fn available(&self) -> bool {
        true
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), self.device.id().to_string())],
            name: self.device.friendly_name().to_string(),
            manufacturer: MANUFACTURER.to_string(),
            model: self.device.model().to_string(),
            sw_version: self.device.firmware_version().map(str::to_string),
            suggested_area: "Kitchen".to_string(),
        }
    }

    /// Subscribe to the device's status pushes. Adapters request a display
    /// refresh on every notification; dropping the handle unsubscribes.
    pub fn subscribe(&self) -> StatusSubscription {
        self.device.subscribe()
    }
}
