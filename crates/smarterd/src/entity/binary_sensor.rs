use std::sync::Arc;

use super::base::EntityBase;
use crate::device::DeviceHandle;
use crate::device_config::EntityConfig;

/// Binary sensor entity.
#[derive(Debug, Clone)]
pub struct BinarySensorEntity {
    base: EntityBase,
}

impl BinarySensorEntity {
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        Self {
            base: EntityBase::new(device, config),
        }
    }

    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    /// On/off state via the configuration's evaluator. Absent status coerces
    /// to unknown, never to on.
    pub fn is_on(&self) -> Option<bool> {
        self.base.config().is_on(self.base.device().status().as_ref())
    }

    pub fn device_class(&self) -> Option<&str> {
        self.base.config().device_class()
    }
}
