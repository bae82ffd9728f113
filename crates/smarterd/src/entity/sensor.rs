use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use super::base::EntityBase;
use crate::device::DeviceHandle;
use crate::device_config::EntityConfig;

/// Read-only sensor entity.
///
/// The primary (device-level) sensor doubles as the service-call target for
/// its appliance and exposes the full status snapshot as extra attributes.
#[derive(Debug, Clone)]
pub struct SensorEntity {
    base: EntityBase,
}

impl SensorEntity {
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        Self {
            base: EntityBase::new(device, config),
        }
    }

    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    /// The sensor's current value, absent while no status has arrived or the
    /// configured field is missing from the snapshot.
    pub fn native_value(&self) -> Option<Value> {
        self.base.config().get_value(self.base.device().status().as_ref())
    }

    pub fn unit(&self) -> Option<&str> {
        self.base.config().unit()
    }

    pub fn state_class(&self) -> Option<&str> {
        self.base.config().state_class()
    }

    /// Extra attributes surfaced alongside the state.
    ///
    /// Always carries the device id (service dispatch resolves entity
    /// targets through it); the device-level sensor also flattens the whole
    /// status snapshot in.
    pub fn extra_attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert(
            "device_id".to_string(),
            Value::String(self.base.device().id().to_string()),
        );
        if self.base.config().is_primary() {
            if let Some(Value::Object(status)) = self.base.device().status() {
                attrs.extend(status);
            }
        }
        attrs
    }
}
