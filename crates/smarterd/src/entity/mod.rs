//! Entity adapters over [`crate::device_config::EntityConfig`].
//!
//! Each adapter pairs a device handle with one entity configuration and
//! exposes the surface a frontend integration expects for that entity kind.
//! All state reads go through the configuration's value mapping; writes go
//! through the configured setter commands.

pub mod base;
pub mod binary_sensor;
pub mod number;
pub mod sensor;
pub mod switch;

use std::sync::Arc;

pub use base::DeviceInfo;
pub use base::EntityBase;
pub use base::DOMAIN;
pub use base::MANUFACTURER;
pub use binary_sensor::BinarySensorEntity;
pub use number::NumberEntity;
pub use number::NumberWritePolicy;
pub use sensor::SensorEntity;
pub use switch::SwitchEntity;

use crate::device::DeviceHandle;
use crate::device_config::EntityConfig;
use crate::device_config::EntityKind;

/// One entity of any kind, as produced by platform setup.
#[derive(Debug, Clone)]
pub enum SmarterEntity {
    Sensor(SensorEntity),
    BinarySensor(BinarySensorEntity),
    Switch(SwitchEntity),
    Number(NumberEntity),
}

impl SmarterEntity {
    /// Build the adapter matching the configuration's kind.
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        match config.kind() {
            EntityKind::Sensor => Self::Sensor(SensorEntity::new(device, config)),
            EntityKind::BinarySensor => {
                Self::BinarySensor(BinarySensorEntity::new(device, config))
            }
            EntityKind::Switch => Self::Switch(SwitchEntity::new(device, config)),
            EntityKind::Number => Self::Number(NumberEntity::new(device, config)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Sensor(_) => EntityKind::Sensor,
            Self::BinarySensor(_) => EntityKind::BinarySensor,
            Self::Switch(_) => EntityKind::Switch,
            Self::Number(_) => EntityKind::Number,
        }
    }

    pub fn base(&self) -> &EntityBase {
        match self {
            Self::Sensor(e) => e.base(),
            Self::BinarySensor(e) => e.base(),
            Self::Switch(e) => e.base(),
            Self::Number(e) => e.base(),
        }
    }

    pub fn unique_id(&self) -> String {
        self.base().unique_id()
    }
}
