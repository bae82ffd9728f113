//! Turns discovered devices into entities and a populated service registry.

use crate::device_config::DeviceRegistry;
use crate::entity::SmarterEntity;
use crate::hub::DeviceSet;
use crate::services::ServiceRegistry;

/// Everything a frontend needs after setup.
pub struct Platform {
    pub entities: Vec<SmarterEntity>,
    pub services: ServiceRegistry,
}

/// Build entities for every discovered device with a known configuration.
///
/// A device whose model has no configuration is logged and skipped; it never
/// aborts setup of the remaining devices.
pub fn setup(devices: &DeviceSet, configs: &DeviceRegistry) -> Platform {
    let mut entities = Vec::new();
    let mut services = ServiceRegistry::new(devices.clone());

    for device in devices.iter() {
        let config = match configs.resolve(device.model()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    device = %device.id(),
                    model = %device.model(),
                    error = %err,
                    "skipping device without configuration"
                );
                continue;
            }
        };

        tracing::info!(
            device = %device.id(),
            config = %config.name(),
            "setting up device"
        );
        for entity_config in config.all_entities() {
            entities.push(SmarterEntity::new(device.clone(), entity_config.clone()));
        }
        services.register_device(device.id(), &config);
    }

    Platform { entities, services }
}
