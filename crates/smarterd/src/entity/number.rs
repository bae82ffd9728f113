use std::sync::Arc;

use serde_json::json;

use super::base::EntityBase;
use crate::device::DeviceHandle;
use crate::device_config::EntityConfig;
use crate::device_config::SetValueError;

/// How a number entity's write value is shaped before it leaves the adapter.
///
/// The devices only accept whole minutes and degrees, so truncation is the
/// default; `Passthrough` sends the fractional value as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberWritePolicy {
    #[default]
    TruncateToInt,
    Passthrough,
}

/// Number entity (boil temperature, keep-warm time, cup count).
#[derive(Debug, Clone)]
pub struct NumberEntity {
    base: EntityBase,
    policy: NumberWritePolicy,
}

impl NumberEntity {
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        Self {
            base: EntityBase::new(device, config),
            policy: NumberWritePolicy::default(),
        }
    }

    pub fn with_write_policy(mut self, policy: NumberWritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Current value as a float; absent while the field is missing.
    pub fn native_value(&self) -> Option<f64> {
        self.base
            .config()
            .get_number(self.base.device().status().as_ref())
    }

    pub fn min(&self) -> f64 {
        self.base.config().range().min
    }

    pub fn max(&self) -> f64 {
        self.base.config().range().max
    }

    pub fn step(&self) -> f64 {
        self.base.config().step()
    }

    /// Write a new value through the configured setter.
    pub async fn set_native_value(&self, value: f64) -> Result<(), SetValueError> {
        let logical = match self.policy {
            NumberWritePolicy::TruncateToInt => json!(value as i64),
            NumberWritePolicy::Passthrough => json!(value),
        };
        self.base
            .config()
            .set_value(self.base.device(), logical)
            .await?;
        Ok(())
    }
}
