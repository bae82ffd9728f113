use std::sync::Arc;

use serde_json::Value;

use super::base::EntityBase;
use crate::device::DeviceHandle;
use crate::device_config::EntityConfig;
use crate::device_config::SetValueError;

/// Switch entity with an optimistic local state.
///
/// Commands are fire-and-forget from the adapter's perspective: after a
/// successful send the local assumed state flips immediately, and the real
/// state arrives with the next status push.
#[derive(Debug, Clone)]
pub struct SwitchEntity {
    base: EntityBase,
    assumed_on: Option<bool>,
}

impl SwitchEntity {
    pub fn new(device: DeviceHandle, config: Arc<EntityConfig>) -> Self {
        Self {
            base: EntityBase::new(device, config),
            assumed_on: None,
        }
    }

    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Status-derived state when a snapshot is present, otherwise the
    /// optimistic state from the last issued command.
    pub fn is_on(&self) -> Option<bool> {
        self.base
            .config()
            .is_on(self.base.device().status().as_ref())
            .or(self.assumed_on)
    }

    pub async fn turn_on(&mut self) -> Result<(), SetValueError> {
        self.set(true).await
    }

    pub async fn turn_off(&mut self) -> Result<(), SetValueError> {
        self.set(false).await
    }

    async fn set(&mut self, on: bool) -> Result<(), SetValueError> {
        self.base
            .config()
            .set_value(self.base.device(), Value::Bool(on))
            .await?;
        self.assumed_on = Some(on);
        Ok(())
    }
}
