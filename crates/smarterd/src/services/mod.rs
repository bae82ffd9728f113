//! Service metadata registry and call dispatch.
//!
//! Two services are always available: `send_command` (raw command to any
//! targeted device) and `get_commands` (list a device's command set). Device
//! descriptors can declare extra named services for their family, such as the
//! kettle's `quick_boil`; those are only accepted by devices whose
//! configuration declares them.

pub mod schema;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::json;
use serde_json::Value;
use thiserror::Error;

pub use schema::ServiceCall;
pub use schema::ValidationError;

use crate::device_config::DeviceConfig;
use crate::entity::EntityBase;
use crate::hub::DeviceSet;
use crate::hub::HubError;

pub const SERVICE_SEND_COMMAND: &str = "send_command";
pub const SERVICE_GET_COMMANDS: &str = "get_commands";

/// One target that was attempted and failed.
#[derive(Debug)]
pub struct TargetFailure {
    pub device_id: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown service: {0}")]
    UnknownService(String),

    /// Raised only after every target was attempted.
    #[error("service call failed for {}: {}",
        .failures.iter().map(|f| f.device_id.as_str()).collect::<Vec<_>>().join(", "),
        .failures.iter().map(|f| f.message.as_str()).collect::<Vec<_>>().join("; "))]
    Aggregate { failures: Vec<TargetFailure> },
}

/// Per-device results, keyed by the id the caller targeted.
pub type ServiceResponse = BTreeMap<String, Value>;

enum ServiceHandler {
    SendCommand,
    GetCommands,
    /// Fixed command and payload declared by a device descriptor.
    DeviceCommand { command: String, value: Value },
}

/// Resolves service calls against the discovered devices.
pub struct ServiceRegistry {
    devices: DeviceSet,
    services: BTreeMap<String, ServiceHandler>,
    /// Primary entity unique id to owning device id.
    entity_targets: BTreeMap<String, String>,
    /// Device id to the family services its descriptor declares.
    device_services: BTreeMap<String, BTreeSet<String>>,
}

impl ServiceRegistry {
    pub fn new(devices: DeviceSet) -> Self {
        let mut services = BTreeMap::new();
        services.insert(SERVICE_SEND_COMMAND.to_string(), ServiceHandler::SendCommand);
        services.insert(SERVICE_GET_COMMANDS.to_string(), ServiceHandler::GetCommands);
        Self {
            devices,
            services,
            entity_targets: BTreeMap::new(),
            device_services: BTreeMap::new(),
        }
    }

    /// Register a device's entity target and its family's declared services.
    pub fn register_device(&mut self, device_id: &str, config: &DeviceConfig) {
        if let Ok(device) = self.devices.get(device_id) {
            let primary = EntityBase::new(device.clone(), config.primary_entity().clone());
            self.entity_targets
                .insert(primary.unique_id(), device_id.to_string());
        }
        let declared = self
            .device_services
            .entry(device_id.to_string())
            .or_default();
        for service in config.services() {
            declared.insert(service.name.clone());
            self.services.entry(service.name.clone()).or_insert_with(|| {
                ServiceHandler::DeviceCommand {
                    command: service.command.clone(),
                    value: service.value.clone(),
                }
            });
        }
    }

    /// Registered service names, global services included.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Resolve target selectors to device ids, in call order.
    ///
    /// Unknown ids are kept so dispatch can report them individually. Area
    /// and label selectors are accepted but this bridge has no area or label
    /// assignments, so they contribute no devices.
    fn resolve_targets(&self, call: &ServiceCall) -> Vec<String> {
        let mut targets = Vec::new();
        let mut seen = BTreeSet::new();
        for entity_id in &call.entity_id {
            let device_id = self
                .entity_targets
                .get(entity_id)
                .cloned()
                .unwrap_or_else(|| entity_id.clone());
            if seen.insert(device_id.clone()) {
                targets.push(device_id);
            }
        }
        for device_id in &call.device_id {
            if seen.insert(device_id.clone()) {
                targets.push(device_id.clone());
            }
        }
        targets
    }

    /// Dispatch one service call.
    ///
    /// Every resolved target is attempted. A target that does not resolve to
    /// a discovered device gets a `"not found"` response entry; any other
    /// per-target failure is collected and raised as one aggregate error
    /// after the loop.
    pub async fn handle(
        &self,
        service: &str,
        call: &ServiceCall,
    ) -> Result<ServiceResponse, ServiceError> {
        let handler = self
            .services
            .get(service)
            .ok_or_else(|| ServiceError::UnknownService(service.to_string()))?;

        let command = match handler {
            ServiceHandler::SendCommand => {
                let (name, value) = call.validate_send_command()?;
                Some((name.to_string(), value))
            }
            ServiceHandler::GetCommands => {
                call.validate_target()?;
                None
            }
            ServiceHandler::DeviceCommand { command, value } => {
                call.validate_target()?;
                Some((command.clone(), value.clone()))
            }
        };
        let gated = matches!(handler, ServiceHandler::DeviceCommand { .. });

        let mut response = ServiceResponse::new();
        let mut failures = Vec::new();
        for target in self.resolve_targets(call) {
            let outcome = self
                .dispatch_one(service, &target, command.as_ref(), gated)
                .await;
            match outcome {
                Ok(result) => {
                    response.insert(target, result);
                }
                Err(HubError::DeviceNotFound(_)) => {
                    response.insert(target, json!("not found"));
                }
                Err(err) => {
                    tracing::warn!(device = %target, error = %err, "service call failed");
                    failures.push(TargetFailure {
                        device_id: target,
                        message: err.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(response)
        } else {
            Err(ServiceError::Aggregate { failures })
        }
    }

    async fn dispatch_one(
        &self,
        service: &str,
        device_id: &str,
        command: Option<&(String, Value)>,
        gated: bool,
    ) -> Result<Value, HubError> {
        // Resolve the device first so gating never masks a missing device.
        self.devices.get(device_id)?;
        if gated {
            let declared = self
                .device_services
                .get(device_id)
                .is_some_and(|s| s.contains(service));
            if !declared {
                return Err(HubError::Client(
                    crate::client::ClientError::UnsupportedCommand {
                        command: service.to_string(),
                    },
                ));
            }
        }
        match command {
            Some((name, value)) => {
                self.devices
                    .send_command(device_id, name, value.clone())
                    .await
            }
            None => {
                let commands: Vec<Value> = self
                    .devices
                    .get_commands(device_id)?
                    .iter()
                    .map(|c| json!({"name": c.name, "example": c.example}))
                    .collect();
                Ok(Value::Array(commands))
            }
        }
    }
}
