//! Handle to one live appliance.
//!
//! A [`DeviceHandle`] wraps the cloud's view of a single kettle or coffee
//! machine: identity, the advertised command set, and the latest status
//! snapshot. The snapshot is replaced wholesale on every push from the cloud
//! and never mutated in place, so readers always see a consistent view.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::client::ClientError;

/// One command a device advertises, with the example payload the cloud
/// provides for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub example: Value,
}

/// The outbound command path for a device.
///
/// Implemented by the vendor client; fire-and-report. The core never retries
/// or reinterprets the result.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send_command(
        &self,
        device_id: &str,
        name: &str,
        value: Value,
    ) -> Result<Value, ClientError>;
}

/// Static identity of a device, as reported at discovery time.
#[derive(Debug, Clone)]
pub struct DeviceSpec {
    pub id: String,
    /// Device family tag, e.g. "kettle" (part of entity unique ids).
    pub device_type: String,
    pub model: String,
    pub friendly_name: String,
    pub firmware_version: Option<String>,
    pub commands: Vec<CommandSpec>,
}

struct DeviceShared {
    spec: DeviceSpec,
    commands: BTreeMap<String, CommandSpec>,
    status_tx: watch::Sender<Option<Value>>,
    sink: Arc<dyn CommandSink>,
}

/// Cheaply clonable handle to one appliance.
#[derive(Clone)]
pub struct DeviceHandle {
    shared: Arc<DeviceShared>,
}

impl DeviceHandle {
    pub fn new(spec: DeviceSpec, sink: Arc<dyn CommandSink>) -> Self {
        let commands = spec
            .commands
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect();
        let (status_tx, _status_rx) = watch::channel(None);
        Self {
            shared: Arc::new(DeviceShared {
                spec,
                commands,
                status_tx,
                sink,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.shared.spec.id
    }

    pub fn device_type(&self) -> &str {
        &self.shared.spec.device_type
    }

    pub fn model(&self) -> &str {
        &self.shared.spec.model
    }

    pub fn friendly_name(&self) -> &str {
        &self.shared.spec.friendly_name
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.shared.spec.firmware_version.as_deref()
    }

    /// Commands the device advertises, in name order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.shared.commands.values()
    }

    /// The latest status snapshot, if one has arrived yet.
    pub fn status(&self) -> Option<Value> {
        self.shared.status_tx.borrow().clone()
    }

    /// Replace the status snapshot and notify subscribers.
    ///
    /// Called by the vendor client on every push; the previous snapshot is
    /// discarded whole.
    pub fn update_status(&self, status: Value) {
        tracing::debug!(device = %self.id(), "status update");
        self.shared.status_tx.send_replace(Some(status));
    }

    /// Register an observer for status changes.
    ///
    /// The returned handle *is* the registration: dropping it unsubscribes.
    pub fn subscribe(&self) -> StatusSubscription {
        StatusSubscription {
            rx: self.shared.status_tx.subscribe(),
        }
    }

    /// Send a command to the device through the vendor client.
    ///
    /// Command names are checked against the advertised command set before
    /// anything leaves the process.
    pub async fn send_command(&self, name: &str, value: Value) -> Result<Value, ClientError> {
        if !self.shared.commands.contains_key(name) {
            return Err(ClientError::UnsupportedCommand {
                command: name.to_string(),
            });
        }
        self.shared.sink.send_command(self.id(), name, value).await
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.shared.spec.id)
            .field("model", &self.shared.spec.model)
            .finish()
    }
}

/// Subscription to one device's status stream.
pub struct StatusSubscription {
    rx: watch::Receiver<Option<Value>>,
}

impl StatusSubscription {
    /// Wait for the next status change. Returns `false` once the device
    /// handle has gone away.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// The snapshot as of the last observed change.
    pub fn current(&self) -> Option<Value> {
        self.rx.borrow().clone()
    }
}
