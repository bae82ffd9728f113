//! Cloud session management and device discovery.
//!
//! [`SmarterHub`] wraps a [`SmarterClient`] implementation, handling the
//! refresh-token-first sign-in dance and flattening the account's networks
//! into a single device map.

use std::collections::BTreeMap;

use crate::client::ClientError;
use crate::client::LoginSession;
use crate::client::SmarterClient;
use crate::client::User;
use crate::device::DeviceHandle;

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("invalid authentication")]
    InvalidAuth,
    #[error("cannot connect to cloud")]
    CannotConnect(#[source] ClientError),
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A signed-in connection to the Smarter cloud.
pub struct SmarterHub<C> {
    client: C,
    session: LoginSession,
}

impl<C: SmarterClient> SmarterHub<C> {
    /// Sign in, preferring a stored refresh token over the password.
    ///
    /// A failed refresh is not fatal; we log it and fall back to a full
    /// credential sign-in so a revoked token heals itself on the next start.
    pub async fn sign_in(
        client: C,
        username: &str,
        password: &str,
        refresh_token: Option<&str>,
    ) -> Result<Self, HubError> {
        if let Some(token) = refresh_token {
            match client.sign_in_with_refresh_token(token).await {
                Ok(session) => return Ok(Self { client, session }),
                Err(ClientError::InvalidAuth) => {
                    tracing::warn!("stored refresh token rejected, retrying with password");
                }
                Err(err) => return Err(HubError::CannotConnect(err)),
            }
        }

        match client.sign_in(username, password).await {
            Ok(session) => Ok(Self { client, session }),
            Err(ClientError::InvalidAuth) => Err(HubError::InvalidAuth),
            Err(err) => Err(HubError::CannotConnect(err)),
        }
    }

    /// The refresh token to persist for the next sign-in.
    pub fn refresh_token(&self) -> &str {
        &self.session.refresh_token
    }

    pub async fn fetch_user(&self) -> Result<User, HubError> {
        Ok(self.client.fetch_user(&self.session).await?)
    }

    /// Enumerate every device on every network the account can see.
    pub async fn discover_devices(&self) -> Result<Vec<DeviceHandle>, HubError> {
        let user = self.fetch_user().await?;
        let mut devices = Vec::new();
        for network in &user.networks {
            let found = self
                .client
                .load_network_devices(network, &user.identifier)
                .await?;
            tracing::debug!(
                network = %network.name,
                count = found.len(),
                "discovered network devices"
            );
            devices.extend(found);
        }
        Ok(devices)
    }
}

/// Discovered devices keyed by cloud device id.
#[derive(Clone, Default)]
pub struct DeviceSet {
    devices: BTreeMap<String, DeviceHandle>,
}

impl DeviceSet {
    pub fn new(devices: impl IntoIterator<Item = DeviceHandle>) -> Self {
        Self {
            devices: devices
                .into_iter()
                .map(|d| (d.id().to_string(), d))
                .collect(),
        }
    }

    pub fn get(&self, device_id: &str) -> Result<&DeviceHandle, HubError> {
        self.devices
            .get(device_id)
            .ok_or_else(|| HubError::DeviceNotFound(device_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceHandle> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Name and example value of every command a device accepts.
    pub fn get_commands(
        &self,
        device_id: &str,
    ) -> Result<Vec<crate::device::CommandSpec>, HubError> {
        Ok(self.get(device_id)?.commands().cloned().collect())
    }

    /// Issue a raw command against one device.
    pub async fn send_command(
        &self,
        device_id: &str,
        command: &str,
        value: serde_json::Value,
    ) -> Result<serde_json::Value, HubError> {
        Ok(self.get(device_id)?.send_command(command, value).await?)
    }
}
