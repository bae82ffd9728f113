//! Boundary to the external Smarter cloud API client.
//!
//! Authentication, session refresh, and network/device discovery are owned by
//! the vendor client, not this crate. The [`SmarterClient`] trait is the
//! narrow interface the rest of the bridge is written against; tests and the
//! real client both implement it.

use async_trait::async_trait;
use thiserror::Error;

use crate::device::DeviceHandle;

/// Errors surfaced by the vendor client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API could not be reached or the request failed in transit.
    #[error("cannot connect to the Smarter API: {0}")]
    Transport(String),

    /// The provided credentials or refresh token were rejected.
    #[error("invalid credentials")]
    InvalidAuth,

    /// The command name is not in the device's advertised command set.
    #[error("device does not support command '{command}'")]
    UnsupportedCommand { command: String },

    /// The API accepted the request but reported a failure.
    #[error("API call failed: {0}")]
    Api(String),
}

/// An authenticated session with the Smarter cloud.
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// Cloud-side identifier of the signed-in user.
    pub local_id: String,

    /// Token that can be used to re-establish the session without a password.
    pub refresh_token: String,
}

/// A network (household) of devices registered to a user.
#[derive(Debug, Clone)]
pub struct Network {
    pub id: String,
    pub name: String,
}

/// A Smarter cloud user and the networks their devices live in.
#[derive(Debug, Clone)]
pub struct User {
    pub identifier: String,
    pub networks: Vec<Network>,
}

/// The vendor API client.
///
/// Every method is a suspension point: sign-in, user fetch, and discovery all
/// talk to the cloud. The command path is separate ([`crate::device`]'s
/// `CommandSink`), because commands are sent per device handle after
/// discovery.
#[async_trait]
pub trait SmarterClient: Send + Sync {
    /// Sign in with username and password.
    async fn sign_in(&self, username: &str, password: &str) -> Result<LoginSession, ClientError>;

    /// Re-establish a session from a stored refresh token.
    async fn sign_in_with_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<LoginSession, ClientError>;

    /// Fetch the user record for an established session.
    async fn fetch_user(&self, session: &LoginSession) -> Result<User, ClientError>;

    /// Discover the device handles present in one network.
    async fn load_network_devices(
        &self,
        network: &Network,
        owner_id: &str,
    ) -> Result<Vec<DeviceHandle>, ClientError>;
}
