//! Bridge between Smarter cloud appliances (kettles, coffee machines) and a
//! home-automation frontend.
//!
//! The heart of the crate is [`device_config`]: declarative TOML descriptors
//! mapping raw device status fields to typed entities and write commands.
//! [`hub`] and [`client`] cover cloud sign-in and discovery, [`entity`] the
//! per-kind adapters, and [`services`] the callable service surface.

pub mod client;
pub mod config;
pub mod device;
pub mod device_config;
pub mod entity;
pub mod hub;
pub mod platform;
pub mod services;

pub use client::ClientError;
pub use client::SmarterClient;
pub use config::Config;
pub use config::LogLevel;
pub use device::DeviceHandle;
pub use device_config::ConfigurationError;
pub use device_config::DeviceConfig;
pub use device_config::DeviceRegistry;
pub use device_config::EntityConfig;
pub use device_config::EntityKind;
pub use device_config::UnsupportedDeviceError;
pub use hub::DeviceSet;
pub use hub::HubError;
pub use hub::SmarterHub;
pub use services::ServiceCall;
pub use services::ServiceRegistry;
