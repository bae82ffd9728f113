//! Declarative device-configuration layer.
//!
//! A device model family is described by a TOML descriptor: which entities it
//! exposes, where each entity reads its value from the status snapshot, how
//! native device values translate to the logical values users see, and which
//! vendor command writes go through. The registry resolves a device's model
//! identifier to its parsed configuration.

mod model;
mod registry;

pub use model::ConfigurationError;
pub use model::DeviceConfig;
pub use model::DeviceService;
pub use model::EntityCategory;
pub use model::EntityConfig;
pub use model::EntityKind;
pub use model::NumberRange;
pub use model::SetValueError;
pub use model::slugify;
pub use model::unit_from_ascii;
pub use registry::DeviceRegistry;
pub use registry::UnsupportedDeviceError;
