use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::model::ConfigurationError;
use super::model::DeviceConfig;

/// No registered device configuration matches a device's model identifier.
///
/// This is a per-device setup failure: the caller skips the device and
/// continues setting up the rest.
#[derive(Debug, Error)]
#[error("no device configuration matches model {model}")]
pub struct UnsupportedDeviceError {
    pub model: String,
}

/// Descriptors compiled into the binary. Registration order decides
/// first-match resolution order.
const BUILTIN_DESCRIPTORS: &[(&str, &str)] = &[
    (
        "smarter_kettle_v3.toml",
        include_str!("descriptors/smarter_kettle_v3.toml"),
    ),
    (
        "smarter_coffee_v3.toml",
        include_str!("descriptors/smarter_coffee_v3.toml"),
    ),
];

/// Registry of device configurations, resolved by model identifier.
///
/// Descriptors are parsed once at construction and shared from then on;
/// lookups never re-read files.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    configs: Vec<Arc<DeviceConfig>>,
}

impl DeviceRegistry {
    /// Build a registry from the descriptors compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let mut registry = Self::default();
        for (name, text) in BUILTIN_DESCRIPTORS {
            registry.add(DeviceConfig::from_toml_str(name, text)?)?;
        }
        Ok(registry)
    }

    /// Build a registry from every `*.toml` descriptor in a directory,
    /// in sorted filename order.
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigurationError> {
        let mut registry = Self::default();
        registry.extend_from_dir(dir)?;
        Ok(registry)
    }

    /// Add every `*.toml` descriptor in a directory to this registry.
    pub fn extend_from_dir(&mut self, dir: &Path) -> Result<(), ConfigurationError> {
        let read = |e: std::io::Error| ConfigurationError::Read {
            file: dir.display().to_string(),
            source: e,
        };

        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(read)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read)?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let text = std::fs::read_to_string(&path).map_err(|e| ConfigurationError::Read {
                file: name.clone(),
                source: e,
            })?;
            self.add(DeviceConfig::from_toml_str(&name, &text)?)?;
            tracing::debug!(descriptor = %name, "loaded device config");
        }
        Ok(())
    }

    /// Register one parsed configuration.
    ///
    /// A product claimed by two descriptors is rejected here rather than
    /// silently resolved first-match; resolution order must never decide
    /// which configuration a device gets.
    pub fn add(&mut self, config: DeviceConfig) -> Result<(), ConfigurationError> {
        for existing in &self.configs {
            for product in config.products() {
                if existing.matches(product) {
                    return Err(ConfigurationError::DuplicateProduct {
                        model: product.clone(),
                        first: existing.source().to_string(),
                        second: config.source().to_string(),
                    });
                }
            }
        }
        self.configs.push(Arc::new(config));
        Ok(())
    }

    /// Resolve a device's model identifier to its configuration.
    pub fn resolve(&self, model: &str) -> Result<Arc<DeviceConfig>, UnsupportedDeviceError> {
        self.configs
            .iter()
            .find(|c| c.matches(model))
            .cloned()
            .ok_or_else(|| UnsupportedDeviceError {
                model: model.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DeviceConfig>> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
