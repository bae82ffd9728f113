use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::ClientError;
use crate::device::DeviceHandle;

/// Which hub platform an entity renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Sensor,
    BinarySensor,
    Switch,
    Number,
}

/// Hub-side grouping of an entity (normal, configuration, or diagnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

/// Errors raised while building or using a device configuration.
///
/// All of these are load-time failures except [`ConfigurationError::NoSetter`],
/// which a malformed write can still hit at call time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to parse device config {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("failed to read device config {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("device config {file} does not list any products")]
    NoProducts { file: String },

    #[error("entity {config_id} has no state field, name, or translation key")]
    MissingStateField { config_id: String },

    #[error("{kind} entity {config_id} is writable but declares no setter")]
    MissingSetter { kind: EntityKind, config_id: String },

    #[error("no setter configured for {config_id} with value {value}")]
    NoSetter { config_id: String, value: Value },

    #[error("product {model} is claimed by both {first} and {second}")]
    DuplicateProduct {
        model: String,
        first: String,
        second: String,
    },
}

/// Failure of a logical write through an entity configuration.
#[derive(Debug, Error)]
pub enum SetValueError {
    #[error(transparent)]
    Config(#[from] ConfigurationError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Translate a vendor unit code into the hub's unit identifier.
///
/// The cloud reports temperature units as bare ASCII letters.
pub fn unit_from_ascii(unit: &str) -> &str {
    match unit {
        "C" => "°C",
        "F" => "°F",
        other => other,
    }
}

/// Lowercase a string into an identifier slug.
///
/// ASCII alphanumerics are kept (lowercased); every other run of characters
/// collapses to a single underscore. Leading and trailing separators are
/// dropped so slugs compose cleanly with `-` in unique ids.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Walk a dot-separated path through nested status mappings.
///
/// Any missing key or non-mapping intermediate resolves to `None`; a stale or
/// partial snapshot is "no value", never an error.
fn get_path<'a>(status: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = status;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

// Raw descriptor records, exactly as they appear in the TOML files. These are
// parsed and validated into `DeviceConfig`/`EntityConfig` and then discarded.

#[derive(Debug, Deserialize)]
struct DeviceDescriptor {
    name: String,
    #[serde(default)]
    products: Vec<ProductDescriptor>,
    primary_entity: EntityDescriptor,
    #[serde(default)]
    secondary_entities: Vec<EntityDescriptor>,
    #[serde(default)]
    services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ProductDescriptor {
    model: String,
}

#[derive(Debug, Deserialize)]
struct ServiceDescriptor {
    name: String,
    command: String,
    #[serde(default = "default_command_value")]
    value: Value,
}

fn default_command_value() -> Value {
    // The API requires a value with every command; the official client sends
    // `true` when none is meaningful.
    Value::Bool(true)
}

#[derive(Debug, Deserialize)]
struct EntityDescriptor {
    entity: EntityKind,
    name: Option<String>,
    translation_key: Option<String>,
    #[serde(default)]
    translation_placeholders: BTreeMap<String, String>,
    device_class: Option<String>,
    icon: Option<String>,
    category: Option<EntityCategory>,
    unit: Option<String>,
    state_class: Option<String>,
    state_field: Option<String>,
    range: Option<NumberRange>,
    step: Option<f64>,
    #[serde(default)]
    mapping: Vec<ValueMapping>,
    #[serde(default)]
    state_on_values: Vec<Value>,
    setter: Option<String>,
    #[serde(default)]
    setter_mapping: Vec<SetterMapping>,
}

/// One row of the two-way value translation table.
#[derive(Debug, Clone, Deserialize)]
struct ValueMapping {
    native_value: Value,
    value: Value,
}

/// One row of the per-value setter override table. Some fields need one
/// command to reach one value and a different command for another; the
/// command's payload can be overridden too (stop commands still send `true`,
/// the command itself encodes the direction).
#[derive(Debug, Clone, Deserialize)]
struct SetterMapping {
    value: Value,
    setter: String,
    native_value: Option<Value>,
}

/// Valid range for a number entity.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl Default for NumberRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

/// A hub-level service declared by a device family, expressed as the vendor
/// command it expands to.
#[derive(Debug, Clone)]
pub struct DeviceService {
    pub name: String,
    pub command: String,
    pub value: Value,
}

/// One user-facing entity derived from a device's status.
///
/// Immutable once built. The read path (`get_value`, `is_on`, `get_number`)
/// and the write path (`write_command`, `set_value`) both go through the
/// declarative mapping tables, so no entity adapter carries ad hoc value
/// comparisons of its own.
#[derive(Debug)]
pub struct EntityConfig {
    kind: EntityKind,
    is_primary: bool,
    name: Option<String>,
    translation_key: Option<String>,
    translation_placeholders: BTreeMap<String, String>,
    device_class: Option<String>,
    icon: Option<String>,
    category: Option<EntityCategory>,
    unit: Option<String>,
    state_class: Option<String>,
    state_field: String,
    range: NumberRange,
    step: f64,
    mapping: Vec<ValueMapping>,
    state_on_values: Vec<Value>,
    setter: Option<String>,
    setter_mapping: Vec<SetterMapping>,
}

impl EntityConfig {
    fn build(desc: EntityDescriptor, is_primary: bool) -> Result<Self, ConfigurationError> {
        let state_field = desc
            .state_field
            .clone()
            .or_else(|| desc.name.clone())
            .or_else(|| desc.translation_key.clone());

        let config = Self {
            kind: desc.entity,
            is_primary,
            name: desc.name,
            translation_key: desc.translation_key,
            translation_placeholders: desc.translation_placeholders,
            device_class: desc.device_class,
            icon: desc.icon,
            category: desc.category,
            unit: desc.unit.as_deref().map(|u| unit_from_ascii(u).to_string()),
            state_class: desc.state_class,
            state_field: String::new(),
            range: desc.range.unwrap_or_default(),
            step: desc.step.unwrap_or(1.0),
            mapping: desc.mapping,
            state_on_values: desc.state_on_values,
            setter: desc.setter,
            setter_mapping: desc.setter_mapping,
        };

        let state_field = state_field.ok_or_else(|| ConfigurationError::MissingStateField {
            config_id: config.config_id(),
        })?;
        let config = Self {
            state_field,
            ..config
        };

        // Read-only entities must not expose a write path at all; catching a
        // writable entity without one here keeps the failure at load time
        // instead of first user interaction.
        if matches!(config.kind, EntityKind::Switch | EntityKind::Number)
            && config.setter.is_none()
            && config.setter_mapping.is_empty()
        {
            return Err(ConfigurationError::MissingSetter {
                kind: config.kind,
                config_id: config.config_id(),
            });
        }

        Ok(config)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Whether this is the device-level entity that service calls target.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn translation_key(&self) -> Option<&str> {
        self.translation_key.as_deref().or(self.name.as_deref())
    }

    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn category(&self) -> Option<EntityCategory> {
        self.category
    }

    /// Unit of measurement, already translated from the vendor's ASCII code.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn state_class(&self) -> Option<&str> {
        self.state_class.as_deref()
    }

    /// Dot-path into the status snapshot this entity tracks.
    pub fn state_field(&self) -> &str {
        &self.state_field
    }

    pub fn range(&self) -> NumberRange {
        self.range
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Identifier of this entity within its device configuration.
    ///
    /// Falls back through name, then translation key with placeholder
    /// substitution, then the bare entity kind. Placeholders are applied in
    /// key order so the result is stable across runs.
    pub fn config_id(&self) -> String {
        if let Some(name) = &self.name {
            return format!("{}_{}", self.kind, slugify(name));
        }
        if let Some(key) = &self.translation_key {
            // Placeholders match whole `_`-separated segments of the key, so
            // a placeholder named `key` cannot rewrite part of another word.
            let mut segments: Vec<String> =
                key.split('_').map(str::to_string).collect();
            for (placeholder, value) in &self.translation_placeholders {
                let mut matched = false;
                for segment in &mut segments {
                    if segment == placeholder {
                        *segment = slugify(value);
                        matched = true;
                    }
                }
                if !matched {
                    segments.push(slugify(value));
                }
            }
            return format!("{}_{}", self.kind, segments.join("_"));
        }
        self.kind.to_string()
    }

    /// Read the entity's logical value from a status snapshot.
    ///
    /// Absent snapshot, missing key, or a non-mapping along the path all
    /// yield `None`; the entity simply reports unknown. A found native value
    /// is translated through the mapping table, unmapped values pass through
    /// unchanged.
    pub fn get_value(&self, status: Option<&Value>) -> Option<Value> {
        let native = get_path(status?, &self.state_field)?;
        Some(self.logical_for_native(native))
    }

    /// Read the entity's value coerced to a float (number entities).
    ///
    /// Absent stays absent, never zero. Numeric strings are accepted because
    /// the cloud stores some numbers that way.
    pub fn get_number(&self, status: Option<&Value>) -> Option<f64> {
        match self.get_value(status)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Evaluate the entity's on/off state from a status snapshot.
    ///
    /// With `state_on_values` configured this is a membership test on the raw
    /// field value; otherwise the mapped logical value must equal `true`.
    /// Absent is `None` (unknown), never `true`.
    pub fn is_on(&self, status: Option<&Value>) -> Option<bool> {
        let native = get_path(status?, &self.state_field)?;
        if !self.state_on_values.is_empty() {
            return Some(self.state_on_values.iter().any(|v| v == native));
        }
        Some(self.logical_for_native(native) == Value::Bool(true))
    }

    fn logical_for_native(&self, native: &Value) -> Value {
        self.mapping
            .iter()
            .find(|m| &m.native_value == native)
            .map(|m| m.value.clone())
            .unwrap_or_else(|| native.clone())
    }

    fn native_for_logical(&self, logical: &Value) -> Value {
        self.mapping
            .iter()
            .find(|m| &m.value == logical)
            .map(|m| m.native_value.clone())
            .unwrap_or_else(|| logical.clone())
    }

    /// Resolve a logical write into the vendor command to issue.
    ///
    /// The setter mapping is consulted first (per-value overrides, including
    /// a payload override), then the default setter. Without an override the
    /// logical value is translated back to its native counterpart through
    /// the mapping table.
    pub fn write_command(&self, logical: &Value) -> Result<(&str, Value), ConfigurationError> {
        if let Some(row) = self.setter_mapping.iter().find(|m| &m.value == logical) {
            let native = row
                .native_value
                .clone()
                .unwrap_or_else(|| self.native_for_logical(logical));
            return Ok((&row.setter, native));
        }
        let setter = self
            .setter
            .as_deref()
            .ok_or_else(|| ConfigurationError::NoSetter {
                config_id: self.config_id(),
                value: logical.clone(),
            })?;
        Ok((setter, self.native_for_logical(logical)))
    }

    /// Write a logical value to the device.
    ///
    /// Fire-and-report: the result is whatever the vendor client returns, and
    /// confirmation of the new state arrives via the next status push.
    pub async fn set_value(
        &self,
        device: &DeviceHandle,
        logical: Value,
    ) -> Result<Value, SetValueError> {
        let (setter, native) = self.write_command(&logical)?;
        Ok(device.send_command(setter, native).await?)
    }
}

/// Parsed configuration for one device model family.
#[derive(Debug)]
pub struct DeviceConfig {
    name: String,
    source: String,
    products: Vec<String>,
    primary: Arc<EntityConfig>,
    secondary: Vec<Arc<EntityConfig>>,
    services: Vec<DeviceService>,
}

impl DeviceConfig {
    /// Parse and validate a TOML descriptor. `source` names the descriptor
    /// (usually its file name) for diagnostics.
    pub fn from_toml_str(source: &str, text: &str) -> Result<Self, ConfigurationError> {
        let desc: DeviceDescriptor =
            toml::from_str(text).map_err(|e| ConfigurationError::Parse {
                file: source.to_string(),
                source: Box::new(e),
            })?;

        if desc.products.is_empty() {
            return Err(ConfigurationError::NoProducts {
                file: source.to_string(),
            });
        }

        let primary = Arc::new(EntityConfig::build(desc.primary_entity, true)?);
        let secondary = desc
            .secondary_entities
            .into_iter()
            .map(|e| EntityConfig::build(e, false).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: desc.name,
            source: source.to_string(),
            products: desc.products.into_iter().map(|p| p.model).collect(),
            primary,
            secondary,
            services: desc
                .services
                .into_iter()
                .map(|s| DeviceService {
                    name: s.name,
                    command: s.command,
                    value: s.value,
                })
                .collect(),
        })
    }

    /// Display name for the device family.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the descriptor this configuration was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Model identifiers this configuration covers.
    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn matches(&self, model: &str) -> bool {
        self.products.iter().any(|p| p == model)
    }

    /// The device-level entity that service calls target.
    pub fn primary_entity(&self) -> &Arc<EntityConfig> {
        &self.primary
    }

    pub fn secondary_entities(&self) -> impl Iterator<Item = &Arc<EntityConfig>> {
        self.secondary.iter()
    }

    /// Primary entity first, then secondary entities in declaration order.
    pub fn all_entities(&self) -> impl Iterator<Item = &Arc<EntityConfig>> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    pub fn entities_for(&self, kind: EntityKind) -> impl Iterator<Item = &Arc<EntityConfig>> {
        self.all_entities().filter(move |e| e.kind() == kind)
    }

    /// Services this family layers on top of the global ones.
    pub fn services(&self) -> &[DeviceService] {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&DeviceService> {
        self.services.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const KETTLE_TOML: &str = r#"
name = "Test Kettle"

[[products]]
model = "TESTKET01"

[primary_entity]
entity = "sensor"
state_field = "state"
icon = "mdi:kettle"

[[secondary_entities]]
entity = "sensor"
name = "Water Temperature"
state_field = "water_temperature"
device_class = "temperature"
state_class = "measurement"
unit = "C"

[[secondary_entities]]
entity = "binary_sensor"
name = "Boiling"
state_field = "state"
state_on_values = ["Boiling"]

[[secondary_entities]]
entity = "switch"
name = "Boiling"
state_field = "state"
state_on_values = ["Boiling", "Keeping Warm", "Cooling"]
setter = "start_boil"

[[secondary_entities.setter_mapping]]
value = false
setter = "stop_boil"
native_value = true

[[secondary_entities]]
entity = "number"
name = "Boil Temperature"
state_field = "boil_temperature"
setter = "set_boil_temperature"
range = { min = 0, max = 100 }
step = 1

[[services]]
name = "quick_boil"
command = "start_auto_boil"
"#;

    fn kettle() -> DeviceConfig {
        DeviceConfig::from_toml_str("test_kettle.toml", KETTLE_TOML).unwrap()
    }

    fn entity<'a>(config: &'a DeviceConfig, kind: EntityKind, name: &str) -> &'a EntityConfig {
        config
            .all_entities()
            .find(|e| e.kind() == kind && e.name() == Some(name))
            .expect("entity present")
    }

    #[test]
    fn test_descriptor_parses() {
        let config = kettle();
        assert_eq!(config.name(), "Test Kettle");
        assert_eq!(config.products(), ["TESTKET01"]);
        assert!(config.matches("TESTKET01"));
        assert!(!config.matches("OTHER"));
        assert!(config.primary_entity().is_primary());
        assert_eq!(config.secondary_entities().count(), 4);
        assert_eq!(config.service("quick_boil").unwrap().command, "start_auto_boil");
        // `value` defaults to true when the descriptor omits it.
        assert_eq!(config.service("quick_boil").unwrap().value, json!(true));
    }

    #[test]
    fn test_get_value_walks_nested_paths() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
name = "Inner"
state_field = "settings.network.ssid"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();

        let status = json!({"settings": {"network": {"ssid": "kitchen"}}});
        assert_eq!(config.get_value(Some(&status)), Some(json!("kitchen")));

        // Intermediate segment is not a mapping: no value, not an error.
        let status = json!({"settings": 7});
        assert_eq!(config.get_value(Some(&status)), None);

        // Missing key along the path.
        let status = json!({"settings": {}});
        assert_eq!(config.get_value(Some(&status)), None);

        // No snapshot at all.
        assert_eq!(config.get_value(None), None);
    }

    #[test]
    fn test_mapping_translates_and_passes_through() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
name = "Mode"
state_field = "mode"

[[mapping]]
native_value = "KW"
value = "keep_warm"

[[mapping]]
native_value = "BO"
value = "boil"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();

        let status = json!({"mode": "KW"});
        assert_eq!(config.get_value(Some(&status)), Some(json!("keep_warm")));

        // Unmapped native values pass through unchanged.
        let status = json!({"mode": "DESCALE"});
        assert_eq!(config.get_value(Some(&status)), Some(json!("DESCALE")));

        // Every table entry round-trips logical -> native -> logical.
        for logical in [json!("keep_warm"), json!("boil")] {
            let native = config.native_for_logical(&logical);
            assert_eq!(config.logical_for_native(&native), logical);
        }
    }

    #[test]
    fn test_get_number_coerces_and_keeps_absent() {
        let config = kettle();
        let number = entity(&config, EntityKind::Number, "Boil Temperature");

        assert_eq!(number.get_number(Some(&json!({"boil_temperature": 95}))), Some(95.0));
        // The cloud stores some numbers as strings.
        assert_eq!(
            number.get_number(Some(&json!({"boil_temperature": "87.5"}))),
            Some(87.5)
        );
        // Absent stays absent, never zero.
        assert_eq!(number.get_number(Some(&json!({}))), None);
        assert_eq!(number.get_number(None), None);
        // Unparseable values read as unknown.
        assert_eq!(number.get_number(Some(&json!({"boil_temperature": "warm"}))), None);
    }

    #[test]
    fn test_is_on_uses_on_value_set() {
        let config = kettle();
        let boiling = entity(&config, EntityKind::BinarySensor, "Boiling");

        assert_eq!(boiling.is_on(Some(&json!({"state": "Boiling"}))), Some(true));
        assert_eq!(boiling.is_on(Some(&json!({"state": "Idle"}))), Some(false));
        // Absent coerces to unknown, never true.
        assert_eq!(boiling.is_on(Some(&json!({}))), None);
        assert_eq!(boiling.is_on(None), None);
    }

    #[test]
    fn test_is_on_without_on_value_set_compares_logical_true() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "binary_sensor"
name = "Present"
state_field = "kettle_is_present"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();

        assert_eq!(config.is_on(Some(&json!({"kettle_is_present": true}))), Some(true));
        assert_eq!(config.is_on(Some(&json!({"kettle_is_present": false}))), Some(false));
        assert_eq!(config.is_on(Some(&json!({"kettle_is_present": "yes"}))), Some(false));
    }

    #[test]
    fn test_write_command_prefers_setter_mapping() {
        let config = kettle();
        let switch = entity(&config, EntityKind::Switch, "Boiling");

        let (setter, native) = switch.write_command(&json!(true)).unwrap();
        assert_eq!(setter, "start_boil");
        assert_eq!(native, json!(true));

        // The mapped stop command overrides the payload: `stop_boil` still
        // takes `true`, the command itself encodes the direction.
        let (setter, native) = switch.write_command(&json!(false)).unwrap();
        assert_eq!(setter, "stop_boil");
        assert_eq!(native, json!(true));
    }

    #[test]
    fn test_write_command_without_any_setter_fails() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "switch"
name = "Oddball"
state_field = "state"

[[setter_mapping]]
value = true
setter = "start"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();

        // `false` matches no mapping entry and there is no default setter.
        let err = config.write_command(&json!(false)).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoSetter { .. }));
    }

    #[test]
    fn test_writable_entity_without_setter_rejected_at_build() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "switch"
name = "Broken"
state_field = "state"
"#,
        )
        .unwrap();
        let err = EntityConfig::build(desc, false).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSetter { .. }));
    }

    #[test]
    fn test_entity_without_state_field_rejected_at_build() {
        let desc: EntityDescriptor = toml::from_str(r#"entity = "sensor""#).unwrap();
        let err = EntityConfig::build(desc, false).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingStateField { .. }));
    }

    #[test]
    fn test_descriptor_without_products_rejected() {
        let err = DeviceConfig::from_toml_str(
            "empty.toml",
            r#"
name = "No Products"

[primary_entity]
entity = "sensor"
state_field = "state"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NoProducts { .. }));
    }

    #[test]
    fn test_config_id_falls_back_through_name_and_translation_key() {
        let config = kettle();
        let temp = entity(&config, EntityKind::Sensor, "Water Temperature");
        assert_eq!(temp.config_id(), "sensor_water_temperature");

        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
translation_key = "zone_NUM_state"
state_field = "state"

[translation_placeholders]
NUM = "Zone 2"
"#,
        )
        .unwrap();
        let translated = EntityConfig::build(desc, false).unwrap();
        assert_eq!(translated.config_id(), "sensor_zone_zone_2_state");

        // No name, no translation key: bare kind tag.
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
state_field = "state"
"#,
        )
        .unwrap();
        let bare = EntityConfig::build(desc, false).unwrap();
        assert_eq!(bare.config_id(), "sensor");
    }

    #[test]
    fn test_config_id_placeholder_matches_whole_segments_only() {
        // `key` names a placeholder but also occurs inside `door_keypad`;
        // only the standalone segment is substituted.
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
translation_key = "door_keypad_key_state"
state_field = "state"

[translation_placeholders]
key = "Front"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();
        assert_eq!(config.config_id(), "sensor_door_keypad_front_state");
    }

    #[test]
    fn test_config_id_appends_slugified_unmatched_placeholder() {
        let desc: EntityDescriptor = toml::from_str(
            r#"
entity = "sensor"
translation_key = "zone_state"
state_field = "state"

[translation_placeholders]
NUM = "Zone 2"
"#,
        )
        .unwrap();
        let config = EntityConfig::build(desc, false).unwrap();
        assert_eq!(config.config_id(), "sensor_zone_state_zone_2");
    }

    #[test]
    fn test_unit_translation() {
        assert_eq!(unit_from_ascii("C"), "°C");
        assert_eq!(unit_from_ascii("F"), "°F");
        assert_eq!(unit_from_ascii("%"), "%");

        let config = kettle();
        let temp = entity(&config, EntityKind::Sensor, "Water Temperature");
        assert_eq!(temp.unit(), Some("°C"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Water Temperature"), "water_temperature");
        assert_eq!(slugify("Kettle is Present"), "kettle_is_present");
        assert_eq!(slugify("  spaced  out  "), "spaced_out");
        assert_eq!(slugify("MixedCase-42"), "mixedcase_42");
    }
}
