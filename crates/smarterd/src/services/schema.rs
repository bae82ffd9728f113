//! Service call payloads and their validation rules.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required key not provided: {0}")]
    MissingKey(&'static str),

    #[error("must contain at least one of entity_id, device_id, area_id, label_id")]
    NoTarget,

    #[error("must contain at least one of command_data_text, command_data_number, command_data_boolean")]
    NoCommandData,

    #[error("must contain at most one of command_data_text, command_data_number, command_data_boolean")]
    AmbiguousCommandData,
}

/// A raw service call as received from the frontend.
///
/// Target selectors accept lists; an omitted selector is an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceCall {
    #[serde(default)]
    pub entity_id: Vec<String>,
    #[serde(default)]
    pub device_id: Vec<String>,
    #[serde(default)]
    pub area_id: Vec<String>,
    #[serde(default)]
    pub label_id: Vec<String>,

    pub command_name: Option<String>,
    pub command_data_text: Option<String>,
    pub command_data_number: Option<f64>,
    pub command_data_boolean: Option<bool>,
}

impl ServiceCall {
    /// A call must name at least one target selector to be dispatchable.
    pub fn validate_target(&self) -> Result<(), ValidationError> {
        if self.entity_id.is_empty()
            && self.device_id.is_empty()
            && self.area_id.is_empty()
            && self.label_id.is_empty()
        {
            return Err(ValidationError::NoTarget);
        }
        Ok(())
    }

    /// Full validation for `send_command`: target, name, and exactly one
    /// data variant. Returns the command name and its JSON value.
    pub fn validate_send_command(&self) -> Result<(&str, Value), ValidationError> {
        self.validate_target()?;
        let name = self
            .command_name
            .as_deref()
            .ok_or(ValidationError::MissingKey("command_name"))?;

        let mut values = Vec::new();
        if let Some(text) = &self.command_data_text {
            values.push(Value::String(text.clone()));
        }
        if let Some(number) = self.command_data_number {
            values.push(serde_json::json!(number));
        }
        if let Some(boolean) = self.command_data_boolean {
            values.push(Value::Bool(boolean));
        }

        match values.len() {
            0 => Err(ValidationError::NoCommandData),
            1 => Ok((name, values.remove(0))),
            _ => Err(ValidationError::AmbiguousCommandData),
        }
    }
}
