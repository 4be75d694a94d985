use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json::{deserialize_some, empty_to_null, get_bool, get_int, split_commas};

/// A device as the configuration API stores it. Fields not listed here are
/// kept in `extra` and written back unchanged.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SnmpDeviceCfg {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_flt_freq: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp_debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_bulk: Option<bool>,

    // list fields come back as null when unset, the null is kept
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_tags: Option<Option<Vec<String>>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub meas_filters: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub measurement_groups: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A device record as edited in the UI: loosely typed, values may be strings,
/// numbers or booleans regardless of the field.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct DeviceForm(Map<String, Value>);

impl DeviceForm {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("ID").and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for DeviceForm {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for DeviceForm {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl TryFrom<&SnmpDeviceCfg> for DeviceForm {
    type Error = serde_json::Error;

    fn try_from(value: &SnmpDeviceCfg) -> Result<Self, Self::Error> {
        DeviceForm::try_from(serde_json::to_value(value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    // add and edit
    Config,
    // ping and query, UpdateFltFreq is left as is
    Console,
}

/// Coerces the form into the shape the API expects. Unknown fields pass
/// through untouched.
pub fn normalize(form: &DeviceForm, mode: NormalizeMode) -> Map<String, Value> {
    form.iter()
        .map(|(key, value)| (key.clone(), normalize_field(key, value, mode)))
        .collect()
}

fn normalize_field(key: &str, value: &Value, mode: NormalizeMode) -> Value {
    match key {
        "Port" | "Retries" | "Timeout" | "Repeat" | "Freq" => get_int(value),
        "UpdateFltFreq" if mode == NormalizeMode::Config => get_int(value),
        "Active" | "SnmpDebug" | "DisableBulk" => Value::Bool(get_bool(value)),
        "ExtraTags" => split_commas(value),
        "MeasFilters" | "MeasurementGroups" => empty_to_null(value),
        _ => value.clone(),
    }
}
