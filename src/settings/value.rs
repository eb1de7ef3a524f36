//! Scalar values stored at the leaves of the settings tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl SettingValue {
    /// Converts a JSON scalar. Returns `None` for arrays, objects and nulls.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Whether the value has a JSON representation. NaN and infinities do not.
    pub fn is_storable(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Typed extraction used by [`SettingsStore::get`](super::SettingsStore::get).
///
/// Returns `None` when the stored value has an incompatible type, in which
/// case the caller's default is used.
pub trait FromSettingValue: Sized {
    fn from_setting(value: &SettingValue) -> Option<Self>;
}

impl FromSettingValue for bool {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromSettingValue for i64 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromSettingValue for i32 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        i64::from_setting(value).and_then(|i| i32::try_from(i).ok())
    }
}

impl FromSettingValue for u32 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        i64::from_setting(value).and_then(|i| u32::try_from(i).ok())
    }
}

impl FromSettingValue for f64 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromSettingValue for String {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_convert() {
        assert_eq!(
            SettingValue::from_json(&serde_json::json!(true)),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(
            SettingValue::from_json(&serde_json::json!(42)),
            Some(SettingValue::Int(42))
        );
        assert_eq!(
            SettingValue::from_json(&serde_json::json!(1.5)),
            Some(SettingValue::Float(1.5))
        );
        assert_eq!(
            SettingValue::from_json(&serde_json::json!("x")),
            Some(SettingValue::String("x".into()))
        );
        assert_eq!(SettingValue::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(SettingValue::from_json(&serde_json::Value::Null), None);
        assert_eq!(SettingValue::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn scalars_serialize_untagged() {
        assert_eq!(SettingValue::Int(7).to_json(), serde_json::json!(7));
        assert_eq!(SettingValue::Float(0.25).to_json(), serde_json::json!(0.25));
        assert_eq!(SettingValue::from("s").to_json(), serde_json::json!("s"));
        assert_eq!(SettingValue::Bool(false).to_json(), serde_json::json!(false));
    }

    #[test]
    fn non_finite_floats_are_not_storable() {
        assert!(SettingValue::Float(1.5).is_storable());
        assert!(!SettingValue::Float(f64::NAN).is_storable());
        assert!(!SettingValue::Float(f64::INFINITY).is_storable());
        assert!(SettingValue::from("nan").is_storable());
    }

    #[test]
    fn typed_extraction_rejects_mismatched_types() {
        assert_eq!(bool::from_setting(&SettingValue::Int(1)), None);
        assert_eq!(i32::from_setting(&SettingValue::Int(i64::MAX)), None);
        assert_eq!(u32::from_setting(&SettingValue::Int(-1)), None);
        assert_eq!(f64::from_setting(&SettingValue::Int(3)), Some(3.0));
        assert_eq!(
            String::from_setting(&SettingValue::String("a".into())),
            Some("a".to_string())
        );
    }
}
