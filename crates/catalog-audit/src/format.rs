//! Canonical text rendering of field values.
//!
//! The formatted string is the only thing compared when diffing, so two
//! values are equal for audit purposes iff they format identically.

use chrono::{DateTime, SecondsFormat, Utc};

use catalog_core::types::id::{PluginId, TeamId, UserId};
use catalog_entity::user::UserRole;

/// A field value read off a tracked record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value. Formats as the empty string.
    Absent,
    /// Free text.
    Text(String),
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// An enumeration member, by symbolic name.
    Enum(&'static str),
    /// A point in time.
    Timestamp(DateTime<Utc>),
}

/// Render a value to its canonical string.
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::Bool(true) => "True".to_string(),
        FieldValue::Bool(false) => "False".to_string(),
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Float(n) => n.to_string(),
        FieldValue::Enum(name) => (*name).to_string(),
        FieldValue::Timestamp(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<UserRole> for FieldValue {
    fn from(value: UserRole) -> Self {
        Self::Enum(value.variant_name())
    }
}

impl From<TeamId> for FieldValue {
    fn from(value: TeamId) -> Self {
        Self::Int(value.get())
    }
}

impl From<PluginId> for FieldValue {
    fn from(value: PluginId) -> Self {
        Self::Int(value.get())
    }
}

impl From<UserId> for FieldValue {
    fn from(value: UserId) -> Self {
        Self::Int(value.get())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_booleans_are_capitalized() {
        assert_eq!(format_value(&true.into()), "True");
        assert_eq!(format_value(&false.into()), "False");
    }

    #[test]
    fn test_absent_is_empty_not_null() {
        assert_eq!(format_value(&FieldValue::from(None::<String>)), "");
        assert_eq!(format_value(&FieldValue::Absent), "");
    }

    #[test]
    fn test_absent_and_empty_text_are_equal() {
        assert_eq!(
            format_value(&FieldValue::from(None::<&str>)),
            format_value(&FieldValue::from(""))
        );
    }

    #[test]
    fn test_enum_renders_symbolic_name() {
        assert_eq!(format_value(&UserRole::Admin.into()), "Admin");
    }

    #[test]
    fn test_numbers_are_locale_independent() {
        assert_eq!(format_value(&1234567i64.into()), "1234567");
        assert_eq!(format_value(&1.5f64.into()), "1.5");
        assert_eq!(format_value(&(-3i32).into()), "-3");
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(format_value(&at.into()), "2024-05-06T07:08:09Z");
    }
}
