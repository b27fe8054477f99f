use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote collection.
///
/// Servers in the wild hand out either integers or strings; the wire form is
/// kept as received so it round-trips into request paths unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    /// Parses user input, preferring the numeric form when it fits.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<u64>()
            .map(RecordId::Number)
            .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
    }

    /// True when both ids address the same `<base>/<id>` path, so typed input
    /// such as `1` finds a record the server keyed as `"1"`.
    pub fn addresses_same(&self, other: &RecordId) -> bool {
        self == other || self.to_string() == other.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(value) => write!(f, "{value}"),
            RecordId::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub number: String,
}

/// Request body for create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub number: String,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_numeric_ids() {
        assert_eq!(RecordId::parse("42"), RecordId::Number(42));
        assert_eq!(
            RecordId::parse("5f1a-c"),
            RecordId::Text("5f1a-c".to_string())
        );
    }

    #[test]
    fn numeric_looking_text_id_addresses_same_record() {
        let typed = RecordId::parse("1");
        let stored = RecordId::Text("1".to_string());
        assert!(typed.addresses_same(&stored));
        assert!(stored.addresses_same(&typed));
        assert!(!typed.addresses_same(&RecordId::Text("01".to_string())));
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(RecordId::Number(7).to_string(), "7");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
    }
}
