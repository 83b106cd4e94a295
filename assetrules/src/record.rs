//! Request-scoped record values exchanged with the data store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lookup to another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity: String,
    pub id: RecordId,
}

impl EntityRef {
    pub fn new(entity: impl Into<String>, id: RecordId) -> Self {
        Self {
            entity: entity.into(),
            id,
        }
    }
}

/// Typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    OptionSet(i32),
    Reference(EntityRef),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::OptionSet(value) => write!(f, "#{value}"),
            Self::Reference(reference) => write!(f, "{}:{}", reference.entity, reference.id),
            Self::DateTime(value) => f.write_str(&value.to_rfc3339()),
        }
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

impl From<EntityRef> for FieldValue {
    fn from(value: EntityRef) -> Self {
        Self::Reference(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// One entity record: logical name, id and attribute bag.
///
/// An attribute that is present but `Null` still counts for [`Record::contains`],
/// matching how a change payload can explicitly clear a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub entity: String,
    pub id: RecordId,
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(entity: impl Into<String>, id: RecordId) -> Self {
        Self {
            entity: entity.into(),
            id,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.attributes.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.attributes.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Text value, treating an empty string like an absent one.
    pub fn non_empty_text(&self, field: &str) -> Option<&str> {
        self.text(field).filter(|value| !value.is_empty())
    }

    pub fn option_value(&self, field: &str) -> Option<i32> {
        match self.get(field) {
            Some(FieldValue::OptionSet(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.get(field) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn decimal(&self, field: &str) -> Option<f64> {
        match self.get(field) {
            Some(FieldValue::Decimal(value)) => Some(*value),
            Some(FieldValue::Integer(value)) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn reference(&self, field: &str) -> Option<&EntityRef> {
        match self.get(field) {
            Some(FieldValue::Reference(value)) => Some(value),
            _ => None,
        }
    }

    pub fn datetime(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.get(field) {
            Some(FieldValue::DateTime(value)) => Some(*value),
            _ => None,
        }
    }

    /// Copies every attribute of `changes` onto this record.
    pub fn apply(&mut self, changes: &Record) {
        for (field, value) in &changes.attributes {
            self.attributes.insert(field.clone(), value.clone());
        }
    }

    /// Copy of this record restricted to `columns`.
    pub fn project(&self, columns: &[&str]) -> Record {
        let mut projected = Record::new(self.entity.clone(), self.id);
        for column in columns {
            if let Some(value) = self.attributes.get(*column) {
                projected.attributes.insert((*column).to_string(), value.clone());
            }
        }
        projected
    }
}
