//! Owned copies of the answers returned by the driver.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use super::error::{DriverError, DriverResult};

/// A value held by an attribute, or produced by an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl AttributeValue {
    /// Get the value as an integer.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            AttributeValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Long(v) => write!(f, "{}", v),
            AttributeValue::Double(v) => write!(f, "{}", v),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
        }
    }
}

/// A concept bound to a variable in an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Concept {
    /// An entity instance, identified by its type label.
    Entity { label: String },
    /// A relation instance.
    Relation { label: String },
    /// An attribute instance and its value.
    Attribute { label: String, value: AttributeValue },
    /// A schema type.
    Type { label: String },
    /// A bare value bound to a value variable.
    Value(AttributeValue),
}

impl Concept {
    /// The type label of the concept, if it has one.
    pub fn label(&self) -> Option<&str> {
        match self {
            Concept::Entity { label }
            | Concept::Relation { label }
            | Concept::Attribute { label, .. }
            | Concept::Type { label } => Some(label),
            Concept::Value(_) => None,
        }
    }

    /// The value carried by an attribute or value concept.
    pub fn value(&self) -> Option<&AttributeValue> {
        match self {
            Concept::Attribute { value, .. } | Concept::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// One answer of a match query: variable name to concept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptRow {
    concepts: BTreeMap<String, Concept>,
}

impl ConceptRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a variable binding.
    pub fn with(mut self, variable: impl Into<String>, concept: Concept) -> Self {
        self.insert(variable, concept);
        self
    }

    /// Bind a variable.
    pub fn insert(&mut self, variable: impl Into<String>, concept: Concept) {
        self.concepts.insert(variable.into(), concept);
    }

    /// Get the concept bound to a variable.
    pub fn get(&self, variable: &str) -> Option<&Concept> {
        self.concepts.get(variable)
    }

    /// Get the string value of the attribute bound to a variable.
    pub fn string(&self, variable: &str) -> DriverResult<&str> {
        let concept = self.get(variable).ok_or_else(|| {
            DriverError::UnexpectedAnswer(format!("variable ${} is not bound", variable))
        })?;
        concept.value().and_then(AttributeValue::as_str).ok_or_else(|| {
            DriverError::UnexpectedAnswer(format!("${} is not a string attribute", variable))
        })
    }
}

impl FromIterator<(String, Concept)> for ConceptRow {
    fn from_iter<I: IntoIterator<Item = (String, Concept)>>(iter: I) -> Self {
        Self {
            concepts: iter.into_iter().collect(),
        }
    }
}
