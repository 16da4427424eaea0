//! Core data models for sobject schema export.
//!
//! Describe documents are kept opaque: nothing in objexport interprets the
//! fields, record types, or permissions inside them. The only structure this
//! module enforces is the collection itself, an insertion-ordered map with
//! unique object names.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One entry of the org's global describe listing.
///
/// The remote listing carries many more attributes per object; only the
/// two used for filtering and progress reporting are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// API name, e.g. `Account` or `Invoice__c`
    pub name: String,
    /// Display label
    pub label: String,
}

impl ObjectSummary {
    /// Creates a summary from a name and label.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Full describe document of a single object.
///
/// Serialized transparently, so YAML and JSON output contain exactly the
/// document the org returned, keys in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectDescription(serde_json::Value);

impl ObjectDescription {
    /// Wraps a raw describe document.
    pub const fn new(document: serde_json::Value) -> Self {
        Self(document)
    }

    /// Borrows the underlying document.
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the description and returns the underlying document.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for ObjectDescription {
    fn from(document: serde_json::Value) -> Self {
        Self(document)
    }
}

/// Object name to describe document, in discovery order.
///
/// # Invariants
/// - Names are unique; [`insert`](Self::insert) rejects a repeated name
/// - Iteration and serialization order is insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptionCollection {
    entries: Vec<(String, ObjectDescription)>,
}

impl DescriptionCollection {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of described objects.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no object has been described.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `name` has already been described.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Looks up the description stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ObjectDescription> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, description)| description)
    }

    /// Appends a description.
    ///
    /// # Errors
    /// Returns [`ObjExportError::DuplicateObject`](crate::ObjExportError::DuplicateObject)
    /// if `name` is already present; the collection is left unchanged.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        description: ObjectDescription,
    ) -> crate::Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(crate::error::ObjExportError::DuplicateObject { name });
        }
        self.entries.push((name, description));
        Ok(())
    }

    /// Object names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectDescription)> {
        self.entries
            .iter()
            .map(|(name, description)| (name.as_str(), description))
    }
}

impl Serialize for DescriptionCollection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, description) in &self.entries {
            map.serialize_entry(name, description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DescriptionCollection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = DescriptionCollection;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of object name to describe document")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut collection = DescriptionCollection::new();
                while let Some((name, description)) =
                    access.next_entry::<String, ObjectDescription>()?
                {
                    collection
                        .insert(name, description)
                        .map_err(<A::Error as serde::de::Error>::custom)?;
                }
                Ok(collection)
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
