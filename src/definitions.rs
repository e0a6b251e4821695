//! Run-scoped reference table for named object definitions.
//!
//! Object types are described once per generation run and referenced by name
//! everywhere else. The table is the cycle-breaking and deduplication
//! mechanism: a class already reserved (even if its definition is still being
//! assembled) is emitted as a `$ref` node instead of being re-walked.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::DescribeError;

/// How reference names are derived from class identities.
///
/// What makes two classes resolve to the same reference name is a
/// configuration decision; with `ShortName` a collision between distinct
/// classes is a hard [`DescribeError::AmbiguousReference`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Last segment of the class identity (`App.User` -> `User`).
    #[default]
    ShortName,
    /// Full identity with separators normalized (`App\User` -> `App.User`).
    FullyQualified,
}

impl NamingStrategy {
    /// Derive the reference name for a class identity.
    pub fn derive(self, class: &str) -> String {
        let normalized = class.replace("\\", ".").replace("::", ".");
        match self {
            NamingStrategy::ShortName => normalized
                .rsplit('.')
                .next()
                .unwrap_or(&normalized)
                .to_string(),
            NamingStrategy::FullyQualified => normalized,
        }
    }
}

/// Class-identity -> reference-name table plus finished definitions.
///
/// One table spans the whole generation run: a class referenced from many
/// endpoints reuses the same name and underlying definition everywhere.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    naming: NamingStrategy,
    /// class identity -> reference name (reserved or finished)
    names: BTreeMap<String, String>,
    /// reference name -> owning class identity, for collision detection
    owners: BTreeMap<String, String>,
    /// reference name -> finished schema
    schemas: Map<String, Value>,
}

impl Definitions {
    pub fn new(naming: NamingStrategy) -> Self {
        Definitions {
            naming,
            ..Definitions::default()
        }
    }

    /// Reference name already assigned to `class`, if any.
    pub fn reference_for(&self, class: &str) -> Option<&str> {
        self.names.get(class).map(String::as_str)
    }

    /// Reserve a reference name for `class` before walking its members.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousReference` if the derived name already belongs to a
    /// different class: two unrelated schemas must never silently alias.
    pub fn reserve(&mut self, class: &str) -> Result<String, DescribeError> {
        if let Some(name) = self.names.get(class) {
            return Ok(name.clone());
        }

        let name = self.naming.derive(class);
        if let Some(existing) = self.owners.get(&name) {
            if existing != class {
                return Err(DescribeError::AmbiguousReference {
                    name,
                    existing: existing.clone(),
                    conflicting: class.to_string(),
                });
            }
        }

        self.names.insert(class.to_string(), name.clone());
        self.owners.insert(name.clone(), class.to_string());
        Ok(name)
    }

    /// Record the finished schema for a previously reserved name.
    pub fn finish(&mut self, name: &str, schema: Value) {
        self.schemas.insert(name.to_string(), schema);
    }

    /// The `$ref` pointer for a reference name.
    pub fn ref_path(name: &str) -> String {
        format!("#/components/schemas/{}", name)
    }

    /// Finished definitions, keyed by reference name.
    pub fn schemas(&self) -> &Map<String, Value> {
        &self.schemas
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Consume the table into a `components` document fragment.
    pub fn into_components(self) -> Value {
        let mut components = Map::new();
        components.insert("schemas".to_string(), Value::Object(self.schemas));
        Value::Object(components)
    }
}
