//! Normalized reflection metadata consumed by the translation engine.
//!
//! Raw reflection (property names, declared nullability, docblock types,
//! attributes) is assumed to arrive already normalized into this model,
//! typically deserialized from a JSON file produced by an extractor.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GenerateError;
use crate::types::TypeDescriptor;

/// Metadata for one named class or backed enum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Parent class identity, if any. Used for nominal subtype checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Whether the class carries the JSON-request marker capability.
    #[serde(default)]
    pub json_request: bool,
    /// Ordered members of the class.
    #[serde(default)]
    pub members: Vec<MemberMetadata>,
    /// Backing values when the class is an enum. An enum has no members.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

/// One member (property) of a class, with its declared attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberMetadata {
    /// Declared member name.
    pub name: String,
    /// Descriptor set for the member (union arity).
    pub types: Vec<TypeDescriptor>,
    /// Whether the member declares a default value.
    #[serde(default)]
    pub has_default: bool,
    /// Serialization groups the member belongs to. Empty = all groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Validation constraints (minimum, maximum, pattern, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub constraints: Map<String, Value>,
    /// Declared schema override fragment, merged over the generated schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Declared parameter attribute, if the member maps to a parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<ParameterAttribute>,
}

impl MemberMetadata {
    /// A member with only a name and descriptor set (test/builder convenience).
    pub fn new(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        MemberMetadata {
            name: name.into(),
            types,
            has_default: false,
            groups: Vec::new(),
            constraints: Map::new(),
            schema: None,
            parameter: None,
        }
    }

    /// A member is required when it is non-nullable and has no default.
    pub fn is_required(&self) -> bool {
        !self.has_default
            && !self.types.is_empty()
            && self.types.iter().all(|t| {
                !t.nullable && t.builtin != crate::types::BuiltinKind::Null
            })
    }
}

/// Declared parameter attribute on a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterAttribute {
    /// Explicit parameter name. Defaults to the member name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter location: `query`, `header`, `path` or `cookie`.
    #[serde(rename = "in")]
    pub location: String,
    /// Remaining attribute fields (description, required, schema, ...),
    /// merged verbatim onto the parameter node.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One handler argument: the descriptor set it was declared with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentMetadata {
    pub types: Vec<TypeDescriptor>,
}

/// Metadata for one endpoint (handler signature plus declared attributes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointMetadata {
    /// HTTP method, e.g. `post`.
    pub method: String,
    /// URL path template, e.g. `/users/{id}`.
    pub path: String,
    /// Optional operation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Literal request-body fragment declared directly on the handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Serialization groups declared at the handler site.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Handler arguments in declaration order.
    #[serde(default)]
    pub arguments: Vec<ArgumentMetadata>,
}

impl EndpointMetadata {
    /// Label used when reporting per-endpoint failures.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.method.to_uppercase(), self.path),
        }
    }
}

/// Registry of class metadata keyed by class identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRegistry {
    classes: BTreeMap<String, ClassMetadata>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry::default()
    }

    /// Registers (or replaces) metadata for a class identity.
    pub fn insert(&mut self, name: impl Into<String>, metadata: ClassMetadata) {
        self.classes.insert(name.into(), metadata);
    }

    /// Looks up metadata for a class identity.
    pub fn get(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    /// Nominal type check: `class` equals `ancestor` or transitively
    /// extends it. Cyclic `extends` chains terminate as non-matching.
    pub fn same_or_subtype(&self, class: &str, ancestor: &str) -> bool {
        let mut current = class;
        // Depth bound guards against malformed cyclic extends chains
        for _ in 0..64 {
            if current == ancestor {
                return true;
            }
            match self.get(current).and_then(|c| c.extends.as_deref()) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

/// Full metadata input: classes plus the endpoints to document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMetadata {
    #[serde(default)]
    pub classes: ClassRegistry,
    #[serde(default)]
    pub endpoints: Vec<EndpointMetadata>,
}

/// Load API metadata from a JSON file.
///
/// # Errors
///
/// Returns `GenerateError` if the file is missing, unreadable, or not valid
/// metadata JSON.
pub fn load_metadata(path: &Path) -> Result<ApiMetadata, GenerateError> {
    if !path.exists() {
        return Err(GenerateError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| GenerateError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| GenerateError::InvalidJson { source })
}
