//! Normalized type descriptors consumed by the describer registry.

use serde::{Deserialize, Serialize};

/// Builtin kind of a normalized type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    String,
    Int,
    Float,
    Bool,
    Array,
    Object,
    Null,
    Mixed,
}

impl BuiltinKind {
    /// Returns the JSON Schema `type` keyword for this kind.
    ///
    /// `Mixed` has no `type` (any value is accepted).
    pub fn schema_type(self) -> Option<&'static str> {
        match self {
            BuiltinKind::String => Some("string"),
            BuiltinKind::Int => Some("integer"),
            BuiltinKind::Float => Some("number"),
            BuiltinKind::Bool => Some("boolean"),
            BuiltinKind::Array => Some("array"),
            BuiltinKind::Object => Some("object"),
            BuiltinKind::Null => Some("null"),
            BuiltinKind::Mixed => None,
        }
    }

    /// Returns the JSON Schema `format` keyword, when the kind implies one.
    pub fn schema_format(self) -> Option<&'static str> {
        match self {
            BuiltinKind::Float => Some("float"),
            _ => None,
        }
    }

    /// Short name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinKind::String => "string",
            BuiltinKind::Int => "int",
            BuiltinKind::Float => "float",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Array => "array",
            BuiltinKind::Object => "object",
            BuiltinKind::Null => "null",
            BuiltinKind::Mixed => "mixed",
        }
    }
}

/// Normalized description of one type a value may take.
///
/// A value may be described by several descriptors at once (union arity);
/// describers declare how many and which shapes they accept. Descriptors are
/// constructed fresh per reflection site and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Builtin kind of the value.
    pub builtin: BuiltinKind,
    /// Identity of a named class/enum type when `builtin` is `object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Whether the declared type admits null.
    #[serde(default)]
    pub nullable: bool,
    /// Element descriptor, present for ordered or keyed collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// A plain builtin descriptor (non-nullable, no class, no element).
    pub fn builtin(builtin: BuiltinKind) -> Self {
        TypeDescriptor {
            builtin,
            class_name: None,
            nullable: false,
            element: None,
        }
    }

    /// A named object/enum type descriptor.
    pub fn object(class_name: impl Into<String>) -> Self {
        TypeDescriptor {
            builtin: BuiltinKind::Object,
            class_name: Some(class_name.into()),
            nullable: false,
            element: None,
        }
    }

    /// An ordered collection (list) of `element`.
    pub fn list_of(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            builtin: BuiltinKind::Array,
            class_name: None,
            nullable: false,
            element: Some(Box::new(element)),
        }
    }

    /// A keyed collection (map) of `element`.
    pub fn map_of(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            builtin: BuiltinKind::Object,
            class_name: None,
            nullable: false,
            element: Some(Box::new(element)),
        }
    }

    /// Marks the descriptor nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Copy of this descriptor with the nullable flag cleared.
    pub fn strip_nullable(&self) -> Self {
        let mut stripped = self.clone();
        stripped.nullable = false;
        stripped
    }

    /// Human-readable shape, used in diagnostics.
    ///
    /// Examples: `string`, `?int`, `array<string>`, `object<App.User>`.
    pub fn shape(&self) -> String {
        let base = match (&self.class_name, &self.element) {
            (Some(class), _) => format!("object<{}>", class),
            (None, Some(element)) => format!("{}<{}>", self.builtin.as_str(), element.shape()),
            (None, None) => self.builtin.as_str().to_string(),
        };
        if self.nullable {
            format!("?{}", base)
        } else {
            base
        }
    }
}

/// Formats a descriptor set for diagnostics, e.g. `?string | int`.
pub fn shape_of(types: &[TypeDescriptor]) -> String {
    types
        .iter()
        .map(TypeDescriptor::shape)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_type_mapping() {
        assert_eq!(BuiltinKind::String.schema_type(), Some("string"));
        assert_eq!(BuiltinKind::Int.schema_type(), Some("integer"));
        assert_eq!(BuiltinKind::Float.schema_type(), Some("number"));
        assert_eq!(BuiltinKind::Bool.schema_type(), Some("boolean"));
        assert_eq!(BuiltinKind::Mixed.schema_type(), None);
    }

    #[test]
    fn shape_scalar() {
        assert_eq!(TypeDescriptor::builtin(BuiltinKind::Int).shape(), "int");
        assert_eq!(
            TypeDescriptor::builtin(BuiltinKind::String)
                .nullable()
                .shape(),
            "?string"
        );
    }

    #[test]
    fn shape_nested() {
        let list = TypeDescriptor::list_of(TypeDescriptor::builtin(BuiltinKind::String));
        assert_eq!(list.shape(), "array<string>");

        let obj = TypeDescriptor::object("App.User").nullable();
        assert_eq!(obj.shape(), "?object<App.User>");
    }

    #[test]
    fn shape_of_union() {
        let types = [
            TypeDescriptor::builtin(BuiltinKind::String),
            TypeDescriptor::builtin(BuiltinKind::Int),
        ];
        assert_eq!(shape_of(&types), "string | int");
    }

    #[test]
    fn strip_nullable_preserves_rest() {
        let desc = TypeDescriptor::object("App.User").nullable();
        let stripped = desc.strip_nullable();
        assert!(!stripped.nullable);
        assert_eq!(stripped.class_name.as_deref(), Some("App.User"));
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let desc: TypeDescriptor = serde_json::from_value(serde_json::json!({
            "builtin": "string"
        }))
        .unwrap();
        assert_eq!(desc.builtin, BuiltinKind::String);
        assert!(!desc.nullable);
        assert!(desc.class_name.is_none());
        assert!(desc.element.is_none());
    }
}
