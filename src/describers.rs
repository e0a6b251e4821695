//! Concrete describers and the default registration order.

use serde_json::{json, Map, Value};

use crate::context::{self, Context};
use crate::definitions::Definitions;
use crate::document::GeneratorConfig;
use crate::error::DescribeError;
use crate::merge;
use crate::metadata::{ClassRegistry, MemberMetadata};
use crate::registry::{Describer, DescriberRegistry};
use crate::types::{shape_of, BuiltinKind, TypeDescriptor};

/// Build the standard registry for a configuration.
///
/// Registration order is part of the dispatch contract (first claiming
/// describer wins):
///
/// 1. union/nullable (multi-descriptor sets and single nullable descriptors)
/// 2. collection (any single descriptor with an element type)
/// 3. scalars (string, int, float, bool, null)
/// 4. mixed
/// 5. uploaded-file, when configured - before the generic object describer
///    so the upload marker type never gets walked as a plain object
/// 6. object/enum
///
/// New types are supported by registering an additional describer; existing
/// ones never need modification.
pub fn default_registry(config: &GeneratorConfig) -> DescriberRegistry {
    let mut registry = DescriberRegistry::new();
    register_defaults(&mut registry, config);
    registry
}

/// Append the standard describer set to an existing registry.
///
/// Describers already registered keep priority over the defaults, so a
/// caller can claim specific shapes ahead of the standard dispatch order.
pub fn register_defaults(registry: &mut DescriberRegistry, config: &GeneratorConfig) {
    registry.register(Box::new(UnionDescriber));
    registry.register(Box::new(CollectionDescriber));
    for kind in [
        BuiltinKind::String,
        BuiltinKind::Int,
        BuiltinKind::Float,
        BuiltinKind::Bool,
        BuiltinKind::Null,
    ] {
        registry.register(Box::new(ScalarDescriber::new(kind)));
    }
    registry.register(Box::new(MixedDescriber));
    if let Some(class) = &config.file_upload_class {
        registry.register(Box::new(UploadedFileDescriber::new(class.clone())));
    }
    registry.register(Box::new(ObjectDescriber::new(
        config.file_upload_class.clone(),
    )));
}

/// Sets `type`/`format` for exactly one non-nullable builtin scalar.
pub struct ScalarDescriber {
    kind: BuiltinKind,
}

impl ScalarDescriber {
    pub fn new(kind: BuiltinKind) -> Self {
        ScalarDescriber { kind }
    }
}

impl Describer for ScalarDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() == 1
            && !types[0].nullable
            && types[0].builtin == self.kind
            && types[0].element.is_none()
            && types[0].class_name.is_none()
    }

    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        _registry: &DescriberRegistry,
        _classes: &ClassRegistry,
        _defs: &mut Definitions,
        _context: &Context,
        _types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        if let Some(schema_type) = self.kind.schema_type() {
            schema.insert("type".to_string(), json!(schema_type));
        }
        if let Some(format) = self.kind.schema_format() {
            schema.insert("format".to_string(), json!(format));
        }
        Ok(())
    }
}

/// `mixed` accepts any value: the schema stays unconstrained.
pub struct MixedDescriber;

impl Describer for MixedDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() == 1
            && !types[0].nullable
            && types[0].builtin == BuiltinKind::Mixed
            && types[0].element.is_none()
    }

    fn describe(
        &self,
        _schema: &mut Map<String, Value>,
        _registry: &DescriberRegistry,
        _classes: &ClassRegistry,
        _defs: &mut Definitions,
        _context: &Context,
        _types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        Ok(())
    }
}

/// Ordered and keyed collections; recurses on the element descriptor.
pub struct CollectionDescriber;

impl Describer for CollectionDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() == 1 && !types[0].nullable && types[0].element.is_some()
    }

    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        registry: &DescriberRegistry,
        classes: &ClassRegistry,
        defs: &mut Definitions,
        context: &Context,
        types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        let Some(element) = types[0].element.as_deref() else {
            return Err(DescribeError::UnsupportedType {
                shape: shape_of(types),
            });
        };

        // Lists become `items`, keyed collections `additionalProperties`;
        // the element subtree keeps the caller's context.
        let slot = if types[0].builtin == BuiltinKind::Array {
            schema
                .entry("type".to_string())
                .or_insert_with(|| json!("array"));
            "items"
        } else {
            schema
                .entry("type".to_string())
                .or_insert_with(|| json!("object"));
            "additionalProperties"
        };

        let mut element_schema = match schema.remove(slot) {
            Some(Value::Object(existing)) => existing,
            _ => Map::new(),
        };
        registry.dispatch(
            &mut element_schema,
            classes,
            defs,
            context,
            std::slice::from_ref(element),
        )?;
        schema.insert(slot.to_string(), Value::Object(element_schema));
        Ok(())
    }
}

/// Nullable scalars/objects and true unions.
///
/// A single nullable descriptor delegates to the describer for its stripped
/// shape and flags the result nullable. A multi-descriptor union builds a
/// `oneOf` composite, each entry dispatched on a singleton slice; `null`
/// union members collapse into the nullable flag.
pub struct UnionDescriber;

impl Describer for UnionDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() >= 2 || (types.len() == 1 && types[0].nullable)
    }

    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        registry: &DescriberRegistry,
        classes: &ClassRegistry,
        defs: &mut Definitions,
        context: &Context,
        types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        if types.len() == 1 {
            // Stripping nullability yields a different descriptor set, so
            // the recursive dispatch cannot loop back here.
            let delegate = types[0].strip_nullable();
            registry.dispatch(schema, classes, defs, context, &[delegate])?;
            schema.insert("nullable".to_string(), json!(true));
            return Ok(());
        }

        let mut nullable = false;
        let mut variants: Vec<TypeDescriptor> = Vec::new();
        for descriptor in types {
            if descriptor.builtin == BuiltinKind::Null {
                nullable = true;
                continue;
            }
            if descriptor.nullable {
                nullable = true;
            }
            let stripped = descriptor.strip_nullable();
            if !variants.contains(&stripped) {
                variants.push(stripped);
            }
        }

        match variants.len() {
            0 => {
                schema.insert("type".to_string(), json!("null"));
                return Ok(());
            }
            1 => {
                registry.dispatch(schema, classes, defs, context, &variants[..1])?;
            }
            _ => {
                let mut one_of = Vec::new();
                for variant in &variants {
                    let mut variant_schema = Map::new();
                    registry.dispatch(
                        &mut variant_schema,
                        classes,
                        defs,
                        context,
                        std::slice::from_ref(variant),
                    )?;
                    let entry = Value::Object(variant_schema);
                    if !one_of.contains(&entry) {
                        one_of.push(entry);
                    }
                }
                merge::merge_at(schema, "oneOf", Value::Array(one_of), true);
            }
        }

        if nullable {
            schema.insert("nullable".to_string(), json!(true));
        }
        Ok(())
    }
}

/// The configured file-upload marker type renders as a binary string.
///
/// Must be registered before [`ObjectDescriber`] so the marker class is not
/// walked as a plain object.
pub struct UploadedFileDescriber {
    class_name: String,
}

impl UploadedFileDescriber {
    pub fn new(class_name: String) -> Self {
        UploadedFileDescriber { class_name }
    }
}

impl Describer for UploadedFileDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() == 1
            && !types[0].nullable
            && types[0].builtin == BuiltinKind::Object
            && types[0].class_name.as_deref() == Some(self.class_name.as_str())
    }

    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        _registry: &DescriberRegistry,
        _classes: &ClassRegistry,
        _defs: &mut Definitions,
        _context: &Context,
        _types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        schema.insert("type".to_string(), json!("string"));
        schema.insert("format".to_string(), json!("binary"));
        Ok(())
    }
}

/// Named object and enum types.
///
/// A class already present in the run-scoped reference table is emitted as a
/// `$ref` node instead of being re-walked; that table lookup breaks cyclic
/// object graphs and deduplicates repeated nested types. Otherwise the name
/// is reserved first, members are dispatched with their own derived context,
/// and the finished definition is recorded under the reserved name.
pub struct ObjectDescriber {
    file_upload_class: Option<String>,
}

impl ObjectDescriber {
    pub fn new(file_upload_class: Option<String>) -> Self {
        ObjectDescriber { file_upload_class }
    }

    fn is_upload_member(&self, member: &MemberMetadata, classes: &ClassRegistry) -> bool {
        let Some(upload) = self.file_upload_class.as_deref() else {
            return false;
        };
        member.types.iter().any(|t| {
            t.class_name
                .as_deref()
                .is_some_and(|c| classes.same_or_subtype(c, upload))
        })
    }
}

impl Describer for ObjectDescriber {
    fn supports(&self, types: &[TypeDescriptor]) -> bool {
        types.len() == 1
            && !types[0].nullable
            && types[0].builtin == BuiltinKind::Object
            && types[0].class_name.is_some()
            && types[0].element.is_none()
    }

    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        registry: &DescriberRegistry,
        classes: &ClassRegistry,
        defs: &mut Definitions,
        context: &Context,
        types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        let Some(class) = types[0].class_name.as_deref() else {
            return Err(DescribeError::UnsupportedType {
                shape: shape_of(types),
            });
        };

        if let Some(name) = defs.reference_for(class) {
            schema.insert("$ref".to_string(), json!(Definitions::ref_path(name)));
            return Ok(());
        }

        let meta = classes
            .get(class)
            .ok_or_else(|| DescribeError::UnknownClass {
                name: class.to_string(),
            })?;

        // Reserve before walking members: cyclic edges back to this class
        // resolve to a $ref while the definition is still being assembled.
        let name = defs.reserve(class)?;

        if let Some(values) = &meta.enum_values {
            describe_enum(schema, values);
            defs.finish(&name, Value::Object(schema.clone()));
            return Ok(());
        }

        let mut properties = Map::new();
        let mut required = Vec::new();

        for member in &meta.members {
            if !context::member_visible(member, context) {
                continue;
            }
            // Upload members belong to the multipart body, not the JSON one
            if self.is_upload_member(member, classes) {
                continue;
            }

            let member_context = context::for_member(member);
            let mut property = Map::new();
            registry.dispatch(&mut property, classes, defs, &member_context, &member.types)?;

            if let Some(constraints) = context::constraints(&member_context) {
                merge::merge_map(&mut property, constraints, false);
            }
            if let Some(fragment) = &member.schema {
                let mut value = Value::Object(property);
                merge::merge(&mut value, fragment, true);
                property = match value {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
            }

            if member.is_required() {
                required.push(Value::String(member.name.clone()));
            }
            properties.insert(member.name.clone(), Value::Object(property));
        }

        schema
            .entry("type".to_string())
            .or_insert_with(|| json!("object"));
        if !properties.is_empty() {
            merge::merge_at(schema, "properties", Value::Object(properties), true);
        }
        if !required.is_empty() {
            merge::merge_at(schema, "required", Value::Array(required), true);
        }

        defs.finish(&name, Value::Object(schema.clone()));
        Ok(())
    }
}

fn describe_enum(schema: &mut Map<String, Value>, values: &[Value]) {
    let backing = match values.first() {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => "integer",
        Some(Value::Number(_)) => "number",
        _ => "string",
    };
    schema
        .entry("type".to_string())
        .or_insert_with(|| json!(backing));
    merge::merge_at(schema, "enum", Value::Array(values.to_vec()), true);
}
