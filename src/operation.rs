//! Operation assembly - builds one endpoint's request surface from its
//! handler signature.
//!
//! For every handler argument whose descriptor set resolves to exactly one
//! JSON-request class, the assembler builds the JSON body schema through the
//! describer registry, synthesizes parameters from members carrying a
//! parameter attribute, and synthesizes a `multipart/form-data` body from
//! members of the configured file-upload type. Everything lands on the
//! operation node through the schema merger, so literal handler attributes
//! and generated content coexist.

use serde_json::{json, Map, Value};

use crate::context;
use crate::definitions::Definitions;
use crate::document::GeneratorConfig;
use crate::error::DescribeError;
use crate::merge;
use crate::metadata::{ArgumentMetadata, ClassRegistry, EndpointMetadata};
use crate::registry::DescriberRegistry;

/// Assembles the request side of one operation node.
pub struct OperationAssembler<'a> {
    registry: &'a DescriberRegistry,
    classes: &'a ClassRegistry,
    config: &'a GeneratorConfig,
}

impl<'a> OperationAssembler<'a> {
    pub fn new(
        registry: &'a DescriberRegistry,
        classes: &'a ClassRegistry,
        config: &'a GeneratorConfig,
    ) -> Self {
        OperationAssembler {
            registry,
            classes,
            config,
        }
    }

    /// Describe `endpoint` into `operation`.
    ///
    /// An endpoint without a qualifying JSON-request argument gets no body or
    /// parameter synthesis; only a literal handler-level body attribute is
    /// applied.
    ///
    /// # Errors
    ///
    /// Propagates describer failures (unsupported member type, unknown
    /// class, ambiguous reference) unchanged.
    pub fn describe(
        &self,
        operation: &mut Map<String, Value>,
        defs: &mut Definitions,
        endpoint: &EndpointMetadata,
    ) -> Result<(), DescribeError> {
        // Literal body attribute first, so generated content enriches it
        if let Some(body) = &endpoint.request_body {
            merge::merge_at(operation, "requestBody", body.clone(), true);
        }

        for argument in &endpoint.arguments {
            let Some(class) = self.json_request_class(argument) else {
                continue;
            };

            let handler_context = context::for_endpoint(endpoint);
            let mut json_content = Map::new();
            self.registry.dispatch(
                &mut json_content,
                self.classes,
                defs,
                &handler_context,
                &argument.types,
            )?;

            merge::merge_at(
                operation,
                "requestBody",
                json!({
                    "content": {
                        "application/json": {"schema": json_content}
                    }
                }),
                true,
            );

            if !self.config.error_responses.is_empty() {
                merge::merge_at(
                    operation,
                    "responses",
                    Value::Object(self.config.error_responses.clone()),
                    true,
                );
            }

            self.describe_parameters(operation, defs, class)?;
            self.describe_file_uploads(operation, class);
        }

        Ok(())
    }

    /// The argument's class identity, when it is a single JSON-request type.
    fn json_request_class<'m>(&self, argument: &'m ArgumentMetadata) -> Option<&'m str> {
        if argument.types.len() != 1 {
            return None;
        }
        let class = argument.types[0].class_name.as_deref()?;
        self.classes
            .get(class)
            .filter(|meta| meta.json_request)
            .map(|_| class)
    }

    /// Synthesize operation parameters from members carrying a parameter
    /// attribute.
    fn describe_parameters(
        &self,
        operation: &mut Map<String, Value>,
        defs: &mut Definitions,
        class: &str,
    ) -> Result<(), DescribeError> {
        let Some(meta) = self.classes.get(class) else {
            return Ok(());
        };

        let mut entries = match operation.remove("parameters") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };

        for member in &meta.members {
            let Some(attr) = &member.parameter else {
                continue;
            };
            let name = attr.name.clone().unwrap_or_else(|| member.name.clone());

            // Locate or create the (name, location) entry
            let position = entries.iter().position(|p| {
                p.get("name").and_then(Value::as_str) == Some(name.as_str())
                    && p.get("in").and_then(Value::as_str) == Some(attr.location.as_str())
            });
            let index = match position {
                Some(index) => index,
                None => {
                    entries.push(json!({"name": name, "in": attr.location}));
                    entries.len() - 1
                }
            };

            merge::merge(&mut entries[index], &Value::Object(attr.fields.clone()), true);

            let Some(parameter) = entries[index].as_object_mut() else {
                continue;
            };
            if !parameter.contains_key("required") {
                parameter.insert("required".to_string(), json!(member.is_required()));
            }

            // Attribute-level overrides (description, explicit schema bits)
            // coexist with the inferred member schema
            let member_context = context::for_member(member);
            let mut schema = match parameter.remove("schema") {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            };
            self.registry.dispatch(
                &mut schema,
                self.classes,
                defs,
                &member_context,
                &member.types,
            )?;
            if let Some(constraints) = context::constraints(&member_context) {
                merge::merge_map(&mut schema, constraints, false);
            }
            parameter.insert("schema".to_string(), Value::Object(schema));
        }

        if !entries.is_empty() {
            operation.insert("parameters".to_string(), Value::Array(entries));
        }
        Ok(())
    }

    /// Synthesize a multipart body from members of the configured upload
    /// type (or a subtype of it).
    fn describe_file_uploads(&self, operation: &mut Map<String, Value>, class: &str) {
        let Some(upload) = self.config.file_upload_class.as_deref() else {
            return;
        };
        let Some(meta) = self.classes.get(class) else {
            return;
        };

        let mut properties = Map::new();
        for member in &meta.members {
            let is_upload = member.types.iter().any(|t| {
                t.class_name
                    .as_deref()
                    .is_some_and(|c| self.classes.same_or_subtype(c, upload))
            });
            if is_upload {
                properties.insert(
                    member.name.clone(),
                    json!({"type": "string", "format": "binary"}),
                );
            }
        }

        if properties.is_empty() {
            return;
        }

        merge::merge_at(
            operation,
            "requestBody",
            json!({
                "content": {
                    "multipart/form-data": {
                        "schema": {
                            "type": "object",
                            "properties": properties
                        }
                    }
                }
            }),
            true,
        );
    }
}
