//! Whole-document generation - one operation node per endpoint, with
//! per-endpoint failure isolation.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::definitions::{Definitions, NamingStrategy};
use crate::describers::default_registry;
use crate::metadata::{ApiMetadata, ClassRegistry, EndpointMetadata};
use crate::operation::OperationAssembler;
use crate::registry::DescriberRegistry;

/// Configuration surface of the translation engine.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Class identity of the file-upload marker type, if any.
    pub file_upload_class: Option<String>,
    /// Literal response fragments merged into every JSON-body-bearing
    /// operation, keyed by status code.
    pub error_responses: Map<String, Value>,
    /// Reference-name derivation strategy for object definitions.
    pub naming: NamingStrategy,
}

/// A single endpoint that failed to generate.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointFailure {
    /// Endpoint label (`operationId` or `METHOD /path`).
    pub endpoint: String,
    pub message: String,
}

/// Outcome of one generation run: the assembled document plus any
/// per-endpoint failures. A failed endpoint is dropped from the document;
/// unrelated endpoints are unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub document: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<EndpointFailure>,
}

impl GenerationReport {
    /// Returns true if every endpoint generated.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Single-pass generator over a set of endpoints.
///
/// One run shares a single [`Definitions`] table, so an object type
/// referenced from many endpoints reuses the same reference name and
/// definition everywhere.
pub struct DocumentGenerator {
    registry: DescriberRegistry,
    config: GeneratorConfig,
}

impl DocumentGenerator {
    /// Generator with the default describer set for `config`.
    pub fn new(config: GeneratorConfig) -> Self {
        let registry = default_registry(&config);
        DocumentGenerator { registry, config }
    }

    /// Generator with a caller-assembled registry (extra describers).
    pub fn with_registry(registry: DescriberRegistry, config: GeneratorConfig) -> Self {
        DocumentGenerator { registry, config }
    }

    /// Generate the document fragment for all endpoints.
    ///
    /// Produces a `paths` map plus a `components.schemas` section holding
    /// every named definition built during the run.
    pub fn generate(
        &self,
        classes: &ClassRegistry,
        endpoints: &[EndpointMetadata],
    ) -> GenerationReport {
        let mut defs = Definitions::new(self.config.naming);
        let mut paths: Map<String, Value> = Map::new();
        let mut failures = Vec::new();
        let assembler = OperationAssembler::new(&self.registry, classes, &self.config);

        for endpoint in endpoints {
            let mut operation = Map::new();
            if let Some(name) = &endpoint.name {
                operation.insert("operationId".to_string(), json!(name));
            }

            // Reservations made during a failed walk must not survive it:
            // a later endpoint hitting a leftover reservation would emit a
            // $ref with no matching definition.
            let snapshot = defs.clone();
            match assembler.describe(&mut operation, &mut defs, endpoint) {
                Ok(()) => {
                    let item = paths
                        .entry(endpoint.path.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(item) = item {
                        item.insert(endpoint.method.to_lowercase(), Value::Object(operation));
                    }
                }
                Err(err) => {
                    defs = snapshot;
                    failures.push(EndpointFailure {
                        endpoint: endpoint.label(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let mut document = Map::new();
        document.insert("paths".to_string(), Value::Object(paths));
        if !defs.is_empty() {
            document.insert("components".to_string(), defs.into_components());
        }

        GenerationReport {
            document: Value::Object(document),
            failures,
        }
    }
}

/// Convenience: generate from loaded metadata in one call.
pub fn generate(metadata: &ApiMetadata, config: GeneratorConfig) -> GenerationReport {
    DocumentGenerator::new(config).generate(&metadata.classes, &metadata.endpoints)
}
