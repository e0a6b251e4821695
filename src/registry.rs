//! Describer registry - ordered, first-match dispatch over type descriptors.

use serde_json::{Map, Value};

use crate::context::Context;
use crate::definitions::Definitions;
use crate::error::DescribeError;
use crate::metadata::ClassRegistry;
use crate::types::{shape_of, TypeDescriptor};

/// A unit of dispatch logic: claims a descriptor shape and translates it
/// into a schema node.
///
/// `describe` mutates the passed node in place so that a pre-existing node
/// (one already carrying merged overrides) is enriched rather than replaced.
/// Composite describers recurse through the registry they are handed; no
/// describer may dispatch the exact `(context, types)` pair it was invoked
/// with, directly or indirectly.
pub trait Describer {
    /// Pure, side-effect-free claim check over the descriptor set.
    fn supports(&self, types: &[TypeDescriptor]) -> bool;

    /// Translate the descriptor set into `schema`.
    fn describe(
        &self,
        schema: &mut Map<String, Value>,
        registry: &DescriberRegistry,
        classes: &ClassRegistry,
        defs: &mut Definitions,
        context: &Context,
        types: &[TypeDescriptor],
    ) -> Result<(), DescribeError>;
}

/// Ordered collection of describers.
///
/// Dispatch evaluates `supports` in registration order and invokes the first
/// match: registration order is a deliberate priority system and part of the
/// contract (a specific describer must be registered before a more general
/// one that also claims its inputs).
#[derive(Default)]
pub struct DescriberRegistry {
    describers: Vec<Box<dyn Describer>>,
}

impl DescriberRegistry {
    /// An empty registry. Use [`crate::describers::default_registry`] for
    /// the standard describer set.
    pub fn new() -> Self {
        DescriberRegistry::default()
    }

    /// Append a describer after all currently registered ones.
    pub fn register(&mut self, describer: Box<dyn Describer>) {
        self.describers.push(describer);
    }

    /// Dispatch a descriptor set to the first claiming describer.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError::UnsupportedType`] when no registered
    /// describer claims the set. There is no silent fallback.
    pub fn dispatch(
        &self,
        schema: &mut Map<String, Value>,
        classes: &ClassRegistry,
        defs: &mut Definitions,
        context: &Context,
        types: &[TypeDescriptor],
    ) -> Result<(), DescribeError> {
        for describer in &self.describers {
            if describer.supports(types) {
                return describer.describe(schema, self, classes, defs, context, types);
            }
        }

        Err(DescribeError::UnsupportedType {
            shape: shape_of(types),
        })
    }
}
