//! DTO to OpenAPI schema generation.
//!
//! This library translates normalized structural type metadata about
//! request/response DTOs into OpenAPI/JSON-Schema document fragments. Type
//! descriptors are dispatched through an ordered registry of describers
//! (first claiming describer wins); composite describers recurse back into
//! the registry for nested and union types; declared override fragments are
//! overlaid onto generated nodes by a deep merger that never loses
//! information.
//!
//! # Example
//!
//! ```
//! use dto_openapi::{
//!     default_registry, ClassRegistry, Context, Definitions, GeneratorConfig,
//!     BuiltinKind, TypeDescriptor,
//! };
//! use serde_json::Map;
//!
//! let registry = default_registry(&GeneratorConfig::default());
//! let classes = ClassRegistry::new();
//! let mut defs = Definitions::default();
//!
//! let mut schema = Map::new();
//! registry
//!     .dispatch(
//!         &mut schema,
//!         &classes,
//!         &mut defs,
//!         &Context::new(),
//!         &[TypeDescriptor::builtin(BuiltinKind::Int)],
//!     )
//!     .unwrap();
//!
//! assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("integer"));
//! ```
//!
//! # Dispatch contract
//!
//! Registration order is a deliberate priority system: `dispatch` invokes
//! the first describer whose pure `supports` check claims the descriptor
//! set, and fails loudly with `UnsupportedType` when none does. Cyclic
//! object graphs are broken by the object describer through a run-scoped
//! reference table, never by the registry itself.

mod context;
mod definitions;
mod describers;
mod document;
mod error;
mod merge;
mod metadata;
mod operation;
mod registry;
mod types;

pub use context::{
    constraints, for_endpoint, for_member, member_visible, Context, CONSTRAINTS_KEY, GROUPS_KEY,
};
pub use definitions::{Definitions, NamingStrategy};
pub use describers::{
    default_registry, register_defaults, CollectionDescriber, MixedDescriber, ObjectDescriber,
    ScalarDescriber, UnionDescriber, UploadedFileDescriber,
};
pub use document::{
    generate, DocumentGenerator, EndpointFailure, GenerationReport, GeneratorConfig,
};
pub use error::{DescribeError, GenerateError};
pub use merge::{merge, merge_at, merge_map};
pub use metadata::{
    load_metadata, ApiMetadata, ArgumentMetadata, ClassMetadata, ClassRegistry, EndpointMetadata,
    MemberMetadata, ParameterAttribute,
};
pub use operation::OperationAssembler;
pub use registry::{Describer, DescriberRegistry};
pub use types::{shape_of, BuiltinKind, TypeDescriptor};
