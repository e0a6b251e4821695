//! Per-site translation context derivation and propagation.
//!
//! A context is derived afresh at each reflection site (root type, member,
//! handler) from that site's own metadata and threaded unchanged through one
//! recursive descent. It is never inherited implicitly from an unrelated
//! caller's site.

use serde_json::{Map, Value};

use crate::metadata::{EndpointMetadata, MemberMetadata};

/// Opaque key/value bag attached to one translation descent.
pub type Context = Map<String, Value>;

/// Context key holding the active serialization groups (array of strings).
pub const GROUPS_KEY: &str = "groups";

/// Context key holding validation constraints (object of schema keywords).
pub const CONSTRAINTS_KEY: &str = "constraints";

/// Derive the context for a member site from its own metadata.
pub fn for_member(member: &MemberMetadata) -> Context {
    let mut context = Context::new();
    if !member.groups.is_empty() {
        context.insert(
            GROUPS_KEY.to_string(),
            Value::Array(member.groups.iter().cloned().map(Value::String).collect()),
        );
    }
    if !member.constraints.is_empty() {
        context.insert(
            CONSTRAINTS_KEY.to_string(),
            Value::Object(member.constraints.clone()),
        );
    }
    context
}

/// Derive the context for a handler site from its own metadata.
pub fn for_endpoint(endpoint: &EndpointMetadata) -> Context {
    let mut context = Context::new();
    if !endpoint.groups.is_empty() {
        context.insert(
            GROUPS_KEY.to_string(),
            Value::Array(
                endpoint
                    .groups
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }
    context
}

/// Constraints carried by `context`, when the site derived any.
pub fn constraints(context: &Context) -> Option<&Map<String, Value>> {
    match context.get(CONSTRAINTS_KEY) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Whether a member is visible under the groups carried by `context`.
///
/// A context without groups sees every member; a member without groups is
/// visible in every context; otherwise the two sets must intersect.
pub fn member_visible(member: &MemberMetadata, context: &Context) -> bool {
    let Some(Value::Array(active)) = context.get(GROUPS_KEY) else {
        return true;
    };
    if active.is_empty() || member.groups.is_empty() {
        return true;
    }
    member
        .groups
        .iter()
        .any(|g| active.iter().any(|a| a.as_str() == Some(g.as_str())))
}
