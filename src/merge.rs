//! Schema merging - overlays declared override fragments onto generated
//! schema nodes.
//!
//! Precedence rules:
//! - Scalar fields (`type`, `format`, `description`, ...) in the overlay
//!   always overwrite the target field: explicit declaration wins over
//!   inference, field by field.
//! - Mapping-valued fields (`properties`, media-type maps, `responses`):
//!   merged key-by-key when `deep` is true, replaced wholesale otherwise.
//! - Sequence-valued fields (`required`, `oneOf`, `enum`): overlay entries
//!   are appended after deduplication by value, never truncating the target.
//! - A field absent from the overlay leaves the target field untouched, and
//!   an overlay field of an incompatible shape is skipped: merging never
//!   fails and never downgrades a populated shape to an empty one.

use serde_json::{Map, Value};

/// Merge `overlay` onto `target` in place.
///
/// `deep` controls how mapping-valued fields combine: key-by-key when true,
/// wholesale replacement when false. Sequence and scalar semantics are
/// independent of `deep`.
pub fn merge(target: &mut Value, overlay: &Value, deep: bool) {
    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            merge_map(target_map, overlay_map, deep);
        }
        (Value::Array(target_arr), Value::Array(overlay_arr)) => {
            append_dedup(target_arr, overlay_arr);
        }
        // Populated container, scalar overlay: incompatible, skip
        (Value::Object(_), _) | (Value::Array(_), _) => {}
        // Scalar or null target: overlay wins
        (target, overlay) => *target = overlay.clone(),
    }
}

/// Merge an overlay object onto a schema map in place (see [`merge`]).
pub fn merge_map(target: &mut Map<String, Value>, overlay: &Map<String, Value>, deep: bool) {
    for (key, overlay_value) in overlay {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), overlay_value.clone());
            }
            Some(target_value) => match (target_value, overlay_value) {
                (Value::Object(t), Value::Object(o)) => {
                    if deep {
                        merge_map(t, o, true);
                    } else {
                        *t = o.clone();
                    }
                }
                (Value::Array(t), Value::Array(o)) => append_dedup(t, o),
                // Incompatible shapes: leave the target field untouched
                (Value::Object(_), _) | (Value::Array(_), _) => {}
                (t, o) => *t = o.clone(),
            },
        }
    }
}

/// Merge `overlay` into `target[key]`, inserting when the key is absent.
pub fn merge_at(target: &mut Map<String, Value>, key: &str, overlay: Value, deep: bool) {
    match target.get_mut(key) {
        Some(existing) => merge(existing, &overlay, deep),
        None => {
            target.insert(key.to_string(), overlay);
        }
    }
}

fn append_dedup(target: &mut Vec<Value>, overlay: &[Value]) {
    for item in overlay {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
