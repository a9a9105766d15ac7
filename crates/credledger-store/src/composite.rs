//! Composite keys over the flat world-state keyspace.
//!
//! Layout: `U+0000 namespace U+0000 (part U+0000)*`. Every composite key
//! starts with U+0000, so it can never collide with a plain primary key, and
//! keys sharing a namespace and leading parts are contiguous in byte order.

use crate::error::{StoreError, StoreResult};

/// Leading byte of every composite key and the separator between components.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Upper bound appended to a partial key to close its prefix range.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn validate_component(component: &str) -> StoreResult<()> {
    if component.contains(COMPOSITE_KEY_NAMESPACE) || component.contains(MAX_UNICODE_RUNE) {
        return Err(StoreError::InvalidCompositeKey(format!(
            "component {:?} contains a reserved character",
            component
        )));
    }
    Ok(())
}

/// Build a composite key from a namespace and ordered parts.
pub fn create_composite_key(namespace: &str, parts: &[&str]) -> StoreResult<String> {
    if namespace.is_empty() {
        return Err(StoreError::InvalidCompositeKey(
            "namespace must not be empty".into(),
        ));
    }
    validate_component(namespace)?;

    let capacity = 2 + namespace.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(namespace);
    key.push(COMPOSITE_KEY_NAMESPACE);

    for part in parts {
        validate_component(part)?;
        key.push_str(part);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }

    Ok(key)
}

/// The `[start, end)` range covering every key that extends the given partial key.
pub fn partial_key_range(namespace: &str, parts: &[&str]) -> StoreResult<(String, String)> {
    let start = create_composite_key(namespace, parts)?;
    let mut end = start.clone();
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

/// Decompose a composite key into its namespace and parts.
pub fn split_composite_key(key: &str) -> StoreResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| StoreError::InvalidCompositeKey(format!("not a composite key: {:?}", key)))?;

    let mut components = body.split(COMPOSITE_KEY_NAMESPACE);
    let namespace = components.next().unwrap_or_default().to_string();
    if namespace.is_empty() {
        return Err(StoreError::InvalidCompositeKey(format!(
            "composite key {:?} has an empty namespace",
            key
        )));
    }

    Ok((namespace, components.map(str::to_string).collect()))
}
