// crates/loopflow-core/src/core/template.rs
// ============================================================================
// Module: Loopflow Binding Templates
// Description: Reference resolution for declarative tool-binding arguments.
// Purpose: Resolve `${...}` references against arguments, state, and payload.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Tool bindings declare their arguments as JSON templates. A string that is
//! exactly one `${...}` reference is spliced with the referenced JSON value;
//! references embedded in a longer string interpolate scalar values into the
//! surrounding text. Supported roots are `arguments`, `state`, and `payload`;
//! dot-separated path segments index into objects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Template Scope
// ============================================================================

/// Resolution scope for binding templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateScope<'a> {
    /// Validated workflow arguments.
    pub arguments: &'a Value,
    /// Mutable workflow state object.
    pub state: &'a Value,
    /// Pending user payload, when a manual transition is firing.
    pub payload: Option<&'a Value>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Template resolution errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Reference root is not `arguments`, `state`, or `payload`.
    #[error("unknown template root: {0}")]
    UnknownRoot(String),
    /// Reference path does not resolve to a value.
    #[error("template path not found: {0}")]
    MissingValue(String),
    /// Reference names `payload` but no payload is pending.
    #[error("template references payload but none is pending")]
    MissingPayload,
    /// Embedded reference resolves to a non-scalar value.
    #[error("cannot interpolate non-scalar value for: {0}")]
    NotInterpolable(String),
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a binding template against the provided scope.
///
/// # Errors
///
/// Returns [`TemplateError`] when a reference fails to resolve.
pub fn resolve_template(
    template: &Value,
    scope: &TemplateScope<'_>,
) -> Result<Value, TemplateError> {
    match template {
        Value::String(text) => resolve_string(text, scope),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_template(item, scope)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(fields) => {
            let mut out = Map::new();
            for (key, value) in fields {
                out.insert(key.clone(), resolve_template(value, scope)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

/// Resolves a string template: whole-reference splice or scalar interpolation.
fn resolve_string(text: &str, scope: &TemplateScope<'_>) -> Result<Value, TemplateError> {
    if let Some(reference) = whole_reference(text) {
        return lookup(reference, scope).cloned();
    }

    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated reference is kept literally.
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let reference = &after[..end];
        let value = lookup(reference, scope)?;
        match value {
            Value::String(item) => out.push_str(item),
            Value::Number(number) => out.push_str(&number.to_string()),
            Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(TemplateError::NotInterpolable(reference.to_string()));
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}

/// Returns the inner reference when the text is exactly one `${...}`.
fn whole_reference(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("${")?.strip_suffix('}')?;
    if inner.contains("${") || inner.contains('}') {
        return None;
    }
    Some(inner)
}

/// Looks up a dot-separated reference in the scope.
fn lookup<'a>(
    reference: &str,
    scope: &TemplateScope<'a>,
) -> Result<&'a Value, TemplateError> {
    let mut segments = reference.split('.');
    let root = segments.next().unwrap_or_default();
    let base = match root {
        "arguments" => scope.arguments,
        "state" => scope.state,
        "payload" => scope.payload.ok_or(TemplateError::MissingPayload)?,
        other => return Err(TemplateError::UnknownRoot(other.to_string())),
    };

    let mut current = base;
    for segment in segments {
        current = current
            .get(segment)
            .ok_or_else(|| TemplateError::MissingValue(reference.to_string()))?;
    }
    Ok(current)
}
