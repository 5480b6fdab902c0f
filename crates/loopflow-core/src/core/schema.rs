// crates/loopflow-core/src/core/schema.rs
// ============================================================================
// Module: Loopflow Schema Validation
// Description: JSON Schema compilation, validation, and default substitution.
// Purpose: Validate workflow arguments, state objects, and document contents.
// Dependencies: jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Workflow arguments, the mutable state object, and document contents are
//! all declared as JSON Schemas (Draft 2020-12) on the workflow
//! specification. This module compiles those schemas and reports the first
//! violation with its instance path. Default substitution fills missing
//! top-level object properties from property-level `default` keywords before
//! validation, mirroring default-argument behavior for workflow inputs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while compiling or applying JSON Schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document failed to compile.
    #[error("failed to compile schema: {0}")]
    Compile(String),
    /// Instance failed schema validation.
    #[error("schema validation failed at '{path}': {message}")]
    Invalid {
        /// Instance path of the first violation.
        path: String,
        /// Violation message reported by the validator.
        message: String,
    },
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Compiles a JSON Schema using Draft 2020-12 semantics.
fn compile_schema(schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|err| SchemaError::Compile(err.to_string()))
}

/// Checks that a schema document compiles.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] when the schema is malformed.
pub fn check_schema(schema: &Value) -> Result<(), SchemaError> {
    compile_schema(schema).map(|_| ())
}

/// Validates an instance against a schema and reports the first violation.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] when the schema is malformed and
/// [`SchemaError::Invalid`] when the instance violates the schema.
pub fn validate_value(schema: &Value, instance: &Value) -> Result<(), SchemaError> {
    let validator = compile_schema(schema)?;
    if let Some(error) = validator.iter_errors(instance).next() {
        return Err(SchemaError::Invalid {
            path: error.instance_path().to_string(),
            message: error.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Default Substitution
// ============================================================================

/// Fills missing top-level object properties from schema `default` keywords.
///
/// Defaults never overwrite caller-provided fields, and non-object instances
/// pass through untouched. Substitution is shallow: nested defaults are the
/// responsibility of the nested schema's consumer.
#[must_use]
pub fn apply_defaults(schema: &Value, instance: &Value) -> Value {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return instance.clone();
    };
    let Value::Object(fields) = instance else {
        return instance.clone();
    };

    let mut merged = fields.clone();
    for (name, property) in properties {
        if let Some(default) = property.get("default") {
            merged.entry(name.clone()).or_insert_with(|| default.clone());
        }
    }
    Value::Object(merged)
}
