// crates/loopflow-notes/src/tools/generate.rs
// ============================================================================
// Module: AI Generate Document Tool
// Description: Produces structured documents through a generation backend.
// Purpose: Bridge workflow transitions to an LLM-backed generation seam.
// Dependencies: loopflow-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The generate tool parses its binding arguments into a generation request
//! (LLM configuration, target document, input value) and delegates to a
//! [`GenerateBackend`]. The backend is a trait seam: hosts wire an actual
//! model client, tests wire deterministic doubles. The tool itself never
//! talks to a network.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use loopflow_core::Tool;
use loopflow_core::ToolContext;
use loopflow_core::ToolError;
use loopflow_core::ToolOutput;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Generation Request
// ============================================================================

/// Tool identifier for the generate tool.
pub const AI_GENERATE_DOCUMENT_TOOL_ID: &str = "ai_generate_document";

/// LLM configuration carried by generation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model provider name.
    pub provider: String,
    /// Model identifier.
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

/// Generation request parsed from the tool's binding arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// LLM configuration for the request.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Target document identifier, when the host tracks one.
    #[serde(default)]
    pub document: Option<String>,
    /// Input value the generation is grounded on.
    pub input: Value,
}

// ============================================================================
// SECTION: Generation Backend
// ============================================================================

/// Generation backend errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Backend reported an error.
    #[error("generation backend error: {0}")]
    Backend(String),
}

/// Backend seam producing structured document content.
pub trait GenerateBackend {
    /// Generates document content for the provided request.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when generation fails.
    fn generate(&self, request: &GenerateRequest) -> Result<Value, GenerateError>;
}

// ============================================================================
// SECTION: AI Generate Document Tool
// ============================================================================

/// Tool producing structured documents through a generation backend.
#[derive(Clone)]
pub struct AiGenerateDocument {
    /// Backend invoked on every generation request.
    backend: Arc<dyn GenerateBackend + Send + Sync>,
}

impl AiGenerateDocument {
    /// Creates a generate tool over the provided backend.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerateBackend + Send + Sync>) -> Self {
        Self {
            backend,
        }
    }
}

impl Tool for AiGenerateDocument {
    fn execute(&self, arguments: &Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let request: GenerateRequest = serde_json::from_value(arguments.clone())
            .map_err(|err| ToolError::Rejected(err.to_string()))?;
        let content = self
            .backend
            .generate(&request)
            .map_err(|err| ToolError::Failed(err.to_string()))?;
        Ok(ToolOutput {
            content,
        })
    }
}
