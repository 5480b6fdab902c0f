// crates/loopflow-core/src/interfaces/mod.rs
// ============================================================================
// Module: Loopflow Interfaces
// Description: Backend-agnostic interfaces for tools and state storage.
// Purpose: Define the contract surfaces used by the Loopflow runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Loopflow integrates with external systems without
//! embedding backend-specific details. Implementations must be deterministic
//! and fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::PlaceId;
use crate::core::identifiers::TransitionId;
use crate::core::identifiers::WorkflowId;
use crate::core::state::WorkflowState;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Tools
// ============================================================================

/// Context provided to tools for each invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContext {
    /// Workflow instance identifier.
    pub workflow_id: WorkflowId,
    /// Place the firing transition starts from.
    pub place: PlaceId,
    /// Transition invoking the tool.
    pub transition: TransitionId,
    /// Invocation timestamp.
    pub time: Timestamp,
}

/// Output produced by a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Content produced by the tool.
    pub content: Value,
}

/// Tool invocation errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool rejected the resolved arguments.
    #[error("tool rejected arguments: {0}")]
    Rejected(String),
    /// Tool execution failed.
    #[error("tool execution failed: {0}")]
    Failed(String),
}

/// Backend-agnostic tool invoked by workflow transitions.
pub trait Tool {
    /// Executes the tool with resolved arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the arguments are rejected or execution fails.
    fn execute(&self, arguments: &Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

// ============================================================================
// SECTION: Workflow State Store
// ============================================================================

/// Workflow state store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("workflow state store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("workflow state store corruption: {0}")]
    Corrupt(String),
    /// Store reported an error.
    #[error("workflow state store error: {0}")]
    Store(String),
}

/// Workflow state store for persistence.
pub trait WorkflowStateStore {
    /// Loads workflow state by instance identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, workflow_id: &WorkflowId) -> Result<Option<WorkflowState>, StoreError>;

    /// Saves workflow state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, state: &WorkflowState) -> Result<(), StoreError>;
}
