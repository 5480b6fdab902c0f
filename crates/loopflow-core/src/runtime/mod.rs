// crates/loopflow-core/src/runtime/mod.rs
// ============================================================================
// Module: Loopflow Runtime
// Description: Deterministic workflow processor, tool registry, and stores.
// Purpose: Execute Loopflow workflows against registered tools and stores.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement workflow execution, tool resolution, and state
//! persistence helpers. All external surfaces must call into the same
//! processor logic to preserve invariance.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod processor;
pub mod registry;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use processor::ExecutionContext;
pub use processor::OPTIONS_SCOPE;
pub use processor::PendingTransition;
pub use processor::ProcessResult;
pub use processor::ProcessorConfig;
pub use processor::ProcessorError;
pub use processor::WorkflowProcessor;
pub use registry::SharedTool;
pub use registry::ToolRegistry;
pub use store::InMemoryWorkflowStateStore;
pub use store::SharedWorkflowStateStore;
