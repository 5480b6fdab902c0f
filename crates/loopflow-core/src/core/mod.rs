// crates/loopflow-core/src/core/mod.rs
// ============================================================================
// Module: Loopflow Core Types
// Description: Canonical Loopflow specification and run-state structures.
// Purpose: Provide stable, serializable types for workflow definitions and logs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Loopflow core types define workflow specifications, run state, document
//! schemas, fingerprints, and binding templates. These types are the
//! canonical source of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod document;
pub mod fingerprint;
pub mod identifiers;
pub mod schema;
pub mod spec;
pub mod state;
pub mod template;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::DocumentRecord;
pub use document::DocumentSpec;
pub use fingerprint::DEFAULT_HASH_ALGORITHM;
pub use fingerprint::Fingerprint;
pub use fingerprint::FingerprintError;
pub use fingerprint::HashAlgorithm;
pub use identifiers::DocumentId;
pub use identifiers::PlaceId;
pub use identifiers::ScopeKey;
pub use identifiers::ToolId;
pub use identifiers::TransitionId;
pub use identifiers::WorkflowId;
pub use schema::SchemaError;
pub use spec::PlaceSpec;
pub use spec::SpecError;
pub use spec::ToolBinding;
pub use spec::TransitionKind;
pub use spec::TransitionSpec;
pub use spec::WorkflowSpec;
pub use state::Caretaker;
pub use state::HashRecord;
pub use state::Memento;
pub use state::ToolCallRecord;
pub use state::WorkflowState;
pub use state::WorkflowStatus;
pub use template::TemplateError;
pub use template::TemplateScope;
pub use time::Timestamp;
