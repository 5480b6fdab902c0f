// crates/loopflow-core/src/core/document.rs
// ============================================================================
// Module: Loopflow Documents
// Description: Passive document declarations and stored document values.
// Purpose: Provide schema-validated document shapes referenced by workflows.
// Dependencies: crate::core::{fingerprint, identifiers, time}, serde, serde_json
// ============================================================================

//! ## Overview
//! Documents are pure data-shape declarations: a document specification names
//! a JSON Schema and nothing else. The processor validates tool-produced
//! content against the declaring schema before a document record is written
//! into run state. Records carry a content fingerprint and a monotonically
//! increasing revision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::fingerprint::Fingerprint;
use crate::core::identifiers::DocumentId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Document Specification
// ============================================================================

/// Passive document declaration referenced by workflow transitions.
///
/// # Invariants
/// - `schema` is a JSON Schema document; it is compiled at spec validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Document identifier.
    pub document_id: DocumentId,
    /// JSON Schema describing valid document contents.
    pub schema: Value,
    /// Optional description of the document.
    pub description: Option<String>,
}

// ============================================================================
// SECTION: Document Record
// ============================================================================

/// Validated document value held in workflow run state.
///
/// # Invariants
/// - `content` satisfies the declaring document schema.
/// - `revision` starts at 1 and increments on every accepted update.
/// - `content_fingerprint` is the canonical fingerprint of `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document identifier.
    pub document_id: DocumentId,
    /// Validated document content.
    pub content: Value,
    /// Canonical fingerprint of the content.
    pub content_fingerprint: Fingerprint,
    /// Monotonic revision counter.
    pub revision: u64,
    /// Timestamp of the last accepted update.
    pub updated_at: Timestamp,
}
