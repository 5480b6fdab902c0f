// crates/loopflow-notes/src/documents/optimized_notes.rs
// ============================================================================
// Module: Optimized Notes Document
// Description: Structured meeting notes produced by the generation tool.
// Purpose: Declare the optimized-notes document shape and typed value.
// Dependencies: loopflow-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Optimized notes are the structured record distilled from raw meeting
//! notes: a date, a summary, and lists of participants, decisions, and
//! action items. Wire field names are camelCase to match the document
//! contract consumed by hosts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use loopflow_core::DocumentId;
use loopflow_core::DocumentSpec;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Optimized Notes
// ============================================================================

/// Document identifier for optimized notes.
pub const OPTIMIZED_NOTES_DOCUMENT_ID: &str = "optimized_notes";

/// Structured meeting notes produced by the generation tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedNotes {
    /// Meeting date in ISO 8601 form.
    pub date: String,
    /// One-line meeting summary.
    pub summary: String,
    /// Meeting participants.
    pub participants: Vec<String>,
    /// Decisions reached in the meeting.
    pub decisions: Vec<String>,
    /// Follow-up action items.
    #[serde(rename = "actionItems")]
    pub action_items: Vec<String>,
}

/// Returns the JSON Schema for optimized notes contents.
#[must_use]
pub fn optimized_notes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "date": { "type": "string" },
            "summary": { "type": "string" },
            "participants": {
                "type": "array",
                "items": { "type": "string" }
            },
            "decisions": {
                "type": "array",
                "items": { "type": "string" }
            },
            "actionItems": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["date", "summary", "participants", "decisions", "actionItems"],
        "additionalProperties": false
    })
}

/// Returns the optimized-notes document specification.
#[must_use]
pub fn optimized_notes_document() -> DocumentSpec {
    DocumentSpec {
        document_id: DocumentId::new(OPTIMIZED_NOTES_DOCUMENT_ID),
        schema: optimized_notes_schema(),
        description: Some("Structured meeting notes distilled from raw text.".to_string()),
    }
}
