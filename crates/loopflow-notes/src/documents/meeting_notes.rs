// crates/loopflow-notes/src/documents/meeting_notes.rs
// ============================================================================
// Module: Meeting Notes Document
// Description: Free-form meeting notes captured from the user.
// Purpose: Declare the meeting-notes document shape and typed value.
// Dependencies: loopflow-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Meeting notes are a single free-form text field. The schema validates
//! engine-side document writes; the typed value is the crate-level API for
//! hosts that want to read the document back out of run state.

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
// SECTION: Meeting Notes
// ============================================================================

/// Document identifier for meeting notes.
pub const MEETING_NOTES_DOCUMENT_ID: &str = "meeting_notes";

/// Free-form meeting notes captured from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingNotes {
    /// Raw meeting notes text.
    pub text: String,
}

/// Returns the JSON Schema for meeting notes contents.
#[must_use]
pub fn meeting_notes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": { "type": "string" }
        },
        "required": ["text"],
        "additionalProperties": false
    })
}

/// Returns the meeting-notes document specification.
#[must_use]
pub fn meeting_notes_document() -> DocumentSpec {
    DocumentSpec {
        document_id: DocumentId::new(MEETING_NOTES_DOCUMENT_ID),
        schema: meeting_notes_schema(),
        description: Some("Free-form meeting notes captured from the user.".to_string()),
    }
}
