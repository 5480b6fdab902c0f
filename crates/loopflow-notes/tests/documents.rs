// crates/loopflow-notes/tests/documents.rs
// ============================================================================
// Module: Document Tests
// Description: Tests for the meeting-notes and optimized-notes documents.
// ============================================================================
//! ## Overview
//! Validates typed document values against their declared JSON Schemas and
//! their camelCase wire forms.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use loopflow_core::schema::validate_value;
use loopflow_notes::MeetingNotes;
use loopflow_notes::OptimizedNotes;
use loopflow_notes::meeting_notes_document;
use loopflow_notes::meeting_notes_schema;
use loopflow_notes::optimized_notes_document;
use loopflow_notes::optimized_notes_schema;
use serde_json::json;

// ============================================================================
// SECTION: Meeting Notes
// ============================================================================

/// Tests meeting notes serialize to a schema-valid wire form.
#[test]
fn test_meeting_notes_match_schema() {
    let notes = MeetingNotes {
        text: "- meeting 1.1.2025".to_string(),
    };

    let wire = serde_json::to_value(&notes).unwrap();
    validate_value(&meeting_notes_schema(), &wire).unwrap();

    let back: MeetingNotes = serde_json::from_value(wire).unwrap();
    assert_eq!(back, notes);
}

/// Tests the meeting-notes schema rejects contents without text.
#[test]
fn test_meeting_notes_schema_requires_text() {
    assert!(validate_value(&meeting_notes_schema(), &json!({})).is_err());
    assert!(validate_value(&meeting_notes_schema(), &json!({"text": 7})).is_err());
}

/// Tests the meeting-notes document declaration carries its schema.
#[test]
fn test_meeting_notes_document_declaration() {
    let document = meeting_notes_document();

    assert_eq!(document.document_id.as_str(), "meeting_notes");
    assert_eq!(document.schema, meeting_notes_schema());
}

// ============================================================================
// SECTION: Optimized Notes
// ============================================================================

/// Tests optimized notes serialize with camelCase action items.
#[test]
fn test_optimized_notes_wire_form_is_camel_case() {
    let notes = OptimizedNotes {
        date: "2025-01-01".to_string(),
        summary: "Budget and hiring discussion".to_string(),
        participants: vec!["Sarah".to_string(), "Anna".to_string()],
        decisions: vec!["Cut costs".to_string()],
        action_items: vec!["Follow up on vendor pricing".to_string()],
    };

    let wire = serde_json::to_value(&notes).unwrap();
    assert_eq!(wire["actionItems"], json!(["Follow up on vendor pricing"]));
    assert!(wire.get("action_items").is_none());

    validate_value(&optimized_notes_schema(), &wire).unwrap();

    let back: OptimizedNotes = serde_json::from_value(wire).unwrap();
    assert_eq!(back, notes);
}

/// Tests the optimized-notes schema requires every structured field.
#[test]
fn test_optimized_notes_schema_requires_all_fields() {
    let missing_action_items = json!({
        "date": "2025-01-01",
        "summary": "s",
        "participants": [],
        "decisions": []
    });

    assert!(validate_value(&optimized_notes_schema(), &missing_action_items).is_err());
}

/// Tests the optimized-notes document declaration carries its schema.
#[test]
fn test_optimized_notes_document_declaration() {
    let document = optimized_notes_document();

    assert_eq!(document.document_id.as_str(), "optimized_notes");
    assert_eq!(document.schema, optimized_notes_schema());
}
