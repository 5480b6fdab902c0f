// crates/loopflow-notes/src/workflow.rs
// ============================================================================
// Module: Meeting Notes Workflow
// Description: Linear human-in-the-loop workflow over meeting-notes documents.
// Purpose: Declare the block graph wiring the two tools and two documents.
// Dependencies: loopflow-core, serde_json
// ============================================================================

//! ## Overview
//! The meeting-notes workflow captures raw notes, lets the user edit them,
//! asks the generation tool for structured optimized notes, and waits for a
//! final confirmation. Two transitions are manual: `user_response` (the
//! edited notes) and `confirm` (the accepted optimized notes). The engine
//! pauses at each and resumes when the matching payload arrives.

// ============================================================================
// SECTION: Imports
// ============================================================================

use loopflow_core::DocumentId;
use loopflow_core::PlaceId;
use loopflow_core::PlaceSpec;
use loopflow_core::ToolBinding;
use loopflow_core::ToolId;
use loopflow_core::TransitionId;
use loopflow_core::TransitionKind;
use loopflow_core::TransitionSpec;
use loopflow_core::WorkflowSpec;
use serde_json::Value;
use serde_json::json;

use crate::documents::MEETING_NOTES_DOCUMENT_ID;
use crate::documents::OPTIMIZED_NOTES_DOCUMENT_ID;
use crate::documents::meeting_notes_document;
use crate::documents::meeting_notes_schema;
use crate::documents::optimized_notes_document;
use crate::documents::optimized_notes_schema;
use crate::tools::AI_GENERATE_DOCUMENT_TOOL_ID;
use crate::tools::CREATE_DOCUMENT_TOOL_ID;

// ============================================================================
// SECTION: Workflow Constants
// ============================================================================

/// Workflow definition name.
pub const WORKFLOW_NAME: &str = "meeting_notes";

/// Default raw meeting notes applied when no input text is provided.
pub const DEFAULT_INPUT_TEXT: &str = "- meeting 1.1.2025\n- budget: need 2 cut costs sarah said\n- hire new person?? --> marketing\n- vendor pricing - follow up needed by anna";

// ============================================================================
// SECTION: Schemas
// ============================================================================

/// Returns the JSON Schema for workflow arguments.
#[must_use]
pub fn arguments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "inputText": {
                "type": "string",
                "default": DEFAULT_INPUT_TEXT
            }
        },
        "required": ["inputText"],
        "additionalProperties": false
    })
}

/// Returns the JSON Schema for the workflow state object.
#[must_use]
pub fn state_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "meetingNotes": meeting_notes_schema(),
            "optimizedNotes": optimized_notes_schema()
        },
        "additionalProperties": false
    })
}

// ============================================================================
// SECTION: Workflow Definition
// ============================================================================

/// Builds the meeting-notes workflow specification.
#[must_use]
pub fn meeting_notes_workflow() -> WorkflowSpec {
    WorkflowSpec {
        workflow_name: WORKFLOW_NAME.to_string(),
        version: "1".to_string(),
        arguments_schema: arguments_schema(),
        state_schema: state_schema(),
        tools: vec![
            ToolId::new(CREATE_DOCUMENT_TOOL_ID),
            ToolId::new(AI_GENERATE_DOCUMENT_TOOL_ID),
        ],
        documents: vec![meeting_notes_document(), optimized_notes_document()],
        places: vec![
            place("start", "Workflow entry point."),
            place("waiting_for_response", "User is editing the captured notes."),
            place("response_received", "Edited notes are recorded."),
            place("notes_optimized", "Optimized notes await confirmation."),
            place("end", "Workflow finished."),
        ],
        transitions: vec![
            TransitionSpec {
                transition_id: TransitionId::new("collect_notes"),
                from: PlaceId::new("start"),
                to: PlaceId::new("waiting_for_response"),
                kind: TransitionKind::Automatic,
                binding: Some(ToolBinding {
                    tool_id: ToolId::new(CREATE_DOCUMENT_TOOL_ID),
                    arguments: json!({
                        "id": "input",
                        "update": {
                            "content": {
                                "text": "${arguments.inputText}"
                            }
                        }
                    }),
                }),
                document: Some(DocumentId::new(MEETING_NOTES_DOCUMENT_ID)),
                assign: Some("meetingNotes".to_string()),
            },
            TransitionSpec {
                transition_id: TransitionId::new("user_response"),
                from: PlaceId::new("waiting_for_response"),
                to: PlaceId::new("response_received"),
                kind: TransitionKind::Manual,
                binding: Some(ToolBinding {
                    tool_id: ToolId::new(CREATE_DOCUMENT_TOOL_ID),
                    arguments: json!({
                        "id": "input",
                        "update": {
                            "content": "${payload}"
                        }
                    }),
                }),
                document: Some(DocumentId::new(MEETING_NOTES_DOCUMENT_ID)),
                assign: Some("meetingNotes".to_string()),
            },
            TransitionSpec {
                transition_id: TransitionId::new("optimize_notes"),
                from: PlaceId::new("response_received"),
                to: PlaceId::new("notes_optimized"),
                kind: TransitionKind::Automatic,
                binding: Some(ToolBinding {
                    tool_id: ToolId::new(AI_GENERATE_DOCUMENT_TOOL_ID),
                    arguments: json!({
                        "llm": {
                            "provider": "openai",
                            "model": "gpt-4o"
                        },
                        "document": "optimized_notes",
                        "input": "${state.meetingNotes}"
                    }),
                }),
                document: Some(DocumentId::new(OPTIMIZED_NOTES_DOCUMENT_ID)),
                assign: Some("optimizedNotes".to_string()),
            },
            TransitionSpec {
                transition_id: TransitionId::new("confirm"),
                from: PlaceId::new("notes_optimized"),
                to: PlaceId::new("end"),
                kind: TransitionKind::Manual,
                binding: Some(ToolBinding {
                    tool_id: ToolId::new(CREATE_DOCUMENT_TOOL_ID),
                    arguments: json!({
                        "id": "optimized",
                        "update": {
                            "content": "${payload}"
                        }
                    }),
                }),
                document: Some(DocumentId::new(OPTIMIZED_NOTES_DOCUMENT_ID)),
                assign: Some("optimizedNotes".to_string()),
            },
        ],
    }
}

/// Builds a place specification with a description.
fn place(place_id: &str, description: &str) -> PlaceSpec {
    PlaceSpec {
        place_id: PlaceId::new(place_id),
        description: Some(description.to_string()),
    }
}
