// crates/loopflow-notes/src/lib.rs
// ============================================================================
// Module: Loopflow Notes Library
// Description: Meeting-notes workflow built on the Loopflow engine.
// Purpose: Expose documents, tools, and the workflow definition.
// Dependencies: loopflow-core
// ============================================================================

//! ## Overview
//! Loopflow notes packages the meeting-notes workflow: two schema-validated
//! documents, the document-creation and AI-generation tools behind explicit
//! seams, and the linear human-in-the-loop workflow definition wiring them
//! together.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod documents;
pub mod tools;
pub mod workflow;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use documents::MEETING_NOTES_DOCUMENT_ID;
pub use documents::MeetingNotes;
pub use documents::OPTIMIZED_NOTES_DOCUMENT_ID;
pub use documents::OptimizedNotes;
pub use documents::meeting_notes_document;
pub use documents::meeting_notes_schema;
pub use documents::optimized_notes_document;
pub use documents::optimized_notes_schema;
pub use tools::AI_GENERATE_DOCUMENT_TOOL_ID;
pub use tools::AiGenerateDocument;
pub use tools::CREATE_DOCUMENT_TOOL_ID;
pub use tools::CreateDocument;
pub use tools::DocumentSink;
pub use tools::GenerateBackend;
pub use tools::GenerateError;
pub use tools::GenerateRequest;
pub use tools::InMemoryDocumentSink;
pub use tools::LlmConfig;
pub use tools::SinkError;
pub use workflow::DEFAULT_INPUT_TEXT;
pub use workflow::WORKFLOW_NAME;
pub use workflow::arguments_schema;
pub use workflow::meeting_notes_workflow;
pub use workflow::state_schema;
