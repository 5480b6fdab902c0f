// crates/loopflow-notes/src/tools/mod.rs
// ============================================================================
// Module: Meeting Notes Tools
// Description: Tool implementations wired into the meeting-notes workflow.
// Purpose: Provide the document-creation and AI-generation tool dependencies.
// Dependencies: loopflow-core
// ============================================================================

//! ## Overview
//! Both tools integrate through seams: the create-document tool writes to a
//! [`DocumentSink`], the generate tool delegates to a [`GenerateBackend`].
//! Hosts supply real surfaces; tests supply doubles.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod create_document;
pub mod generate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use create_document::CREATE_DOCUMENT_TOOL_ID;
pub use create_document::CreateDocument;
pub use create_document::CreateDocumentArgs;
pub use create_document::DocumentSink;
pub use create_document::DocumentUpdate;
pub use create_document::InMemoryDocumentSink;
pub use create_document::SinkDocument;
pub use create_document::SinkError;
pub use generate::AI_GENERATE_DOCUMENT_TOOL_ID;
pub use generate::AiGenerateDocument;
pub use generate::GenerateBackend;
pub use generate::GenerateError;
pub use generate::GenerateRequest;
pub use generate::LlmConfig;
