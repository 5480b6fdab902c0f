// crates/loopflow-notes/src/tools/create_document.rs
// ============================================================================
// Module: Create Document Tool
// Description: Upserts editable document content into a document sink.
// Purpose: Surface workflow content to hosts and echo it back to the engine.
// Dependencies: loopflow-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The create-document tool writes content into a host-facing document sink
//! (a form, an editor pane, a persistence layer) and echoes the stored
//! content back as its output so the engine can validate and record it. The
//! sink is a trait so hosts plug in their own surface; an in-memory sink is
//! provided for tests and local use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use loopflow_core::Tool;
use loopflow_core::ToolContext;
use loopflow_core::ToolError;
use loopflow_core::ToolOutput;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Tool Arguments
// ============================================================================

/// Tool identifier for the create-document tool.
pub const CREATE_DOCUMENT_TOOL_ID: &str = "create_document";

/// Update applied to a sink document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    /// Replacement document content.
    pub content: Value,
}

/// Arguments accepted by the create-document tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDocumentArgs {
    /// Sink document identifier.
    pub id: String,
    /// Update applied to the document.
    pub update: DocumentUpdate,
}

// ============================================================================
// SECTION: Document Sink
// ============================================================================

/// Document sink errors.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sink reported an error.
    #[error("document sink error: {0}")]
    Sink(String),
}

/// Host-facing document surface written to by the create-document tool.
pub trait DocumentSink {
    /// Inserts or replaces document content and returns the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the write fails.
    fn upsert(&self, id: &str, content: &Value) -> Result<u64, SinkError>;
}

/// Document stored by the in-memory sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkDocument {
    /// Stored content.
    pub content: Value,
    /// Revision counter starting at 1.
    pub revision: u64,
}

/// In-memory document sink for tests and local use.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentSink {
    /// Stored documents protected by a mutex.
    documents: Arc<Mutex<BTreeMap<String, SinkDocument>>>,
}

impl InMemoryDocumentSink {
    /// Creates an empty in-memory document sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Returns the stored document for the provided identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the sink lock is poisoned.
    pub fn fetch(&self, id: &str) -> Result<Option<SinkDocument>, SinkError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| SinkError::Sink("document sink mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

impl DocumentSink for InMemoryDocumentSink {
    fn upsert(&self, id: &str, content: &Value) -> Result<u64, SinkError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| SinkError::Sink("document sink mutex poisoned".to_string()))?;
        let revision = guard.get(id).map_or(1, |document| document.revision + 1);
        guard.insert(
            id.to_string(),
            SinkDocument {
                content: content.clone(),
                revision,
            },
        );
        Ok(revision)
    }
}

// ============================================================================
// SECTION: Create Document Tool
// ============================================================================

/// Tool upserting document content into a document sink.
#[derive(Clone)]
pub struct CreateDocument {
    /// Sink written to on every invocation.
    sink: Arc<dyn DocumentSink + Send + Sync>,
}

impl CreateDocument {
    /// Creates a create-document tool over the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn DocumentSink + Send + Sync>) -> Self {
        Self {
            sink,
        }
    }
}

impl Tool for CreateDocument {
    fn execute(&self, arguments: &Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: CreateDocumentArgs = serde_json::from_value(arguments.clone())
            .map_err(|err| ToolError::Rejected(err.to_string()))?;
        self.sink
            .upsert(&args.id, &args.update.content)
            .map_err(|err| ToolError::Failed(err.to_string()))?;
        Ok(ToolOutput {
            content: args.update.content,
        })
    }
}
