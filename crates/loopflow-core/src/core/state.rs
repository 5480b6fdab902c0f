// crates/loopflow-core/src/core/state.rs
// ============================================================================
// Module: Loopflow Run State
// Description: Workflow instance state, caretaker history, and tool-call logs.
// Purpose: Capture deterministic run evolution for resumption and replay.
// Dependencies: crate::core::{document, fingerprint, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Run state captures everything a host needs to pause a workflow at a manual
//! transition and resume it later: the current place, the caretaker history
//! of visited places, the hash record of previously fingerprinted inputs,
//! validated documents, and the tool-call transcript. All logs are
//! append-only and deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::document::DocumentRecord;
use crate::core::fingerprint::Fingerprint;
use crate::core::identifiers::DocumentId;
use crate::core::identifiers::PlaceId;
use crate::core::identifiers::ScopeKey;
use crate::core::identifiers::ToolId;
use crate::core::identifiers::TransitionId;
use crate::core::identifiers::WorkflowId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Workflow Status
// ============================================================================

/// Workflow instance lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Instance is actively firing transitions.
    Running,
    /// Instance is paused at a manual transition awaiting a user payload.
    Waiting,
    /// Instance reached a terminal place.
    Completed,
    /// Instance failed during tool execution.
    Failed,
}

// ============================================================================
// SECTION: Caretaker History
// ============================================================================

/// History entry recording one visited place.
///
/// # Invariants
/// - `seq` is monotonic within a caretaker, starting at 1.
/// - `transition` is absent only for the initial place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memento {
    /// Monotonic sequence number assigned by the caretaker.
    pub seq: u64,
    /// Place that was entered.
    pub place: PlaceId,
    /// Transition that entered the place, if any.
    pub transition: Option<TransitionId>,
    /// Timestamp the place was entered.
    pub recorded_at: Timestamp,
}

/// Append-only history of visited places for one workflow instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caretaker {
    /// Recorded mementos in entry order.
    entries: Vec<Memento>,
}

impl Caretaker {
    /// Creates an empty caretaker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a memento for an entered place.
    pub fn record(
        &mut self,
        place: PlaceId,
        transition: Option<TransitionId>,
        recorded_at: Timestamp,
    ) {
        let seq = self.entries.len() as u64 + 1;
        self.entries.push(Memento {
            seq,
            place,
            transition,
            recorded_at,
        });
    }

    /// Returns the recorded history in entry order.
    #[must_use]
    pub fn history(&self) -> &[Memento] {
        &self.entries
    }

    /// Returns the visited place names in entry order.
    #[must_use]
    pub fn places(&self) -> Vec<&str> {
        self.entries.iter().map(|memento| memento.place.as_str()).collect()
    }

    /// Returns the number of recorded mementos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no mementos are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Tool Call Records
// ============================================================================

/// Tool-call transcript entry.
///
/// # Invariants
/// - `arguments_fingerprint` is the canonical fingerprint of the resolved
///   arguments passed to the tool.
/// - `output_fingerprint` is absent exactly when `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Tool-call identifier, unique within the instance.
    pub call_id: String,
    /// Tool that was invoked.
    pub tool_id: ToolId,
    /// Transition that invoked the tool.
    pub transition_id: TransitionId,
    /// Canonical fingerprint of the resolved tool arguments.
    pub arguments_fingerprint: Fingerprint,
    /// Canonical fingerprint of the tool output content, when successful.
    pub output_fingerprint: Option<Fingerprint>,
    /// Tool-call timestamp.
    pub called_at: Timestamp,
    /// Error message when the tool call failed.
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Workflow State
// ============================================================================

/// Hash record mapping input scopes to previously computed fingerprints.
pub type HashRecord = BTreeMap<ScopeKey, Fingerprint>;

/// Workflow instance state with append-only logs.
///
/// # Invariants
/// - `caretaker` and `tool_calls` are append-only.
/// - `spec_fingerprint` matches the canonical fingerprint of the workflow
///   specification the instance was created from.
/// - `state` is a JSON object satisfying the workflow's state schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Workflow instance identifier.
    pub workflow_id: WorkflowId,
    /// Workflow definition name.
    pub workflow_name: String,
    /// Canonical fingerprint of the workflow specification.
    pub spec_fingerprint: Fingerprint,
    /// Current place of the instance.
    pub current_place: PlaceId,
    /// Instance lifecycle status.
    pub status: WorkflowStatus,
    /// Validated workflow arguments with defaults applied.
    pub arguments: Value,
    /// Mutable workflow state object.
    pub state: Value,
    /// Validated documents recorded from tool outputs.
    pub documents: BTreeMap<DocumentId, DocumentRecord>,
    /// Fingerprints of previously processed inputs, keyed by scope.
    pub hash_record: HashRecord,
    /// Caretaker history of visited places.
    pub caretaker: Caretaker,
    /// Tool-call transcript.
    pub tool_calls: Vec<ToolCallRecord>,
}
