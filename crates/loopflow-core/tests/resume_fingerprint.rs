// crates/loopflow-core/tests/resume_fingerprint.rs
// ============================================================================
// Module: Resumption Fingerprint Tests
// Description: Fingerprint-based memoization, restarts, and spec drift.
// ============================================================================
//! ## Overview
//! Validates resumption safety: identical arguments resume without re-running
//! earlier steps, changed arguments restart the instance, and instances
//! created from a different spec are rejected.

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

use std::sync::Arc;
use std::sync::Mutex;

use loopflow_core::ExecutionContext;
use loopflow_core::OPTIONS_SCOPE;
use loopflow_core::PlaceId;
use loopflow_core::PlaceSpec;
use loopflow_core::ProcessorConfig;
use loopflow_core::ProcessorError;
use loopflow_core::ScopeKey;
use loopflow_core::Timestamp;
use loopflow_core::Tool;
use loopflow_core::ToolBinding;
use loopflow_core::ToolContext;
use loopflow_core::ToolError;
use loopflow_core::ToolId;
use loopflow_core::ToolOutput;
use loopflow_core::ToolRegistry;
use loopflow_core::TransitionId;
use loopflow_core::TransitionKind;
use loopflow_core::TransitionSpec;
use loopflow_core::WorkflowId;
use loopflow_core::WorkflowProcessor;
use loopflow_core::WorkflowSpec;
use loopflow_core::WorkflowStatus;
use loopflow_core::fingerprint::DEFAULT_HASH_ALGORITHM;
use loopflow_core::fingerprint::fingerprint_canonical_json;
use loopflow_core::runtime::InMemoryWorkflowStateStore;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Tool double counting invocations and echoing arguments back.
#[derive(Clone)]
struct CountingTool {
    /// Number of invocations.
    count: Arc<Mutex<usize>>,
}

impl CountingTool {
    /// Creates a counting tool.
    fn new() -> Self {
        Self {
            count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns the invocation count.
    fn count(&self) -> usize {
        *self.count.lock().unwrap()
    }
}

impl Tool for CountingTool {
    fn execute(&self, arguments: &Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        *self.count.lock().unwrap() += 1;
        Ok(ToolOutput {
            content: arguments.clone(),
        })
    }
}

/// Builds a capture-then-wait workflow spec with the provided version.
fn capture_spec(version: &str) -> WorkflowSpec {
    WorkflowSpec {
        workflow_name: "capture".to_string(),
        version: version.to_string(),
        arguments_schema: json!({
            "type": "object",
            "properties": { "note": { "type": "string", "default": "hello" } },
            "required": ["note"],
            "additionalProperties": false
        }),
        state_schema: json!({"type": "object"}),
        tools: vec![ToolId::new("echo")],
        documents: Vec::new(),
        places: vec![
            PlaceSpec {
                place_id: PlaceId::new("start"),
                description: None,
            },
            PlaceSpec {
                place_id: PlaceId::new("waiting"),
                description: None,
            },
            PlaceSpec {
                place_id: PlaceId::new("end"),
                description: None,
            },
        ],
        transitions: vec![
            TransitionSpec {
                transition_id: TransitionId::new("capture"),
                from: PlaceId::new("start"),
                to: PlaceId::new("waiting"),
                kind: TransitionKind::Automatic,
                binding: Some(ToolBinding {
                    tool_id: ToolId::new("echo"),
                    arguments: json!({"body": "${arguments.note}"}),
                }),
                document: None,
                assign: None,
            },
            TransitionSpec {
                transition_id: TransitionId::new("finish"),
                from: PlaceId::new("waiting"),
                to: PlaceId::new("end"),
                kind: TransitionKind::Manual,
                binding: None,
                document: None,
                assign: None,
            },
        ],
    }
}

/// Builds a processor over the capture workflow and the provided store.
fn capture_processor(
    version: &str,
    tool: &CountingTool,
    store: InMemoryWorkflowStateStore,
) -> WorkflowProcessor<InMemoryWorkflowStateStore> {
    let mut registry = ToolRegistry::new();
    registry.register(ToolId::new("echo"), Arc::new(tool.clone()));
    WorkflowProcessor::new(capture_spec(version), registry, store, ProcessorConfig::default())
        .unwrap()
}

// ============================================================================
// SECTION: Memoization
// ============================================================================

/// Tests the hash record stores the options fingerprint of validated arguments.
#[test]
fn test_hash_record_holds_options_fingerprint() {
    let tool = CountingTool::new();
    let processor = capture_processor("1", &tool, InMemoryWorkflowStateStore::new());

    let result = processor
        .process(
            &WorkflowId::new("run-1"),
            &json!({}),
            &ExecutionContext::new(Timestamp::Logical(1)),
        )
        .unwrap();

    let expected =
        fingerprint_canonical_json(DEFAULT_HASH_ALGORITHM, &json!({"note": "hello"})).unwrap();
    let recorded = result.state.hash_record.get(&ScopeKey::new(OPTIONS_SCOPE)).unwrap();
    assert_eq!(recorded, &expected);
}

/// Tests identical arguments resume without re-running earlier steps.
#[test]
fn test_identical_arguments_resume_without_rerun() {
    let tool = CountingTool::new();
    let store = InMemoryWorkflowStateStore::new();
    let processor = capture_processor("1", &tool, store);

    let workflow_id = WorkflowId::new("run-1");
    processor
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(1)))
        .unwrap();
    assert_eq!(tool.count(), 1);

    let resumed = processor
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(2)))
        .unwrap();

    assert_eq!(tool.count(), 1, "capture step must not re-run");
    assert_eq!(resumed.status, WorkflowStatus::Waiting);
    assert_eq!(resumed.state.caretaker.places(), vec!["start", "waiting"]);
}

/// Tests explicitly passing the defaulted value matches the defaulted run.
#[test]
fn test_explicit_default_matches_defaulted_run() {
    let tool = CountingTool::new();
    let store = InMemoryWorkflowStateStore::new();
    let processor = capture_processor("1", &tool, store);

    let workflow_id = WorkflowId::new("run-1");
    processor
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(1)))
        .unwrap();
    processor
        .process(
            &workflow_id,
            &json!({"note": "hello"}),
            &ExecutionContext::new(Timestamp::Logical(2)),
        )
        .unwrap();

    assert_eq!(tool.count(), 1, "defaulted and explicit arguments share a fingerprint");
}

// ============================================================================
// SECTION: Restarts
// ============================================================================

/// Tests changed arguments restart the instance with fresh history.
#[test]
fn test_changed_arguments_restart_instance() {
    let tool = CountingTool::new();
    let store = InMemoryWorkflowStateStore::new();
    let processor = capture_processor("1", &tool, store);

    let workflow_id = WorkflowId::new("run-1");
    processor
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(1)))
        .unwrap();
    assert_eq!(tool.count(), 1);

    let restarted = processor
        .process(
            &workflow_id,
            &json!({"note": "edited"}),
            &ExecutionContext::new(Timestamp::Logical(2)),
        )
        .unwrap();

    assert_eq!(tool.count(), 2, "capture step re-runs for changed inputs");
    assert_eq!(restarted.state.caretaker.places(), vec!["start", "waiting"]);

    let expected =
        fingerprint_canonical_json(DEFAULT_HASH_ALGORITHM, &json!({"note": "edited"})).unwrap();
    let recorded = restarted.state.hash_record.get(&ScopeKey::new(OPTIONS_SCOPE)).unwrap();
    assert_eq!(recorded, &expected);
}

// ============================================================================
// SECTION: Spec Drift
// ============================================================================

/// Tests instances created from a different spec are rejected.
#[test]
fn test_spec_drift_is_rejected() {
    let tool = CountingTool::new();
    let store = InMemoryWorkflowStateStore::new();
    let processor_v1 = capture_processor("1", &tool, store.clone());

    let workflow_id = WorkflowId::new("run-1");
    processor_v1
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(1)))
        .unwrap();

    let processor_v2 = capture_processor("2", &tool, store);
    let error = processor_v2
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(2)))
        .unwrap_err();

    assert!(matches!(error, ProcessorError::SpecMismatch(_)));
}
