// crates/loopflow-core/tests/processor_errors.rs
// ============================================================================
// Module: Processor Error Tests
// Description: Structural misuse, tool failures, and walk termination.
// ============================================================================
//! ## Overview
//! Validates the error split: tool execution failures surface through the
//! result's error flag, while structural misuse surfaces as typed errors.

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

use std::collections::BTreeMap;
use std::sync::Arc;

use loopflow_core::Caretaker;
use loopflow_core::DocumentId;
use loopflow_core::DocumentSpec;
use loopflow_core::ExecutionContext;
use loopflow_core::OPTIONS_SCOPE;
use loopflow_core::PendingTransition;
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
use loopflow_core::WorkflowState;
use loopflow_core::WorkflowStateStore;
use loopflow_core::WorkflowStatus;
use loopflow_core::fingerprint::DEFAULT_HASH_ALGORITHM;
use loopflow_core::fingerprint::fingerprint_canonical_json;
use loopflow_core::runtime::InMemoryWorkflowStateStore;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Tool double that always fails.
struct FailingTool;

impl Tool for FailingTool {
    fn execute(&self, _arguments: &Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        Err(ToolError::Failed("backend down".to_string()))
    }
}

/// Tool double returning a fixed content value.
struct ConstTool {
    /// Content returned on every invocation.
    content: Value,
}

impl Tool for ConstTool {
    fn execute(&self, _arguments: &Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput {
            content: self.content.clone(),
        })
    }
}

/// Builds a capture-then-wait workflow spec bound to the `echo` tool.
fn capture_spec() -> WorkflowSpec {
    WorkflowSpec {
        workflow_name: "capture".to_string(),
        version: "1".to_string(),
        arguments_schema: json!({
            "type": "object",
            "properties": { "note": { "type": "string", "default": "hello" } },
            "required": ["note"],
            "additionalProperties": false
        }),
        state_schema: json!({"type": "object"}),
        tools: vec![ToolId::new("echo")],
        documents: vec![DocumentSpec {
            document_id: DocumentId::new("note_doc"),
            schema: json!({
                "type": "object",
                "properties": { "body": { "type": "string" } },
                "required": ["body"],
                "additionalProperties": false
            }),
            description: None,
        }],
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
                document: Some(DocumentId::new("note_doc")),
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

/// Builds a processor over the capture workflow with the provided tool.
fn processor_with_tool(
    tool: Arc<dyn Tool + Send + Sync>,
    store: InMemoryWorkflowStateStore,
) -> WorkflowProcessor<InMemoryWorkflowStateStore> {
    let mut registry = ToolRegistry::new();
    registry.register(ToolId::new("echo"), tool);
    WorkflowProcessor::new(capture_spec(), registry, store, ProcessorConfig::default()).unwrap()
}

// ============================================================================
// SECTION: Tool Failures
// ============================================================================

/// Tests a tool failure surfaces through the error flag, not a typed error.
#[test]
fn test_tool_failure_sets_error_flag() {
    let processor = processor_with_tool(Arc::new(FailingTool), InMemoryWorkflowStateStore::new());

    let result = processor
        .process(
            &WorkflowId::new("run-1"),
            &json!({}),
            &ExecutionContext::new(Timestamp::Logical(1)),
        )
        .unwrap();

    assert!(result.error);
    assert!(result.stop);
    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(result.state.current_place.as_str(), "start", "failed transition must not advance");
    assert_eq!(result.state.caretaker.places(), vec!["start"]);

    let record = &result.state.tool_calls[0];
    assert!(record.output_fingerprint.is_none());
    assert!(record.error.as_deref().unwrap().contains("backend down"));
}

/// Tests invalid document content from a tool is a typed error.
#[test]
fn test_invalid_document_content_is_rejected() {
    let tool = ConstTool {
        content: json!("not an object"),
    };
    let processor = processor_with_tool(Arc::new(tool), InMemoryWorkflowStateStore::new());

    let error = processor
        .process(
            &WorkflowId::new("run-1"),
            &json!({}),
            &ExecutionContext::new(Timestamp::Logical(1)),
        )
        .unwrap_err();

    assert!(matches!(error, ProcessorError::InvalidDocument(_, _)));
}

// ============================================================================
// SECTION: Structural Misuse
// ============================================================================

/// Tests invalid arguments are rejected before any state is touched.
#[test]
fn test_invalid_arguments_are_rejected() {
    let tool = ConstTool {
        content: json!({"body": "b"}),
    };
    let store = InMemoryWorkflowStateStore::new();
    let processor = processor_with_tool(Arc::new(tool), store.clone());

    let error = processor
        .process(
            &WorkflowId::new("run-1"),
            &json!({"note": 7}),
            &ExecutionContext::new(Timestamp::Logical(1)),
        )
        .unwrap_err();

    assert!(matches!(error, ProcessorError::InvalidArguments(_)));
    assert!(store.load(&WorkflowId::new("run-1")).unwrap().is_none());
}

/// Tests a pending transition for another instance is rejected.
#[test]
fn test_pending_workflow_mismatch_is_rejected() {
    let tool = ConstTool {
        content: json!({"body": "b"}),
    };
    let processor = processor_with_tool(Arc::new(tool), InMemoryWorkflowStateStore::new());

    let pending = PendingTransition {
        transition_id: TransitionId::new("finish"),
        workflow_id: WorkflowId::new("other-run"),
        payload: json!({}),
    };
    let error = processor
        .process(
            &WorkflowId::new("run-1"),
            &json!({}),
            &ExecutionContext::with_pending(pending, Timestamp::Logical(1)),
        )
        .unwrap_err();

    assert!(matches!(error, ProcessorError::WorkflowMismatch(_)));
}

/// Tests a pending transition for a non-awaited transition keeps waiting.
#[test]
fn test_pending_unknown_transition_keeps_waiting() {
    let tool = ConstTool {
        content: json!({"body": "b"}),
    };
    let store = InMemoryWorkflowStateStore::new();
    let processor = processor_with_tool(Arc::new(tool), store);

    let workflow_id = WorkflowId::new("run-1");
    processor
        .process(&workflow_id, &json!({}), &ExecutionContext::new(Timestamp::Logical(1)))
        .unwrap();

    let pending = PendingTransition {
        transition_id: TransitionId::new("someone_elses_step"),
        workflow_id: workflow_id.clone(),
        payload: json!({}),
    };
    let result = processor
        .process(
            &workflow_id,
            &json!({}),
            &ExecutionContext::with_pending(pending, Timestamp::Logical(2)),
        )
        .unwrap();

    assert!(!result.error);
    assert!(result.stop);
    assert_eq!(result.status, WorkflowStatus::Waiting);
}

/// Tests constructing a processor with an unregistered tool fails.
#[test]
fn test_missing_tool_rejected_at_construction() {
    let registry = ToolRegistry::new();
    let error = WorkflowProcessor::new(
        capture_spec(),
        registry,
        InMemoryWorkflowStateStore::new(),
        ProcessorConfig::default(),
    )
    .map(|_| ())
    .unwrap_err();

    assert!(matches!(error, ProcessorError::UnknownTool(_)));
}

// ============================================================================
// SECTION: Walk Termination
// ============================================================================

/// Builds a spec with an unreachable self-loop place.
fn looping_spec() -> WorkflowSpec {
    let mut spec = capture_spec();
    spec.places.push(PlaceSpec {
        place_id: PlaceId::new("orbit"),
        description: None,
    });
    spec.transitions.push(TransitionSpec {
        transition_id: TransitionId::new("spin"),
        from: PlaceId::new("orbit"),
        to: PlaceId::new("orbit"),
        kind: TransitionKind::Automatic,
        binding: None,
        document: None,
        assign: None,
    });
    spec
}

/// Tests a seeded instance inside an unreachable cycle terminates with an error.
#[test]
fn test_seeded_cycle_terminates_with_error() {
    let spec = looping_spec();
    spec.validate().unwrap();

    let store = InMemoryWorkflowStateStore::new();
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolId::new("echo"),
        Arc::new(ConstTool {
            content: json!({"body": "b"}),
        }),
    );
    let processor =
        WorkflowProcessor::new(spec.clone(), registry, store.clone(), ProcessorConfig::default())
            .unwrap();

    let arguments = json!({"note": "hello"});
    let options =
        fingerprint_canonical_json(DEFAULT_HASH_ALGORITHM, &arguments).unwrap();
    let mut hash_record = BTreeMap::new();
    hash_record.insert(ScopeKey::new(OPTIONS_SCOPE), options);
    let mut caretaker = Caretaker::new();
    caretaker.record(PlaceId::new("orbit"), None, Timestamp::Logical(0));

    store
        .save(&WorkflowState {
            workflow_id: WorkflowId::new("run-1"),
            workflow_name: spec.workflow_name.clone(),
            spec_fingerprint: spec.canonical_fingerprint().unwrap(),
            current_place: PlaceId::new("orbit"),
            status: WorkflowStatus::Waiting,
            arguments: arguments.clone(),
            state: json!({}),
            documents: BTreeMap::new(),
            hash_record,
            caretaker,
            tool_calls: Vec::new(),
        })
        .unwrap();

    let error = processor
        .process(
            &WorkflowId::new("run-1"),
            &arguments,
            &ExecutionContext::new(Timestamp::Logical(1)),
        )
        .unwrap_err();

    assert!(matches!(error, ProcessorError::TransitionCycle(_)));
}
