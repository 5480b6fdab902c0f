// crates/loopflow-core/src/runtime/processor.rs
// ============================================================================
// Module: Loopflow Workflow Processor
// Description: Deterministic workflow execution, pausing, and resumption.
// Purpose: Execute workflow specifications with fingerprint-safe resumption.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The workflow processor is the single canonical execution path for
//! Loopflow. A `process` call validates arguments against the workflow's
//! schema (applying declared defaults), fingerprints the validated arguments
//! under the `options` scope, and creates, resumes, or restarts the instance
//! accordingly. It then walks the place graph: automatic transitions fire
//! immediately, manual transitions fire only when the execution context
//! carries a matching pending user payload, and every entered place is
//! recorded in the caretaker history. Mutated state is saved once, at the
//! end of the walk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::document::DocumentRecord;
use crate::core::fingerprint::DEFAULT_HASH_ALGORITHM;
use crate::core::fingerprint::Fingerprint;
use crate::core::fingerprint::FingerprintError;
use crate::core::fingerprint::HashAlgorithm;
use crate::core::fingerprint::fingerprint_canonical_json;
use crate::core::identifiers::PlaceId;
use crate::core::identifiers::ScopeKey;
use crate::core::identifiers::TransitionId;
use crate::core::identifiers::WorkflowId;
use crate::core::schema::apply_defaults;
use crate::core::schema::validate_value;
use crate::core::spec::SpecError;
use crate::core::spec::TransitionKind;
use crate::core::spec::TransitionSpec;
use crate::core::spec::WorkflowSpec;
use crate::core::state::Caretaker;
use crate::core::state::ToolCallRecord;
use crate::core::state::WorkflowState;
use crate::core::state::WorkflowStatus;
use crate::core::template::TemplateError;
use crate::core::template::TemplateScope;
use crate::core::template::resolve_template;
use crate::core::time::Timestamp;
use crate::interfaces::StoreError;
use crate::interfaces::ToolContext;
use crate::interfaces::WorkflowStateStore;
use crate::runtime::registry::ToolRegistry;

// ============================================================================
// SECTION: Processor Configuration
// ============================================================================

/// Hash-record scope holding the fingerprint of the validated arguments.
pub const OPTIONS_SCOPE: &str = "options";

/// Configuration for the workflow processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Hash algorithm used for canonical fingerprints.
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: DEFAULT_HASH_ALGORITHM,
        }
    }
}

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Pending user transition carried by an execution context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTransition {
    /// Manual transition the payload answers.
    pub transition_id: TransitionId,
    /// Workflow instance the payload targets.
    pub workflow_id: WorkflowId,
    /// User-supplied payload.
    pub payload: Value,
}

/// Execution context for one `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Optional pending user transition.
    pub pending: Option<PendingTransition>,
    /// Timestamp applied to records produced by this call.
    pub time: Timestamp,
}

impl ExecutionContext {
    /// Creates a context with no pending transition.
    #[must_use]
    pub const fn new(time: Timestamp) -> Self {
        Self {
            pending: None,
            time,
        }
    }

    /// Creates a context carrying a pending user transition.
    #[must_use]
    pub const fn with_pending(pending: PendingTransition, time: Timestamp) -> Self {
        Self {
            pending: Some(pending),
            time,
        }
    }
}

// ============================================================================
// SECTION: Process Result
// ============================================================================

/// Result returned by [`WorkflowProcessor::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// True when tool execution failed during this call.
    pub error: bool,
    /// True when the instance is paused (manual wait) or failed.
    pub stop: bool,
    /// Instance status after this call.
    pub status: WorkflowStatus,
    /// Instance state after this call, including caretaker history.
    pub state: WorkflowState,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Workflow processor errors.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Workflow spec failed validation.
    #[error("invalid workflow spec: {0}")]
    InvalidSpec(#[from] SpecError),
    /// Arguments failed schema validation.
    #[error("arguments rejected: {0}")]
    InvalidArguments(String),
    /// State object failed schema validation.
    #[error("state rejected: {0}")]
    InvalidState(String),
    /// Document content failed schema validation.
    #[error("document content rejected for {0}: {1}")]
    InvalidDocument(String, String),
    /// Stored instance was created from a different workflow spec.
    #[error("workflow spec drift for instance: {0}")]
    SpecMismatch(String),
    /// Pending transition targets another workflow instance.
    #[error("pending transition targets another workflow: {0}")]
    WorkflowMismatch(String),
    /// Tool is not registered.
    #[error("tool is not registered: {0}")]
    UnknownTool(String),
    /// Transition walk revisited places beyond the spec's transition count.
    #[error("transition walk did not terminate for instance: {0}")]
    TransitionCycle(String),
    /// Binding template failed to resolve.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Fingerprinting error.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    /// Workflow state store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Workflow Processor
// ============================================================================

/// Outcome of firing a single transition.
enum FireOutcome {
    /// The transition fired and the instance advanced.
    Advanced,
    /// The bound tool failed; the failure reason is recorded.
    Failed(String),
}

/// Workflow processor implementing deterministic Loopflow execution.
pub struct WorkflowProcessor<S> {
    /// Workflow specification executed by this processor.
    spec: WorkflowSpec,
    /// Canonical fingerprint of the specification.
    spec_fingerprint: Fingerprint,
    /// Initial place of the specification.
    initial_place: PlaceId,
    /// Registered tool dependencies.
    tools: ToolRegistry,
    /// Workflow state store implementation.
    store: S,
    /// Processor configuration.
    config: ProcessorConfig,
}

impl<S> WorkflowProcessor<S>
where
    S: WorkflowStateStore,
{
    /// Creates a new workflow processor.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::InvalidSpec`] when the spec fails validation
    /// and [`ProcessorError::UnknownTool`] when a declared tool is missing
    /// from the registry.
    pub fn new(
        spec: WorkflowSpec,
        tools: ToolRegistry,
        store: S,
        config: ProcessorConfig,
    ) -> Result<Self, ProcessorError> {
        spec.validate()?;
        for tool_id in &spec.tools {
            if !tools.contains(tool_id) {
                return Err(ProcessorError::UnknownTool(tool_id.to_string()));
            }
        }
        let spec_fingerprint = spec.canonical_fingerprint_with(config.hash_algorithm)?;
        let initial_place =
            spec.initial_place().ok_or(ProcessorError::InvalidSpec(SpecError::MissingPlaces))?.clone();
        Ok(Self {
            spec,
            spec_fingerprint,
            initial_place,
            tools,
            store,
            config,
        })
    }

    /// Returns the workflow specification executed by this processor.
    #[must_use]
    pub const fn spec(&self) -> &WorkflowSpec {
        &self.spec
    }

    /// Validates arguments against the workflow schema, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::InvalidArguments`] when validation fails.
    pub fn validate_arguments(&self, arguments: &Value) -> Result<Value, ProcessorError> {
        let merged = apply_defaults(&self.spec.arguments_schema, arguments);
        validate_value(&self.spec.arguments_schema, &merged)
            .map_err(|err| ProcessorError::InvalidArguments(err.to_string()))?;
        Ok(merged)
    }

    /// Processes a workflow instance with the provided arguments and context.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] on structural misuse: invalid arguments,
    /// spec drift, a pending transition for another instance, template or
    /// store failures. Tool execution failures are reported through the
    /// result's error flag instead.
    pub fn process(
        &self,
        workflow_id: &WorkflowId,
        arguments: &Value,
        ctx: &ExecutionContext,
    ) -> Result<ProcessResult, ProcessorError> {
        let arguments = self.validate_arguments(arguments)?;
        let options_fingerprint =
            fingerprint_canonical_json(self.config.hash_algorithm, &arguments)?;

        if let Some(pending) = &ctx.pending
            && pending.workflow_id != *workflow_id
        {
            return Err(ProcessorError::WorkflowMismatch(pending.workflow_id.to_string()));
        }

        let mut state = match self.store.load(workflow_id)? {
            Some(existing) => {
                self.resume_state(existing, workflow_id, &arguments, &options_fingerprint, ctx)?
            }
            None => self.new_state(workflow_id, &arguments, &options_fingerprint, ctx.time),
        };

        if state.status == WorkflowStatus::Completed {
            let status = state.status;
            return Ok(ProcessResult {
                error: false,
                stop: false,
                status,
                state,
            });
        }

        let mut pending = ctx.pending.as_ref();
        let mut error = false;
        let mut budget = self.spec.transitions.len() + 1;

        loop {
            let Some(transition) = self.spec.outgoing(&state.current_place) else {
                state.status = WorkflowStatus::Completed;
                tracing::info!(workflow_id = %state.workflow_id, "workflow completed");
                break;
            };

            let payload: Option<&Value> = match transition.kind {
                TransitionKind::Manual => {
                    let Some(awaiting) = pending else {
                        state.status = WorkflowStatus::Waiting;
                        tracing::debug!(
                            workflow_id = %state.workflow_id,
                            place = %state.current_place,
                            "workflow waiting for manual transition"
                        );
                        break;
                    };
                    if awaiting.transition_id != transition.transition_id {
                        state.status = WorkflowStatus::Waiting;
                        break;
                    }
                    pending = None;
                    Some(&awaiting.payload)
                }
                TransitionKind::Automatic => None,
            };

            if budget == 0 {
                return Err(ProcessorError::TransitionCycle(state.workflow_id.to_string()));
            }
            budget -= 1;

            match self.fire(&mut state, transition, payload, ctx.time)? {
                FireOutcome::Advanced => {}
                FireOutcome::Failed(reason) => {
                    state.status = WorkflowStatus::Failed;
                    error = true;
                    tracing::warn!(
                        workflow_id = %state.workflow_id,
                        %reason,
                        "tool execution failed"
                    );
                    break;
                }
            }
        }

        self.store.save(&state)?;

        let stop = matches!(state.status, WorkflowStatus::Waiting | WorkflowStatus::Failed);
        let status = state.status;
        Ok(ProcessResult {
            error,
            stop,
            status,
            state,
        })
    }

    /// Creates a fresh instance state at the initial place.
    fn new_state(
        &self,
        workflow_id: &WorkflowId,
        arguments: &Value,
        options_fingerprint: &Fingerprint,
        time: Timestamp,
    ) -> WorkflowState {
        let mut caretaker = Caretaker::new();
        caretaker.record(self.initial_place.clone(), None, time);

        let mut hash_record = BTreeMap::new();
        hash_record.insert(ScopeKey::new(OPTIONS_SCOPE), options_fingerprint.clone());

        tracing::info!(workflow_id = %workflow_id, "created workflow instance");
        WorkflowState {
            workflow_id: workflow_id.clone(),
            workflow_name: self.spec.workflow_name.clone(),
            spec_fingerprint: self.spec_fingerprint.clone(),
            current_place: self.initial_place.clone(),
            status: WorkflowStatus::Running,
            arguments: arguments.clone(),
            state: Value::Object(Map::new()),
            documents: BTreeMap::new(),
            hash_record,
            caretaker,
            tool_calls: Vec::new(),
        }
    }

    /// Resumes an existing instance or restarts it when its inputs changed.
    fn resume_state(
        &self,
        existing: WorkflowState,
        workflow_id: &WorkflowId,
        arguments: &Value,
        options_fingerprint: &Fingerprint,
        ctx: &ExecutionContext,
    ) -> Result<WorkflowState, ProcessorError> {
        if existing.spec_fingerprint != self.spec_fingerprint {
            return Err(ProcessorError::SpecMismatch(workflow_id.to_string()));
        }

        let recorded = existing.hash_record.get(&ScopeKey::new(OPTIONS_SCOPE));
        if recorded == Some(options_fingerprint) {
            tracing::debug!(
                workflow_id = %workflow_id,
                place = %existing.current_place,
                "resuming workflow instance; arguments already processed"
            );
            Ok(existing)
        } else {
            tracing::warn!(
                workflow_id = %workflow_id,
                "arguments changed; restarting workflow instance"
            );
            Ok(self.new_state(workflow_id, arguments, options_fingerprint, ctx.time))
        }
    }

    /// Fires a transition: executes the bound tool and advances the instance.
    fn fire(
        &self,
        state: &mut WorkflowState,
        transition: &TransitionSpec,
        payload: Option<&Value>,
        time: Timestamp,
    ) -> Result<FireOutcome, ProcessorError> {
        if let Some(binding) = &transition.binding {
            let scope = TemplateScope {
                arguments: &state.arguments,
                state: &state.state,
                payload,
            };
            let resolved = resolve_template(&binding.arguments, &scope)?;
            let tool = self
                .tools
                .resolve(&binding.tool_id)
                .ok_or_else(|| ProcessorError::UnknownTool(binding.tool_id.to_string()))?;
            let tool_ctx = ToolContext {
                workflow_id: state.workflow_id.clone(),
                place: state.current_place.clone(),
                transition: transition.transition_id.clone(),
                time,
            };
            let arguments_fingerprint =
                fingerprint_canonical_json(self.config.hash_algorithm, &resolved)?;
            let call_id = format!("call-{}", state.tool_calls.len() + 1);

            match tool.execute(&resolved, &tool_ctx) {
                Ok(output) => {
                    let output_fingerprint =
                        fingerprint_canonical_json(self.config.hash_algorithm, &output.content)?;
                    state.tool_calls.push(ToolCallRecord {
                        call_id,
                        tool_id: binding.tool_id.clone(),
                        transition_id: transition.transition_id.clone(),
                        arguments_fingerprint,
                        output_fingerprint: Some(output_fingerprint),
                        called_at: time,
                        error: None,
                    });
                    self.commit_content(state, transition, output.content, time)?;
                }
                Err(err) => {
                    state.tool_calls.push(ToolCallRecord {
                        call_id,
                        tool_id: binding.tool_id.clone(),
                        transition_id: transition.transition_id.clone(),
                        arguments_fingerprint,
                        output_fingerprint: None,
                        called_at: time,
                        error: Some(err.to_string()),
                    });
                    return Ok(FireOutcome::Failed(err.to_string()));
                }
            }
        }

        state.current_place = transition.to.clone();
        state.status = WorkflowStatus::Running;
        state.caretaker.record(
            transition.to.clone(),
            Some(transition.transition_id.clone()),
            time,
        );
        tracing::debug!(
            workflow_id = %state.workflow_id,
            transition = %transition.transition_id,
            place = %transition.to,
            "transition fired"
        );
        Ok(FireOutcome::Advanced)
    }

    /// Validates tool output content and commits it into the instance state.
    fn commit_content(
        &self,
        state: &mut WorkflowState,
        transition: &TransitionSpec,
        content: Value,
        time: Timestamp,
    ) -> Result<(), ProcessorError> {
        if let Some(document_id) = &transition.document {
            let document = self.spec.document(document_id).ok_or_else(|| {
                ProcessorError::InvalidDocument(
                    document_id.to_string(),
                    "document is not declared".to_string(),
                )
            })?;
            validate_value(&document.schema, &content).map_err(|err| {
                ProcessorError::InvalidDocument(document_id.to_string(), err.to_string())
            })?;
            let revision =
                state.documents.get(document_id).map_or(1, |record| record.revision + 1);
            let content_fingerprint =
                fingerprint_canonical_json(self.config.hash_algorithm, &content)?;
            state.documents.insert(
                document_id.clone(),
                DocumentRecord {
                    document_id: document_id.clone(),
                    content: content.clone(),
                    content_fingerprint,
                    revision,
                    updated_at: time,
                },
            );
        }

        if let Some(key) = &transition.assign {
            let Value::Object(fields) = &mut state.state else {
                return Err(ProcessorError::InvalidState(
                    "state object is not a json object".to_string(),
                ));
            };
            fields.insert(key.clone(), content);
            validate_value(&self.spec.state_schema, &state.state)
                .map_err(|err| ProcessorError::InvalidState(err.to_string()))?;
        }

        Ok(())
    }
}
