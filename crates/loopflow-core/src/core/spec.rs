// crates/loopflow-core/src/core/spec.rs
// ============================================================================
// Module: Loopflow Workflow Specification
// Description: Workflow, place, transition, and tool-binding specifications.
// Purpose: Define canonical Loopflow workflow definitions with validation helpers.
// Dependencies: crate::core::{document, fingerprint, identifiers, schema}, serde
// ============================================================================

//! ## Overview
//! Workflow specifications declare the block graph executed by the runtime:
//! named places, the transitions between them, the tools and documents the
//! workflow depends on, and the JSON Schemas for its arguments and mutable
//! state. Specs are validated at load time to enforce invariants such as
//! unique identifiers, resolvable endpoints, and a single outgoing transition
//! per place. The graph reachable from the initial place must be acyclic so a
//! processing pass always terminates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::document::DocumentSpec;
use crate::core::fingerprint::DEFAULT_HASH_ALGORITHM;
use crate::core::fingerprint::Fingerprint;
use crate::core::fingerprint::FingerprintError;
use crate::core::fingerprint::HashAlgorithm;
use crate::core::fingerprint::fingerprint_canonical_json;
use crate::core::identifiers::DocumentId;
use crate::core::identifiers::PlaceId;
use crate::core::identifiers::ToolId;
use crate::core::identifiers::TransitionId;
use crate::core::schema::check_schema;

// ============================================================================
// SECTION: Workflow Specification
// ============================================================================

/// Canonical workflow specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSpec {
    /// Workflow name shared by all instances of this definition.
    pub workflow_name: String,
    /// Specification version string.
    pub version: String,
    /// JSON Schema for workflow arguments, including default values.
    pub arguments_schema: Value,
    /// JSON Schema for the mutable workflow state object.
    pub state_schema: Value,
    /// Tool dependencies declared by the workflow.
    pub tools: Vec<ToolId>,
    /// Document dependencies declared by the workflow.
    pub documents: Vec<DocumentSpec>,
    /// Places in declaration order; the first place is the initial place.
    pub places: Vec<PlaceSpec>,
    /// Transitions between places.
    pub transitions: Vec<TransitionSpec>,
}

impl WorkflowSpec {
    /// Computes the canonical fingerprint of the workflow specification.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::Canonicalization`] when serialization fails.
    pub fn canonical_fingerprint(&self) -> Result<Fingerprint, FingerprintError> {
        self.canonical_fingerprint_with(DEFAULT_HASH_ALGORITHM)
    }

    /// Computes the canonical fingerprint using a specific algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::Canonicalization`] when serialization fails.
    pub fn canonical_fingerprint_with(
        &self,
        algorithm: HashAlgorithm,
    ) -> Result<Fingerprint, FingerprintError> {
        fingerprint_canonical_json(algorithm, self)
    }

    /// Returns the initial place of the workflow, if any.
    #[must_use]
    pub fn initial_place(&self) -> Option<&PlaceId> {
        self.places.first().map(|place| &place.place_id)
    }

    /// Returns the outgoing transition from the provided place, if any.
    #[must_use]
    pub fn outgoing(&self, place_id: &PlaceId) -> Option<&TransitionSpec> {
        self.transitions.iter().find(|transition| &transition.from == place_id)
    }

    /// Returns the document specification for the provided document id.
    #[must_use]
    pub fn document(&self, document_id: &DocumentId) -> Option<&DocumentSpec> {
        self.documents.iter().find(|document| &document.document_id == document_id)
    }

    /// Validates the workflow specification invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation fails.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.places.is_empty() {
            return Err(SpecError::MissingPlaces);
        }

        ensure_unique_place_ids(&self.places)?;
        ensure_unique_transition_ids(&self.transitions)?;
        ensure_unique_document_ids(&self.documents)?;
        ensure_transition_endpoints_resolve(&self.places, &self.transitions)?;
        ensure_single_outgoing(&self.places, &self.transitions)?;
        ensure_bound_tools_declared(&self.transitions, &self.tools)?;
        ensure_document_refs_resolve(&self.transitions, &self.documents)?;
        ensure_reachable_path_acyclic(self)?;
        ensure_schemas_compile(self)?;

        Ok(())
    }
}

// ============================================================================
// SECTION: Place Specifications
// ============================================================================

/// Place specification naming one state in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSpec {
    /// Place identifier.
    pub place_id: PlaceId,
    /// Optional description of the place.
    pub description: Option<String>,
}

// ============================================================================
// SECTION: Transition Specifications
// ============================================================================

/// Transition firing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Fires as soon as the source place is reached.
    Automatic,
    /// Fires only when a matching user payload is pending.
    Manual,
}

/// Tool binding executed when a transition fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolBinding {
    /// Tool identifier; must be declared in the workflow's tools.
    pub tool_id: ToolId,
    /// Argument template resolved against arguments, state, and payload.
    pub arguments: Value,
}

/// Transition specification connecting two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Transition identifier.
    pub transition_id: TransitionId,
    /// Source place identifier.
    pub from: PlaceId,
    /// Target place identifier.
    pub to: PlaceId,
    /// Firing behavior.
    pub kind: TransitionKind,
    /// Optional tool binding executed when the transition fires.
    pub binding: Option<ToolBinding>,
    /// Optional document validated and recorded from the tool output.
    pub document: Option<DocumentId>,
    /// Optional state-object key assigned from the tool output.
    pub assign: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Workflow specification validation errors.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Specification contains no places.
    #[error("workflow spec must define at least one place")]
    MissingPlaces,
    /// Duplicate place identifiers detected.
    #[error("duplicate place identifier: {0}")]
    DuplicatePlaceId(String),
    /// Duplicate transition identifiers detected.
    #[error("duplicate transition identifier: {0}")]
    DuplicateTransitionId(String),
    /// Duplicate document identifiers detected.
    #[error("duplicate document identifier: {0}")]
    DuplicateDocumentId(String),
    /// Transition source place is not declared.
    #[error("transition {0} starts from unknown place: {1}")]
    UnknownSourcePlace(String, String),
    /// Transition target place is not declared.
    #[error("transition {0} targets unknown place: {1}")]
    UnknownTargetPlace(String, String),
    /// Multiple transitions share a source place.
    #[error("place has more than one outgoing transition: {0}")]
    ConflictingTransitions(String),
    /// Transition binds a tool that is not declared.
    #[error("transition {0} binds undeclared tool: {1}")]
    UndeclaredTool(String, String),
    /// Transition references a document that is not declared.
    #[error("transition {0} references unknown document: {1}")]
    UnknownDocument(String, String),
    /// Transition path from the initial place revisits a place.
    #[error("transition path revisits place: {0}")]
    CyclicTransitions(String),
    /// Declared schema failed to compile.
    #[error("invalid schema for {0}: {1}")]
    InvalidSchema(String, String),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures place identifiers are unique within the spec.
fn ensure_unique_place_ids(places: &[PlaceSpec]) -> Result<(), SpecError> {
    for (index, place) in places.iter().enumerate() {
        if places.iter().skip(index + 1).any(|other| other.place_id == place.place_id) {
            return Err(SpecError::DuplicatePlaceId(place.place_id.to_string()));
        }
    }
    Ok(())
}

/// Ensures transition identifiers are unique within the spec.
fn ensure_unique_transition_ids(transitions: &[TransitionSpec]) -> Result<(), SpecError> {
    for (index, transition) in transitions.iter().enumerate() {
        if transitions
            .iter()
            .skip(index + 1)
            .any(|other| other.transition_id == transition.transition_id)
        {
            return Err(SpecError::DuplicateTransitionId(transition.transition_id.to_string()));
        }
    }
    Ok(())
}

/// Ensures document identifiers are unique within the spec.
fn ensure_unique_document_ids(documents: &[DocumentSpec]) -> Result<(), SpecError> {
    for (index, document) in documents.iter().enumerate() {
        if documents.iter().skip(index + 1).any(|other| other.document_id == document.document_id)
        {
            return Err(SpecError::DuplicateDocumentId(document.document_id.to_string()));
        }
    }
    Ok(())
}

/// Ensures transition endpoints reference declared places.
fn ensure_transition_endpoints_resolve(
    places: &[PlaceSpec],
    transitions: &[TransitionSpec],
) -> Result<(), SpecError> {
    for transition in transitions {
        if !places.iter().any(|place| place.place_id == transition.from) {
            return Err(SpecError::UnknownSourcePlace(
                transition.transition_id.to_string(),
                transition.from.to_string(),
            ));
        }
        if !places.iter().any(|place| place.place_id == transition.to) {
            return Err(SpecError::UnknownTargetPlace(
                transition.transition_id.to_string(),
                transition.to.to_string(),
            ));
        }
    }
    Ok(())
}

/// Ensures each place has at most one outgoing transition.
fn ensure_single_outgoing(
    places: &[PlaceSpec],
    transitions: &[TransitionSpec],
) -> Result<(), SpecError> {
    for place in places {
        let outgoing =
            transitions.iter().filter(|transition| transition.from == place.place_id).count();
        if outgoing > 1 {
            return Err(SpecError::ConflictingTransitions(place.place_id.to_string()));
        }
    }
    Ok(())
}

/// Ensures bound tools are declared in the workflow's tool list.
fn ensure_bound_tools_declared(
    transitions: &[TransitionSpec],
    tools: &[ToolId],
) -> Result<(), SpecError> {
    for transition in transitions {
        if let Some(binding) = &transition.binding
            && !tools.contains(&binding.tool_id)
        {
            return Err(SpecError::UndeclaredTool(
                transition.transition_id.to_string(),
                binding.tool_id.to_string(),
            ));
        }
    }
    Ok(())
}

/// Ensures document references resolve to declared documents.
fn ensure_document_refs_resolve(
    transitions: &[TransitionSpec],
    documents: &[DocumentSpec],
) -> Result<(), SpecError> {
    for transition in transitions {
        if let Some(document_id) = &transition.document
            && !documents.iter().any(|document| &document.document_id == document_id)
        {
            return Err(SpecError::UnknownDocument(
                transition.transition_id.to_string(),
                document_id.to_string(),
            ));
        }
    }
    Ok(())
}

/// Ensures the transition path from the initial place never revisits a place.
fn ensure_reachable_path_acyclic(spec: &WorkflowSpec) -> Result<(), SpecError> {
    let mut visited: Vec<&PlaceId> = Vec::new();
    let mut current = spec.initial_place();
    while let Some(place_id) = current {
        if visited.contains(&place_id) {
            return Err(SpecError::CyclicTransitions(place_id.to_string()));
        }
        visited.push(place_id);
        current = spec.outgoing(place_id).map(|transition| &transition.to);
    }
    Ok(())
}

/// Ensures all declared schemas compile.
fn ensure_schemas_compile(spec: &WorkflowSpec) -> Result<(), SpecError> {
    check_schema(&spec.arguments_schema)
        .map_err(|err| SpecError::InvalidSchema("arguments".to_string(), err.to_string()))?;
    check_schema(&spec.state_schema)
        .map_err(|err| SpecError::InvalidSchema("state".to_string(), err.to_string()))?;
    for document in &spec.documents {
        check_schema(&document.schema).map_err(|err| {
            SpecError::InvalidSchema(document.document_id.to_string(), err.to_string())
        })?;
    }
    Ok(())
}
