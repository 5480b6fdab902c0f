// crates/loopflow-core/src/runtime/store.rs
// ============================================================================
// Module: Loopflow In-Memory Store
// Description: Simple in-memory workflow state store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`WorkflowStateStore`] for tests and local demos. It is not intended for
//! production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::identifiers::WorkflowId;
use crate::core::state::WorkflowState;
use crate::interfaces::StoreError;
use crate::interfaces::WorkflowStateStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory workflow state store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkflowStateStore {
    /// Workflow state map protected by a mutex.
    states: Arc<Mutex<BTreeMap<String, WorkflowState>>>,
}

impl InMemoryWorkflowStateStore {
    /// Creates a new in-memory workflow state store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl WorkflowStateStore for InMemoryWorkflowStateStore {
    fn load(&self, workflow_id: &WorkflowId) -> Result<Option<WorkflowState>, StoreError> {
        let guard = self
            .states
            .lock()
            .map_err(|_| StoreError::Store("workflow state store mutex poisoned".to_string()))?;
        Ok(guard.get(workflow_id.as_str()).cloned())
    }

    fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
        self.states
            .lock()
            .map_err(|_| StoreError::Store("workflow state store mutex poisoned".to_string()))?
            .insert(state.workflow_id.as_str().to_string(), state.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared workflow state store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedWorkflowStateStore {
    /// Inner store implementation.
    inner: Arc<dyn WorkflowStateStore + Send + Sync>,
}

impl SharedWorkflowStateStore {
    /// Wraps a workflow state store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl WorkflowStateStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn WorkflowStateStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl WorkflowStateStore for SharedWorkflowStateStore {
    fn load(&self, workflow_id: &WorkflowId) -> Result<Option<WorkflowState>, StoreError> {
        self.inner.load(workflow_id)
    }

    fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
        self.inner.save(state)
    }
}
