// crates/loopflow-core/src/runtime/registry.rs
// ============================================================================
// Module: Loopflow Tool Registry
// Description: Deterministic registry resolving tool identifiers to tools.
// Purpose: Supply declared tool dependencies to the workflow processor.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The tool registry maps declared tool identifiers to implementations. Hosts
//! register concrete tools; tests register doubles. Registration is
//! last-write-wins so a double can override a previously registered tool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::identifiers::ToolId;
use crate::interfaces::Tool;

// ============================================================================
// SECTION: Tool Registry
// ============================================================================

/// Shared tool handle stored in the registry.
pub type SharedTool = Arc<dyn Tool + Send + Sync>;

/// Deterministic registry of tools keyed by tool identifier.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    /// Registered tools in identifier order.
    tools: BTreeMap<ToolId, SharedTool>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registers a tool, replacing any previous registration.
    pub fn register(&mut self, tool_id: ToolId, tool: SharedTool) {
        self.tools.insert(tool_id, tool);
    }

    /// Resolves a tool by identifier.
    #[must_use]
    pub fn resolve(&self, tool_id: &ToolId) -> Option<SharedTool> {
        self.tools.get(tool_id).cloned()
    }

    /// Returns true when the identifier is registered.
    #[must_use]
    pub fn contains(&self, tool_id: &ToolId) -> bool {
        self.tools.contains_key(tool_id)
    }

    /// Returns registered tool identifiers in deterministic order.
    #[must_use]
    pub fn tool_ids(&self) -> Vec<&ToolId> {
        self.tools.keys().collect()
    }
}
