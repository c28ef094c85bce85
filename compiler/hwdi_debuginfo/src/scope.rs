//! Scope resolution for debug annotations.
//!
//! `dbg.variable` and `dbg.scope` may name an enclosing scope by the value a
//! `dbg.scope` produced. Resolution maps that value to the inline module
//! synthesized for the scope while classifying the current module body.

use hwdi_ir::{Design, OpId, ValueId};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::node::ModuleId;
use crate::{DebugInfoError, UnresolvedScopePolicy};

/// Inline modules of one module body, keyed by their `dbg.scope` op.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScopeTable {
    inline: FxHashMap<OpId, ModuleId>,
}

impl ScopeTable {
    pub(crate) fn insert(&mut self, scope: OpId, module: ModuleId) {
        self.inline.insert(scope, module);
    }

    pub(crate) fn get(&self, scope: OpId) -> Option<ModuleId> {
        self.inline.get(&scope).copied()
    }

    /// Inline module of a scope op classified in this body.
    ///
    /// The module builder's classify and populate walks prune the same ops
    /// (both go through its `nested_module` check first), so every
    /// `dbg.scope` populate reaches was inserted here by classify.
    ///
    /// # Panics
    /// Panics if `scope` was not classified, which means the two walks
    /// visited different ops.
    pub(crate) fn inline_module(&self, scope: OpId) -> ModuleId {
        match self.get(scope) {
            Some(module) => module,
            None => panic!("dbg.scope {scope:?} was not classified"),
        }
    }
}

/// Chooses the owner of each annotated node in one module body.
pub(crate) struct ScopeResolver<'a> {
    design: &'a Design,
    scopes: &'a ScopeTable,
    current: ModuleId,
    policy: UnresolvedScopePolicy,
}

impl<'a> ScopeResolver<'a> {
    pub(crate) fn new(
        design: &'a Design,
        scopes: &'a ScopeTable,
        current: ModuleId,
        policy: UnresolvedScopePolicy,
    ) -> Self {
        Self {
            design,
            scopes,
            current,
            policy,
        }
    }

    /// Owner for a node created by `user` with optional `scope` operand.
    pub(crate) fn resolve(
        &self,
        scope: Option<ValueId>,
        user: OpId,
    ) -> Result<ModuleId, DebugInfoError> {
        let Some(scope) = scope else {
            return Ok(self.current);
        };
        if let Some(module) = self
            .design
            .defining_op(scope)
            .and_then(|def| self.scopes.get(def))
        {
            return Ok(module);
        }

        match self.policy {
            UnresolvedScopePolicy::Error => {
                Err(DebugInfoError::UnresolvedScope { op: user, scope })
            }
            UnresolvedScopePolicy::Enclosing => {
                warn!(
                    op = ?user,
                    ?scope,
                    "scope is not a dbg.scope of this module; attaching to the module itself"
                );
                Ok(self.current)
            }
        }
    }
}
