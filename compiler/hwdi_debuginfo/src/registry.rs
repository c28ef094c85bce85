//! Name → module registry.
//!
//! Registry modules are created lazily: the first time a name is seen,
//! whether by its definition or by an instance referring to it, a node is
//! allocated; every later lookup returns the same [`ModuleId`]. This is what
//! lets an instance appear before the module it instantiates.

use std::collections::hash_map::Entry;

use hwdi_ir::{Name, OpId};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::arena::DebugArena;
use crate::node::{DiModule, ModuleId};
use crate::DebugInfoError;

/// Which kind of op defines a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum ModuleKind {
    Module,
    Extern,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Slot {
    id: ModuleId,
    definition: Option<(ModuleKind, OpId)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ModuleRegistry {
    entries: FxHashMap<Name, Slot>,
    /// Every registry module, in first-seen order.
    order: Vec<ModuleId>,
    /// Defined modules, in definition order.
    defined: Vec<ModuleId>,
}

impl ModuleRegistry {
    /// Module for `name`, allocating an empty one on first sight.
    pub(crate) fn get_or_insert(&mut self, name: Name, arena: &mut DebugArena) -> ModuleId {
        self.slot(name, arena).id
    }

    pub(crate) fn get(&self, name: Name) -> Option<ModuleId> {
        self.entries.get(&name).map(|entry| entry.id)
    }

    /// Record `op` as the definition of `name`.
    ///
    /// A name may be referenced any number of times but defined once.
    pub(crate) fn define(
        &mut self,
        name: Name,
        kind: ModuleKind,
        op: OpId,
        arena: &mut DebugArena,
    ) -> Result<ModuleId, DebugInfoError> {
        let slot = self.slot(name, arena);
        let id = slot.id;
        match slot.definition {
            None => slot.definition = Some((kind, op)),
            Some((first_kind, first)) if first_kind == kind => {
                return Err(DebugInfoError::DuplicateModule {
                    name,
                    first,
                    second: op,
                });
            }
            Some((_, first)) => {
                return Err(DebugInfoError::ConflictingModuleKind {
                    name,
                    first,
                    second: op,
                });
            }
        }

        let module = arena.module_mut(id);
        module.op = Some(op);
        module.is_extern = kind == ModuleKind::Extern;
        self.defined.push(id);
        Ok(id)
    }

    fn slot(&mut self, name: Name, arena: &mut DebugArena) -> &mut Slot {
        match self.entries.entry(name) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let id = arena.alloc_module(DiModule::new(name));
                trace!(?name, ?id, "registered module");
                self.order.push(id);
                slot.insert(Slot {
                    id,
                    definition: None,
                })
            }
        }
    }

    /// Every registry module, in first-seen order.
    pub(crate) fn ids(&self) -> &[ModuleId] {
        &self.order
    }

    /// Defined modules, in definition order.
    pub(crate) fn defined(&self) -> &[ModuleId] {
        &self.defined
    }
}
