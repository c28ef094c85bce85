//! Module builder: two walks over one module body.
//!
//! [`classify`](DebugInfoBuilder::classify) records which debug annotation
//! kinds the body carries, synthesizes an inline module per `dbg.scope`,
//! and collects module info and enum definitions. Only the resulting
//! [`Classified`] can be [`populate`](DebugInfoBuilder::populate)d, which
//! creates variables and instances and runs the structural fallback for a
//! concern only when classification found no annotation of that kind.
//!
//! Both walks visit exactly the same ops: each prunes module-like ops
//! through `nested_module` before looking at anything else. Populate
//! relies on this to find every scope and enum definition it meets in the
//! tables classify built.

use std::collections::btree_map::Entry;

use hwdi_ir::{BlockId, Design, EnumId, OpId, OpKind, Port, ValueId, WalkControl};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::DebugInfoBuilder;
use crate::node::{
    DiInstance, DiModule, DiPresence, DiVariable, EnumDefinition, ModuleId, SourceLangType,
};
use crate::scope::{ScopeResolver, ScopeTable};
use crate::{DebugInfoError, ModuleInfoPolicy};

/// A module body after classification.
pub(super) struct Classified {
    module: ModuleId,
    body: BlockId,
    pub(super) presence: DiPresence,
    scopes: ScopeTable,
    /// `dbg.enumdef` ops of this body and the id each defines.
    enums: FxHashMap<OpId, EnumId>,
}

impl DebugInfoBuilder<'_> {
    pub(super) fn visit_module(
        &mut self,
        module: ModuleId,
        op: OpId,
        ports: &[Port],
        body: BlockId,
    ) -> Result<(), DebugInfoError> {
        let classified = self.classify(module, op, body)?;
        let port_fallback = !classified.presence.contains(DiPresence::VARIABLES);
        debug!(
            ?module,
            presence = ?classified.presence,
            port_fallback,
            instance_fallback = !classified.presence.contains(DiPresence::INSTANCES),
            "classified module body"
        );
        if port_fallback {
            self.add_port_variables(module, op, ports, body)?;
        }
        self.populate(classified)
    }

    pub(super) fn classify(
        &mut self,
        module: ModuleId,
        op: OpId,
        body: BlockId,
    ) -> Result<Classified, DebugInfoError> {
        let design = self.design;
        let policy = self.options.module_info;
        let arena = &mut self.arena;
        let mut presence = DiPresence::empty();
        let mut scopes = ScopeTable::default();
        let mut module_info: Option<OpId> = None;
        let mut enums = FxHashMap::default();

        design.try_walk_block::<DebugInfoError, _>(body, &mut |id, child| {
            if nested_module(id, &child.kind) {
                return Ok(WalkControl::Skip);
            }
            match &child.kind {
                OpKind::DbgVariable(_) => presence |= DiPresence::VARIABLES,
                OpKind::DbgScope(scope) => {
                    presence |= DiPresence::INSTANCES;
                    let inline = arena.alloc_module(DiModule::inline(scope.module_name, id, module));
                    trace!(scope = ?id, ?inline, "created inline module");
                    scopes.insert(id, inline);
                }
                OpKind::DbgModuleInfo { type_name, params } => {
                    if let Some(first) = module_info {
                        if policy == ModuleInfoPolicy::Strict {
                            return Err(DebugInfoError::DuplicateModuleInfo {
                                module: op,
                                first,
                                second: id,
                            });
                        }
                        debug!(?first, second = ?id, "later module info replaces earlier");
                    }
                    module_info = Some(id);
                    arena.module_mut(module).source_type =
                        SourceLangType::from_parts(Some(*type_name), params.clone());
                }
                OpKind::DbgEnumDef(def) => {
                    enums.insert(id, def.id);
                    match arena.module_mut(module).enum_definitions.entry(def.id) {
                        Entry::Vacant(slot) => {
                            slot.insert(EnumDefinition::from_annotation(def));
                        }
                        Entry::Occupied(_) => {
                            debug!(op = ?id, enum_id = ?def.id, "keeping earlier enum definition");
                        }
                    }
                }
                _ => {}
            }
            Ok(WalkControl::Descend)
        })?;

        self.arena.module_mut(module).explicit = presence;
        Ok(Classified {
            module,
            body,
            presence,
            scopes,
            enums,
        })
    }

    /// One variable per port, in declaration order: inputs and inouts bind to
    /// body arguments, outputs to `hw.output` operands.
    fn add_port_variables(
        &mut self,
        module: ModuleId,
        op: OpId,
        ports: &[Port],
        body: BlockId,
    ) -> Result<(), DebugInfoError> {
        let design = self.design;
        let args = design.block_args(body);
        let outputs = match design.terminator(body).map(|t| &design.op(t).kind) {
            Some(OpKind::Output { operands }) => operands.as_slice(),
            _ => &[],
        };

        for port in ports {
            let values = if port.direction.is_output() {
                outputs
            } else {
                args
            };
            let value = values.get(port.arg_num as usize).copied().ok_or(
                DebugInfoError::MissingPortValue {
                    module: op,
                    port: port.name,
                    arg_num: port.arg_num,
                },
            )?;
            let variable = self
                .arena
                .push_variable(DiVariable::port(port, Some(value), module));
            trace!(?variable, ?value, "port variable");
        }
        Ok(())
    }

    pub(super) fn populate(&mut self, classified: Classified) -> Result<(), DebugInfoError> {
        let Classified {
            module,
            body,
            presence,
            scopes,
            enums,
        } = classified;
        let design = self.design;
        let resolver = ScopeResolver::new(design, &scopes, module, self.options.unresolved_scope);
        let arena = &mut self.arena;
        let registry = &mut self.registry;
        let explicit_variables = presence.contains(DiPresence::VARIABLES);
        let explicit_instances = presence.contains(DiPresence::INSTANCES);

        design.try_walk_block::<DebugInfoError, _>(body, &mut |id, child| {
            if nested_module(id, &child.kind) {
                return Ok(WalkControl::Skip);
            }
            match &child.kind {
                OpKind::DbgVariable(var) => {
                    let owner = resolver.resolve(var.scope, id)?;
                    let enum_def = var
                        .enum_def
                        .map(|value| enum_reference(design, &enums, id, value))
                        .transpose()?;
                    let variable = arena.push_variable(DiVariable {
                        name: var.name,
                        loc: child.loc,
                        value: Some(var.value),
                        source_type: SourceLangType::from_parts(var.type_name, var.params.clone()),
                        enum_def,
                        owner,
                    });
                    trace!(?variable, ?owner, "annotated variable");
                }
                OpKind::DbgScope(scope) => {
                    let owner = resolver.resolve(scope.scope, id)?;
                    let instance = arena.push_instance(
                        owner,
                        DiInstance {
                            name: scope.instance_name,
                            module: scopes.inline_module(id),
                            op: id,
                        },
                    );
                    trace!(?instance, ?owner, "scope instance");
                }
                OpKind::Instance {
                    instance_name,
                    module_name,
                    ..
                } if !explicit_instances => {
                    let target = registry.get_or_insert(*module_name, arena);
                    let instance = arena.push_instance(
                        module,
                        DiInstance {
                            name: *instance_name,
                            module: target,
                            op: id,
                        },
                    );
                    trace!(?instance, ?target, "structural instance");
                }
                OpKind::Wire { name, .. } if !explicit_variables => {
                    let variable = arena.push_variable(DiVariable {
                        name: *name,
                        loc: child.loc,
                        value: child.result(),
                        source_type: None,
                        enum_def: None,
                        owner: module,
                    });
                    trace!(?variable, "wire variable");
                }
                _ => {}
            }
            Ok(WalkControl::Descend)
        })?;
        Ok(())
    }
}

/// Module-like ops inside a module body are not part of it.
fn nested_module(id: OpId, kind: &OpKind) -> bool {
    let nested = matches!(kind, OpKind::Module { .. } | OpKind::ExternModule { .. });
    if nested {
        trace!(op = ?id, "skipping module-like op nested in a module body");
    }
    nested
}

/// Enum id of the `dbg.enumdef` producing `value`, which must be one of
/// this body's.
fn enum_reference(
    design: &Design,
    enums: &FxHashMap<OpId, EnumId>,
    user: OpId,
    value: ValueId,
) -> Result<EnumId, DebugInfoError> {
    design
        .defining_op(value)
        .and_then(|def| enums.get(&def).copied())
        .ok_or(DebugInfoError::InvalidEnumReference { op: user, value })
}
