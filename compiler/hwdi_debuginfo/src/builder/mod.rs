//! Root builder: one pre-order walk over the design.
//!
//! Module-like ops are collected where they appear; their bodies are handed
//! to the module builder and never walked by the root walk itself, so every
//! module body is visited exactly once. Any other top-level op (for example
//! a wrapping container) is descended into.

mod module;

use hwdi_ir::{Design, OpId, OpKind, WalkControl};
use tracing::debug;

use crate::arena::DebugArena;
use crate::node::DiVariable;
use crate::registry::{ModuleKind, ModuleRegistry};
use crate::{DebugInfoError, DebugInfoOptions};

pub(crate) struct DebugInfoBuilder<'d> {
    design: &'d Design,
    options: DebugInfoOptions,
    arena: DebugArena,
    registry: ModuleRegistry,
}

impl<'d> DebugInfoBuilder<'d> {
    pub(crate) fn new(design: &'d Design, options: DebugInfoOptions) -> Self {
        Self {
            design,
            options,
            arena: DebugArena::new(),
            registry: ModuleRegistry::default(),
        }
    }

    pub(crate) fn visit_root(&mut self) -> Result<(), DebugInfoError> {
        let design = self.design;
        design.try_walk_block(design.top(), &mut |id, _| self.visit_top_level(id))?;
        Ok(())
    }

    pub(crate) fn finish(self) -> (DebugArena, ModuleRegistry) {
        (self.arena, self.registry)
    }

    fn visit_top_level(&mut self, id: OpId) -> Result<WalkControl, DebugInfoError> {
        let design = self.design;
        match &design.op(id).kind {
            OpKind::Module { name, ports, body } => {
                debug!(
                    module = design.interner().lookup(*name),
                    op = ?id,
                    "collecting module"
                );
                let module = self
                    .registry
                    .define(*name, ModuleKind::Module, id, &mut self.arena)?;
                self.visit_module(module, id, ports, *body)?;
                Ok(WalkControl::Skip)
            }
            OpKind::ExternModule { name, ports } => {
                debug!(
                    module = design.interner().lookup(*name),
                    op = ?id,
                    "collecting extern module"
                );
                let module = self
                    .registry
                    .define(*name, ModuleKind::Extern, id, &mut self.arena)?;
                for port in ports {
                    self.arena.push_variable(DiVariable::port(port, None, module));
                }
                Ok(WalkControl::Skip)
            }
            _ => Ok(WalkControl::Descend),
        }
    }
}
