//! The built debug-info hierarchy and its query surface.

use std::fmt;

use hwdi_ir::{Design, EnumId, Name, SharedInterner};
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span};

use crate::arena::DebugArena;
use crate::builder::DebugInfoBuilder;
use crate::node::{
    DiInstance, DiModule, DiVariable, EnumDefinition, InstanceId, ModuleId, VariableId,
};
use crate::registry::ModuleRegistry;
use crate::{DebugInfoError, DebugInfoOptions};

/// Node counts of a build.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct DebugInfoStats {
    /// Modules reachable by name, defined or only referenced.
    pub registry_modules: usize,
    /// Modules synthesized from `dbg.scope` ops.
    pub inline_modules: usize,
    pub instances: usize,
    pub variables: usize,
}

/// Debug information extracted from one [`Design`].
///
/// Immutable once built. Names resolve through the design's interner,
/// which the result keeps alive.
#[derive(Clone)]
pub struct DebugInfo {
    interner: SharedInterner,
    arena: DebugArena,
    registry: ModuleRegistry,
}

impl DebugInfo {
    /// Build with default options.
    pub fn build(design: &Design) -> Result<Self, DebugInfoError> {
        Self::build_with(design, &DebugInfoOptions::default())
    }

    pub fn build_with(design: &Design, options: &DebugInfoOptions) -> Result<Self, DebugInfoError> {
        let _span = debug_span!("debug_info", ops = design.op_count()).entered();

        let mut builder = DebugInfoBuilder::new(design, *options);
        builder.visit_root()?;
        let (arena, registry) = builder.finish();

        let info = DebugInfo {
            interner: design.interner().clone(),
            arena,
            registry,
        };
        let stats = info.stats();
        debug!(
            registry_modules = stats.registry_modules,
            inline_modules = stats.inline_modules,
            instances = stats.instances,
            variables = stats.variables,
            "built debug info"
        );
        Ok(info)
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Resolve an interned name.
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &DiModule {
        self.arena.module(id)
    }

    #[inline]
    pub fn instance(&self, id: InstanceId) -> &DiInstance {
        self.arena.instance(id)
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &DiVariable {
        self.arena.variable(id)
    }

    /// Every registry module in first-seen order, including modules that
    /// were instantiated but never defined.
    pub fn modules(&self) -> &[ModuleId] {
        self.registry.ids()
    }

    /// Modules whose definition was visited, in discovery order.
    pub fn top_level_modules(&self) -> &[ModuleId] {
        self.registry.defined()
    }

    /// Top-level modules no structural instance refers to: the roots of the
    /// instance hierarchy.
    pub fn root_modules(&self) -> Vec<ModuleId> {
        let instantiated: FxHashSet<ModuleId> = self
            .arena
            .instances()
            .iter()
            .map(|instance| instance.module)
            .filter(|&module| !self.module(module).is_inline)
            .collect();
        self.top_level_modules()
            .iter()
            .copied()
            .filter(|module| !instantiated.contains(module))
            .collect()
    }

    pub fn module_by_name(&self, name: Name) -> Option<ModuleId> {
        self.registry.get(name)
    }

    /// Look a module up by its string name.
    pub fn lookup_module(&self, name: &str) -> Option<ModuleId> {
        self.interner.get(name).and_then(|name| self.module_by_name(name))
    }

    /// Enum definition `id` registered on `module`.
    pub fn lookup_enum(&self, module: ModuleId, id: EnumId) -> Option<&EnumDefinition> {
        self.module(module).enum_definition(id)
    }

    /// Enum definition a variable links to.
    ///
    /// Looks in the owning module first, then, for variables owned by an
    /// inline module, in the module whose body holds the scope.
    pub fn resolve_enum(&self, variable: VariableId) -> Option<&EnumDefinition> {
        let variable = self.variable(variable);
        let id = variable.enum_def?;
        let mut module = Some(variable.owner);
        while let Some(current) = module {
            if let Some(def) = self.lookup_enum(current, id) {
                return Some(def);
            }
            module = self.module(current).parent;
        }
        None
    }

    pub fn stats(&self) -> DebugInfoStats {
        let registry_modules = self.registry.ids().len();
        DebugInfoStats {
            registry_modules,
            inline_modules: self.arena.module_count() - registry_modules,
            instances: self.arena.instance_count(),
            variables: self.arena.variable_count(),
        }
    }
}

/// Structural equality; the interner is not compared.
impl PartialEq for DebugInfo {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena && self.registry == other.registry
    }
}

impl Eq for DebugInfo {}

impl fmt::Debug for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugInfo")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
