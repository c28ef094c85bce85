//! Build-scoped storage for debug-info nodes.
//!
//! Every node of one extraction is allocated here exactly once and lives as
//! long as the owning [`DebugInfo`](crate::DebugInfo). Nothing is freed
//! individually.

use crate::node::{DiInstance, DiModule, DiVariable, InstanceId, ModuleId, VariableId};

/// Arena of modules, instances and variables, indexed by their handles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DebugArena {
    modules: Vec<DiModule>,
    instances: Vec<DiInstance>,
    variables: Vec<DiVariable>,
}

fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many debug-info {what}: {len}"))
}

impl DebugArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc_module(&mut self, module: DiModule) -> ModuleId {
        let id = ModuleId::new(to_u32(self.modules.len(), "modules"));
        self.modules.push(module);
        id
    }

    pub(crate) fn alloc_instance(&mut self, instance: DiInstance) -> InstanceId {
        let id = InstanceId::new(to_u32(self.instances.len(), "instances"));
        self.instances.push(instance);
        id
    }

    pub(crate) fn alloc_variable(&mut self, variable: DiVariable) -> VariableId {
        let id = VariableId::new(to_u32(self.variables.len(), "variables"));
        self.variables.push(variable);
        id
    }

    #[inline]
    pub(crate) fn module(&self, id: ModuleId) -> &DiModule {
        &self.modules[id.index()]
    }

    #[inline]
    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut DiModule {
        &mut self.modules[id.index()]
    }

    #[inline]
    pub(crate) fn instance(&self, id: InstanceId) -> &DiInstance {
        &self.instances[id.index()]
    }

    #[inline]
    pub(crate) fn variable(&self, id: VariableId) -> &DiVariable {
        &self.variables[id.index()]
    }

    /// All instances, in allocation order.
    pub(crate) fn instances(&self) -> &[DiInstance] {
        &self.instances
    }

    pub(crate) fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub(crate) fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Allocate `variable` and append it to its owner's list.
    pub(crate) fn push_variable(&mut self, variable: DiVariable) -> VariableId {
        let owner = variable.owner;
        let id = self.alloc_variable(variable);
        self.module_mut(owner).variables.push(id);
        id
    }

    /// Allocate `instance` and append it to `owner`'s list.
    pub(crate) fn push_instance(&mut self, owner: ModuleId, instance: DiInstance) -> InstanceId {
        let id = self.alloc_instance(instance);
        self.module_mut(owner).instances.push(id);
        id
    }
}
