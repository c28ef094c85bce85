//! Build options.

/// What to do with a scope reference that does not name a `dbg.scope` of
/// the module being built.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum UnresolvedScopePolicy {
    /// Abort the build with [`DebugInfoError::UnresolvedScope`](crate::DebugInfoError::UnresolvedScope).
    #[default]
    Error,
    /// Attribute the node to the module being built and log a warning.
    Enclosing,
}

/// What to do when a module body carries more than one `dbg.moduleinfo`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ModuleInfoPolicy {
    /// The last annotation in walk order replaces earlier ones.
    #[default]
    LastWins,
    /// Abort the build with [`DebugInfoError::DuplicateModuleInfo`](crate::DebugInfoError::DuplicateModuleInfo).
    Strict,
}

/// Options for [`DebugInfo::build_with`](crate::DebugInfo::build_with).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct DebugInfoOptions {
    pub unresolved_scope: UnresolvedScopePolicy,
    pub module_info: ModuleInfoPolicy,
}

impl DebugInfoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unresolved_scope(mut self, policy: UnresolvedScopePolicy) -> Self {
        self.unresolved_scope = policy;
        self
    }

    #[must_use]
    pub fn with_module_info(mut self, policy: ModuleInfoPolicy) -> Self {
        self.module_info = policy;
        self
    }
}
