//! Errors that abort a debug-info build.
//!
//! Missing debug information is never an error: it is what the structural
//! fallbacks exist for. These variants describe IR the builder cannot make
//! sense of.

use hwdi_diagnostic::{Diagnostic, ErrorCode};
use hwdi_ir::{Design, Location, Name, OpId, OpKind, ValueId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DebugInfoError {
    /// A `dbg.variable` or `dbg.scope` names a scope value that is not the
    /// result of a `dbg.scope` in the same module.
    #[error("{op:?} refers to scope {scope:?}, which is not a scope of its module")]
    UnresolvedScope { op: OpId, scope: ValueId },

    /// A name is defined both as a module and as an extern module.
    #[error("{name:?} is defined by both {first:?} and {second:?} with different kinds")]
    ConflictingModuleKind {
        name: Name,
        first: OpId,
        second: OpId,
    },

    /// A name is defined twice with the same kind.
    #[error("{name:?} is defined twice, by {first:?} and {second:?}")]
    DuplicateModule {
        name: Name,
        first: OpId,
        second: OpId,
    },

    /// A `dbg.variable`'s enum operand is not the result of a `dbg.enumdef`
    /// in the same module body.
    #[error("{op:?} links enum value {value:?}, which is not an enum definition of its module")]
    InvalidEnumReference { op: OpId, value: ValueId },

    /// A port has no block argument (inputs) or terminator operand
    /// (outputs) at its index.
    #[error("port {port:?} of {module:?} has no value at index {arg_num}")]
    MissingPortValue {
        module: OpId,
        port: Name,
        arg_num: u32,
    },

    /// A module body carries two `dbg.moduleinfo` ops under
    /// [`ModuleInfoPolicy::Strict`](crate::ModuleInfoPolicy::Strict).
    #[error("{module:?} has module info at both {first:?} and {second:?}")]
    DuplicateModuleInfo {
        module: OpId,
        first: OpId,
        second: OpId,
    },
}

impl DebugInfoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DebugInfoError::ConflictingModuleKind { .. } => ErrorCode::E1001,
            DebugInfoError::DuplicateModule { .. } => ErrorCode::E1002,
            DebugInfoError::MissingPortValue { .. } => ErrorCode::E1003,
            DebugInfoError::UnresolvedScope { .. } => ErrorCode::E2001,
            DebugInfoError::InvalidEnumReference { .. } => ErrorCode::E2002,
            DebugInfoError::DuplicateModuleInfo { .. } => ErrorCode::E2003,
        }
    }

    /// Convert into a [`Diagnostic`] with names and locations resolved
    /// against `design`, which must be the design the build ran on.
    pub fn to_diagnostic(&self, design: &Design) -> Diagnostic {
        let interner = design.interner();
        let diagnostic = Diagnostic::error(self.code());

        match *self {
            DebugInfoError::UnresolvedScope { op, scope } => {
                let user = design.op(op);
                let mut diagnostic = diagnostic
                    .with_message(format!(
                        "`{}` refers to a scope outside its module",
                        user.kind.mnemonic()
                    ))
                    .with_label(user.loc, "scope used here");
                match design.defining_op(scope) {
                    Some(def) => {
                        let def = design.op(def);
                        diagnostic = diagnostic.with_secondary_label(
                            def.loc,
                            format!("scope value produced by `{}`", def.kind.mnemonic()),
                        );
                    }
                    None => {
                        diagnostic = diagnostic.with_note("the scope value is a block argument");
                    }
                }
                if let Some(module) = enclosing_module(design, op) {
                    diagnostic = diagnostic.with_secondary_label(
                        design.op(module).loc,
                        format!("in module `{}`", module_name(design, module)),
                    );
                }
                diagnostic.with_note("scopes must be defined by a `dbg.scope` in the same module")
            }
            DebugInfoError::ConflictingModuleKind {
                name,
                first,
                second,
            } => {
                let second_op = design.op(second);
                let first_op = design.op(first);
                diagnostic
                    .with_message(format!(
                        "`{}` is declared as both `{}` and `{}`",
                        interner.lookup(name),
                        first_op.kind.mnemonic(),
                        second_op.kind.mnemonic()
                    ))
                    .with_label(second_op.loc, "conflicting declaration")
                    .with_secondary_label(first_op.loc, "first declared here")
            }
            DebugInfoError::DuplicateModule {
                name,
                first,
                second,
            } => diagnostic
                .with_message(format!(
                    "module `{}` is defined more than once",
                    interner.lookup(name)
                ))
                .with_label(design.op(second).loc, "redefined here")
                .with_secondary_label(design.op(first).loc, "first defined here"),
            DebugInfoError::InvalidEnumReference { op, value } => {
                let mut diagnostic = diagnostic
                    .with_message(
                        "`dbg.variable` links an enum value that is not a `dbg.enumdef` of its module",
                    )
                    .with_label(design.op(op).loc, "enum linked here");
                if let Some(def) = design.defining_op(value) {
                    let def = design.op(def);
                    diagnostic = diagnostic.with_secondary_label(
                        def.loc,
                        format!("value produced by `{}`", def.kind.mnemonic()),
                    );
                }
                diagnostic
            }
            DebugInfoError::MissingPortValue {
                module,
                port,
                arg_num,
            } => {
                let module_op = design.op(module);
                let site = port_loc(&module_op.kind, port).unwrap_or(module_op.loc);
                diagnostic
                    .with_message(format!(
                        "port `{}` of module `{}` has no value at index {arg_num}",
                        interner.lookup(port),
                        module_name(design, module)
                    ))
                    .with_label(site, "port declared here")
                    .with_note("inputs bind to body arguments, outputs to `hw.output` operands")
            }
            DebugInfoError::DuplicateModuleInfo {
                module,
                first,
                second,
            } => diagnostic
                .with_message(format!(
                    "module `{}` has more than one `dbg.moduleinfo`",
                    module_name(design, module)
                ))
                .with_label(design.op(second).loc, "repeated here")
                .with_secondary_label(design.op(first).loc, "first given here"),
        }
    }
}

/// The `hw.module` whose body (transitively) holds `op`.
fn enclosing_module(design: &Design, op: OpId) -> Option<OpId> {
    let mut parent = design.block(design.op(op).parent).parent;
    while let Some(id) = parent {
        if matches!(design.op(id).kind, OpKind::Module { .. }) {
            return Some(id);
        }
        parent = design.block(design.op(id).parent).parent;
    }
    None
}

fn module_name(design: &Design, module: OpId) -> &str {
    match design.op(module).kind.symbol_name() {
        Some(name) => design.interner().lookup(name),
        None => "<anonymous>",
    }
}

fn port_loc(kind: &OpKind, port: Name) -> Option<Location> {
    let ports = match kind {
        OpKind::Module { ports, .. } | OpKind::ExternModule { ports, .. } => ports,
        _ => return None,
    };
    ports
        .iter()
        .find(|p| p.name == port && !p.loc.is_unknown())
        .map(|p| p.loc)
}
