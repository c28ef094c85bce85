//! Operation kinds of the hardware and debug dialects.
//!
//! Only the operations debug-info extraction distinguishes get their own
//! variant; everything else (combinational logic, registers, SV constructs)
//! is an [`OpKind::Opaque`] op that may produce a value and own regions.

use smallvec::SmallVec;

use crate::{Attr, BlockId, EnumId, Location, Name, ValueId};

/// Direction of a module port.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PortDirection {
    Input,
    Output,
    InOut,
}

impl PortDirection {
    /// Output ports bind to terminator operands; inputs and inouts bind to
    /// body block arguments.
    #[inline]
    pub const fn is_output(self) -> bool {
        matches!(self, PortDirection::Output)
    }
}

/// A module port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    pub name: Name,
    pub direction: PortDirection,
    /// Position among ports of the same binding kind: the block argument
    /// index for inputs/inouts, the terminator operand index for outputs.
    pub arg_num: u32,
    pub loc: Location,
}

/// `dbg.variable`: names a value for the debugger.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableAnnotation {
    pub name: Name,
    pub value: ValueId,
    /// Result of a `dbg.scope` the variable belongs to.
    pub scope: Option<ValueId>,
    pub type_name: Option<Name>,
    pub params: Option<Attr>,
    /// Result of the `dbg.enumdef` describing the variable's encoding.
    pub enum_def: Option<ValueId>,
}

impl VariableAnnotation {
    /// A variable with no scope, type or enum information.
    pub fn new(name: Name, value: ValueId) -> Self {
        Self {
            name,
            value,
            scope: None,
            type_name: None,
            params: None,
            enum_def: None,
        }
    }

    #[must_use]
    pub fn in_scope(mut self, scope: ValueId) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn with_type(mut self, type_name: Name, params: Option<Attr>) -> Self {
        self.type_name = Some(type_name);
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_enum(mut self, enum_def: ValueId) -> Self {
        self.enum_def = Some(enum_def);
        self
    }
}

/// `dbg.scope`: an inline level of hierarchy inside a module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeAnnotation {
    pub instance_name: Name,
    pub module_name: Name,
    /// Enclosing `dbg.scope`, if nested.
    pub scope: Option<ValueId>,
}

/// `dbg.enumdef`: the value encoding of a source-language enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDefAnnotation {
    pub name: Name,
    pub id: EnumId,
    /// Variant name to encoded value, in declaration order.
    pub variants: Vec<(Name, i64)>,
}

/// Operation kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `hw.module`
    Module {
        name: Name,
        ports: Vec<Port>,
        body: BlockId,
    },
    /// `hw.module.extern`
    ExternModule { name: Name, ports: Vec<Port> },
    /// `hw.instance`
    Instance {
        instance_name: Name,
        module_name: Name,
        inputs: SmallVec<[ValueId; 4]>,
    },
    /// `hw.wire`
    Wire { name: Name, input: Option<ValueId> },
    /// `hw.output`, the module body terminator.
    Output { operands: SmallVec<[ValueId; 4]> },
    /// `dbg.variable`
    DbgVariable(VariableAnnotation),
    /// `dbg.scope`
    DbgScope(ScopeAnnotation),
    /// `dbg.moduleinfo`
    DbgModuleInfo {
        type_name: Name,
        params: Option<Attr>,
    },
    /// `dbg.enumdef`
    DbgEnumDef(EnumDefAnnotation),
    /// Any other operation.
    Opaque {
        name: Name,
        operands: SmallVec<[ValueId; 4]>,
        regions: SmallVec<[BlockId; 2]>,
    },
}

impl OpKind {
    /// Nested regions, in walk order.
    pub fn regions(&self) -> &[BlockId] {
        match self {
            OpKind::Module { body, .. } => std::slice::from_ref(body),
            OpKind::Opaque { regions, .. } => regions.as_slice(),
            _ => &[],
        }
    }

    /// Symbol name of module-like operations.
    pub fn symbol_name(&self) -> Option<Name> {
        match self {
            OpKind::Module { name, .. } | OpKind::ExternModule { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Dialect mnemonic, for diagnostics and logging.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpKind::Module { .. } => "hw.module",
            OpKind::ExternModule { .. } => "hw.module.extern",
            OpKind::Instance { .. } => "hw.instance",
            OpKind::Wire { .. } => "hw.wire",
            OpKind::Output { .. } => "hw.output",
            OpKind::DbgVariable(_) => "dbg.variable",
            OpKind::DbgScope(_) => "dbg.scope",
            OpKind::DbgModuleInfo { .. } => "dbg.moduleinfo",
            OpKind::DbgEnumDef(_) => "dbg.enumdef",
            OpKind::Opaque { .. } => "opaque",
        }
    }
}

/// An operation stored in a [`Design`](crate::Design).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Operation {
    pub kind: OpKind,
    pub loc: Location,
    pub results: SmallVec<[ValueId; 1]>,
    /// Block this operation is placed in.
    pub parent: BlockId,
}

impl Operation {
    /// First result, for single-result operations.
    #[inline]
    pub fn result(&self) -> Option<ValueId> {
        self.results.first().copied()
    }
}
