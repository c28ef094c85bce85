//! Debug-info nodes.
//!
//! Three node kinds make up the hierarchy:
//!
//! - **[`DiModule`]**: a module definition, an extern declaration, or an
//!   inline scope synthesized from a `dbg.scope` annotation
//! - **[`DiInstance`]**: an instantiation edge from an owning module to the
//!   module it instantiates
//! - **[`DiVariable`]**: a named, debugger-visible value
//!
//! Nodes live in one build-scoped arena and refer to each
//! other through `u32` handles. Owning edges (module → variables, module →
//! instances) are handle lists on the owner; referencing edges (instance →
//! module, variable → enum definition) are plain ids that never own.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use hwdi_ir::{
    Attr, EnumDefAnnotation, EnumId, Location, Name, OpId, Port, ValueId,
};

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

node_id!(
    /// Handle to a [`DiModule`].
    ModuleId,
    "module#"
);
node_id!(
    /// Handle to a [`DiInstance`].
    InstanceId,
    "instance#"
);
node_id!(
    /// Handle to a [`DiVariable`].
    VariableId,
    "variable#"
);

bitflags! {
    /// Which concerns of a module were populated from explicit debug
    /// annotations. A concern without its flag was populated from the
    /// hardware structure.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DiPresence: u8 {
        /// At least one `dbg.variable` in the body.
        const VARIABLES = 1 << 0;
        /// At least one `dbg.scope` in the body.
        const INSTANCES = 1 << 1;
    }
}

/// Opaque source-language type: a type name and its parameters.
///
/// Recorded as found; never interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLangType {
    pub type_name: Option<Name>,
    pub params: Option<Attr>,
}

impl SourceLangType {
    /// `None` when neither part is present.
    pub fn from_parts(type_name: Option<Name>, params: Option<Attr>) -> Option<Self> {
        if type_name.is_none() && params.is_none() {
            None
        } else {
            Some(Self { type_name, params })
        }
    }
}

/// Encoding of a source-language enum: encoded value → variant name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDefinition {
    pub name: Name,
    pub variants: BTreeMap<i64, Name>,
}

impl EnumDefinition {
    /// Build the value map of a `dbg.enumdef`. If two variants share a
    /// value the later one wins.
    pub fn from_annotation(annotation: &EnumDefAnnotation) -> Self {
        Self {
            name: annotation.name,
            variants: annotation
                .variants
                .iter()
                .map(|&(variant, value)| (value, variant))
                .collect(),
        }
    }

    /// Variant name for an encoded value.
    pub fn variant(&self, value: i64) -> Option<Name> {
        self.variants.get(&value).copied()
    }
}

/// A module in the debug hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiModule {
    pub name: Name,
    /// The `hw.module`, `hw.module.extern` or `dbg.scope` this node came
    /// from. `None` for modules only ever referenced by an instance.
    pub op: Option<OpId>,
    pub is_extern: bool,
    /// Synthesized from a `dbg.scope`; never in the name registry.
    pub is_inline: bool,
    /// For inline modules, the registry module whose body holds the scope.
    pub parent: Option<ModuleId>,
    pub source_type: Option<SourceLangType>,
    pub enum_definitions: BTreeMap<EnumId, EnumDefinition>,
    /// Owned variables in discovery order.
    pub variables: Vec<VariableId>,
    /// Owned instances in discovery order.
    pub instances: Vec<InstanceId>,
    /// Concerns populated from explicit annotations.
    pub explicit: DiPresence,
}

impl DiModule {
    /// A registry module, before its definition has been seen.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            op: None,
            is_extern: false,
            is_inline: false,
            parent: None,
            source_type: None,
            enum_definitions: BTreeMap::new(),
            variables: Vec::new(),
            instances: Vec::new(),
            explicit: DiPresence::empty(),
        }
    }

    /// An inline module for the `dbg.scope` `op` inside `parent`.
    pub fn inline(name: Name, op: OpId, parent: ModuleId) -> Self {
        Self {
            op: Some(op),
            is_inline: true,
            parent: Some(parent),
            ..Self::new(name)
        }
    }

    /// Look up an enum definition registered on this module.
    pub fn enum_definition(&self, id: EnumId) -> Option<&EnumDefinition> {
        self.enum_definitions.get(&id)
    }
}

/// An instantiation of `module` inside the module owning this node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiInstance {
    /// Unique within the owning module's instance list.
    pub name: Name,
    pub module: ModuleId,
    /// The `hw.instance` or `dbg.scope` this node came from.
    pub op: OpId,
}

/// A debugger-visible value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiVariable {
    pub name: Name,
    pub loc: Location,
    /// Underlying IR value. `None` for extern module ports.
    pub value: Option<ValueId>,
    pub source_type: Option<SourceLangType>,
    /// Id of an enum definition on the owning module (or the module
    /// enclosing an inline owner).
    pub enum_def: Option<EnumId>,
    /// Module whose `variables` list holds this node.
    pub owner: ModuleId,
}

impl DiVariable {
    /// Variable standing in for a port.
    pub fn port(port: &Port, value: Option<ValueId>, owner: ModuleId) -> Self {
        Self {
            name: port.name,
            loc: port.loc,
            value,
            source_type: None,
            enum_def: None,
            owner,
        }
    }
}
