//! Hardware design IR consumed by debug-info extraction.
//!
//! This crate models the slice of a hardware compiler's IR that debug-info
//! extraction looks at:
//! - `hw` dialect structure: modules, extern modules, instances, wires and
//!   the body terminator
//! - `dbg` dialect annotations: variables, scopes, module info and enum
//!   definitions
//! - everything else as opaque operations that may nest regions
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: names are `Name(u32)`
//! - **Flatten Everything**: operations, blocks and values live in arenas and
//!   refer to each other through `OpId`/`BlockId`/`ValueId`
//! - **Explicit Traversal**: walks take a visitor returning
//!   [`WalkControl`], so skipping a subtree is a visible decision

mod attr;
mod builder;
mod design;
mod ids;
mod interner;
mod location;
mod name;
mod op;
mod walk;

pub use attr::Attr;
pub use builder::{BodyBuilder, DesignBuilder, PortSpec};
pub use design::{Block, Design};
pub use ids::{BlockId, EnumId, OpId, ValueDef, ValueId};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use location::{Location, LocationDisplay};
pub use name::Name;
pub use op::{
    EnumDefAnnotation, OpKind, Operation, Port, PortDirection, ScopeAnnotation,
    VariableAnnotation,
};
pub use walk::{WalkControl, WalkOutcome};
