//! Hierarchical debug-info extraction from hardware design IR.
//!
//! [`DebugInfo::build`] walks a [`Design`](hwdi_ir::Design) once and produces
//! a graph of modules, instances and variables a debugger can navigate:
//!
//! - **Explicit first**: `dbg.variable`, `dbg.scope`, `dbg.moduleinfo` and
//!   `dbg.enumdef` annotations are used when a module body carries them
//! - **Structural fallback**: a module without variable annotations gets its
//!   ports and wires as variables; one without scope annotations gets its
//!   `hw.instance`s as instances
//! - **Lazy modules**: instantiating a module before its definition is fine;
//!   both resolve to the same [`ModuleId`]
//!
//! The decision is made per module and per concern, so annotated and
//! unannotated modules mix freely in one design.

mod arena;
mod builder;
mod debug_info;
mod error;
mod node;
mod options;
mod registry;
mod scope;

use std::sync::Once;

pub use debug_info::{DebugInfo, DebugInfoStats};
pub use error::DebugInfoError;
pub use node::{
    DiInstance, DiModule, DiPresence, DiVariable, EnumDefinition, InstanceId, ModuleId,
    SourceLangType, VariableId,
};
pub use options::{DebugInfoOptions, ModuleInfoPolicy, UnresolvedScopePolicy};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug-info builds.
///
/// Output is controlled by `RUST_LOG`, e.g. `RUST_LOG=hwdi_debuginfo=trace`.
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
