//! Pre-order operation walk with subtree skipping.
//!
//! The visitor decides, per operation, whether the walk descends into the
//! operation's regions, skips them, or stops altogether:
//!
//! ```text
//! design.walk_block(design.top(), &mut |id, op| match op.kind {
//!     OpKind::Module { .. } => {
//!         collect(id);
//!         WalkControl::Skip // the module body is handled elsewhere
//!     }
//!     _ => WalkControl::Descend,
//! });
//! ```

use std::convert::Infallible;

use hwdi_stack::ensure_sufficient_stack;

use crate::{BlockId, Design, OpId, Operation};

/// What the walk does after visiting an operation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WalkControl {
    /// Visit the operation's regions next.
    Descend,
    /// Do not visit the operation's regions; continue with its next sibling.
    Skip,
    /// End the whole walk.
    Stop,
}

/// How a walk ended.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WalkOutcome {
    Completed,
    Stopped,
}

impl Design {
    /// Walk every operation nested in `block`, pre-order.
    pub fn walk_block<F>(&self, block: BlockId, visit: &mut F) -> WalkOutcome
    where
        F: FnMut(OpId, &Operation) -> WalkControl,
    {
        let walked: Result<WalkOutcome, Infallible> =
            self.try_walk_block(block, &mut |id, op| Ok(visit(id, op)));
        match walked {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Walk every operation nested in `block`, pre-order, stopping at the
    /// first error the visitor returns.
    pub fn try_walk_block<E, F>(&self, block: BlockId, visit: &mut F) -> Result<WalkOutcome, E>
    where
        F: FnMut(OpId, &Operation) -> Result<WalkControl, E>,
    {
        for &id in &self.block(block).ops {
            let op = self.op(id);
            match visit(id, op)? {
                WalkControl::Descend => {
                    for &region in op.kind.regions() {
                        let outcome = ensure_sufficient_stack(|| {
                            self.try_walk_block(region, &mut *visit)
                        })?;
                        if outcome == WalkOutcome::Stopped {
                            return Ok(WalkOutcome::Stopped);
                        }
                    }
                }
                WalkControl::Skip => {}
                WalkControl::Stop => return Ok(WalkOutcome::Stopped),
            }
        }
        Ok(WalkOutcome::Completed)
    }
}
