//! Flat storage for a hardware design.
//!
//! A [`Design`] owns every operation, block and value in parallel `Vec`s
//! indexed by [`OpId`], [`BlockId`] and [`ValueId`]. It is built once through
//! [`DesignBuilder`](crate::DesignBuilder) and read-only afterwards.

use smallvec::SmallVec;

use crate::ids::to_u32;
use crate::{BlockId, OpId, OpKind, Operation, SharedInterner, ValueDef, ValueId};

/// A block: arguments plus an ordered list of operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub args: SmallVec<[ValueId; 4]>,
    pub ops: Vec<OpId>,
    /// Operation owning the region this block forms (`None` for the top block).
    pub parent: Option<OpId>,
}

/// A complete design.
pub struct Design {
    interner: SharedInterner,
    ops: Vec<Operation>,
    blocks: Vec<Block>,
    values: Vec<ValueDef>,
    top: BlockId,
}

impl Design {
    /// Create an empty design with just the top block.
    pub(crate) fn new(interner: SharedInterner) -> Self {
        Self {
            interner,
            ops: Vec::new(),
            blocks: vec![Block {
                args: SmallVec::new(),
                ops: Vec::new(),
                parent: None,
            }],
            values: Vec::new(),
            top: BlockId::new(0),
        }
    }

    /// Interner the design's names live in.
    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The top-level block.
    #[inline]
    pub fn top(&self) -> BlockId {
        self.top
    }

    /// Get an operation.
    #[inline]
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id.index()]
    }

    /// Get a block.
    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Arguments of a block, in order.
    #[inline]
    pub fn block_args(&self, block: BlockId) -> &[ValueId] {
        &self.block(block).args
    }

    /// Get the definition of a value.
    #[inline]
    pub fn value_def(&self, id: ValueId) -> ValueDef {
        self.values[id.index()]
    }

    /// Operation producing `value`, or `None` for block arguments.
    pub fn defining_op(&self, value: ValueId) -> Option<OpId> {
        match self.value_def(value) {
            ValueDef::OpResult { op, .. } => Some(op),
            ValueDef::BlockArg { .. } => None,
        }
    }

    /// The block's `hw.output` terminator, if its last op is one.
    pub fn terminator(&self, block: BlockId) -> Option<OpId> {
        let last = *self.block(block).ops.last()?;
        matches!(self.op(last).kind, OpKind::Output { .. }).then_some(last)
    }

    /// Number of operations.
    #[inline]
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Number of blocks, including the top block.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of values.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn push_block(&mut self, parent: Option<OpId>) -> BlockId {
        let id = BlockId::new(to_u32(self.blocks.len(), "blocks"));
        self.blocks.push(Block {
            args: SmallVec::new(),
            ops: Vec::new(),
            parent,
        });
        id
    }

    pub(crate) fn push_block_arg(&mut self, block: BlockId) -> ValueId {
        let index = to_u32(self.blocks[block.index()].args.len(), "block arguments");
        let value = self.push_value(ValueDef::BlockArg { block, index });
        self.blocks[block.index()].args.push(value);
        value
    }

    /// Append an operation with `result_count` results to `block`.
    pub(crate) fn push_op(&mut self, block: BlockId, mut op: Operation, result_count: u32) -> OpId {
        let id = OpId::new(to_u32(self.ops.len(), "operations"));
        op.parent = block;
        for index in 0..result_count {
            let value = self.push_value(ValueDef::OpResult { op: id, index });
            op.results.push(value);
        }
        self.ops.push(op);
        self.blocks[block.index()].ops.push(id);
        id
    }

    /// Replace the kind of an already pushed operation.
    ///
    /// Region-owning ops are pushed before their region blocks exist, so the
    /// block handles are patched in afterwards.
    pub(crate) fn set_kind(&mut self, id: OpId, kind: OpKind) {
        self.ops[id.index()].kind = kind;
    }

    fn push_value(&mut self, def: ValueDef) -> ValueId {
        let id = ValueId::new(to_u32(self.values.len(), "values"));
        self.values.push(def);
        id
    }
}

impl std::fmt::Debug for Design {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Design")
            .field("ops", &self.ops.len())
            .field("blocks", &self.blocks.len())
            .field("values", &self.values.len())
            .finish_non_exhaustive()
    }
}
