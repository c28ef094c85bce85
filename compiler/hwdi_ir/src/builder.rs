//! Construction API for [`Design`].
//!
//! Parsing the textual IR lives outside this workspace, so designs are put
//! together programmatically:
//!
//! ```text
//! let mut b = DesignBuilder::new();
//! b.extern_module("Pll", &[PortSpec::input("ref"), PortSpec::output("clk")]);
//! b.module("Top", &[PortSpec::input("a"), PortSpec::output("b")], |body| {
//!     let a = body.input(0);
//!     let w = body.wire("w", Some(a));
//!     body.instance("pll", "Pll", &[a]);
//!     body.output(&[w]);
//! });
//! let design = b.finish();
//! ```

use smallvec::{smallvec, SmallVec};

use crate::{
    Attr, BlockId, Design, EnumDefAnnotation, EnumId, Location, Name, OpId, OpKind, Operation,
    Port, PortDirection, ScopeAnnotation, SharedInterner, ValueId, VariableAnnotation,
};

/// Port description passed to [`DesignBuilder::module`].
#[derive(Copy, Clone, Debug)]
pub struct PortSpec<'a> {
    pub name: &'a str,
    pub direction: PortDirection,
    pub loc: Location,
}

impl<'a> PortSpec<'a> {
    pub fn input(name: &'a str) -> Self {
        Self::new(name, PortDirection::Input)
    }

    pub fn output(name: &'a str) -> Self {
        Self::new(name, PortDirection::Output)
    }

    pub fn inout(name: &'a str) -> Self {
        Self::new(name, PortDirection::InOut)
    }

    fn new(name: &'a str, direction: PortDirection) -> Self {
        Self {
            name,
            direction,
            loc: Location::UNKNOWN,
        }
    }

    /// Attach a source location.
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }
}

fn operation(kind: OpKind, loc: Location) -> Operation {
    Operation {
        kind,
        loc,
        results: SmallVec::new(),
        parent: BlockId::new(0),
    }
}

/// Builds a [`Design`] top-down.
pub struct DesignBuilder {
    design: Design,
    insertion: BlockId,
    loc: Location,
}

impl DesignBuilder {
    /// Start a design with a fresh interner.
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    /// Start a design that interns into `interner`.
    pub fn with_interner(interner: SharedInterner) -> Self {
        let design = Design::new(interner);
        let insertion = design.top();
        Self {
            design,
            insertion,
            loc: Location::UNKNOWN,
        }
    }

    /// The interner names are created in.
    pub fn interner(&self) -> &SharedInterner {
        self.design.interner()
    }

    pub fn intern(&self, s: &str) -> Name {
        self.design.interner().intern(s)
    }

    /// Make a location in `file`.
    pub fn loc(&self, file: &str, line: u32, column: u32) -> Location {
        Location::new(self.intern(file), line, column)
    }

    /// Location attached to the next operations created at this level.
    pub fn set_loc(&mut self, loc: Location) -> &mut Self {
        self.loc = loc;
        self
    }

    /// Add an `hw.module`. Inputs and inouts become body block arguments in
    /// declaration order; outputs are numbered by their terminator position.
    pub fn module(
        &mut self,
        name: &str,
        ports: &[PortSpec<'_>],
        build: impl FnOnce(&mut BodyBuilder<'_>),
    ) -> OpId {
        let name = self.intern(name);
        let ports = self.lower_ports(ports);
        let placeholder = OpKind::Module {
            name,
            ports: Vec::new(),
            body: self.insertion,
        };
        let op = self
            .design
            .push_op(self.insertion, operation(placeholder, self.loc), 0);
        let body = self.design.push_block(Some(op));
        for _ in ports.iter().filter(|p| !p.direction.is_output()) {
            self.design.push_block_arg(body);
        }
        self.design.set_kind(op, OpKind::Module { name, ports, body });

        let args = self.design.block(body).args.clone();
        let mut body_builder = BodyBuilder {
            design: &mut self.design,
            block: body,
            args,
            loc: self.loc,
        };
        build(&mut body_builder);
        op
    }

    /// Add an `hw.module.extern`.
    pub fn extern_module(&mut self, name: &str, ports: &[PortSpec<'_>]) -> OpId {
        let name = self.intern(name);
        let ports = self.lower_ports(ports);
        self.design.push_op(
            self.insertion,
            operation(OpKind::ExternModule { name, ports }, self.loc),
            0,
        )
    }

    /// Add an opaque top-level op with one region and build inside it
    /// (e.g. a wrapping `builtin.module`).
    pub fn container(&mut self, name: &str, build: impl FnOnce(&mut DesignBuilder)) -> OpId {
        let name = self.intern(name);
        let op = self.design.push_op(
            self.insertion,
            operation(
                OpKind::Opaque {
                    name,
                    operands: SmallVec::new(),
                    regions: SmallVec::new(),
                },
                self.loc,
            ),
            0,
        );
        let block = self.design.push_block(Some(op));
        self.design.set_kind(
            op,
            OpKind::Opaque {
                name,
                operands: SmallVec::new(),
                regions: smallvec![block],
            },
        );

        let outer = std::mem::replace(&mut self.insertion, block);
        build(self);
        self.insertion = outer;
        op
    }

    /// Finish building.
    pub fn finish(self) -> Design {
        self.design
    }

    fn lower_ports(&self, ports: &[PortSpec<'_>]) -> Vec<Port> {
        let mut inputs = 0u32;
        let mut outputs = 0u32;
        ports
            .iter()
            .map(|spec| {
                let counter = if spec.direction.is_output() {
                    &mut outputs
                } else {
                    &mut inputs
                };
                let arg_num = *counter;
                *counter += 1;
                Port {
                    name: self.intern(spec.name),
                    direction: spec.direction,
                    arg_num,
                    loc: spec.loc,
                }
            })
            .collect()
    }
}

impl Default for DesignBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the operations of one block (a module body or a nested region).
pub struct BodyBuilder<'d> {
    design: &'d mut Design,
    block: BlockId,
    /// Body arguments of the enclosing module.
    args: SmallVec<[ValueId; 4]>,
    loc: Location,
}

impl BodyBuilder<'_> {
    pub fn intern(&self, s: &str) -> Name {
        self.design.interner().intern(s)
    }

    /// Make a location in `file`.
    pub fn loc(&self, file: &str, line: u32, column: u32) -> Location {
        Location::new(self.intern(file), line, column)
    }

    /// Location attached to the following operations.
    pub fn set_loc(&mut self, loc: Location) -> &mut Self {
        self.loc = loc;
        self
    }

    /// The `index`-th input of the enclosing module.
    ///
    /// # Panics
    /// Panics if the module has fewer inputs.
    pub fn input(&self, index: usize) -> ValueId {
        self.args[index]
    }

    /// `hw.wire`
    pub fn wire(&mut self, name: &str, input: Option<ValueId>) -> ValueId {
        let name = self.intern(name);
        let op = self.push(OpKind::Wire { name, input }, 1);
        self.design.op(op).results[0]
    }

    /// `hw.instance`
    pub fn instance(&mut self, instance_name: &str, module_name: &str, inputs: &[ValueId]) -> OpId {
        let instance_name = self.intern(instance_name);
        let module_name = self.intern(module_name);
        self.push(
            OpKind::Instance {
                instance_name,
                module_name,
                inputs: SmallVec::from_slice(inputs),
            },
            0,
        )
    }

    /// Single-result opaque op (combinational logic, registers, constants).
    pub fn opaque(&mut self, name: &str, operands: &[ValueId]) -> ValueId {
        let name = self.intern(name);
        let op = self.push(
            OpKind::Opaque {
                name,
                operands: SmallVec::from_slice(operands),
                regions: SmallVec::new(),
            },
            1,
        );
        self.design.op(op).results[0]
    }

    /// Opaque op with one nested region (e.g. `sv.ifdef`), built by `build`.
    pub fn region(&mut self, name: &str, build: impl FnOnce(&mut BodyBuilder<'_>)) -> OpId {
        let name = self.intern(name);
        let op = self.push(
            OpKind::Opaque {
                name,
                operands: SmallVec::new(),
                regions: SmallVec::new(),
            },
            0,
        );
        let block = self.design.push_block(Some(op));
        self.design.set_kind(
            op,
            OpKind::Opaque {
                name,
                operands: SmallVec::new(),
                regions: smallvec![block],
            },
        );

        let mut nested = BodyBuilder {
            design: &mut *self.design,
            block,
            args: self.args.clone(),
            loc: self.loc,
        };
        build(&mut nested);
        op
    }

    /// `dbg.variable` with only a name and a value.
    pub fn dbg_variable(&mut self, name: &str, value: ValueId) -> OpId {
        let name = self.intern(name);
        self.dbg_variable_with(VariableAnnotation::new(name, value))
    }

    /// `dbg.variable` with scope, type or enum information.
    pub fn dbg_variable_with(&mut self, annotation: VariableAnnotation) -> OpId {
        self.push(OpKind::DbgVariable(annotation), 0)
    }

    /// `dbg.scope`, returning the scope value variables refer to.
    pub fn dbg_scope(
        &mut self,
        instance_name: &str,
        module_name: &str,
        scope: Option<ValueId>,
    ) -> ValueId {
        let annotation = ScopeAnnotation {
            instance_name: self.intern(instance_name),
            module_name: self.intern(module_name),
            scope,
        };
        let op = self.push(OpKind::DbgScope(annotation), 1);
        self.design.op(op).results[0]
    }

    /// `dbg.moduleinfo`
    pub fn dbg_module_info(&mut self, type_name: &str, params: Option<Attr>) -> OpId {
        let type_name = self.intern(type_name);
        self.push(OpKind::DbgModuleInfo { type_name, params }, 0)
    }

    /// `dbg.enumdef`, returning the value variables link to.
    pub fn dbg_enum_def(&mut self, name: &str, id: u64, variants: &[(&str, i64)]) -> ValueId {
        let annotation = EnumDefAnnotation {
            name: self.intern(name),
            id: EnumId(id),
            variants: variants
                .iter()
                .map(|&(variant, value)| (self.intern(variant), value))
                .collect(),
        };
        let op = self.push(OpKind::DbgEnumDef(annotation), 1);
        self.design.op(op).results[0]
    }

    /// `hw.output`, terminating the module body.
    pub fn output(&mut self, values: &[ValueId]) -> OpId {
        self.push(
            OpKind::Output {
                operands: SmallVec::from_slice(values),
            },
            0,
        )
    }

    fn push(&mut self, kind: OpKind, results: u32) -> OpId {
        self.design
            .push_op(self.block, operation(kind, self.loc), results)
    }
}
