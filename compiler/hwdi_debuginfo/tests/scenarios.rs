//! End-to-end extraction scenarios.
//!
//! Each test builds a small design with `DesignBuilder`, extracts debug info
//! and checks the resulting hierarchy by name.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use hwdi_debuginfo::{
    DebugInfo, DebugInfoError, DebugInfoOptions, DiPresence, ModuleId, ModuleInfoPolicy,
    UnresolvedScopePolicy,
};
use hwdi_ir::{Attr, Design, DesignBuilder, EnumId, PortSpec, VariableAnnotation};
use pretty_assertions::assert_eq;

fn build(design: &Design) -> DebugInfo {
    hwdi_debuginfo::init_tracing();
    DebugInfo::build(design).expect("debug info should build")
}

fn variable_names(info: &DebugInfo, module: ModuleId) -> Vec<&str> {
    info.module(module)
        .variables
        .iter()
        .map(|&v| info.name(info.variable(v).name))
        .collect()
}

/// `(instance name, instantiated module name)` pairs.
fn instance_names(info: &DebugInfo, module: ModuleId) -> Vec<(&str, &str)> {
    info.module(module)
        .instances
        .iter()
        .map(|&i| {
            let instance = info.instance(i);
            (
                info.name(instance.name),
                info.name(info.module(instance.module).name),
            )
        })
        .collect()
}

// -- Scenarios --

#[test]
fn unannotated_module_exposes_ports() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a"), PortSpec::output("b")], |body| {
        let a = body.input(0);
        let b = body.opaque("comb.not", &[a]);
        body.output(&[b]);
    });
    let info = build(&b.finish());

    assert_eq!(info.top_level_modules().len(), 1);
    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["a", "b"]);
    assert!(info.module(m).instances.is_empty());
    assert_eq!(info.module(m).explicit, DiPresence::empty());
}

#[test]
fn scope_splits_variables_between_module_and_inline_child() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let s = body.dbg_scope("s", "Sub", None);
        let scoped = body.intern("inner");
        body.dbg_variable_with(VariableAnnotation::new(scoped, a).in_scope(s));
        body.dbg_variable("outer", a);
        body.output(&[]);
    });
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["outer"]);
    assert_eq!(instance_names(&info, m), vec![("s", "Sub")]);

    let sub = info.instance(info.module(m).instances[0]).module;
    assert!(info.module(sub).is_inline);
    assert_eq!(info.module(sub).parent, Some(m));
    assert_eq!(variable_names(&info, sub), vec!["inner"]);
    assert_eq!(info.modules(), &[m], "inline modules are not registry entries");
}

#[test]
fn extern_module_ports_have_no_values() {
    let mut b = DesignBuilder::new();
    b.extern_module(
        "Ext",
        &[
            PortSpec::input("clk"),
            PortSpec::input("rst"),
            PortSpec::output("out"),
        ],
    );
    let info = build(&b.finish());

    let ext = info.lookup_module("Ext").unwrap();
    let module = info.module(ext);
    assert!(module.is_extern);
    assert!(module.instances.is_empty());
    assert_eq!(variable_names(&info, ext), vec!["clk", "rst", "out"]);
    assert!(module
        .variables
        .iter()
        .all(|&v| info.variable(v).value.is_none()));
}

#[test]
fn enum_definition_is_looked_up_by_id() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let e = body.dbg_enum_def("State", 3, &[("IDLE", 0), ("RUN", 1)]);
        let v = body.intern("v");
        body.dbg_variable_with(VariableAnnotation::new(v, a).with_enum(e));
        body.output(&[]);
    });
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    let def = info.lookup_enum(m, EnumId(3)).unwrap();
    let variants: Vec<(i64, &str)> = def
        .variants
        .iter()
        .map(|(&value, &name)| (value, info.name(name)))
        .collect();
    assert_eq!(variants, vec![(0, "IDLE"), (1, "RUN")]);

    let v = info.module(m).variables[0];
    assert_eq!(info.variable(v).enum_def, Some(EnumId(3)));
    assert_eq!(info.resolve_enum(v), Some(def));
}

#[test]
fn first_enum_definition_with_an_id_wins() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let first = body.dbg_enum_def("First", 3, &[("IDLE", 0)]);
        body.dbg_enum_def("Second", 3, &[("OTHER", 0)]);
        let v = body.intern("v");
        body.dbg_variable_with(VariableAnnotation::new(v, a).with_enum(first));
        body.output(&[]);
    });
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    let def = info.lookup_enum(m, EnumId(3)).unwrap();
    assert_eq!(info.name(def.name), "First");
    assert_eq!(def.variant(0).map(|n| info.name(n)), Some("IDLE"));

    let v = info.module(m).variables[0];
    assert_eq!(info.resolve_enum(v), Some(def));
}

// -- Fallbacks --

#[test]
fn port_variables_keep_declaration_order_across_directions() {
    let mut b = DesignBuilder::new();
    let mut values = Vec::new();
    b.module(
        "M",
        &[
            PortSpec::input("a"),
            PortSpec::output("b"),
            PortSpec::inout("bus"),
            PortSpec::input("c"),
            PortSpec::output("d"),
        ],
        |body| {
            let a = body.input(0);
            let bus = body.input(1);
            let c = body.input(2);
            let b = body.opaque("comb.and", &[a, c]);
            let d = body.opaque("comb.or", &[a, bus]);
            values = vec![a, b, bus, c, d];
            body.output(&[b, d]);
        },
    );
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["a", "b", "bus", "c", "d"]);
    let bound: Vec<_> = info
        .module(m)
        .variables
        .iter()
        .map(|&v| info.variable(v).value.unwrap())
        .collect();
    assert_eq!(bound, values);
}

#[test]
fn wires_follow_ports_without_variable_annotations() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a"), PortSpec::output("y")], |body| {
        let a = body.input(0);
        let w0 = body.wire("w0", Some(a));
        body.region("sv.ifdef", |inner| {
            inner.wire("w1", Some(w0));
        });
        body.output(&[w0]);
    });
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["a", "y", "w0", "w1"]);
    let w1 = info.module(m).variables[3];
    assert_eq!(info.variable(w1).source_type, None);
    assert!(info.variable(w1).value.is_some());
}

#[test]
fn one_variable_annotation_disables_port_and_wire_fallback() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a"), PortSpec::output("y")], |body| {
        let a = body.input(0);
        let w = body.wire("w", Some(a));
        let name = body.intern("count");
        let ty = body.intern("uint<8>");
        body.dbg_variable_with(VariableAnnotation::new(name, w).with_type(ty, Some(Attr::Int(8))));
        body.output(&[w]);
    });
    let info = build(&b.finish());

    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["count"]);
    let count = info.variable(info.module(m).variables[0]);
    let ty = count.source_type.as_ref().unwrap();
    assert_eq!(ty.type_name.map(|n| info.name(n)), Some("uint<8>"));
    assert_eq!(ty.params, Some(Attr::Int(8)));
    assert_eq!(info.module(m).explicit, DiPresence::VARIABLES);
}

#[test]
fn structural_instances_without_scope_annotations() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[PortSpec::input("clk")], |body| {
        let clk = body.input(0);
        body.instance("u0", "Child", &[clk]);
        body.dbg_variable("clk", clk);
        body.instance("u1", "Child", &[clk]);
        body.output(&[]);
    });
    b.module("Child", &[PortSpec::input("clk")], |body| {
        body.output(&[]);
    });
    let info = build(&b.finish());

    let top = info.lookup_module("Top").unwrap();
    assert_eq!(
        instance_names(&info, top),
        vec![("u0", "Child"), ("u1", "Child")]
    );
    let first = info.instance(info.module(top).instances[0]).module;
    let second = info.instance(info.module(top).instances[1]).module;
    assert_eq!(first, second, "one node per module name");
}

#[test]
fn scope_annotation_suppresses_structural_instances() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[], |body| {
        body.instance("u0", "Child", &[]);
        body.dbg_scope("logical", "Logical", None);
        body.output(&[]);
    });
    let info = build(&b.finish());

    let top = info.lookup_module("Top").unwrap();
    assert_eq!(instance_names(&info, top), vec![("logical", "Logical")]);
    assert_eq!(info.lookup_module("Child"), None);
}

#[test]
fn nested_scopes_form_a_chain() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let outer = body.dbg_scope("outer", "Outer", None);
        let inner = body.dbg_scope("inner", "Inner", Some(outer));
        let x = body.intern("x");
        body.dbg_variable_with(VariableAnnotation::new(x, a).in_scope(inner));
        body.output(&[]);
    });
    let info = build(&b.finish());

    let top = info.lookup_module("Top").unwrap();
    assert_eq!(instance_names(&info, top), vec![("outer", "Outer")]);
    let outer = info.instance(info.module(top).instances[0]).module;
    assert_eq!(instance_names(&info, outer), vec![("inner", "Inner")]);
    let inner = info.instance(info.module(outer).instances[0]).module;
    assert_eq!(variable_names(&info, inner), vec!["x"]);
    assert!(variable_names(&info, top).is_empty());
}

// -- Module identity and ordering --

#[test]
fn forward_instantiation_resolves_to_later_definition() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[], |body| {
        body.instance("c", "Child", &[]);
        body.output(&[]);
    });
    b.module("Child", &[PortSpec::input("d")], |body| {
        body.output(&[]);
    });
    let info = build(&b.finish());

    let top = info.lookup_module("Top").unwrap();
    let child = info.lookup_module("Child").unwrap();
    assert_eq!(info.instance(info.module(top).instances[0]).module, child);
    assert!(info.module(child).op.is_some());
    assert_eq!(variable_names(&info, child), vec!["d"]);
    assert_eq!(info.top_level_modules(), &[top, child]);
    assert_eq!(info.modules(), &[top, child]);
}

#[test]
fn undefined_instantiated_module_stays_a_bare_node() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[], |body| {
        body.instance("bb", "BlackBox", &[]);
        body.output(&[]);
    });
    let info = build(&b.finish());

    let black_box = info.lookup_module("BlackBox").unwrap();
    assert_eq!(info.module(black_box).op, None);
    assert!(info.module(black_box).variables.is_empty());
    assert!(!info.top_level_modules().contains(&black_box));
    assert!(info.modules().contains(&black_box));
}

#[test]
fn modules_inside_containers_are_collected() {
    let mut b = DesignBuilder::new();
    b.container("builtin.module", |b| {
        b.extern_module("Ram", &[PortSpec::input("addr")]);
        b.module("Top", &[], |body| {
            body.instance("ram", "Ram", &[]);
            body.output(&[]);
        });
    });
    let info = build(&b.finish());

    let ram = info.lookup_module("Ram").unwrap();
    let top = info.lookup_module("Top").unwrap();
    assert_eq!(info.top_level_modules(), &[ram, top]);
    assert_eq!(info.root_modules(), vec![top]);
}

#[test]
fn rebuilding_yields_an_equal_hierarchy() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let s = body.dbg_scope("s", "S", None);
        let x = body.intern("x");
        body.dbg_variable_with(VariableAnnotation::new(x, a).in_scope(s));
        body.instance("leaf", "Leaf", &[a]);
        body.output(&[]);
    });
    b.extern_module("Leaf", &[PortSpec::input("a")]);
    let design = b.finish();

    assert_eq!(build(&design), build(&design));
}

// -- Module info --

#[test]
fn module_info_sets_source_type() {
    let mut b = DesignBuilder::new();
    b.module("Top", &[], |body| {
        body.dbg_module_info("Counter", None);
        body.dbg_module_info("Counter8", Some(Attr::Int(8)));
        body.output(&[]);
    });
    let info = build(&b.finish());

    let top = info.lookup_module("Top").unwrap();
    let ty = info.module(top).source_type.clone().unwrap();
    assert_eq!(ty.type_name.map(|n| info.name(n)), Some("Counter8"));
    assert_eq!(ty.params, Some(Attr::Int(8)));
}

#[test]
fn strict_module_info_rejects_repeats() {
    let mut b = DesignBuilder::new();
    let mut ops = Vec::new();
    let top = b.module("Top", &[], |body| {
        ops.push(body.dbg_module_info("A", None));
        ops.push(body.dbg_module_info("B", None));
        body.output(&[]);
    });
    let design = b.finish();

    let options = DebugInfoOptions::new().with_module_info(ModuleInfoPolicy::Strict);
    let err = DebugInfo::build_with(&design, &options).unwrap_err();
    assert_eq!(
        err,
        DebugInfoError::DuplicateModuleInfo {
            module: top,
            first: ops[0],
            second: ops[1],
        }
    );
}

// -- Errors --

#[test]
fn scope_from_another_module_is_rejected() {
    let mut b = DesignBuilder::new();
    let mut foreign = None;
    b.module("A", &[], |body| {
        foreign = Some(body.dbg_scope("s", "S", None));
        body.output(&[]);
    });
    let foreign = foreign.unwrap();
    let mut user = None;
    b.module("B", &[PortSpec::input("x")], |body| {
        let x = body.input(0);
        let name = body.intern("x");
        user = Some(body.dbg_variable_with(VariableAnnotation::new(name, x).in_scope(foreign)));
        body.output(&[]);
    });
    let design = b.finish();

    let err = DebugInfo::build(&design).unwrap_err();
    assert_eq!(
        err,
        DebugInfoError::UnresolvedScope {
            op: user.unwrap(),
            scope: foreign,
        }
    );
    assert_eq!(err.to_diagnostic(&design).code.as_str(), "E2001");
}

#[test]
fn enclosing_policy_keeps_unresolved_variables() {
    let mut b = DesignBuilder::new();
    b.module("M", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let bogus = body.opaque("comb.and", &[a, a]);
        let name = body.intern("v");
        body.dbg_variable_with(VariableAnnotation::new(name, a).in_scope(bogus));
        body.output(&[]);
    });
    let design = b.finish();

    assert!(matches!(
        DebugInfo::build(&design),
        Err(DebugInfoError::UnresolvedScope { .. })
    ));

    let options = DebugInfoOptions::new().with_unresolved_scope(UnresolvedScopePolicy::Enclosing);
    let info = DebugInfo::build_with(&design, &options).unwrap();
    let m = info.lookup_module("M").unwrap();
    assert_eq!(variable_names(&info, m), vec!["v"]);
}

#[test]
fn enum_link_must_come_from_an_enum_definition() {
    let mut b = DesignBuilder::new();
    let mut user = None;
    let mut value = None;
    b.module("M", &[PortSpec::input("a")], |body| {
        let a = body.input(0);
        let name = body.intern("v");
        user = Some(body.dbg_variable_with(VariableAnnotation::new(name, a).with_enum(a)));
        value = Some(a);
        body.output(&[]);
    });
    let err = DebugInfo::build(&b.finish()).unwrap_err();

    assert_eq!(
        err,
        DebugInfoError::InvalidEnumReference {
            op: user.unwrap(),
            value: value.unwrap(),
        }
    );
}

#[test]
fn enum_from_another_module_is_rejected() {
    let mut b = DesignBuilder::new();
    let mut foreign = None;
    b.module("A", &[PortSpec::input("x")], |body| {
        let x = body.input(0);
        let e = body.dbg_enum_def("State", 3, &[("IDLE", 0)]);
        let v = body.intern("local");
        body.dbg_variable_with(VariableAnnotation::new(v, x).with_enum(e));
        foreign = Some(e);
        body.output(&[]);
    });
    let foreign = foreign.unwrap();
    let mut user = None;
    b.module("B", &[PortSpec::input("y")], |body| {
        let y = body.input(0);
        let v = body.intern("remote");
        user = Some(body.dbg_variable_with(VariableAnnotation::new(v, y).with_enum(foreign)));
        body.output(&[]);
    });
    let design = b.finish();

    let err = DebugInfo::build(&design).unwrap_err();
    assert_eq!(
        err,
        DebugInfoError::InvalidEnumReference {
            op: user.unwrap(),
            value: foreign,
        }
    );
    assert_eq!(err.to_diagnostic(&design).code.as_str(), "E2002");
}

#[test]
fn module_and_extern_with_one_name_conflict() {
    let mut b = DesignBuilder::new();
    let first = b.module("Core", &[], |body| {
        body.output(&[]);
    });
    let second = b.extern_module("Core", &[]);
    let design = b.finish();

    let err = DebugInfo::build(&design).unwrap_err();
    assert_eq!(
        err,
        DebugInfoError::ConflictingModuleKind {
            name: design.interner().intern("Core"),
            first,
            second,
        }
    );
}

#[test]
fn duplicate_definition_is_rejected() {
    let mut b = DesignBuilder::new();
    b.module("Core", &[], |body| {
        body.output(&[]);
    });
    b.module("Core", &[], |body| {
        body.output(&[]);
    });
    let err = DebugInfo::build(&b.finish()).unwrap_err();

    assert!(matches!(err, DebugInfoError::DuplicateModule { .. }));
    assert_eq!(err.code().as_str(), "E1002");
}
