use hwdi_ir::StringInterner;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("unresolved debug scope reference")
        .with_label(Location::UNKNOWN, "here")
        .with_secondary_label(Location::UNKNOWN, "related")
        .with_note("fix it");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_label().map(|l| l.message.as_str()), Some("here"));
    assert_eq!(diag.notes, vec!["fix it".to_owned()]);
}

#[test]
fn render_resolves_locations() {
    let interner = StringInterner::new();
    let file = interner.intern("top.sv");
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("unresolved debug scope reference")
        .with_label(Location::new(file, 4, 3), "variable `count` names this scope")
        .with_secondary_label(Location::new(file, 2, 1), "in module `Top`")
        .with_note("scopes must be defined by a `dbg.scope` in the same module");

    assert_eq!(
        diag.render(&interner),
        "error[E2001]: unresolved debug scope reference\n\
         \x20 --> top.sv:4:3: variable `count` names this scope\n\
         \x20 ::: top.sv:2:1: in module `Top`\n\
         \x20 = note: scopes must be defined by a `dbg.scope` in the same module\n"
    );
}

#[test]
fn display_is_headline() {
    let diag = Diagnostic::error(ErrorCode::E1002).with_message("module `M` defined twice");
    assert_eq!(diag.to_string(), "error[E1002]: module `M` defined twice");
}

#[test]
fn severity_display() {
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Note.to_string(), "note");
}
