//! Diagnostics for debug-info extraction.
//!
//! Malformed input aborts extraction; the error is turned into a
//! [`Diagnostic`] carrying:
//! - an error code for searchability
//! - a message (what went wrong)
//! - labelled source locations (where, and what else is involved)
//! - notes (how to fix)

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
