use tracing::trace;

use crate::ir::expr::ExprRef;
use crate::ir::visitor::Accept;

pub mod json_formatters;
pub mod printer;

pub use json_formatters::to_json;
pub use printer::{format_literal, PrettyPrinter};

/// Formats an expression tree into its call notation.
/// Supports both compact and pretty-printed output.
///
/// # Arguments
/// * tree - The root of the expression tree.
/// * pretty_print - If true, breaks nested calls over indented lines.
pub fn format(tree: &ExprRef, pretty_print: bool) -> String {
    let mut printer = PrettyPrinter::new(pretty_print);
    tree.accept(&mut printer);
    let result = printer.into_result();
    trace!("Formatted {} (length={})", tree.kind_name(), result.len());
    result
}
