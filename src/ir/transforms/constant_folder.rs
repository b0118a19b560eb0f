//! Folds boolean constants out of logical operators.
//!
//! Applied bottom-up, so folding cascades: `Not(And(true, false))` first folds
//! the `And` to `false` and then the `Not` to `true`.
//!
//! Rules:
//! - `And(true, x)`, `And(x, true)` => `x`; `And(false, _)`, `And(_, false)` => `false`
//! - `Or(false, x)`, `Or(x, false)` => `x`; `Or(true, _)`, `Or(_, true)` => `true`
//! - `Not(b)` => `!b` for a boolean constant `b`; `Not(Not(x))` => `x`

use std::sync::Arc;

use tracing::debug;

use crate::ir::expr::builder::boolean;
use crate::ir::expr::{ExprRef, Expression};
use crate::ir::visitor::{reuse_or_rebuild, Accept, ExprRewriter};

/// Rewriter that simplifies `And`, `Or` and `Not` over boolean constants.
#[derive(Debug, Default)]
pub struct ConstantFolder {
    folded: usize,
}

impl ConstantFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes folded away so far.
    pub fn folded(&self) -> usize {
        self.folded
    }

    fn fold(&mut self, kind: &str, result: ExprRef) -> ExprRef {
        self.folded += 1;
        debug!("Folded {} to {}", kind, result.kind_name());
        result
    }
}

impl ExprRewriter for ConstantFolder {
    fn rewrite_and(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);

        match (new_left.as_bool(), new_right.as_bool()) {
            (Some(false), _) => self.fold("And", new_left),
            (_, Some(false)) => self.fold("And", new_right),
            (Some(true), _) => self.fold("And", new_right),
            (_, Some(true)) => self.fold("And", new_left),
            _ => reuse_or_rebuild(
                node,
                Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
                || Expression::And { left: new_left, right: new_right },
            ),
        }
    }

    fn rewrite_or(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);

        match (new_left.as_bool(), new_right.as_bool()) {
            (Some(true), _) => self.fold("Or", new_left),
            (_, Some(true)) => self.fold("Or", new_right),
            (Some(false), _) => self.fold("Or", new_right),
            (_, Some(false)) => self.fold("Or", new_left),
            _ => reuse_or_rebuild(
                node,
                Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
                || Expression::Or { left: new_left, right: new_right },
            ),
        }
    }

    fn rewrite_not(&mut self, node: &ExprRef, arg: &ExprRef) -> ExprRef {
        let new_arg = arg.accept(self);

        if let Some(value) = new_arg.as_bool() {
            return self.fold("Not", boolean(!value));
        }
        if let Expression::Not { arg: inner } = &*new_arg {
            return self.fold("Not", Arc::clone(inner));
        }
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::Not { arg: new_arg })
    }
}
