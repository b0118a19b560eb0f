//! Substitutes column references by entity and column name.
//!
//! This is the rewrite a data-binding layer performs when a field of the
//! bound table is renamed or replaced by a computed expression: every
//! `ColumnRef` whose source is the named entity and whose column matches is
//! swapped, and everything else stays shared with the input tree.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ir::expr::{ExprRef, Expression, Ident};
use crate::ir::visitor::{Accept, ExprRewriter};

#[derive(Debug, Clone)]
enum Replacement {
    /// Keep the (rewritten) source and change only the column name.
    Rename(Ident),
    /// Replace the whole reference with an arbitrary expression.
    With(ExprRef),
}

/// Rewriter that replaces selected `ColumnRef` nodes.
#[derive(Debug, Default)]
pub struct ColumnSubstitution {
    replacements: FxHashMap<(Ident, Ident), Replacement>,
    substitutions: usize,
}

impl ColumnSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames `entity[from]` to `entity[to]`.
    pub fn rename(mut self, entity: &str, from: &str, to: &str) -> Self {
        self.replacements
            .insert((Arc::from(entity), Arc::from(from)), Replacement::Rename(Arc::from(to)));
        self
    }

    /// Replaces `entity[column]` with `replacement`, which may be any expression.
    pub fn replace_with(mut self, entity: &str, column: &str, replacement: ExprRef) -> Self {
        self.replacements
            .insert((Arc::from(entity), Arc::from(column)), Replacement::With(replacement));
        self
    }

    /// Number of column references substituted so far.
    pub fn substitutions(&self) -> usize {
        self.substitutions
    }
}

impl ExprRewriter for ColumnSubstitution {
    fn rewrite_column_ref(&mut self, node: &ExprRef, source: &ExprRef, column: &Ident) -> ExprRef {
        let new_source = source.accept(self);

        let key = new_source
            .entity_name()
            .map(|entity| (Arc::clone(entity), Arc::clone(column)));
        match key.and_then(|key| self.replacements.get(&key).cloned()) {
            Some(Replacement::Rename(to)) if to != *column => {
                debug!("Renaming column {} to {}", column, to);
                self.substitutions += 1;
                return Arc::new(Expression::ColumnRef { source: new_source, column: to });
            }
            Some(Replacement::With(expr)) => {
                debug!("Replacing column {} with {}", column, expr.kind_name());
                self.substitutions += 1;
                return expr;
            }
            _ => {}
        }

        if Arc::ptr_eq(source, &new_source) {
            Arc::clone(node)
        } else {
            Arc::new(Expression::ColumnRef {
                source: new_source,
                column: Arc::clone(column),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::expr::builder::*;

    #[test]
    fn test_rename_matching_column_only() {
        let sales_amount = column_ref(entity("Sales"), "Amount");
        let sales_region = column_ref(entity("Sales"), "Region");
        let other_amount = column_ref(entity("Budget"), "Amount");
        let tree = and(
            compare_eq(Arc::clone(&sales_amount), integer(1)),
            or(
                compare_eq(Arc::clone(&sales_region), text("EU")),
                exists(Arc::clone(&other_amount)),
            ),
        );

        let mut rewriter = ColumnSubstitution::new().rename("Sales", "Amount", "NetAmount");
        let result = rewriter.rewrite(&tree);

        assert_eq!(rewriter.substitutions(), 1);
        let expected = and(
            compare_eq(column_ref(entity("Sales"), "NetAmount"), integer(1)),
            or(
                compare_eq(column_ref(entity("Sales"), "Region"), text("EU")),
                exists(column_ref(entity("Budget"), "Amount")),
            ),
        );
        assert_eq!(*result, *expected);

        // The untouched Or subtree is shared with the input.
        match (&*tree, &*result) {
            (Expression::And { right: before, .. }, Expression::And { right: after, .. }) => {
                assert!(Arc::ptr_eq(before, after));
            }
            _ => panic!("expected And at the root"),
        }
    }

    #[test]
    fn test_replace_with_any_expression() {
        let tree = aggregate(
            column_ref(entity("Sales"), "Amount"),
            crate::ir::expr::AggregateFunction::Sum,
        );
        let measure = measure_ref(entity("Sales"), "Total Amount");
        let mut rewriter =
            ColumnSubstitution::new().replace_with("Sales", "Amount", Arc::clone(&measure));
        let result = rewriter.rewrite(&tree);
        match &*result {
            Expression::Aggregation { arg, .. } => assert!(Arc::ptr_eq(arg, &measure)),
            other => panic!("expected Aggregation, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_no_match_returns_same_tree() {
        let tree = column_ref(entity("Sales"), "Amount");
        let mut rewriter = ColumnSubstitution::new().rename("Sales", "Quantity", "Qty");
        let result = rewriter.rewrite(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
        assert_eq!(rewriter.substitutions(), 0);
    }

    #[test]
    fn test_rename_to_same_name_keeps_identity() {
        let tree = compare_eq(column_ref(entity("Sales"), "Amount"), integer(1));
        let mut rewriter = ColumnSubstitution::new().rename("Sales", "Amount", "Amount");
        let result = rewriter.rewrite(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
        assert_eq!(rewriter.substitutions(), 0);
    }
}
