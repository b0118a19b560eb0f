use std::sync::Arc;

use super::sequence::rewrite_seq;
use super::visitor_trait::{Accept, ExprVisitor};
use crate::ir::expr::{
    AggregateFunction, ComparisonKind, ExprList, ExprRef, ExprTupleList, Expression, Ident,
    Literal, TimeUnit,
};

/// Returns `node` itself when `unchanged`, otherwise a new node built by `build`.
#[inline]
pub fn reuse_or_rebuild(
    node: &ExprRef,
    unchanged: bool,
    build: impl FnOnce() -> Expression,
) -> ExprRef {
    if unchanged {
        Arc::clone(node)
    } else {
        Arc::new(build())
    }
}

/// A bottom-up rewriter over the semantic query expression tree.
///
/// Every method has a default that rewrites the node's children through
/// `accept` with this same rewriter and rebuilds the node only when at least
/// one child came back as a different `Arc`. When nothing below a node changed,
/// the original node is returned, so an identity rewrite allocates nothing.
///
/// Children are always rewritten in declaration order and all of them are
/// visited, even after an earlier sibling changed.
///
/// Overrides may return any expression, including one of a different variant;
/// parents treat the returned `Arc` as the new child and detect changes by
/// pointer identity only.
///
/// Implementing this trait also implements [`ExprVisitor`] with
/// `Output = ExprRef`, so `node.accept(&mut rewriter)` works as well.
pub trait ExprRewriter {
    /// Rewrites the tree rooted at `node`.
    fn rewrite(&mut self, node: &ExprRef) -> ExprRef {
        node.accept(self)
    }

    /// Rewrites a sequence of expressions with copy-on-first-difference sharing.
    fn rewrite_list(&mut self, exprs: &ExprList) -> ExprList {
        rewrite_seq(exprs, |expr| expr.accept(self))
    }

    fn rewrite_column_ref(&mut self, node: &ExprRef, source: &ExprRef, column: &Ident) -> ExprRef {
        let new_source = source.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(source, &new_source), || Expression::ColumnRef {
            source: new_source,
            column: Arc::clone(column),
        })
    }

    fn rewrite_measure_ref(
        &mut self,
        node: &ExprRef,
        source: &ExprRef,
        measure: &Ident,
    ) -> ExprRef {
        let new_source = source.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(source, &new_source), || Expression::MeasureRef {
            source: new_source,
            measure: Arc::clone(measure),
        })
    }

    fn rewrite_aggregation(
        &mut self,
        node: &ExprRef,
        arg: &ExprRef,
        function: AggregateFunction,
    ) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::Aggregation {
            arg: new_arg,
            function,
        })
    }

    fn rewrite_hierarchy(&mut self, node: &ExprRef, arg: &ExprRef, hierarchy: &Ident) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::Hierarchy {
            arg: new_arg,
            hierarchy: Arc::clone(hierarchy),
        })
    }

    fn rewrite_hierarchy_level(&mut self, node: &ExprRef, arg: &ExprRef, level: &Ident) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::HierarchyLevel {
            arg: new_arg,
            level: Arc::clone(level),
        })
    }

    fn rewrite_entity(
        &mut self,
        node: &ExprRef,
        _schema: &Option<Ident>,
        _entity: &Ident,
        _variable: &Option<Ident>,
    ) -> ExprRef {
        Arc::clone(node)
    }

    fn rewrite_and(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
            || Expression::And { left: new_left, right: new_right },
        )
    }

    fn rewrite_or(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
            || Expression::Or { left: new_left, right: new_right },
        )
    }

    fn rewrite_compare(
        &mut self,
        node: &ExprRef,
        comparison: ComparisonKind,
        left: &ExprRef,
        right: &ExprRef,
    ) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
            || Expression::Compare { comparison, left: new_left, right: new_right },
        )
    }

    fn rewrite_contains(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
            || Expression::Contains { left: new_left, right: new_right },
        )
    }

    fn rewrite_starts_with(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        let new_left = left.accept(self);
        let new_right = right.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(left, &new_left) && Arc::ptr_eq(right, &new_right),
            || Expression::StartsWith { left: new_left, right: new_right },
        )
    }

    fn rewrite_between(
        &mut self,
        node: &ExprRef,
        arg: &ExprRef,
        lower: &ExprRef,
        upper: &ExprRef,
    ) -> ExprRef {
        let new_arg = arg.accept(self);
        let new_lower = lower.accept(self);
        let new_upper = upper.accept(self);
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(arg, &new_arg)
                && Arc::ptr_eq(lower, &new_lower)
                && Arc::ptr_eq(upper, &new_upper),
            || Expression::Between { arg: new_arg, lower: new_lower, upper: new_upper },
        )
    }

    fn rewrite_exists(&mut self, node: &ExprRef, arg: &ExprRef) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::Exists { arg: new_arg })
    }

    fn rewrite_not(&mut self, node: &ExprRef, arg: &ExprRef) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::Not { arg: new_arg })
    }

    /// Rewrites the argument list and every value row.
    ///
    /// The row list is rebuilt with the same copy-on-first-difference rule as
    /// the rows themselves, so untouched rows stay shared with the input.
    ///
    /// # Panics
    /// If a value row does not have exactly one element per argument.
    fn rewrite_in(&mut self, node: &ExprRef, args: &ExprList, values: &ExprTupleList) -> ExprRef {
        assert!(
            values.iter().all(|tuple| tuple.len() == args.len()),
            "In value rows must have as many elements as there are arguments"
        );
        let new_args = self.rewrite_list(args);
        let new_values = rewrite_seq(values, |tuple| self.rewrite_list(tuple));
        reuse_or_rebuild(
            node,
            Arc::ptr_eq(args, &new_args) && Arc::ptr_eq(values, &new_values),
            || Expression::In { args: new_args, values: new_values },
        )
    }

    fn rewrite_constant(&mut self, node: &ExprRef, _value: &Literal) -> ExprRef {
        Arc::clone(node)
    }

    fn rewrite_date_span(&mut self, node: &ExprRef, unit: TimeUnit, arg: &ExprRef) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::DateSpan {
            unit,
            arg: new_arg,
        })
    }

    fn rewrite_date_add(
        &mut self,
        node: &ExprRef,
        unit: TimeUnit,
        amount: i64,
        arg: &ExprRef,
    ) -> ExprRef {
        let new_arg = arg.accept(self);
        reuse_or_rebuild(node, Arc::ptr_eq(arg, &new_arg), || Expression::DateAdd {
            unit,
            amount,
            arg: new_arg,
        })
    }

    fn rewrite_now(&mut self, node: &ExprRef) -> ExprRef {
        Arc::clone(node)
    }

    fn rewrite_default_value(&mut self, node: &ExprRef) -> ExprRef {
        Arc::clone(node)
    }

    fn rewrite_any_value(&mut self, node: &ExprRef) -> ExprRef {
        Arc::clone(node)
    }
}

impl<R: ExprRewriter + ?Sized> ExprVisitor for R {
    type Output = ExprRef;

    fn visit_default(&mut self, node: &ExprRef) -> ExprRef {
        Arc::clone(node)
    }

    fn visit_column_ref(&mut self, node: &ExprRef, source: &ExprRef, column: &Ident) -> ExprRef {
        self.rewrite_column_ref(node, source, column)
    }

    fn visit_measure_ref(&mut self, node: &ExprRef, source: &ExprRef, measure: &Ident) -> ExprRef {
        self.rewrite_measure_ref(node, source, measure)
    }

    fn visit_aggregation(
        &mut self,
        node: &ExprRef,
        arg: &ExprRef,
        function: AggregateFunction,
    ) -> ExprRef {
        self.rewrite_aggregation(node, arg, function)
    }

    fn visit_hierarchy(&mut self, node: &ExprRef, arg: &ExprRef, hierarchy: &Ident) -> ExprRef {
        self.rewrite_hierarchy(node, arg, hierarchy)
    }

    fn visit_hierarchy_level(&mut self, node: &ExprRef, arg: &ExprRef, level: &Ident) -> ExprRef {
        self.rewrite_hierarchy_level(node, arg, level)
    }

    fn visit_entity(
        &mut self,
        node: &ExprRef,
        schema: &Option<Ident>,
        entity: &Ident,
        variable: &Option<Ident>,
    ) -> ExprRef {
        self.rewrite_entity(node, schema, entity, variable)
    }

    fn visit_and(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        self.rewrite_and(node, left, right)
    }

    fn visit_or(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        self.rewrite_or(node, left, right)
    }

    fn visit_compare(
        &mut self,
        node: &ExprRef,
        comparison: ComparisonKind,
        left: &ExprRef,
        right: &ExprRef,
    ) -> ExprRef {
        self.rewrite_compare(node, comparison, left, right)
    }

    fn visit_contains(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        self.rewrite_contains(node, left, right)
    }

    fn visit_starts_with(&mut self, node: &ExprRef, left: &ExprRef, right: &ExprRef) -> ExprRef {
        self.rewrite_starts_with(node, left, right)
    }

    fn visit_between(
        &mut self,
        node: &ExprRef,
        arg: &ExprRef,
        lower: &ExprRef,
        upper: &ExprRef,
    ) -> ExprRef {
        self.rewrite_between(node, arg, lower, upper)
    }

    fn visit_exists(&mut self, node: &ExprRef, arg: &ExprRef) -> ExprRef {
        self.rewrite_exists(node, arg)
    }

    fn visit_not(&mut self, node: &ExprRef, arg: &ExprRef) -> ExprRef {
        self.rewrite_not(node, arg)
    }

    fn visit_in(&mut self, node: &ExprRef, args: &ExprList, values: &ExprTupleList) -> ExprRef {
        self.rewrite_in(node, args, values)
    }

    fn visit_constant(&mut self, node: &ExprRef, value: &Literal) -> ExprRef {
        self.rewrite_constant(node, value)
    }

    fn visit_date_span(&mut self, node: &ExprRef, unit: TimeUnit, arg: &ExprRef) -> ExprRef {
        self.rewrite_date_span(node, unit, arg)
    }

    fn visit_date_add(
        &mut self,
        node: &ExprRef,
        unit: TimeUnit,
        amount: i64,
        arg: &ExprRef,
    ) -> ExprRef {
        self.rewrite_date_add(node, unit, amount, arg)
    }

    fn visit_now(&mut self, node: &ExprRef) -> ExprRef {
        self.rewrite_now(node)
    }

    fn visit_default_value(&mut self, node: &ExprRef) -> ExprRef {
        self.rewrite_default_value(node)
    }

    fn visit_any_value(&mut self, node: &ExprRef) -> ExprRef {
        self.rewrite_any_value(node)
    }
}
