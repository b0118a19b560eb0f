use crate::ir::expr::{
    AggregateFunction, ComparisonKind, ExprList, ExprRef, ExprTupleList, Expression, Ident,
    Literal, TimeUnit,
};

/// Double-dispatch entry point exposed by every expression node.
///
/// `node.accept(&mut visitor)` calls the visitor method matching the node's
/// variant and returns whatever that method returns.
pub trait Accept {
    fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

impl Accept for ExprRef {
    fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit(self)
    }
}

/// A visitor over the semantic query expression tree.
///
/// There is one method per variant. Each receives the node itself (so an
/// implementation can hand back the original `Arc`) followed by the variant's
/// fields. Every per-variant method defaults to [`ExprVisitor::visit_default`],
/// so an implementation only overrides the variants it cares about.
///
/// Rewriters do not implement this trait directly; see
/// [`ExprRewriter`](super::ExprRewriter), which provides it.
pub trait ExprVisitor {
    type Output;

    /// Fallback for every variant that is not overridden.
    fn visit_default(&mut self, node: &ExprRef) -> Self::Output;

    /// Dispatches `node` to the method for its variant.
    /// Implementors typically do not override this method.
    fn visit(&mut self, node: &ExprRef) -> Self::Output {
        match &**node {
            Expression::ColumnRef { source, column } => self.visit_column_ref(node, source, column),
            Expression::MeasureRef { source, measure } => {
                self.visit_measure_ref(node, source, measure)
            }
            Expression::Aggregation { arg, function } => {
                self.visit_aggregation(node, arg, *function)
            }
            Expression::Hierarchy { arg, hierarchy } => self.visit_hierarchy(node, arg, hierarchy),
            Expression::HierarchyLevel { arg, level } => {
                self.visit_hierarchy_level(node, arg, level)
            }
            Expression::Entity { schema, entity, variable } => {
                self.visit_entity(node, schema, entity, variable)
            }
            Expression::And { left, right } => self.visit_and(node, left, right),
            Expression::Or { left, right } => self.visit_or(node, left, right),
            Expression::Compare { comparison, left, right } => {
                self.visit_compare(node, *comparison, left, right)
            }
            Expression::Contains { left, right } => self.visit_contains(node, left, right),
            Expression::StartsWith { left, right } => self.visit_starts_with(node, left, right),
            Expression::Between { arg, lower, upper } => {
                self.visit_between(node, arg, lower, upper)
            }
            Expression::Exists { arg } => self.visit_exists(node, arg),
            Expression::Not { arg } => self.visit_not(node, arg),
            Expression::In { args, values } => self.visit_in(node, args, values),
            Expression::Constant { value } => self.visit_constant(node, value),
            Expression::DateSpan { unit, arg } => self.visit_date_span(node, *unit, arg),
            Expression::DateAdd { unit, amount, arg } => {
                self.visit_date_add(node, *unit, *amount, arg)
            }
            Expression::Now => self.visit_now(node),
            Expression::DefaultValue => self.visit_default_value(node),
            Expression::AnyValue => self.visit_any_value(node),
        }
    }

    fn visit_column_ref(
        &mut self,
        node: &ExprRef,
        _source: &ExprRef,
        _column: &Ident,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_measure_ref(
        &mut self,
        node: &ExprRef,
        _source: &ExprRef,
        _measure: &Ident,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_aggregation(
        &mut self,
        node: &ExprRef,
        _arg: &ExprRef,
        _function: AggregateFunction,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_hierarchy(
        &mut self,
        node: &ExprRef,
        _arg: &ExprRef,
        _hierarchy: &Ident,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_hierarchy_level(
        &mut self,
        node: &ExprRef,
        _arg: &ExprRef,
        _level: &Ident,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_entity(
        &mut self,
        node: &ExprRef,
        _schema: &Option<Ident>,
        _entity: &Ident,
        _variable: &Option<Ident>,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_and(&mut self, node: &ExprRef, _left: &ExprRef, _right: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_or(&mut self, node: &ExprRef, _left: &ExprRef, _right: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_compare(
        &mut self,
        node: &ExprRef,
        _comparison: ComparisonKind,
        _left: &ExprRef,
        _right: &ExprRef,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_contains(
        &mut self,
        node: &ExprRef,
        _left: &ExprRef,
        _right: &ExprRef,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_starts_with(
        &mut self,
        node: &ExprRef,
        _left: &ExprRef,
        _right: &ExprRef,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_between(
        &mut self,
        node: &ExprRef,
        _arg: &ExprRef,
        _lower: &ExprRef,
        _upper: &ExprRef,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_exists(&mut self, node: &ExprRef, _arg: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_not(&mut self, node: &ExprRef, _arg: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_in(
        &mut self,
        node: &ExprRef,
        _args: &ExprList,
        _values: &ExprTupleList,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_constant(&mut self, node: &ExprRef, _value: &Literal) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_date_span(&mut self, node: &ExprRef, _unit: TimeUnit, _arg: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_date_add(
        &mut self,
        node: &ExprRef,
        _unit: TimeUnit,
        _amount: i64,
        _arg: &ExprRef,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_now(&mut self, node: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_default_value(&mut self, node: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_any_value(&mut self, node: &ExprRef) -> Self::Output {
        self.visit_default(node)
    }
}
