#![allow(dead_code)]

use std::sync::Arc;

use semantic_query_ir::ir::expr::builder::*;
use semantic_query_ir::ir::expr::{
    AggregateFunction, ComparisonKind, ExprRef, Expression, Literal, TimeUnit,
};
use semantic_query_ir::ir::visitor::ExprRewriter;
use test_utils::ir::generator::{GenAggregate, GenComparison, GenExpr, GenLiteral, GenUnit};

/// Rewriter that leaves every node alone.
pub struct IdentityRewriter;

impl ExprRewriter for IdentityRewriter {}

/// Rewriter that maps integer constant `from` to `to` and leaves everything else alone.
pub struct ReplaceInteger {
    pub from: i64,
    pub to: i64,
}

impl ExprRewriter for ReplaceInteger {
    fn rewrite_constant(&mut self, node: &ExprRef, value: &Literal) -> ExprRef {
        match value {
            Literal::Integer(i) if *i == self.from => integer(self.to),
            _ => Arc::clone(node),
        }
    }
}

/// Text no generated constant can hold.
pub const MARKER: &str = "marked!";

/// Rewriter that replaces every constant with a fresh `MARKER` text node, so
/// every constant leaf of the result is a new node that differs from the input.
pub struct MarkConstants;

impl ExprRewriter for MarkConstants {
    fn rewrite_constant(&mut self, _node: &ExprRef, _value: &Literal) -> ExprRef {
        text(MARKER)
    }
}

/// The shape `MarkConstants` should turn `shape` into.
pub fn mark_constants(shape: &GenExpr) -> GenExpr {
    fn mark(e: &GenExpr) -> Box<GenExpr> {
        Box::new(mark_constants(e))
    }
    match shape {
        GenExpr::Constant(_) => GenExpr::Constant(GenLiteral::Text(MARKER.to_string())),
        GenExpr::Entity(_) | GenExpr::Now | GenExpr::DefaultValue | GenExpr::AnyValue => {
            shape.clone()
        }
        GenExpr::Column(source, name) => GenExpr::Column(mark(source), name.clone()),
        GenExpr::Measure(source, name) => GenExpr::Measure(mark(source), name.clone()),
        GenExpr::Aggregation(arg, function) => GenExpr::Aggregation(mark(arg), *function),
        GenExpr::Hierarchy(arg, name) => GenExpr::Hierarchy(mark(arg), name.clone()),
        GenExpr::HierarchyLevel(arg, name) => GenExpr::HierarchyLevel(mark(arg), name.clone()),
        GenExpr::And(l, r) => GenExpr::And(mark(l), mark(r)),
        GenExpr::Or(l, r) => GenExpr::Or(mark(l), mark(r)),
        GenExpr::Compare(op, l, r) => GenExpr::Compare(*op, mark(l), mark(r)),
        GenExpr::Contains(l, r) => GenExpr::Contains(mark(l), mark(r)),
        GenExpr::StartsWith(l, r) => GenExpr::StartsWith(mark(l), mark(r)),
        GenExpr::Between(a, lo, hi) => GenExpr::Between(mark(a), mark(lo), mark(hi)),
        GenExpr::Exists(arg) => GenExpr::Exists(mark(arg)),
        GenExpr::Not(arg) => GenExpr::Not(mark(arg)),
        GenExpr::In { args, rows } => GenExpr::In {
            args: args.iter().map(mark_constants).collect(),
            rows: rows.iter().map(|row| row.iter().map(mark_constants).collect()).collect(),
        },
        GenExpr::DateSpan(unit, arg) => GenExpr::DateSpan(*unit, mark(arg)),
        GenExpr::DateAdd(unit, amount, arg) => GenExpr::DateAdd(*unit, *amount, mark(arg)),
    }
}

/// Builds the IR tree described by a generated shape.
pub fn build(shape: &GenExpr) -> ExprRef {
    match shape {
        GenExpr::Entity(name) => entity(name),
        GenExpr::Column(source, name) => column_ref(build(source), name),
        GenExpr::Measure(source, name) => measure_ref(build(source), name),
        GenExpr::Aggregation(arg, function) => {
            aggregate(build(arg), aggregate_function(*function))
        }
        GenExpr::Hierarchy(arg, name) => hierarchy(build(arg), name),
        GenExpr::HierarchyLevel(arg, name) => hierarchy_level(build(arg), name),
        GenExpr::And(l, r) => and(build(l), build(r)),
        GenExpr::Or(l, r) => or(build(l), build(r)),
        GenExpr::Compare(op, l, r) => compare(comparison(*op), build(l), build(r)),
        GenExpr::Contains(l, r) => contains(build(l), build(r)),
        GenExpr::StartsWith(l, r) => starts_with(build(l), build(r)),
        GenExpr::Between(a, lo, hi) => between(build(a), build(lo), build(hi)),
        GenExpr::Exists(arg) => exists(build(arg)),
        GenExpr::Not(arg) => not(build(arg)),
        GenExpr::In { args, rows } => in_values(
            args.iter().map(build).collect(),
            rows.iter().map(|row| row.iter().map(build).collect()).collect(),
        )
        .expect("generated In shapes are rectangular"),
        GenExpr::Constant(value) => constant(literal(value)),
        GenExpr::DateSpan(unit, arg) => date_span(time_unit(*unit), build(arg)),
        GenExpr::DateAdd(unit, amount, arg) => date_add(time_unit(*unit), *amount, build(arg)),
        GenExpr::Now => now(),
        GenExpr::DefaultValue => default_value(),
        GenExpr::AnyValue => any_value(),
    }
}

fn aggregate_function(function: GenAggregate) -> AggregateFunction {
    match function {
        GenAggregate::Sum => AggregateFunction::Sum,
        GenAggregate::Avg => AggregateFunction::Avg,
        GenAggregate::Count => AggregateFunction::Count,
        GenAggregate::Min => AggregateFunction::Min,
        GenAggregate::Max => AggregateFunction::Max,
    }
}

fn comparison(op: GenComparison) -> ComparisonKind {
    match op {
        GenComparison::Equal => ComparisonKind::Equal,
        GenComparison::GreaterThan => ComparisonKind::GreaterThan,
        GenComparison::GreaterThanOrEqual => ComparisonKind::GreaterThanOrEqual,
        GenComparison::LessThan => ComparisonKind::LessThan,
        GenComparison::LessThanOrEqual => ComparisonKind::LessThanOrEqual,
    }
}

fn time_unit(unit: GenUnit) -> TimeUnit {
    match unit {
        GenUnit::Day => TimeUnit::Day,
        GenUnit::Month => TimeUnit::Month,
        GenUnit::Year => TimeUnit::Year,
    }
}

fn literal(value: &GenLiteral) -> Literal {
    match value {
        GenLiteral::Null => Literal::Null,
        GenLiteral::Boolean(b) => Literal::Boolean(*b),
        GenLiteral::Integer(i) => Literal::Integer(*i),
        GenLiteral::Double(d) => Literal::Double(*d),
        GenLiteral::Text(s) => Literal::Text(Arc::from(s.as_str())),
    }
}

/// Unpacks the two operands of a binary node.
pub fn operands(node: &ExprRef) -> (&ExprRef, &ExprRef) {
    match &**node {
        Expression::And { left, right }
        | Expression::Or { left, right }
        | Expression::Compare { left, right, .. }
        | Expression::Contains { left, right }
        | Expression::StartsWith { left, right } => (left, right),
        other => panic!("expected a binary node, got {}", other.kind_name()),
    }
}
