//! Constructors for every expression variant.
//!
//! Every function returns a freshly allocated [`ExprRef`]. Only `In` has a
//! shape that can be wrong at construction time, so [`in_values`] is the one
//! fallible builder.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::node_types::{
    AggregateFunction, ComparisonKind, ExprList, ExprRef, Expression, Literal, TimeUnit,
};
use crate::error::{ExprError, ExprResult};

pub fn entity(name: &str) -> ExprRef {
    entity_with(None, name, None)
}

/// Entity qualified by an optional schema and bound to an optional query variable.
pub fn entity_with(schema: Option<&str>, name: &str, variable: Option<&str>) -> ExprRef {
    Arc::new(Expression::Entity {
        schema: schema.map(Arc::from),
        entity: Arc::from(name),
        variable: variable.map(Arc::from),
    })
}

pub fn column_ref(source: ExprRef, column: &str) -> ExprRef {
    Arc::new(Expression::ColumnRef { source, column: Arc::from(column) })
}

pub fn measure_ref(source: ExprRef, measure: &str) -> ExprRef {
    Arc::new(Expression::MeasureRef { source, measure: Arc::from(measure) })
}

pub fn aggregate(arg: ExprRef, function: AggregateFunction) -> ExprRef {
    Arc::new(Expression::Aggregation { arg, function })
}

pub fn hierarchy(arg: ExprRef, name: &str) -> ExprRef {
    Arc::new(Expression::Hierarchy { arg, hierarchy: Arc::from(name) })
}

pub fn hierarchy_level(arg: ExprRef, level: &str) -> ExprRef {
    Arc::new(Expression::HierarchyLevel { arg, level: Arc::from(level) })
}

pub fn and(left: ExprRef, right: ExprRef) -> ExprRef {
    Arc::new(Expression::And { left, right })
}

pub fn or(left: ExprRef, right: ExprRef) -> ExprRef {
    Arc::new(Expression::Or { left, right })
}

/// Left-nested conjunction of all operands, or `None` when there are none.
pub fn and_all<I: IntoIterator<Item = ExprRef>>(operands: I) -> Option<ExprRef> {
    operands.into_iter().reduce(and)
}

/// Left-nested disjunction of all operands, or `None` when there are none.
pub fn or_all<I: IntoIterator<Item = ExprRef>>(operands: I) -> Option<ExprRef> {
    operands.into_iter().reduce(or)
}

pub fn compare(comparison: ComparisonKind, left: ExprRef, right: ExprRef) -> ExprRef {
    Arc::new(Expression::Compare { comparison, left, right })
}

pub fn compare_eq(left: ExprRef, right: ExprRef) -> ExprRef {
    compare(ComparisonKind::Equal, left, right)
}

pub fn contains(left: ExprRef, right: ExprRef) -> ExprRef {
    Arc::new(Expression::Contains { left, right })
}

pub fn starts_with(left: ExprRef, right: ExprRef) -> ExprRef {
    Arc::new(Expression::StartsWith { left, right })
}

pub fn between(arg: ExprRef, lower: ExprRef, upper: ExprRef) -> ExprRef {
    Arc::new(Expression::Between { arg, lower, upper })
}

pub fn exists(arg: ExprRef) -> ExprRef {
    Arc::new(Expression::Exists { arg })
}

pub fn not(arg: ExprRef) -> ExprRef {
    Arc::new(Expression::Not { arg })
}

/// Builds `(args...) IN (row, row, ...)`.
///
/// # Errors
/// * [`ExprError::EmptyInArgs`] if `args` is empty.
/// * [`ExprError::RaggedTuple`] if a row does not have exactly `args.len()` elements.
pub fn in_values(args: Vec<ExprRef>, values: Vec<Vec<ExprRef>>) -> ExprResult<ExprRef> {
    if args.is_empty() {
        return Err(ExprError::EmptyInArgs);
    }
    if let Some((index, tuple)) =
        values.iter().enumerate().find(|(_, tuple)| tuple.len() != args.len())
    {
        return Err(ExprError::RaggedTuple { index, expected: args.len(), found: tuple.len() });
    }
    let values: Vec<ExprList> = values.into_iter().map(ExprList::from).collect();
    Ok(Arc::new(Expression::In { args: ExprList::from(args), values: values.into() }))
}

pub fn constant(value: Literal) -> ExprRef {
    Arc::new(Expression::Constant { value })
}

pub fn null() -> ExprRef {
    constant(Literal::Null)
}

pub fn boolean(value: bool) -> ExprRef {
    constant(Literal::Boolean(value))
}

pub fn integer(value: i64) -> ExprRef {
    constant(Literal::Integer(value))
}

pub fn double(value: f64) -> ExprRef {
    constant(Literal::Double(value))
}

pub fn decimal(canonical: &str) -> ExprRef {
    constant(Literal::Decimal(Arc::from(canonical)))
}

pub fn text(value: &str) -> ExprRef {
    constant(Literal::Text(Arc::from(value)))
}

pub fn datetime(value: DateTime<Utc>) -> ExprRef {
    constant(Literal::DateTime(value))
}

pub fn date_span(unit: TimeUnit, arg: ExprRef) -> ExprRef {
    Arc::new(Expression::DateSpan { unit, arg })
}

pub fn date_add(unit: TimeUnit, amount: i64, arg: ExprRef) -> ExprRef {
    Arc::new(Expression::DateAdd { unit, amount, arg })
}

pub fn now() -> ExprRef {
    Arc::new(Expression::Now)
}

pub fn default_value() -> ExprRef {
    Arc::new(Expression::DefaultValue)
}

pub fn any_value() -> ExprRef {
    Arc::new(Expression::AnyValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_values_rejects_empty_args() {
        let result = in_values(vec![], vec![vec![integer(1)]]);
        assert!(matches!(result, Err(ExprError::EmptyInArgs)));
    }

    #[test]
    fn test_in_values_rejects_ragged_rows() {
        let a = column_ref(entity("T"), "A");
        let b = column_ref(entity("T"), "B");
        let result = in_values(
            vec![a, b],
            vec![vec![integer(1), integer(2)], vec![integer(3)]],
        );
        match result {
            Err(ExprError::RaggedTuple { index, expected, found }) => {
                assert_eq!((index, expected, found), (1, 2, 1));
            }
            other => panic!("expected RaggedTuple, got {:?}", other),
        }
    }

    #[test]
    fn test_in_values_allows_no_rows() {
        let node = in_values(vec![column_ref(entity("T"), "A")], vec![]).unwrap();
        match &*node {
            Expression::In { args, values } => {
                assert_eq!(args.len(), 1);
                assert!(values.is_empty());
            }
            other => panic!("expected In, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_and_all_nests_to_the_left() {
        let a = boolean(true);
        let b = boolean(false);
        let c = null();
        let all = and_all(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        match &*all {
            Expression::And { left, right } => {
                assert!(Arc::ptr_eq(right, &c));
                assert!(matches!(&**left, Expression::And { .. }));
            }
            other => panic!("expected And, got {}", other.kind_name()),
        }
        assert!(and_all(Vec::new()).is_none());
        assert!(Arc::ptr_eq(&or_all(vec![a.clone()]).unwrap(), &a));
    }

    #[test]
    fn test_entity_with_qualifiers() {
        let node = entity_with(Some("dbo"), "Sales", Some("s"));
        assert_eq!(
            *node,
            Expression::Entity {
                schema: Some(Arc::from("dbo")),
                entity: Arc::from("Sales"),
                variable: Some(Arc::from("s")),
            }
        );
    }
}
