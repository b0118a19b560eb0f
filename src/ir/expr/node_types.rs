use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ExprRef = Arc<Expression>;
/// An ordered, shareable sequence of expressions (`In` arguments and value tuples).
pub type ExprList = Arc<[ExprRef]>;
/// The value rows of an `In` expression; each row is matched against the arguments.
pub type ExprTupleList = Arc<[ExprList]>;
pub type Ident = Arc<str>;

/// Aggregation applied by an [`Expression::Aggregation`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AggregateFunction {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    CountNonNull,
    Median,
    StandardDeviation,
    Variance,
}

impl AggregateFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Sum => "Sum",
            AggregateFunction::Avg => "Avg",
            AggregateFunction::Count => "Count",
            AggregateFunction::Min => "Min",
            AggregateFunction::Max => "Max",
            AggregateFunction::CountNonNull => "CountNonNull",
            AggregateFunction::Median => "Median",
            AggregateFunction::StandardDeviation => "StandardDeviation",
            AggregateFunction::Variance => "Variance",
        }
    }
}

/// Comparison performed by an [`Expression::Compare`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonKind {
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonKind {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonKind::Equal => "=",
            ComparisonKind::GreaterThan => ">",
            ComparisonKind::GreaterThanOrEqual => ">=",
            ComparisonKind::LessThan => "<",
            ComparisonKind::LessThanOrEqual => "<=",
        }
    }
}

/// Calendar unit used by date arithmetic nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
    Decade,
    Second,
    Minute,
    Hour,
    Quarter,
}

impl TimeUnit {
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
            TimeUnit::Decade => "Decade",
            TimeUnit::Second => "Second",
            TimeUnit::Minute => "Minute",
            TimeUnit::Hour => "Hour",
            TimeUnit::Quarter => "Quarter",
        }
    }
}

/// Literal value carried by an [`Expression::Constant`] node.
///
/// Decimals keep their canonical text so that no precision is lost between
/// the data source and the consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Decimal(Arc<str>),
    Text(Arc<str>),
    DateTime(DateTime<Utc>),
}

/// A node of the semantic query expression tree.
///
/// Nodes are immutable once built and always held behind [`ExprRef`], so a
/// subtree can be shared between several trees. Rewrites detect "nothing
/// changed" by pointer identity of these `Arc`s, never by comparing contents.
///
/// # Examples
/// - `ColumnRef { source: Entity(Sales), column: "Amount" }`: the `Amount` column of `Sales`.
/// - `Compare { Equal, left, right }`: `left = right`.
/// - `In { args: [a, b], values: [[1, 2], [3, 4]] }`: `(a, b)` is one of the listed rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expression {
    /// A column of the table produced by `source`.
    ColumnRef {
        source: ExprRef,
        column: Ident,
    },
    /// A model measure defined on `source`.
    MeasureRef {
        source: ExprRef,
        measure: Ident,
    },
    Aggregation {
        arg: ExprRef,
        function: AggregateFunction,
    },
    Hierarchy {
        arg: ExprRef,
        hierarchy: Ident,
    },
    HierarchyLevel {
        arg: ExprRef,
        level: Ident,
    },
    /// A table of the model, optionally qualified by schema and bound to a query variable.
    Entity {
        schema: Option<Ident>,
        entity: Ident,
        variable: Option<Ident>,
    },
    And {
        left: ExprRef,
        right: ExprRef,
    },
    Or {
        left: ExprRef,
        right: ExprRef,
    },
    Compare {
        comparison: ComparisonKind,
        left: ExprRef,
        right: ExprRef,
    },
    Contains {
        left: ExprRef,
        right: ExprRef,
    },
    StartsWith {
        left: ExprRef,
        right: ExprRef,
    },
    /// Inclusive range test `lower <= arg <= upper`.
    Between {
        arg: ExprRef,
        lower: ExprRef,
        upper: ExprRef,
    },
    Exists {
        arg: ExprRef,
    },
    Not {
        arg: ExprRef,
    },
    /// Set membership of the `args` tuple in `values`; every row has `args.len()` elements.
    In {
        args: ExprList,
        values: ExprTupleList,
    },
    Constant {
        value: Literal,
    },
    DateSpan {
        unit: TimeUnit,
        arg: ExprRef,
    },
    DateAdd {
        unit: TimeUnit,
        amount: i64,
        arg: ExprRef,
    },
    Now,
    DefaultValue,
    AnyValue,
}
