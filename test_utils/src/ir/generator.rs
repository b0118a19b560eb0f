//! Module for generating random semantic query expression shapes for property-based testing.
//!
//! `GenExpr` mirrors the expression variants without depending on the IR crate, so tests build
//! the real tree from it. Its `Display` output uses the same call notation as the IR's compact
//! pretty printer, e.g. `And(Compare(=, Column(Entity(sales), amount), 3), Now())`.
//!
//! Generation functions use a depth parameter to limit recursion and prevent excessive tree depth,
//! which keeps the recursive rewriters well inside the stack in property-based tests.

use quickcheck::{Arbitrary, Gen};
use std::fmt;

/// Aggregate functions exercised by the generator.
#[derive(Clone, Copy, Debug)]
pub enum GenAggregate {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// Comparison kinds.
#[derive(Clone, Copy, Debug)]
pub enum GenComparison {
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Time units for date arithmetic.
#[derive(Clone, Copy, Debug)]
pub enum GenUnit {
    Day,
    Month,
    Year,
}

/// Constant values.
#[derive(Clone, Debug)]
pub enum GenLiteral {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Always an exact multiple of 0.25, so its text form is stable.
    Double(f64),
    Text(String),
}

/// A randomly generated expression shape.
#[derive(Clone, Debug)]
pub enum GenExpr {
    Entity(String),
    Column(Box<GenExpr>, String),
    Measure(Box<GenExpr>, String),
    Aggregation(Box<GenExpr>, GenAggregate),
    Hierarchy(Box<GenExpr>, String),
    HierarchyLevel(Box<GenExpr>, String),
    And(Box<GenExpr>, Box<GenExpr>),
    Or(Box<GenExpr>, Box<GenExpr>),
    Compare(GenComparison, Box<GenExpr>, Box<GenExpr>),
    Contains(Box<GenExpr>, Box<GenExpr>),
    StartsWith(Box<GenExpr>, Box<GenExpr>),
    Between(Box<GenExpr>, Box<GenExpr>, Box<GenExpr>),
    Exists(Box<GenExpr>),
    Not(Box<GenExpr>),
    /// Every row has exactly `args.len()` elements and `args` is never empty.
    In { args: Vec<GenExpr>, rows: Vec<Vec<GenExpr>> },
    Constant(GenLiteral),
    DateSpan(GenUnit, Box<GenExpr>),
    DateAdd(GenUnit, i64, Box<GenExpr>),
    Now,
    DefaultValue,
    AnyValue,
}

/// Maximum recursion depth for generation to prevent excessive tree depth.
const MAX_DEPTH: usize = 6;

impl GenExpr {
    /// Number of nodes in the generated shape.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|child| child.node_count()).sum::<usize>()
    }

    /// Number of constant leaves.
    pub fn constant_count(&self) -> usize {
        match self {
            GenExpr::Constant(_) => 1,
            other => other.children().iter().map(|child| child.constant_count()).sum(),
        }
    }

    fn children(&self) -> Vec<&GenExpr> {
        match self {
            GenExpr::Entity(_)
            | GenExpr::Constant(_)
            | GenExpr::Now
            | GenExpr::DefaultValue
            | GenExpr::AnyValue => vec![],
            GenExpr::Column(e, _)
            | GenExpr::Measure(e, _)
            | GenExpr::Aggregation(e, _)
            | GenExpr::Hierarchy(e, _)
            | GenExpr::HierarchyLevel(e, _)
            | GenExpr::Exists(e)
            | GenExpr::Not(e)
            | GenExpr::DateSpan(_, e)
            | GenExpr::DateAdd(_, _, e) => vec![&**e],
            GenExpr::And(l, r)
            | GenExpr::Or(l, r)
            | GenExpr::Compare(_, l, r)
            | GenExpr::Contains(l, r)
            | GenExpr::StartsWith(l, r) => vec![&**l, &**r],
            GenExpr::Between(a, lo, hi) => vec![&**a, &**lo, &**hi],
            GenExpr::In { args, rows } => args.iter().chain(rows.iter().flatten()).collect(),
        }
    }
}

impl GenAggregate {
    pub fn name(self) -> &'static str {
        match self {
            GenAggregate::Sum => "Sum",
            GenAggregate::Avg => "Avg",
            GenAggregate::Count => "Count",
            GenAggregate::Min => "Min",
            GenAggregate::Max => "Max",
        }
    }
}

impl GenComparison {
    pub fn symbol(self) -> &'static str {
        match self {
            GenComparison::Equal => "=",
            GenComparison::GreaterThan => ">",
            GenComparison::GreaterThanOrEqual => ">=",
            GenComparison::LessThan => "<",
            GenComparison::LessThanOrEqual => "<=",
        }
    }
}

impl GenUnit {
    pub fn name(self) -> &'static str {
        match self {
            GenUnit::Day => "Day",
            GenUnit::Month => "Month",
            GenUnit::Year => "Year",
        }
    }
}

impl fmt::Display for GenLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenLiteral::Null => write!(f, "null"),
            GenLiteral::Boolean(b) => write!(f, "{}", b),
            GenLiteral::Integer(i) => write!(f, "{}", i),
            GenLiteral::Double(d) => write!(f, "{:?}", d),
            GenLiteral::Text(s) => write!(f, "'{}'", s),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[GenExpr]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl fmt::Display for GenExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenExpr::Entity(name) => write!(f, "Entity({})", name),
            GenExpr::Column(source, name) => write!(f, "Column({}, {})", source, name),
            GenExpr::Measure(source, name) => write!(f, "Measure({}, {})", source, name),
            GenExpr::Aggregation(arg, function) => write!(f, "{}({})", function.name(), arg),
            GenExpr::Hierarchy(arg, name) => write!(f, "Hierarchy({}, {})", arg, name),
            GenExpr::HierarchyLevel(arg, name) => write!(f, "Level({}, {})", arg, name),
            GenExpr::And(l, r) => write!(f, "And({}, {})", l, r),
            GenExpr::Or(l, r) => write!(f, "Or({}, {})", l, r),
            GenExpr::Compare(op, l, r) => write!(f, "Compare({}, {}, {})", op.symbol(), l, r),
            GenExpr::Contains(l, r) => write!(f, "Contains({}, {})", l, r),
            GenExpr::StartsWith(l, r) => write!(f, "StartsWith({}, {})", l, r),
            GenExpr::Between(a, lo, hi) => write!(f, "Between({}, {}, {})", a, lo, hi),
            GenExpr::Exists(arg) => write!(f, "Exists({})", arg),
            GenExpr::Not(arg) => write!(f, "Not({})", arg),
            GenExpr::In { args, rows } => {
                write!(f, "In(")?;
                write_list(f, args)?;
                write!(f, ", [")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_list(f, row)?;
                }
                write!(f, "])")
            }
            GenExpr::Constant(value) => write!(f, "{}", value),
            GenExpr::DateSpan(unit, arg) => write!(f, "DateSpan({}, {})", unit.name(), arg),
            GenExpr::DateAdd(unit, amount, arg) => {
                write!(f, "DateAdd({}, {}, {})", unit.name(), amount, arg)
            }
            GenExpr::Now => write!(f, "Now()"),
            GenExpr::DefaultValue => write!(f, "DefaultValue()"),
            GenExpr::AnyValue => write!(f, "AnyValue()"),
        }
    }
}

/// Generates a random number in the range [min, max] inclusive.
fn gen_range(g: &mut Gen, min: u32, max: u32) -> u32 {
    min + (u32::arbitrary(g) % (max - min + 1))
}

/// Generates a short lowercase identifier.
fn gen_name(g: &mut Gen) -> String {
    let letters: Vec<char> = "abcdefghijklmnopqrstuvwxyz".chars().collect();
    let len = gen_range(g, 1, 8);
    (0..len).map(|_| *g.choose(&letters).unwrap()).collect()
}

fn gen_literal(g: &mut Gen) -> GenLiteral {
    const CHOICES: &[&str] = &["null", "bool", "int", "double", "text"];
    match *g.choose(CHOICES).unwrap() {
        "null" => GenLiteral::Null,
        "bool" => GenLiteral::Boolean(bool::arbitrary(g)),
        "int" => GenLiteral::Integer(i64::arbitrary(g) % 1000),
        "double" => GenLiteral::Double(f64::from(gen_range(g, 0, 400)) / 4.0),
        "text" => GenLiteral::Text(gen_name(g)),
        _ => unreachable!(),
    }
}

fn gen_aggregate(g: &mut Gen) -> GenAggregate {
    const CHOICES: &[GenAggregate] = &[
        GenAggregate::Sum,
        GenAggregate::Avg,
        GenAggregate::Count,
        GenAggregate::Min,
        GenAggregate::Max,
    ];
    *g.choose(CHOICES).unwrap()
}

fn gen_comparison(g: &mut Gen) -> GenComparison {
    *g.choose(&[
        GenComparison::Equal,
        GenComparison::GreaterThan,
        GenComparison::GreaterThanOrEqual,
        GenComparison::LessThan,
        GenComparison::LessThanOrEqual,
    ])
    .unwrap()
}

fn gen_unit(g: &mut Gen) -> GenUnit {
    *g.choose(&[GenUnit::Day, GenUnit::Month, GenUnit::Year]).unwrap()
}

/// Generates a leaf expression.
fn gen_leaf(g: &mut Gen) -> GenExpr {
    const CHOICES: &[&str] = &["entity", "constant", "constant", "now", "default", "any"];
    match *g.choose(CHOICES).unwrap() {
        "entity" => GenExpr::Entity(gen_name(g)),
        "constant" => GenExpr::Constant(gen_literal(g)),
        "now" => GenExpr::Now,
        "default" => GenExpr::DefaultValue,
        "any" => GenExpr::AnyValue,
        _ => unreachable!(),
    }
}

/// Generates a field reference rooted at an entity.
fn gen_field(g: &mut Gen) -> GenExpr {
    let source = Box::new(GenExpr::Entity(gen_name(g)));
    const CHOICES: &[&str] = &["column", "measure", "level"];
    match *g.choose(CHOICES).unwrap() {
        "column" => GenExpr::Column(source, gen_name(g)),
        "measure" => GenExpr::Measure(source, gen_name(g)),
        "level" => {
            let hierarchy = GenExpr::Hierarchy(source, gen_name(g));
            GenExpr::HierarchyLevel(Box::new(hierarchy), gen_name(g))
        }
        _ => unreachable!(),
    }
}

/// Elements of an `In` are kept shallow, since a single list may hold a dozen of them.
fn gen_in(g: &mut Gen, depth: usize) -> GenExpr {
    let depth = depth.min(1);
    let arity = gen_range(g, 1, 3) as usize;
    let args = (0..arity).map(|_| gen_expr(g, depth)).collect();
    let rows = (0..gen_range(g, 0, 4))
        .map(|_| (0..arity).map(|_| gen_expr(g, depth)).collect())
        .collect();
    GenExpr::In { args, rows }
}

/// Generates an expression of at most `depth` levels below the current node.
pub fn gen_expr(g: &mut Gen, depth: usize) -> GenExpr {
    if depth == 0 {
        return gen_leaf(g);
    }
    let d = depth - 1;
    let b = |g: &mut Gen| Box::new(gen_expr(g, d));
    const CHOICES: &[&str] = &[
        "leaf", "field", "aggregate", "and", "or", "compare", "contains", "starts_with",
        "between", "exists", "not", "in", "date_span", "date_add",
    ];
    match *g.choose(CHOICES).unwrap() {
        "leaf" => gen_leaf(g),
        "field" => gen_field(g),
        "aggregate" => GenExpr::Aggregation(b(g), gen_aggregate(g)),
        "and" => GenExpr::And(b(g), b(g)),
        "or" => GenExpr::Or(b(g), b(g)),
        "compare" => {
            let op = gen_comparison(g);
            GenExpr::Compare(op, b(g), b(g))
        }
        "contains" => GenExpr::Contains(b(g), b(g)),
        "starts_with" => GenExpr::StartsWith(b(g), b(g)),
        "between" => GenExpr::Between(b(g), b(g), b(g)),
        "exists" => GenExpr::Exists(b(g)),
        "not" => GenExpr::Not(b(g)),
        "in" => gen_in(g, d),
        "date_span" => {
            let unit = gen_unit(g);
            GenExpr::DateSpan(unit, b(g))
        }
        "date_add" => {
            let unit = gen_unit(g);
            let amount = i64::from(gen_range(g, 0, 24)) - 12;
            GenExpr::DateAdd(unit, amount, b(g))
        }
        _ => unreachable!(),
    }
}

impl Arbitrary for GenExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_expr(g, g.size().min(MAX_DEPTH))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let children: Vec<GenExpr> = self.children().into_iter().cloned().collect();
        Box::new(children.into_iter())
    }
}
