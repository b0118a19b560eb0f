use chrono::SecondsFormat;

use crate::ir::expr::{
    AggregateFunction, ComparisonKind, ExprList, ExprRef, ExprTupleList, Ident, Literal, TimeUnit,
};
use crate::ir::visitor::{Accept, ExprVisitor};

/// One argument of a printed call or list.
enum Part<'a> {
    Expr(&'a ExprRef),
    Text(String),
    List(Vec<Part<'a>>),
}

impl Part<'_> {
    /// Simple parts never force their enclosing group onto several lines.
    fn is_simple(&self) -> bool {
        match self {
            Part::Expr(expr) => expr.is_leaf(),
            Part::Text(_) => true,
            Part::List(items) => items.iter().all(Part::is_simple),
        }
    }
}

fn exprs(list: &ExprList) -> Part<'_> {
    Part::List(list.iter().map(Part::Expr).collect())
}

/// A visitor that renders an expression tree in a compact call notation,
/// e.g. `And(Compare(=, Column(Entity(Sales), Region), 'EU'), Now())`.
///
/// In pretty mode every call or list that has a non-leaf argument is broken
/// over several lines, one argument per line, indented by two spaces.
pub struct PrettyPrinter {
    /// If true, formats output with indentation and newlines.
    pretty_print: bool,

    /// Current nesting level of multi-line groups.
    indent: usize,

    /// The accumulating string result.
    result: String,
}

impl PrettyPrinter {
    pub fn new(pretty_print: bool) -> Self {
        PrettyPrinter {
            pretty_print,
            indent: 0,
            result: String::new(),
        }
    }

    pub fn into_result(self) -> String {
        self.result
    }

    fn newline(&mut self) {
        self.result.push('\n');
        for _ in 0..self.indent {
            self.result.push_str("  ");
        }
    }

    fn call(&mut self, name: &str, parts: Vec<Part<'_>>) {
        self.result.push_str(name);
        self.group("(", &parts, ")");
    }

    fn group(&mut self, open: &str, parts: &[Part<'_>], close: &str) {
        self.result.push_str(open);
        if self.pretty_print && !parts.iter().all(Part::is_simple) {
            self.indent += 1;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    self.result.push(',');
                }
                self.newline();
                self.part(part);
            }
            self.indent -= 1;
            self.newline();
        } else {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    self.result.push_str(", ");
                }
                self.part(part);
            }
        }
        self.result.push_str(close);
    }

    fn part(&mut self, part: &Part<'_>) {
        match part {
            Part::Expr(expr) => expr.accept(self),
            Part::Text(text) => self.result.push_str(text),
            Part::List(items) => self.group("[", items, "]"),
        }
    }
}

/// Renders a literal the way it would appear in a query.
pub fn format_literal(value: &Literal) -> String {
    match value {
        Literal::Null => "null".to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Double(d) => format!("{:?}", d),
        Literal::Decimal(d) => format!("{}M", d),
        Literal::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::DateTime(dt) => {
            format!("datetime'{}'", dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
    }
}

fn text(value: &str) -> Part<'static> {
    Part::Text(value.to_string())
}

impl ExprVisitor for PrettyPrinter {
    type Output = ();

    fn visit_default(&mut self, node: &ExprRef) {
        let name = node.kind_name();
        self.call(name, node.children().into_iter().map(Part::Expr).collect());
    }

    fn visit_column_ref(&mut self, _node: &ExprRef, source: &ExprRef, column: &Ident) {
        self.call("Column", vec![Part::Expr(source), text(column)]);
    }

    fn visit_measure_ref(&mut self, _node: &ExprRef, source: &ExprRef, measure: &Ident) {
        self.call("Measure", vec![Part::Expr(source), text(measure)]);
    }

    fn visit_aggregation(&mut self, _node: &ExprRef, arg: &ExprRef, function: AggregateFunction) {
        self.call(function.name(), vec![Part::Expr(arg)]);
    }

    fn visit_hierarchy(&mut self, _node: &ExprRef, arg: &ExprRef, hierarchy: &Ident) {
        self.call("Hierarchy", vec![Part::Expr(arg), text(hierarchy)]);
    }

    fn visit_hierarchy_level(&mut self, _node: &ExprRef, arg: &ExprRef, level: &Ident) {
        self.call("Level", vec![Part::Expr(arg), text(level)]);
    }

    fn visit_entity(
        &mut self,
        _node: &ExprRef,
        schema: &Option<Ident>,
        entity: &Ident,
        variable: &Option<Ident>,
    ) {
        let mut name = match schema {
            Some(schema) => format!("{}.{}", schema, entity),
            None => entity.to_string(),
        };
        if let Some(variable) = variable {
            name.push_str(" as ");
            name.push_str(variable);
        }
        self.call("Entity", vec![Part::Text(name)]);
    }

    fn visit_compare(
        &mut self,
        _node: &ExprRef,
        comparison: ComparisonKind,
        left: &ExprRef,
        right: &ExprRef,
    ) {
        self.call("Compare", vec![text(comparison.symbol()), Part::Expr(left), Part::Expr(right)]);
    }

    fn visit_in(&mut self, _node: &ExprRef, args: &ExprList, values: &ExprTupleList) {
        let rows = Part::List(values.iter().map(exprs).collect());
        self.call("In", vec![exprs(args), rows]);
    }

    fn visit_constant(&mut self, _node: &ExprRef, value: &Literal) {
        self.result.push_str(&format_literal(value));
    }

    fn visit_date_span(&mut self, _node: &ExprRef, unit: TimeUnit, arg: &ExprRef) {
        self.call("DateSpan", vec![text(unit.name()), Part::Expr(arg)]);
    }

    fn visit_date_add(&mut self, _node: &ExprRef, unit: TimeUnit, amount: i64, arg: &ExprRef) {
        self.call(
            "DateAdd",
            vec![text(unit.name()), Part::Text(amount.to_string()), Part::Expr(arg)],
        );
    }
}
