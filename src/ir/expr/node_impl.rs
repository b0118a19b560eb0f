use std::sync::Arc;

use super::node_types::{ExprRef, Expression, Ident, Literal};

impl Expression {
    /// Name of the variant, as used in diagnostics and the pretty printer.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::ColumnRef { .. } => "ColumnRef",
            Expression::MeasureRef { .. } => "MeasureRef",
            Expression::Aggregation { .. } => "Aggregation",
            Expression::Hierarchy { .. } => "Hierarchy",
            Expression::HierarchyLevel { .. } => "HierarchyLevel",
            Expression::Entity { .. } => "Entity",
            Expression::And { .. } => "And",
            Expression::Or { .. } => "Or",
            Expression::Compare { .. } => "Compare",
            Expression::Contains { .. } => "Contains",
            Expression::StartsWith { .. } => "StartsWith",
            Expression::Between { .. } => "Between",
            Expression::Exists { .. } => "Exists",
            Expression::Not { .. } => "Not",
            Expression::In { .. } => "In",
            Expression::Constant { .. } => "Constant",
            Expression::DateSpan { .. } => "DateSpan",
            Expression::DateAdd { .. } => "DateAdd",
            Expression::Now => "Now",
            Expression::DefaultValue => "DefaultValue",
            Expression::AnyValue => "AnyValue",
        }
    }

    /// Returns true for variants without child expressions.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Expression::Entity { .. }
                | Expression::Constant { .. }
                | Expression::Now
                | Expression::DefaultValue
                | Expression::AnyValue
        )
    }

    /// Direct children in traversal order.
    ///
    /// For `In`, the arguments come first, followed by every value row flattened in order.
    pub fn children(&self) -> Vec<&ExprRef> {
        match self {
            Expression::ColumnRef { source, .. } | Expression::MeasureRef { source, .. } => {
                vec![source]
            }
            Expression::Aggregation { arg, .. }
            | Expression::Hierarchy { arg, .. }
            | Expression::HierarchyLevel { arg, .. }
            | Expression::Exists { arg }
            | Expression::Not { arg }
            | Expression::DateSpan { arg, .. }
            | Expression::DateAdd { arg, .. } => vec![arg],
            Expression::And { left, right }
            | Expression::Or { left, right }
            | Expression::Compare { left, right, .. }
            | Expression::Contains { left, right }
            | Expression::StartsWith { left, right } => vec![left, right],
            Expression::Between { arg, lower, upper } => vec![arg, lower, upper],
            Expression::In { args, values } => args
                .iter()
                .chain(values.iter().flat_map(|tuple| tuple.iter()))
                .collect(),
            Expression::Entity { .. }
            | Expression::Constant { .. }
            | Expression::Now
            | Expression::DefaultValue
            | Expression::AnyValue => Vec::new(),
        }
    }

    /// The boolean payload of a `Constant` node, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expression::Constant { value: Literal::Boolean(b) } => Some(*b),
            _ => None,
        }
    }

    /// The entity name of an `Entity` node, if it is one.
    pub fn entity_name(&self) -> Option<&Ident> {
        match self {
            Expression::Entity { entity, .. } => Some(entity),
            _ => None,
        }
    }
}

/// Identity comparison used for change detection.
#[inline]
pub fn same_node(a: &ExprRef, b: &ExprRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Height of the tree rooted at `root`; a lone leaf has depth 1.
///
/// Uses an explicit stack so arbitrarily deep trees can be measured before
/// handing them to a recursive rewriter.
pub fn depth(root: &ExprRef) -> usize {
    let mut max_depth = 0;
    let mut stack: Vec<(&ExprRef, usize)> = vec![(root, 1)];
    while let Some((node, level)) = stack.pop() {
        max_depth = max_depth.max(level);
        stack.extend(node.children().into_iter().map(|child| (child, level + 1)));
    }
    max_depth
}

/// Number of node occurrences in the tree; a shared subtree is counted once per reference.
pub fn node_count(root: &ExprRef) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::expr::builder::*;

    #[test]
    fn test_children_of_in_are_args_then_rows() {
        let a = column_ref(entity("T"), "A");
        let one = integer(1);
        let two = integer(2);
        let node = in_values(vec![a.clone()], vec![vec![one.clone()], vec![two.clone()]]).unwrap();
        let children = node.children();
        assert_eq!(children.len(), 3);
        assert!(same_node(children[0], &a));
        assert!(same_node(children[1], &one));
        assert!(same_node(children[2], &two));
    }

    #[test]
    fn test_depth_and_node_count() {
        let leaf = now();
        assert_eq!(depth(&leaf), 1);
        assert_eq!(node_count(&leaf), 1);

        let tree = and(
            compare_eq(column_ref(entity("T"), "A"), integer(1)),
            not(boolean(true)),
        );
        assert_eq!(depth(&tree), 4);
        assert_eq!(node_count(&tree), 7);
    }

    #[test]
    fn test_depth_of_deep_chain() {
        let mut tree = boolean(true);
        for _ in 0..2_000 {
            tree = not(tree);
        }
        assert_eq!(depth(&tree), 2_001);
    }

    #[test]
    fn test_leaf_classification() {
        assert!(entity("Sales").is_leaf());
        assert!(integer(42).is_leaf());
        assert!(any_value().is_leaf());
        assert!(!not(boolean(false)).is_leaf());
        assert_eq!(not(boolean(false)).kind_name(), "Not");
    }
}
