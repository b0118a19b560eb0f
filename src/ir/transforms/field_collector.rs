//! Collects the model fields referenced by an expression.
//!
//! Consumers use the collected fields as identity keys, e.g. to tell which
//! bound columns a selection filter touches.

use std::sync::Arc;

use crate::ir::expr::{ExprRef, Expression, Ident};
use crate::ir::visitor::{Accept, ExprVisitor};

/// The kind of model field a [`FieldRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Column,
    Measure,
    Hierarchy,
    HierarchyLevel,
}

/// A referenced field, qualified by the entity it was reached from when that
/// entity is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub entity: Option<Ident>,
    pub kind: FieldKind,
    pub name: Ident,
}

/// Visitor that records every column, measure, hierarchy and hierarchy level
/// reference in traversal order, duplicates included.
#[derive(Debug, Default)]
pub struct FieldCollector {
    fields: Vec<FieldRef>,
}

impl FieldCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the fields referenced by `root`.
    pub fn collect(root: &ExprRef) -> Vec<FieldRef> {
        let mut collector = Self::new();
        root.accept(&mut collector);
        collector.fields
    }

    pub fn fields(&self) -> &[FieldRef] {
        &self.fields
    }

    fn record(&mut self, source: &ExprRef, kind: FieldKind, name: &Ident) {
        self.fields.push(FieldRef {
            entity: owning_entity(source),
            kind,
            name: Arc::clone(name),
        });
        source.accept(self);
    }
}

/// Walks down hierarchy wrappers to the entity a field belongs to.
fn owning_entity(source: &ExprRef) -> Option<Ident> {
    let mut current = source;
    loop {
        match &**current {
            Expression::Entity { entity, .. } => return Some(Arc::clone(entity)),
            Expression::Hierarchy { arg, .. }
            | Expression::HierarchyLevel { arg, .. } => current = arg,
            _ => return None,
        }
    }
}

impl ExprVisitor for FieldCollector {
    type Output = ();

    fn visit_default(&mut self, node: &ExprRef) {
        for child in node.children() {
            child.accept(self);
        }
    }

    fn visit_column_ref(&mut self, _node: &ExprRef, source: &ExprRef, column: &Ident) {
        self.record(source, FieldKind::Column, column);
    }

    fn visit_measure_ref(&mut self, _node: &ExprRef, source: &ExprRef, measure: &Ident) {
        self.record(source, FieldKind::Measure, measure);
    }

    fn visit_hierarchy(&mut self, _node: &ExprRef, arg: &ExprRef, hierarchy: &Ident) {
        self.record(arg, FieldKind::Hierarchy, hierarchy);
    }

    fn visit_hierarchy_level(&mut self, _node: &ExprRef, arg: &ExprRef, level: &Ident) {
        self.record(arg, FieldKind::HierarchyLevel, level);
    }
}
