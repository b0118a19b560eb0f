//! Renames entities throughout an expression tree.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ir::expr::{ExprRef, Expression, Ident};
use crate::ir::visitor::ExprRewriter;

/// Rewriter that maps entity names to new names, keeping schema and variable.
///
/// Since every parent of a renamed `Entity` sees a new child, the whole path
/// from each renamed entity up to the root is rebuilt; all other subtrees are
/// shared with the input.
#[derive(Debug, Default)]
pub struct EntitySubstitution {
    renames: FxHashMap<Ident, Ident>,
}

impl EntitySubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.renames.insert(Arc::from(from), Arc::from(to));
        self
    }
}

impl ExprRewriter for EntitySubstitution {
    fn rewrite_entity(
        &mut self,
        node: &ExprRef,
        schema: &Option<Ident>,
        entity: &Ident,
        variable: &Option<Ident>,
    ) -> ExprRef {
        match self.renames.get(entity) {
            Some(to) if to != entity => {
                debug!("Renaming entity {} to {}", entity, to);
                Arc::new(Expression::Entity {
                    schema: schema.clone(),
                    entity: Arc::clone(to),
                    variable: variable.clone(),
                })
            }
            _ => Arc::clone(node),
        }
    }
}
