//! Parallel rewriting of independent expression trees.

use rayon::prelude::*;
use tracing::debug;

use crate::ir::expr::ExprRef;
use crate::ir::visitor::ExprRewriter;

/// Rewrites every root in `roots` on the rayon pool.
///
/// `make_rewriter` is called once per worker split, so stateful rewriters do
/// not need to be `Sync`. Results come back in input order, and roots the
/// rewriter leaves alone are returned as the same `Arc`.
pub fn rewrite_parallel<R, F>(roots: &[ExprRef], make_rewriter: F) -> Vec<ExprRef>
where
    R: ExprRewriter,
    F: Fn() -> R + Sync + Send,
{
    debug!("Rewriting {} roots in parallel", roots.len());
    roots
        .par_iter()
        .map_init(&make_rewriter, |rewriter, root| rewriter.rewrite(root))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ir::expr::builder::*;
    use crate::ir::transforms::entity_substitution::EntitySubstitution;

    #[test]
    fn test_preserves_order_and_identity() {
        let roots: Vec<ExprRef> = (0..64)
            .map(|i| {
                if i % 2 == 0 {
                    column_ref(entity("Sales"), &format!("C{}", i))
                } else {
                    column_ref(entity("Budget"), &format!("C{}", i))
                }
            })
            .collect();

        let results =
            rewrite_parallel(&roots, || EntitySubstitution::new().rename("Sales", "Orders"));

        assert_eq!(results.len(), roots.len());
        for (i, (before, after)) in roots.iter().zip(&results).enumerate() {
            if i % 2 == 0 {
                assert_eq!(**after, *column_ref(entity("Orders"), &format!("C{}", i)));
            } else {
                assert!(Arc::ptr_eq(before, after));
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(rewrite_parallel(&[], EntitySubstitution::new).is_empty());
    }
}
