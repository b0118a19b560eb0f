//! Rewrite configuration and the depth-checked entry point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExprError, ExprResult};
use crate::ir::expr::{depth, ExprRef};
use crate::ir::visitor::ExprRewriter;

/// Default ceiling on tree depth accepted by [`rewrite_checked`].
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Settings for [`rewrite_checked`].
///
/// Missing fields fall back to their defaults, so hosts can embed a partial
/// object in their own settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    /// Deepest tree that will be handed to the recursive rewriter.
    pub max_depth: usize,
    /// Emit a debug event describing each finished rewrite.
    pub log_changes: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_changes: false,
        }
    }
}

impl RewriteOptions {
    pub fn from_json(json: &str) -> ExprResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Rewrites `root` after checking that its depth is within `options.max_depth`.
///
/// The depth is measured iteratively, so an oversized tree is refused before
/// any recursion happens.
///
/// # Errors
/// [`ExprError::DepthLimitExceeded`] when the tree is deeper than allowed.
pub fn rewrite_checked<R: ExprRewriter + ?Sized>(
    rewriter: &mut R,
    root: &ExprRef,
    options: &RewriteOptions,
) -> ExprResult<ExprRef> {
    let tree_depth = depth(root);
    if tree_depth > options.max_depth {
        warn!(depth = tree_depth, limit = options.max_depth, "refusing to rewrite expression");
        return Err(ExprError::DepthLimitExceeded { depth: tree_depth, limit: options.max_depth });
    }

    let result = rewriter.rewrite(root);
    if options.log_changes {
        debug!(
            root = root.kind_name(),
            depth = tree_depth,
            changed = !Arc::ptr_eq(root, &result),
            "rewrite finished"
        );
    }
    Ok(result)
}
