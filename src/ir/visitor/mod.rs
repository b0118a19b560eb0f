//! Visitor pattern for semantic query expression traversal and transformation
//!
//! Two traits cover the two ways the tree is consumed:
//! - [`ExprVisitor`]: one method per variant with an arbitrary `Output`, used by
//!   read-only passes such as the pretty printer and the field collector.
//! - [`ExprRewriter`]: a bottom-up rewriter whose defaults rebuild a node only
//!   when one of its children changed, preserving structural sharing via `Arc`.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use semantic_query_ir::ir::expr::{builder, ExprRef, Literal};
//! use semantic_query_ir::ir::visitor::ExprRewriter;
//!
//! /// Replaces every integer constant with zero.
//! struct ZeroIntegers;
//!
//! impl ExprRewriter for ZeroIntegers {
//!     fn rewrite_constant(&mut self, node: &ExprRef, value: &Literal) -> ExprRef {
//!         match value {
//!             Literal::Integer(0) => Arc::clone(node),
//!             Literal::Integer(_) => builder::integer(0),
//!             _ => Arc::clone(node),
//!         }
//!     }
//! }
//!
//! let tree = builder::and(builder::integer(0), builder::integer(7));
//! let zeroed = ZeroIntegers.rewrite(&tree);
//! assert!(!Arc::ptr_eq(&tree, &zeroed));
//! ```
//!
//! # Pattern
//!
//! Each default rewrite method:
//! 1. Rewrites every child via `accept`
//! 2. Checks whether any child changed using `Arc::ptr_eq()`
//! 3. Returns the original node if unchanged, a new node if changed
//!
//! Sequences (`In` arguments and value rows) go through [`rewrite_seq`], which
//! defers allocating a new sequence until the first element that changed.

mod rewriter;
mod sequence;
mod visitor_trait;

pub use rewriter::{reuse_or_rebuild, ExprRewriter};
pub use sequence::{rewrite_seq, SharedRef};
pub use visitor_trait::{Accept, ExprVisitor};
