// Semantic query expression node module
//
// - node_types: the Expression enum, scalar kinds and shared type aliases
// - node_impl: read-only structural queries (children, depth, identity)
// - builder: constructors for every variant

pub mod builder;
pub mod node_impl;
pub mod node_types;

pub use node_impl::{depth, node_count, same_node};
pub use node_types::*;
