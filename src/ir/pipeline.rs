use std::sync::Arc;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Topo;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use super::expr::ExprRef;
use super::visitor::ExprRewriter;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transform `{0}` is already registered")]
    DuplicateTransform(String),

    #[error("transform `{transform}` depends on unknown transform `{dependency}`")]
    UnknownDependency { transform: String, dependency: String },
}

/// Manages a pipeline of rewriters applied to an expression tree.
/// Transformations are organized in a dependency graph and executed in topological order,
/// ensuring that dependent transformations run after their prerequisites.
///
/// Each rewriter receives the output of the previous one, so a pipeline in
/// which no rewriter changes anything hands back the input `Arc` untouched.
pub struct Pipeline {
    /// The dependency graph of transformations.
    graph: StableGraph<Transform, ()>,
    /// Maps transformation IDs to their indices in the graph.
    node_indices: FxHashMap<String, NodeIndex>,
}

/// A single transformation in the pipeline, including its rewriter and dependencies.
pub struct Transform {
    /// Unique identifier for the transformation.
    pub id: String,
    /// IDs of transformations that must run before this one.
    pub dependencies: Vec<String>,
    /// The rewriter implementing the transformation logic.
    pub rewriter: Box<dyn ExprRewriter + Send>,
}

impl Transform {
    pub fn new(id: impl Into<String>, rewriter: impl ExprRewriter + Send + 'static) -> Self {
        Transform {
            id: id.into(),
            dependencies: Vec::new(),
            rewriter: Box::new(rewriter),
        }
    }

    pub fn after(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("id", &self.id)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates a new, empty transformation pipeline.
    pub fn new() -> Self {
        Pipeline {
            graph: StableGraph::new(),
            node_indices: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Adds a transformation to the pipeline, establishing its dependencies.
    ///
    /// Dependencies must already be registered, which keeps the graph acyclic.
    ///
    /// # Errors
    /// * [`PipelineError::DuplicateTransform`] if the ID is taken.
    /// * [`PipelineError::UnknownDependency`] if a dependency is not registered.
    pub fn add_transform(&mut self, transform: Transform) -> Result<(), PipelineError> {
        if self.node_indices.contains_key(&transform.id) {
            return Err(PipelineError::DuplicateTransform(transform.id));
        }
        let mut dep_nodes = Vec::with_capacity(transform.dependencies.len());
        for dep_id in &transform.dependencies {
            match self.node_indices.get(dep_id) {
                Some(dep_node) => dep_nodes.push(*dep_node),
                None => {
                    return Err(PipelineError::UnknownDependency {
                        transform: transform.id.clone(),
                        dependency: dep_id.clone(),
                    });
                }
            }
        }

        let id = transform.id.clone();
        let node = self.graph.add_node(transform);
        for dep_node in dep_nodes {
            self.graph.add_edge(dep_node, node, ());
        }
        self.node_indices.insert(id, node);
        Ok(())
    }

    /// Removes a transformation from the pipeline by its ID.
    /// Returns `false` if no such transformation was registered.
    pub fn remove_transform(&mut self, id: &str) -> bool {
        match self.node_indices.remove(id) {
            Some(node) => {
                self.graph.remove_node(node);
                true
            }
            None => false,
        }
    }

    /// Applies all transformations to `tree` in topological order.
    ///
    /// The graph is acyclic by construction: edges only ever point from an
    /// already registered transform to the one being added.
    ///
    /// # Returns
    /// The tree after the last transformation, which is `tree` itself when
    /// no transformation changed anything.
    pub fn apply(&mut self, tree: &ExprRef) -> ExprRef {
        let mut topo = Topo::new(&self.graph);
        let mut current = Arc::clone(tree);
        while let Some(node_idx) = topo.next(&self.graph) {
            let transform = &mut self.graph[node_idx];
            let next = transform.rewriter.rewrite(&current);
            debug!(
                transform = %transform.id,
                changed = !Arc::ptr_eq(&current, &next),
                "applied transform"
            );
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ir::expr::builder::*;
    use crate::ir::expr::{ExprRef, Literal};

    struct IdentityRewriter;

    impl ExprRewriter for IdentityRewriter {
        // Default implementations preserve the node
    }

    struct IncrementIntegers;

    impl ExprRewriter for IncrementIntegers {
        fn rewrite_constant(&mut self, node: &ExprRef, value: &Literal) -> ExprRef {
            match value {
                Literal::Integer(i) => integer(i + 1),
                _ => Arc::clone(node),
            }
        }
    }

    #[test]
    fn test_pipeline_apply_identity() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("identity", IdentityRewriter)).unwrap();
        let node = now();
        let result = pipeline.apply(&node);
        assert!(Arc::ptr_eq(&node, &result));
    }

    #[test]
    fn test_pipeline_threads_output_through() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("first", IncrementIntegers)).unwrap();
        pipeline.add_transform(Transform::new("second", IncrementIntegers).after("first")).unwrap();
        let result = pipeline.apply(&integer(1));
        assert_eq!(*result, *integer(3));
    }

    #[test]
    fn test_pipeline_rejects_duplicates_and_unknown_dependencies() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("a", IdentityRewriter)).unwrap();
        assert!(matches!(
            pipeline.add_transform(Transform::new("a", IdentityRewriter)),
            Err(PipelineError::DuplicateTransform(id)) if id == "a"
        ));
        assert!(matches!(
            pipeline.add_transform(Transform::new("b", IdentityRewriter).after("missing")),
            Err(PipelineError::UnknownDependency { dependency, .. }) if dependency == "missing"
        ));
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_pipeline_remove_transform() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("inc", IncrementIntegers)).unwrap();
        pipeline.add_transform(Transform::new("identity", IdentityRewriter)).unwrap();
        assert!(pipeline.remove_transform("inc"));
        assert!(!pipeline.remove_transform("inc"));

        let node = integer(5);
        let result = pipeline.apply(&node);
        assert!(Arc::ptr_eq(&node, &result));
    }

    /// Appends its label to a shared log whenever it runs.
    struct Record(&'static str, Arc<Mutex<Vec<&'static str>>>);

    impl ExprRewriter for Record {
        fn rewrite(&mut self, node: &ExprRef) -> ExprRef {
            if let Ok(mut log) = self.1.lock() {
                log.push(self.0);
            }
            Arc::clone(node)
        }
    }

    #[test]
    fn test_pipeline_runs_every_transform_after_its_dependencies() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let record = |label| Record(label, Arc::clone(&log));
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("root", record("root"))).unwrap();
        pipeline.add_transform(Transform::new("left", record("left")).after("root")).unwrap();
        pipeline.add_transform(Transform::new("right", record("right")).after("root")).unwrap();
        pipeline
            .add_transform(Transform::new("join", record("join")).after("left").after("right"))
            .unwrap();
        pipeline.add_transform(Transform::new("loose", record("loose"))).unwrap();

        let node = now();
        assert!(Arc::ptr_eq(&node, &pipeline.apply(&node)));

        let order = log.lock().unwrap().clone();
        assert_eq!(order.len(), 5);
        let position = |label: &str| order.iter().position(|entry| *entry == label).unwrap();
        assert!(position("root") < position("left"));
        assert!(position("root") < position("right"));
        assert!(position("left") < position("join"));
        assert!(position("right") < position("join"));
    }
}
