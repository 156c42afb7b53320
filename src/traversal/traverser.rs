//! 单源遍历引擎
//!
//! [`TraversalDescription`] 描述一次遍历：扩展器、推进顺序、唯一性
//! 约束、深度剪枝与返回过滤；`traverse` 产出惰性、有限、不可重放的
//! [`Traverser`] 路径序列。

use std::rc::Rc;

use crate::core::{GraphError, NodeId, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::path::Path;
use crate::graph::store::GraphStore;
use crate::traversal::branch::TraversalBranch;
use crate::traversal::selector::{
    BranchSelector, BreadthFirstSelector, DepthFirstSelector, ExpansionPolicy, ThrottledSelector,
};

/// 路径内唯一性约束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    /// 同一路径内关系不重复（节点可经由不同关系重访）
    RelationshipPath,
    /// 同一路径内节点不重复（更严格，保证简单路径）
    NodePath,
}

/// 分支推进顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOrdering {
    DepthFirst,
    BreadthFirst,
    /// 带超级节点挂起的深度优先
    Throttled { start_threshold: usize },
}

type ReturnFilter = Rc<dyn Fn(&TraversalBranch) -> bool>;

/// 一次遍历的完整描述
#[derive(Clone)]
pub struct TraversalDescription {
    expander: RelationshipExpander,
    ordering: BranchOrdering,
    uniqueness: Uniqueness,
    max_depth: Option<usize>,
    filter: ReturnFilter,
}

impl TraversalDescription {
    /// 默认：深度优先、关系唯一、无深度上限、返回所有位置
    pub fn new(expander: RelationshipExpander) -> Self {
        Self {
            expander,
            ordering: BranchOrdering::DepthFirst,
            uniqueness: Uniqueness::RelationshipPath,
            max_depth: None,
            filter: Rc::new(|_| true),
        }
    }

    pub fn depth_first(mut self) -> Self {
        self.ordering = BranchOrdering::DepthFirst;
        self
    }

    pub fn breadth_first(mut self) -> Self {
        self.ordering = BranchOrdering::BreadthFirst;
        self
    }

    /// 超级节点挂起的深度优先推进
    pub fn throttled(mut self, start_threshold: usize) -> Self {
        self.ordering = BranchOrdering::Throttled { start_threshold };
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// 深度剪枝：不再扩展达到该深度的位置
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// 返回过滤：只有谓词通过的位置才会被呈现给调用方
    pub fn return_where(mut self, filter: impl Fn(&TraversalBranch) -> bool + 'static) -> Self {
        self.filter = Rc::new(filter);
        self
    }

    /// 从起点发起遍历
    pub fn traverse<'g, G: GraphStore>(self, graph: &'g G, start: NodeId) -> Traverser<'g, G> {
        if !graph.node_exists(start) {
            return Traverser {
                graph,
                selector: None,
                filter: self.filter,
                pending_root: None,
                error: Some(GraphError::NodeNotFound(start).into()),
                done: false,
            };
        }

        let root = TraversalBranch::root(start);
        let policy = ExpansionPolicy {
            expander: self.expander,
            uniqueness: self.uniqueness,
            max_depth: self.max_depth,
        };
        let selector: Box<dyn BranchSelector<G>> = match self.ordering {
            BranchOrdering::DepthFirst => {
                Box::new(DepthFirstSelector::new(Rc::clone(&root), policy))
            }
            BranchOrdering::BreadthFirst => {
                Box::new(BreadthFirstSelector::new(Rc::clone(&root), policy))
            }
            BranchOrdering::Throttled { start_threshold } => Box::new(ThrottledSelector::new(
                Rc::clone(&root),
                policy,
                start_threshold,
            )),
        };

        Traverser {
            graph,
            selector: Some(selector),
            filter: self.filter,
            pending_root: Some(root),
            error: None,
            done: false,
        }
    }
}

/// 惰性遍历结果序列
///
/// 有限、不可重放；图访问失败时产出一个 `Err` 随即耗尽。
pub struct Traverser<'g, G: GraphStore> {
    graph: &'g G,
    selector: Option<Box<dyn BranchSelector<G>>>,
    filter: ReturnFilter,
    pending_root: Option<Rc<TraversalBranch>>,
    error: Option<crate::core::TraversalError>,
    done: bool,
}

impl<G: GraphStore> Iterator for Traverser<'_, G> {
    type Item = TraversalResult<Path>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(error) = self.error.take() {
            self.done = true;
            return Some(Err(error));
        }
        // 根位置也参与返回过滤
        if let Some(root) = self.pending_root.take() {
            if (self.filter)(&root) {
                return Some(Ok(root.to_path()));
            }
        }
        let selector = self.selector.as_mut()?;
        loop {
            match selector.next(self.graph) {
                Ok(Some(branch)) => {
                    if (self.filter)(&branch) {
                        return Some(Ok(branch.to_path()));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryGraph;

    /// a -> b -> c，外加 a -> c 捷径
    fn diamond() -> (MemoryGraph, NodeId, NodeId, NodeId) {
        let graph = MemoryGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph
            .create_relationship(a, b, "to")
            .expect("Relationship should be created in test");
        graph
            .create_relationship(b, c, "to")
            .expect("Relationship should be created in test");
        graph
            .create_relationship(a, c, "to")
            .expect("Relationship should be created in test");
        (graph, a, b, c)
    }

    #[test]
    fn test_return_filter_selects_end_node() {
        let (graph, a, _, c) = diamond();
        let paths: Vec<Path> = TraversalDescription::new(RelationshipExpander::outgoing())
            .max_depth(3)
            .return_where(move |branch| branch.node() == c)
            .traverse(&graph, a)
            .collect::<TraversalResult<_>>()
            .expect("Traversal should succeed in test");

        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.start_node(), a);
            assert_eq!(path.end_node(), c);
        }
    }

    #[test]
    fn test_root_position_is_surfaced() {
        let (graph, a, ..) = diamond();
        let paths: Vec<Path> = TraversalDescription::new(RelationshipExpander::outgoing())
            .max_depth(1)
            .traverse(&graph, a)
            .collect::<TraversalResult<_>>()
            .expect("Traversal should succeed in test");

        // 根位置（零长路径）+ 深度 1 的两个位置
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].length(), 0);
    }

    #[test]
    fn test_missing_start_yields_error() {
        let graph = MemoryGraph::new();
        let mut traverser = TraversalDescription::new(RelationshipExpander::outgoing())
            .traverse(&graph, NodeId(42));

        assert!(matches!(traverser.next(), Some(Err(_))));
        assert!(traverser.next().is_none());
    }

    #[test]
    fn test_relationship_uniqueness_allows_node_revisit() {
        // a <-> b 双向关系对：关系唯一性允许经不同关系回到 a
        let graph = MemoryGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph
            .create_relationship(a, b, "to")
            .expect("Relationship should be created in test");
        graph
            .create_relationship(b, a, "to")
            .expect("Relationship should be created in test");

        let revisits_a: Vec<Path> = TraversalDescription::new(RelationshipExpander::outgoing())
            .uniqueness(Uniqueness::RelationshipPath)
            .max_depth(2)
            .return_where(move |branch| branch.node() == a && branch.depth() == 2)
            .traverse(&graph, a)
            .collect::<TraversalResult<_>>()
            .expect("Traversal should succeed in test");
        assert_eq!(revisits_a.len(), 1);

        let simple: Vec<Path> = TraversalDescription::new(RelationshipExpander::outgoing())
            .uniqueness(Uniqueness::NodePath)
            .max_depth(2)
            .return_where(move |branch| branch.node() == a && branch.depth() == 2)
            .traverse(&graph, a)
            .collect::<TraversalResult<_>>()
            .expect("Traversal should succeed in test");
        assert!(simple.is_empty());
    }
}
