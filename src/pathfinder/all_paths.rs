//! 全路径查找
//!
//! [`AllPaths`] 找出两点间深度上限内的全部路径（关系不重复）；
//! [`AllSimplePaths`] 更严格，要求节点不重复，只产出简单路径。
//! 两者都是对单源遍历引擎的薄配置。

use crate::core::{NodeId, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::path::Path;
use crate::graph::store::GraphStore;
use crate::traversal::traverser::{TraversalDescription, Traverser, Uniqueness};

/// 两点间全部路径（允许经不同关系重访节点）
#[derive(Debug, Clone)]
pub struct AllPaths {
    max_depth: usize,
    expander: RelationshipExpander,
}

impl AllPaths {
    pub fn new(max_depth: usize, expander: RelationshipExpander) -> Self {
        Self {
            max_depth,
            expander,
        }
    }

    /// 惰性产出 start 到 end 的所有路径
    pub fn find_all_paths<'g, G: GraphStore>(
        &self,
        graph: &'g G,
        start: NodeId,
        end: NodeId,
    ) -> Traverser<'g, G> {
        TraversalDescription::new(self.expander.clone())
            .depth_first()
            .uniqueness(Uniqueness::RelationshipPath)
            .max_depth(self.max_depth)
            .return_where(move |branch| branch.node() == end)
            .traverse(graph, start)
    }

    /// 第一条路径，或 None
    pub fn find_single_path<G: GraphStore>(
        &self,
        graph: &G,
        start: NodeId,
        end: NodeId,
    ) -> TraversalResult<Option<Path>> {
        self.find_all_paths(graph, start, end).next().transpose()
    }
}

/// 两点间全部简单路径（节点不重复）
#[derive(Debug, Clone)]
pub struct AllSimplePaths {
    max_depth: usize,
    expander: RelationshipExpander,
}

impl AllSimplePaths {
    pub fn new(max_depth: usize, expander: RelationshipExpander) -> Self {
        Self {
            max_depth,
            expander,
        }
    }

    pub fn find_all_paths<'g, G: GraphStore>(
        &self,
        graph: &'g G,
        start: NodeId,
        end: NodeId,
    ) -> Traverser<'g, G> {
        TraversalDescription::new(self.expander.clone())
            .depth_first()
            .uniqueness(Uniqueness::NodePath)
            .max_depth(self.max_depth)
            .return_where(move |branch| branch.node() == end)
            .traverse(graph, start)
    }

    pub fn find_single_path<G: GraphStore>(
        &self,
        graph: &G,
        start: NodeId,
        end: NodeId,
    ) -> TraversalResult<Option<Path>> {
        self.find_all_paths(graph, start, end).next().transpose()
    }
}
