//! 关系扩展器
//!
//! 封装方向与类型过滤的能力对象；双向搜索通过 `reversed()`
//! 取得反向视图来驱动后向前沿。

use serde::{Deserialize, Serialize};

use crate::core::{Direction, NodeId, Relationship, TraversalResult};
use crate::graph::store::GraphStore;

/// 方向 + 类型过滤的关系扩展器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipExpander {
    direction: Direction,
    rel_type: Option<String>,
}

impl RelationshipExpander {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            rel_type: None,
        }
    }

    /// 任意方向、不限类型
    pub fn all() -> Self {
        Self::new(Direction::Both)
    }

    pub fn outgoing() -> Self {
        Self::new(Direction::Outgoing)
    }

    pub fn incoming() -> Self {
        Self::new(Direction::Incoming)
    }

    /// 限定关系类型
    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rel_type(&self) -> Option<&str> {
        self.rel_type.as_deref()
    }

    /// 返回方向取反的扩展器视图
    pub fn reversed(&self) -> Self {
        Self {
            direction: self.direction.reverse(),
            rel_type: self.rel_type.clone(),
        }
    }

    /// 产出从该节点可用于遍历的关系
    pub fn expand<G: GraphStore>(
        &self,
        graph: &G,
        node: NodeId,
    ) -> TraversalResult<Vec<Relationship>> {
        graph.relationships_of(node, self.direction, self.rel_type.as_deref())
    }

    /// 节点在该扩展器过滤下的度数
    pub fn degree<G: GraphStore>(&self, graph: &G, node: NodeId) -> TraversalResult<usize> {
        graph.degree(node, self.direction, self.rel_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryGraph;

    #[test]
    fn test_expand_filters_by_direction_and_type() {
        let graph = MemoryGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph
            .create_relationship(a, b, "to")
            .expect("Relationship should be created in test");
        graph
            .create_relationship(b, a, "to")
            .expect("Relationship should be created in test");
        graph
            .create_relationship(a, b, "likes")
            .expect("Relationship should be created in test");

        let expander = RelationshipExpander::outgoing().with_type("to");
        let rels = expander
            .expand(&graph, a)
            .expect("Expansion should succeed in test");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].end, b);
    }

    #[test]
    fn test_reversed_flips_direction() {
        let expander = RelationshipExpander::outgoing().with_type("to");
        let reversed = expander.reversed();
        assert_eq!(reversed.direction(), Direction::Incoming);
        assert_eq!(reversed.rel_type(), Some("to"));
        assert_eq!(reversed.reversed(), expander);
    }

    #[test]
    fn test_reversed_sees_opposite_relationships() {
        let graph = MemoryGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph
            .create_relationship(a, b, "to")
            .expect("Relationship should be created in test");

        let forward = RelationshipExpander::outgoing();
        let backward = forward.reversed();

        assert_eq!(
            forward
                .expand(&graph, a)
                .expect("Expansion should succeed in test")
                .len(),
            1
        );
        assert_eq!(
            backward
                .expand(&graph, b)
                .expect("Expansion should succeed in test")
                .len(),
            1
        );
        assert!(backward
            .expand(&graph, a)
            .expect("Expansion should succeed in test")
            .is_empty());
    }
}
