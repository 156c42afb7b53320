//! 图访问接口
//!
//! 遍历引擎通过该抽象读取图数据，不拥有存储本身。
//! 扩展顺序由实现方决定，引擎不做归一化。

use crate::core::{Direction, NodeId, Relationship, RelationshipId, TraversalResult};

/// 抽象图读取接口
pub trait GraphStore {
    /// 判断节点是否存在
    fn node_exists(&self, node: NodeId) -> bool;

    /// 返回节点上满足方向与类型过滤的关系
    ///
    /// 节点不存在时返回 [`GraphError::NodeNotFound`](crate::core::GraphError)。
    fn relationships_of(
        &self,
        node: NodeId,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> TraversalResult<Vec<Relationship>>;

    /// 按标识取回关系，用于从访问记录回溯路径
    fn relationship_by_id(&self, id: RelationshipId) -> TraversalResult<Relationship>;

    /// 节点在给定过滤下的度数
    fn degree(
        &self,
        node: NodeId,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> TraversalResult<usize> {
        Ok(self.relationships_of(node, direction, rel_type)?.len())
    }
}
