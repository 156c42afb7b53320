//! 基础类型
//!
//! 节点与关系的不透明标识、方向枚举以及关系记录本身。
//! 标识实现 `Copy + Eq + Hash + Ord`，可直接作为映射键使用。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点标识
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 关系标识
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct RelationshipId(pub u64);

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 关系的遍历方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    /// 取反方向，`Both` 保持不变
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

/// 一条有向关系
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub start: NodeId,
    pub end: NodeId,
    pub rel_type: String,
}

impl Relationship {
    pub fn new(id: RelationshipId, start: NodeId, end: NodeId, rel_type: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            rel_type: rel_type.into(),
        }
    }

    /// 给定一端，返回另一端；自环返回同一节点
    pub fn other_node(&self, node: NodeId) -> NodeId {
        if node == self.start {
            self.end
        } else {
            self.start
        }
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        node == self.start || node == self.end
    }
}
