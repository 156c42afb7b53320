//! 路径表示与构造器
//!
//! [`Path`] 是节点与关系交替的不可变序列；[`PathBuilder`] 采用
//! 函数式追加语义，`push` 返回新的构造器实例，旧引用保持有效，
//! 搜索分叉时可以安全复用公共前缀。
//! `build_with` 将锚定起点与锚定终点的两个半路径在相遇节点合并。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{NodeId, PathError, Relationship};

/// 图中一条不可变路径
///
/// 不变量：`nodes.len() == relationships.len() + 1`，
/// 单节点路径长度为 0。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<NodeId>,
    relationships: Vec<Relationship>,
}

impl Path {
    /// 仅含单个节点的零长路径
    pub fn singular(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            relationships: Vec::new(),
        }
    }

    pub fn start_node(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end_node(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// 路径长度（关系数）
    pub fn length(&self) -> usize {
        self.relationships.len()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// 节点在路径中的位置
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| *n == node)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.nodes[0])?;
        for (i, rel) in self.relationships.iter().enumerate() {
            let from = self.nodes[i];
            let to = self.nodes[i + 1];
            if rel.start == from && rel.end == to {
                write!(f, "-[{}]->({})", rel.id, to)?;
            } else {
                write!(f, "<-[{}]-({})", rel.id, to)?;
            }
        }
        Ok(())
    }
}

/// 函数式路径构造器，锚定在一个起始节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    start: NodeId,
    relationships: Vec<Relationship>,
    head: NodeId,
}

impl PathBuilder {
    pub fn new(start: NodeId) -> Self {
        Self {
            start,
            relationships: Vec::new(),
            head: start,
        }
    }

    /// 从已有路径构造，head 为该路径的终点
    pub fn from_path(path: &Path) -> Self {
        Self {
            start: path.start_node(),
            relationships: path.relationships().to_vec(),
            head: path.end_node(),
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// 当前已构造到的远端节点
    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// 在远端追加一条关系，返回新的构造器
    #[must_use]
    pub fn push(&self, rel: Relationship) -> PathBuilder {
        let next = rel.other_node(self.head);
        let mut relationships = Vec::with_capacity(self.relationships.len() + 1);
        relationships.extend_from_slice(&self.relationships);
        relationships.push(rel);
        PathBuilder {
            start: self.start,
            relationships,
            head: next,
        }
    }

    /// 定型为路径
    pub fn build(&self) -> Path {
        let mut nodes = Vec::with_capacity(self.relationships.len() + 1);
        nodes.push(self.start);
        let mut current = self.start;
        for rel in &self.relationships {
            current = rel.other_node(current);
            nodes.push(current);
        }
        Path {
            nodes,
            relationships: self.relationships.clone(),
        }
    }

    /// 与另一侧的构造器在相遇节点合并成完整路径
    ///
    /// `self` 锚定整体起点，`other` 锚定整体终点，两者的 head
    /// 必须是同一个相遇节点，否则返回 [`PathError::DisjointMerge`]。
    pub fn build_with(&self, other: &PathBuilder) -> Result<Path, PathError> {
        if self.head != other.head {
            return Err(PathError::DisjointMerge {
                left: self.head,
                right: other.head,
            });
        }

        let mut nodes = Vec::with_capacity(self.relationships.len() + other.relationships.len() + 1);
        let mut relationships =
            Vec::with_capacity(self.relationships.len() + other.relationships.len());

        nodes.push(self.start);
        let mut current = self.start;
        for rel in &self.relationships {
            current = rel.other_node(current);
            relationships.push(rel.clone());
            nodes.push(current);
        }
        // 终点侧的半路径反向接回，使其从相遇节点走向整体终点
        for rel in other.relationships.iter().rev() {
            current = rel.other_node(current);
            relationships.push(rel.clone());
            nodes.push(current);
        }

        Ok(Path {
            nodes,
            relationships,
        })
    }
}
