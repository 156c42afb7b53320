//! 遍历分支
//!
//! 一个分支代表遍历中的一个位置：当前节点、抵达它的关系、深度，
//! 以及指向父分支的引用链。分叉时共享公共前缀，不复制路径。

use std::rc::Rc;

use crate::core::{NodeId, Relationship, RelationshipId};
use crate::graph::path::{Path, PathBuilder};

/// 遍历位置，父链共享
#[derive(Debug)]
pub struct TraversalBranch {
    parent: Option<Rc<TraversalBranch>>,
    node: NodeId,
    relationship: Option<Relationship>,
    depth: usize,
}

impl TraversalBranch {
    /// 遍历起点位置，深度 0
    pub fn root(node: NodeId) -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            node,
            relationship: None,
            depth: 0,
        })
    }

    /// 沿关系扩展出子分支
    pub fn child(self: &Rc<Self>, rel: Relationship) -> Rc<TraversalBranch> {
        let node = rel.other_node(self.node);
        Rc::new(TraversalBranch {
            parent: Some(Rc::clone(self)),
            node,
            relationship: Some(rel),
            depth: self.depth + 1,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 抵达该位置的关系，根位置为 None
    pub fn relationship(&self) -> Option<&Relationship> {
        self.relationship.as_ref()
    }

    pub fn parent(&self) -> Option<&Rc<TraversalBranch>> {
        self.parent.as_ref()
    }

    /// 节点是否已出现在当前路径上（含自身）
    pub fn seen_node(&self, node: NodeId) -> bool {
        let mut current = Some(self);
        while let Some(branch) = current {
            if branch.node == node {
                return true;
            }
            current = branch.parent.as_deref();
        }
        false
    }

    /// 关系是否已出现在当前路径上
    pub fn seen_relationship(&self, id: RelationshipId) -> bool {
        let mut current = Some(self);
        while let Some(branch) = current {
            if let Some(rel) = &branch.relationship {
                if rel.id == id {
                    return true;
                }
            }
            current = branch.parent.as_deref();
        }
        false
    }

    /// 沿父链回溯，物化为路径
    pub fn to_path(&self) -> Path {
        let mut chain = Vec::with_capacity(self.depth);
        let mut current = self;
        loop {
            match (&current.relationship, &current.parent) {
                (Some(rel), Some(parent)) => {
                    chain.push(rel.clone());
                    current = parent;
                }
                _ => break,
            }
        }
        chain.reverse();

        let mut builder = PathBuilder::new(current.node);
        for rel in chain {
            builder = builder.push(rel);
        }
        builder.build()
    }
}
