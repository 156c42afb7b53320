//! 内存图实现
//!
//! 邻接表存放在读写锁内，可通过 `Arc` 在并行搜索线程间共享；
//! 关系按插入顺序返回。

use std::collections::{HashMap, HashSet};

use crossbeam_utils::atomic::AtomicCell;
use parking_lot::RwLock;

use crate::core::{Direction, GraphError, NodeId, Relationship, RelationshipId, TraversalResult};
use crate::graph::store::GraphStore;

#[derive(Debug, Default)]
struct GraphInner {
    nodes: HashSet<NodeId>,
    outgoing: HashMap<NodeId, Vec<RelationshipId>>,
    incoming: HashMap<NodeId, Vec<RelationshipId>>,
    relationships: HashMap<RelationshipId, Relationship>,
}

/// 内存图
#[derive(Debug)]
pub struct MemoryGraph {
    inner: RwLock<GraphInner>,
    next_node_id: AtomicCell<u64>,
    next_rel_id: AtomicCell<u64>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(GraphInner::default()),
            next_node_id: AtomicCell::new(0),
            next_rel_id: AtomicCell::new(0),
        }
    }

    /// 创建节点并返回其标识
    pub fn create_node(&self) -> NodeId {
        let id = NodeId(self.next_node_id.fetch_add(1));
        self.inner.write().nodes.insert(id);
        id
    }

    /// 在两个已存在的节点之间创建关系
    pub fn create_relationship(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> TraversalResult<Relationship> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains(&start) {
            return Err(GraphError::NodeNotFound(start).into());
        }
        if !inner.nodes.contains(&end) {
            return Err(GraphError::NodeNotFound(end).into());
        }

        let id = RelationshipId(self.next_rel_id.fetch_add(1));
        let rel = Relationship::new(id, start, end, rel_type);
        inner.outgoing.entry(start).or_default().push(id);
        inner.incoming.entry(end).or_default().push(id);
        inner.relationships.insert(id, rel.clone());
        Ok(rel)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.inner.read().relationships.len()
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for MemoryGraph {
    fn node_exists(&self, node: NodeId) -> bool {
        self.inner.read().nodes.contains(&node)
    }

    fn relationships_of(
        &self,
        node: NodeId,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> TraversalResult<Vec<Relationship>> {
        let inner = self.inner.read();
        if !inner.nodes.contains(&node) {
            return Err(GraphError::NodeNotFound(node).into());
        }

        let mut ids: Vec<RelationshipId> = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            if let Some(out) = inner.outgoing.get(&node) {
                ids.extend(out.iter().copied());
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            if let Some(inc) = inner.incoming.get(&node) {
                // Both 方向下自环只从出边列表计一次
                for id in inc {
                    if direction == Direction::Both {
                        if let Some(rel) = inner.relationships.get(id) {
                            if rel.start == rel.end {
                                continue;
                            }
                        }
                    }
                    ids.push(*id);
                }
            }
        }

        let mut rels = Vec::with_capacity(ids.len());
        for id in ids {
            let rel = inner
                .relationships
                .get(&id)
                .ok_or(GraphError::RelationshipNotFound(id))?;
            if let Some(wanted) = rel_type {
                if rel.rel_type != wanted {
                    continue;
                }
            }
            rels.push(rel.clone());
        }
        Ok(rels)
    }

    fn relationship_by_id(&self, id: RelationshipId) -> TraversalResult<Relationship> {
        self.inner
            .read()
            .relationships
            .get(&id)
            .cloned()
            .ok_or_else(|| GraphError::RelationshipNotFound(id).into())
    }
}
