//! 精确深度路径查找
//!
//! 把目标深度拆成两半：从起点正向遍历到 `on_depth / 2`，从终点用
//! 反向扩展器遍历到剩余深度，两个遍历都启用超级节点挂起。逐步交替
//! 推进两侧的位置迭代器，当某个节点被两侧都到达时，在该节点缝合
//! 两条半路径产出完整结果。

use std::collections::{HashMap, VecDeque};

use crate::core::{NodeId, TraversalError, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::path::{Path, PathBuilder};
use crate::graph::store::GraphStore;
use crate::traversal::traverser::{TraversalDescription, Traverser, Uniqueness};

/// 半路径来自哪一侧的遍历
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

/// 固定深度的双向相遇查找器
#[derive(Debug, Clone)]
pub struct ExactDepthPathFinder {
    on_depth: usize,
    start_threshold: usize,
    expander: RelationshipExpander,
}

impl ExactDepthPathFinder {
    pub fn new(on_depth: usize, start_threshold: usize, expander: RelationshipExpander) -> Self {
        Self {
            on_depth,
            start_threshold,
            expander,
        }
    }

    /// 惰性产出所有长度恰为 `on_depth` 的路径
    pub fn find_all_paths<'g, G: GraphStore>(
        &self,
        graph: &'g G,
        start: NodeId,
        end: NodeId,
    ) -> ExactDepthPaths<'g, G> {
        let first_half = self.on_depth / 2;
        let second_half = self.on_depth - first_half;

        let forward = TraversalDescription::new(self.expander.clone())
            .throttled(self.start_threshold)
            .uniqueness(Uniqueness::RelationshipPath)
            .max_depth(first_half)
            .return_where(move |branch| branch.depth() == first_half)
            .traverse(graph, start);
        let backward = TraversalDescription::new(self.expander.reversed())
            .throttled(self.start_threshold)
            .uniqueness(Uniqueness::RelationshipPath)
            .max_depth(second_half)
            .return_where(move |branch| branch.depth() == second_half)
            .traverse(graph, end);

        ExactDepthPaths {
            forward,
            backward,
            forward_done: false,
            backward_done: false,
            visits: HashMap::new(),
            emitted: VecDeque::new(),
            error: None,
            done: false,
        }
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

/// 交替推进两侧遍历的惰性结果序列
pub struct ExactDepthPaths<'g, G: GraphStore> {
    forward: Traverser<'g, G>,
    backward: Traverser<'g, G>,
    forward_done: bool,
    backward_done: bool,
    visits: HashMap<NodeId, Vec<(Side, Path)>>,
    emitted: VecDeque<Path>,
    error: Option<TraversalError>,
    done: bool,
}

impl<G: GraphStore> ExactDepthPaths<'_, G> {
    /// 记录一次到达；若对侧已到过同一节点则缝合产出
    fn visit(&mut self, side: Side, half: Path) {
        let meeting = half.end_node();
        if let Some(earlier) = self.visits.get(&meeting) {
            for (other_side, other_half) in earlier {
                if *other_side == side {
                    continue;
                }
                let (front, back) = match side {
                    Side::Forward => (&half, other_half),
                    Side::Backward => (other_half, &half),
                };
                // 两个半段不能复用同一条关系
                if shares_relationship(front, back) {
                    continue;
                }
                match PathBuilder::from_path(front).build_with(&PathBuilder::from_path(back)) {
                    Ok(path) => self.emitted.push_back(path),
                    Err(error) => self.error = Some(error.into()),
                }
            }
        }
        self.visits.entry(meeting).or_default().push((side, half));
    }

    fn advance(&mut self) {
        if !self.forward_done {
            match self.forward.next() {
                Some(Ok(half)) => self.visit(Side::Forward, half),
                Some(Err(error)) => {
                    self.error = Some(error);
                    return;
                }
                None => self.forward_done = true,
            }
        }
        if !self.backward_done {
            match self.backward.next() {
                Some(Ok(half)) => self.visit(Side::Backward, half),
                Some(Err(error)) => {
                    self.error = Some(error);
                }
                None => self.backward_done = true,
            }
        }
    }
}

impl<G: GraphStore> Iterator for ExactDepthPaths<'_, G> {
    type Item = TraversalResult<Path>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.emitted.pop_front() {
                return Some(Ok(path));
            }
            if self.done {
                return None;
            }
            if let Some(error) = self.error.take() {
                self.done = true;
                return Some(Err(error));
            }
            if self.forward_done && self.backward_done {
                self.done = true;
                return None;
            }
            self.advance();
        }
    }
}

fn shares_relationship(front: &Path, back: &Path) -> bool {
    front.relationships().iter().any(|rel| {
        back.relationships()
            .iter()
            .any(|other| other.id == rel.id)
    })
}
