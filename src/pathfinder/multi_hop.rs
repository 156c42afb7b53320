//! 多跳路径拼接器
//!
//! 把航点序列拆成相邻点对，每对在独立线程、独立读事务里跑一次
//! 双向最短路搜索；全部线程汇合后按航点顺序做笛卡尔拼接。任何
//! 一对无解则整体结果为空，不做部分拼接。

use std::sync::Arc;
use std::thread;

use crate::core::{NodeId, PathError, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::path::{Path, PathBuilder};
use crate::graph::store::GraphStore;
use crate::graph::transaction::TransactionManager;
use crate::pathfinder::shortest_path::ShortestPath;

/// 经过一串航点的路径查找器
pub struct MultiHopPathFinder<G> {
    graph: Arc<G>,
    expander: RelationshipExpander,
    max_depth: usize,
    parallelism: usize,
    tx_manager: Arc<TransactionManager>,
}

impl<G: GraphStore + Send + Sync + 'static> MultiHopPathFinder<G> {
    pub fn new(graph: Arc<G>, max_depth: usize, expander: RelationshipExpander) -> Self {
        Self {
            graph,
            expander,
            max_depth,
            parallelism: num_cpus::get().max(1),
            tx_manager: Arc::new(TransactionManager::new()),
        }
    }

    /// 限制同时运行的点对搜索线程数
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// 依次经过全部航点的所有最短路拼接
    ///
    /// 航点少于 2 个是调用方配置错误；任何一对点之间无路径时
    /// 返回空集。
    pub fn find_paths_from_scratch(&self, waypoints: &[NodeId]) -> TraversalResult<Vec<Path>> {
        let segments = self.search_pairs(waypoints, false)?;
        if segments.iter().any(Vec::is_empty) {
            return Ok(Vec::new());
        }
        conjunct(&segments)
    }

    /// 任意一条经过全部航点的拼接路径
    pub fn find_path_from_scratch(&self, waypoints: &[NodeId]) -> TraversalResult<Option<Path>> {
        let segments = self.search_pairs(waypoints, true)?;
        if segments.iter().any(Vec::is_empty) {
            return Ok(None);
        }
        Ok(conjunct(&segments)?.into_iter().next())
    }

    /// 每个相邻点对派一个线程搜索，按航点顺序返回各对的结果集
    fn search_pairs(
        &self,
        waypoints: &[NodeId],
        stop_asap: bool,
    ) -> TraversalResult<Vec<Vec<Path>>> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()).into());
        }

        let pairs: Vec<(NodeId, NodeId)> = waypoints
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        let mut segments = Vec::with_capacity(pairs.len());
        for batch in pairs.chunks(self.parallelism) {
            let handles: Vec<_> = batch
                .iter()
                .map(|&(from, to)| {
                    let graph = Arc::clone(&self.graph);
                    let manager = Arc::clone(&self.tx_manager);
                    let mut finder = ShortestPath::new(self.max_depth, self.expander.clone());
                    if stop_asap {
                        finder = finder.with_stop_asap();
                    }
                    thread::spawn(move || -> TraversalResult<Vec<Path>> {
                        let tx = manager.begin_read();
                        let paths = finder.find_all_paths(graph.as_ref(), from, to)?;
                        tx.commit()?;
                        Ok(paths)
                    })
                })
                .collect();

            for (&(from, to), handle) in batch.iter().zip(handles) {
                let paths = match handle.join() {
                    Ok(Ok(paths)) => paths,
                    Ok(Err(error)) => {
                        log::warn!("pair search {from} -> {to} failed: {error}");
                        Vec::new()
                    }
                    Err(_) => {
                        log::warn!("pair search thread {from} -> {to} panicked");
                        Vec::new()
                    }
                };
                segments.push(paths);
            }
        }
        Ok(segments)
    }
}

/// 按航点顺序对各段结果做笛卡尔拼接
fn conjunct(segments: &[Vec<Path>]) -> TraversalResult<Vec<Path>> {
    let mut combined: Vec<PathBuilder> = segments[0].iter().map(PathBuilder::from_path).collect();
    for segment in &segments[1..] {
        let mut extended = Vec::with_capacity(combined.len() * segment.len());
        for base in &combined {
            for piece in segment {
                if base.head() != piece.start_node() {
                    return Err(PathError::DisjointMerge {
                        left: base.head(),
                        right: piece.start_node(),
                    }
                    .into());
                }
                let mut builder = base.clone();
                for rel in piece.relationships() {
                    builder = builder.push(rel.clone());
                }
                extended.push(builder);
            }
        }
        combined = extended;
    }
    Ok(combined.iter().map(PathBuilder::build).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryGraph;

    /// a -> b 距离 1，b -> c 距离 2（两条并列）
    fn fixture() -> (Arc<MemoryGraph>, NodeId, NodeId, NodeId) {
        let graph = MemoryGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let m1 = graph.create_node();
        let m2 = graph.create_node();
        let c = graph.create_node();
        for (from, to) in [(a, b), (b, m1), (m1, c), (b, m2), (m2, c)] {
            graph
                .create_relationship(from, to, "to")
                .expect("Relationship should be created in test");
        }
        (Arc::new(graph), a, b, c)
    }

    #[test]
    fn test_stitches_waypoints_in_order() {
        let (graph, a, b, c) = fixture();
        let finder = MultiHopPathFinder::new(graph, 5, RelationshipExpander::outgoing());
        let paths = finder
            .find_paths_from_scratch(&[a, b, c])
            .expect("Stitching should succeed in test");

        // 1 条 a->b 与 2 条 b->c 的组合
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.length(), 3);
            assert_eq!(path.start_node(), a);
            assert_eq!(path.end_node(), c);
            assert_eq!(path.position_of(b), Some(1));
        }
    }

    #[test]
    fn test_single_stitched_path() {
        let (graph, a, b, c) = fixture();
        let finder = MultiHopPathFinder::new(graph, 5, RelationshipExpander::outgoing());
        let path = finder
            .find_path_from_scratch(&[a, b, c])
            .expect("Stitching should succeed in test")
            .expect("A stitched path should exist in test");
        assert_eq!(path.length(), 3);
        assert!(path.contains_node(b));
    }

    #[test]
    fn test_empty_pair_empties_whole_result() {
        let (graph, a, b, _) = fixture();
        let isolated = graph.create_node();
        let finder = MultiHopPathFinder::new(graph, 5, RelationshipExpander::outgoing());
        let paths = finder
            .find_paths_from_scratch(&[a, b, isolated])
            .expect("Stitching should succeed in test");
        assert!(paths.is_empty());
    }

    #[test]
    fn test_too_few_waypoints_is_error() {
        let (graph, a, ..) = fixture();
        let finder = MultiHopPathFinder::new(graph, 5, RelationshipExpander::outgoing());
        assert!(finder.find_paths_from_scratch(&[a]).is_err());
        assert!(finder.find_paths_from_scratch(&[]).is_err());
    }

    #[test]
    fn test_parallelism_cap_preserves_order() {
        let (graph, a, b, c) = fixture();
        let finder = MultiHopPathFinder::new(graph, 5, RelationshipExpander::outgoing())
            .with_parallelism(1);
        let paths = finder
            .find_paths_from_scratch(&[a, b, c])
            .expect("Stitching should succeed in test");
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.start_node() == a && p.end_node() == c));
    }
}
