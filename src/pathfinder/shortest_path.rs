//! 双向最短路搜索引擎
//!
//! 从起点与终点同时逐层推进，起点侧用原扩展器，终点侧用反向扩展器，
//! 两侧严格交替、每次只消费一条关系，保证分支因子悬殊时推进仍然均衡。
//! 一侧踏入对侧已访问的节点即为相遇，首次相遇冻结总深度，之后只接受
//! 不超过冻结深度的相遇；同层经不同关系到达同一节点的情况会追加记录，
//! 因而并列的等长最短路全部保留。搜索结束后从最浅的相遇桶回溯
//! 访问记录还原全部路径组合。
//!
//! `stop_asap` 模式供单路径查询使用：哪一侧记下相遇哪一侧就收手，
//! 对侧在冻结深度内走完即止，以并列解的完整性换速度。

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::{GraphError, NodeId, Relationship, RelationshipId, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::path::{Path, PathBuilder};
use crate::graph::store::GraphStore;

/// 双向最短路查找器
#[derive(Debug, Clone)]
pub struct ShortestPath {
    max_depth: usize,
    expander: RelationshipExpander,
    stop_asap: bool,
}

impl ShortestPath {
    pub fn new(max_depth: usize, expander: RelationshipExpander) -> Self {
        Self {
            max_depth,
            expander,
            stop_asap: false,
        }
    }

    /// 找到第一个最浅相遇即终止搜索
    pub fn with_stop_asap(mut self) -> Self {
        self.stop_asap = true;
        self
    }

    /// 全部等长最短路径；不可达时为空集而非错误
    pub fn find_all_paths<G: GraphStore>(
        &self,
        graph: &G,
        start: NodeId,
        end: NodeId,
    ) -> TraversalResult<Vec<Path>> {
        if !graph.node_exists(start) {
            return Err(GraphError::NodeNotFound(start).into());
        }
        if !graph.node_exists(end) {
            return Err(GraphError::NodeNotFound(end).into());
        }
        if start == end {
            return Ok(vec![Path::singular(start)]);
        }

        let mut search = BidirectionalSearch::new(
            start,
            end,
            self.expander.clone(),
            self.max_depth,
            self.stop_asap,
        );
        search.run(graph)?;
        search.into_paths(graph, start, end)
    }

    /// 任意一条最短路径，内部以 `stop_asap` 提前终止
    pub fn find_single_path<G: GraphStore>(
        &self,
        graph: &G,
        start: NodeId,
        end: NodeId,
    ) -> TraversalResult<Option<Path>> {
        let single = self.clone().with_stop_asap();
        Ok(single.find_all_paths(graph, start, end)?.into_iter().next())
    }
}

/// 某一侧对一个节点的访问记录：到达深度与同层到达的全部关系
#[derive(Debug)]
struct LevelData {
    depth: usize,
    rels: Vec<RelationshipId>,
}

/// 相遇记录，按相遇节点判等去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Hit {
    node: NodeId,
}

/// 两侧共用的协调状态
///
/// 步进严格串行，持有 `&mut` 的一侧直接改写即可，无须原子量。
#[derive(Debug)]
struct SharedSearchState {
    frozen_depth: Option<usize>,
    /// 两侧层数之和，也是当前可能构成的最短路径长度
    current_depth: usize,
    /// 已被任一侧消费过的关系，另一侧不再重复走
    visited_rels: HashSet<RelationshipId>,
    max_depth: usize,
    stop_asap: bool,
}

/// 单侧可续推的前沿状态
#[derive(Debug)]
struct DirectionData {
    expander: RelationshipExpander,
    visited: HashMap<NodeId, LevelData>,
    /// 当前层尚未展开的节点
    frontier: VecDeque<NodeId>,
    /// 已展开、尚未消费的 (父节点, 关系)
    pending: VecDeque<(NodeId, Relationship)>,
    /// 下一层种子
    next_nodes: Vec<NodeId>,
    current_depth: usize,
    have_found_something: bool,
    stop: bool,
    /// 对侧耗尽后置位：收完当前层即止，不再下探
    finish_current_layer_then_stop: bool,
}

impl DirectionData {
    fn new(origin: NodeId, expander: RelationshipExpander) -> Self {
        let mut visited = HashMap::new();
        visited.insert(
            origin,
            LevelData {
                depth: 0,
                rels: Vec::new(),
            },
        );
        Self {
            expander,
            visited,
            frontier: VecDeque::new(),
            pending: VecDeque::new(),
            next_nodes: vec![origin],
            current_depth: 0,
            have_found_something: false,
            stop: false,
            finish_current_layer_then_stop: false,
        }
    }

    fn can_go_deeper(&self, shared: &SharedSearchState) -> bool {
        shared.frozen_depth.is_none()
            && shared.current_depth < shared.max_depth
            && !self.finish_current_layer_then_stop
    }

    /// 本侧的下一条待消费关系；按需展开节点、推进层级
    fn fetch_next_rel<G: GraphStore>(
        &mut self,
        graph: &G,
        shared: &mut SharedSearchState,
    ) -> TraversalResult<Option<(NodeId, Relationship)>> {
        if self.stop {
            return Ok(None);
        }
        // 冻结深度已过而本侧一无所获：继续走不可能贡献更短的路径
        let come_too_far_empty_handed = shared
            .frozen_depth
            .is_some_and(|frozen| shared.current_depth > frozen && !self.have_found_something);
        if come_too_far_empty_handed {
            return Ok(None);
        }

        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Ok(Some(entry));
            }
            if let Some(node) = self.frontier.pop_front() {
                for rel in self.expander.expand(graph, node)? {
                    self.pending.push_back((node, rel));
                }
                continue;
            }
            if self.next_nodes.is_empty() || !self.can_go_deeper(shared) {
                return Ok(None);
            }
            self.frontier.extend(self.next_nodes.drain(..));
            self.current_depth += 1;
            shared.current_depth += 1;
            log::trace!(
                "search side advanced to level {} (combined depth {})",
                self.current_depth,
                shared.current_depth
            );
        }
    }

    /// 步进到本侧的下一个新节点
    ///
    /// 首次到达的节点记入访问表并作为下层种子返回；同层经另一条
    /// 关系再次到达时只追加关系（并列最短路来源），更深的重访忽略。
    fn next_node<G: GraphStore>(
        &mut self,
        graph: &G,
        shared: &mut SharedSearchState,
    ) -> TraversalResult<Option<NodeId>> {
        loop {
            let Some((parent, rel)) = self.fetch_next_rel(graph, shared)? else {
                return Ok(None);
            };
            // 每条关系只允许一侧消费
            if !shared.visited_rels.insert(rel.id) {
                continue;
            }
            let node = rel.other_node(parent);
            match self.visited.get_mut(&node) {
                None => {
                    self.visited.insert(
                        node,
                        LevelData {
                            depth: self.current_depth,
                            rels: vec![rel.id],
                        },
                    );
                    self.next_nodes.push(node);
                    return Ok(Some(node));
                }
                Some(level) if level.depth == self.current_depth => {
                    if !shared.stop_asap {
                        level.rels.push(rel.id);
                    }
                }
                Some(_) => {}
            }
        }
    }
}

/// 一次完整的双向搜索
struct BidirectionalSearch {
    start_data: DirectionData,
    end_data: DirectionData,
    shared: SharedSearchState,
    hits: HashMap<usize, HashSet<Hit>>,
}

impl BidirectionalSearch {
    fn new(
        start: NodeId,
        end: NodeId,
        expander: RelationshipExpander,
        max_depth: usize,
        stop_asap: bool,
    ) -> Self {
        Self {
            start_data: DirectionData::new(start, expander.clone()),
            end_data: DirectionData::new(end, expander.reversed()),
            shared: SharedSearchState {
                frozen_depth: None,
                current_depth: 0,
                visited_rels: HashSet::new(),
                max_depth,
                stop_asap,
            },
            hits: HashMap::new(),
        }
    }

    fn run<G: GraphStore>(&mut self, graph: &G) -> TraversalResult<()> {
        loop {
            let stepped_start = self.go_one_step(graph, true)?;
            let stepped_end = self.go_one_step(graph, false)?;
            if !stepped_start && !stepped_end {
                return Ok(());
            }
        }
    }

    /// 让一侧前进一个节点并做相遇检测
    fn go_one_step<G: GraphStore>(&mut self, graph: &G, from_start: bool) -> TraversalResult<bool> {
        let Self {
            start_data,
            end_data,
            shared,
            hits,
        } = self;
        let (data, other) = if from_start {
            (start_data, end_data)
        } else {
            (end_data, start_data)
        };

        let Some(node) = data.next_node(graph, shared)? else {
            // 本侧耗尽，对侧收完当前层后也没有必要继续下探
            other.finish_current_layer_then_stop = true;
            return Ok(false);
        };

        if let Some(other_level) = other.visited.get(&node) {
            let depth = data.current_depth + other_level.depth;
            if shared.frozen_depth.is_none() {
                log::debug!("first meeting at node {node}, freezing depth {depth}");
            }
            let frozen = *shared.frozen_depth.get_or_insert(depth);
            if depth <= frozen {
                data.have_found_something = true;
                if depth < frozen {
                    shared.frozen_depth = Some(depth);
                    // 更深的相遇都是对侧贡献的，叫停它
                    other.stop = true;
                    log::debug!("lowered frozen depth to {depth}, stopping opposite side");
                }
                hits.entry(depth).or_default().insert(Hit { node });
                // 单路径模式：本侧有收获即可收手，对侧照常走完以免错过更浅的相遇
                if shared.stop_asap {
                    data.stop = true;
                }
            }
        }
        Ok(true)
    }

    /// 从最浅的相遇桶回溯出全部路径组合
    fn into_paths<G: GraphStore>(
        &self,
        graph: &G,
        start: NodeId,
        end: NodeId,
    ) -> TraversalResult<Vec<Path>> {
        if self.hits.is_empty() {
            return Ok(Vec::new());
        }
        let mut depth = 0;
        let bucket = loop {
            if let Some(bucket) = self.hits.get(&depth) {
                break bucket;
            }
            depth += 1;
        };

        let mut paths = Vec::new();
        for hit in bucket {
            let start_chains = chains_to(graph, &self.start_data, hit.node, self.shared.stop_asap)?;
            let end_chains = chains_to(graph, &self.end_data, hit.node, self.shared.stop_asap)?;
            for start_chain in &start_chains {
                let front = to_builder(start, start_chain);
                for end_chain in &end_chains {
                    let back = to_builder(end, end_chain);
                    paths.push(front.build_with(&back)?);
                }
            }
        }
        Ok(paths)
    }
}

/// 从相遇节点沿某一侧的访问记录逐层回退，枚举该侧全部关系链
///
/// 同一层记录了多条关系时在此分叉，这正是并列最短路的来源；
/// `stop_asap` 模式每层只取第一条。返回的链按从原点出发的顺序排列。
fn chains_to<G: GraphStore>(
    graph: &G,
    data: &DirectionData,
    meeting: NodeId,
    stop_asap: bool,
) -> TraversalResult<Vec<Vec<Relationship>>> {
    let Some(meeting_level) = data.visited.get(&meeting) else {
        return Ok(Vec::new());
    };

    let mut frontier: Vec<(NodeId, Vec<Relationship>)> = vec![(meeting, Vec::new())];
    for _ in 0..meeting_level.depth {
        let mut closer = Vec::new();
        for (node, chain) in &frontier {
            let Some(level) = data.visited.get(node) else {
                continue;
            };
            for &rel_id in &level.rels {
                let rel = graph.relationship_by_id(rel_id)?;
                let previous = rel.other_node(*node);
                let mut extended = chain.clone();
                extended.push(rel);
                closer.push((previous, extended));
                if stop_asap {
                    break;
                }
            }
        }
        frontier = closer;
    }

    Ok(frontier
        .into_iter()
        .map(|(_, mut chain)| {
            chain.reverse();
            chain
        })
        .collect())
}

fn to_builder(origin: NodeId, chain: &[Relationship]) -> PathBuilder {
    let mut builder = PathBuilder::new(origin);
    for rel in chain {
        builder = builder.push(rel.clone());
    }
    builder
}
