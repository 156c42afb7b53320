//! Branch selectors: pluggable frontier-expansion strategies.
//!
//! A selector decides which pending expansion to advance next. The
//! depth-first and breadth-first selectors are the usual stack/queue
//! disciplines; the throttled selector protects against super-nodes by
//! parking a source once it has produced a threshold's worth of
//! expansions, resuming it later from a FIFO queue.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::{Relationship, TraversalResult};
use crate::graph::expander::RelationshipExpander;
use crate::graph::store::GraphStore;
use crate::traversal::branch::TraversalBranch;
use crate::traversal::traverser::Uniqueness;

/// Expansion policy shared by all selectors: expander, uniqueness
/// constraint and depth pruning.
#[derive(Debug, Clone)]
pub(crate) struct ExpansionPolicy {
    pub(crate) expander: RelationshipExpander,
    pub(crate) uniqueness: Uniqueness,
    pub(crate) max_depth: Option<usize>,
}

impl ExpansionPolicy {
    fn expand<G: GraphStore>(
        &self,
        graph: &G,
        branch: &Rc<TraversalBranch>,
    ) -> TraversalResult<VecDeque<Relationship>> {
        if let Some(limit) = self.max_depth {
            if branch.depth() >= limit {
                return Ok(VecDeque::new());
            }
        }
        Ok(self.expander.expand(graph, branch.node())?.into())
    }

    fn admits(&self, parent: &TraversalBranch, rel: &Relationship) -> bool {
        match self.uniqueness {
            Uniqueness::RelationshipPath => !parent.seen_relationship(rel.id),
            Uniqueness::NodePath => !parent.seen_node(rel.other_node(parent.node())),
        }
    }
}

/// A branch with its not-yet-consumed expansion relationships.
pub(crate) struct ExpansionSource {
    branch: Rc<TraversalBranch>,
    pending: Option<VecDeque<Relationship>>,
    expanded: usize,
}

impl ExpansionSource {
    pub(crate) fn new(branch: Rc<TraversalBranch>) -> Self {
        Self {
            branch,
            pending: None,
            expanded: 0,
        }
    }

    /// Number of child branches produced from this source so far.
    fn expanded(&self) -> usize {
        self.expanded
    }

    /// Produce the next admissible child branch, expanding lazily on
    /// first use.
    fn next_branch<G: GraphStore>(
        &mut self,
        graph: &G,
        policy: &ExpansionPolicy,
    ) -> TraversalResult<Option<Rc<TraversalBranch>>> {
        if self.pending.is_none() {
            let fetched = policy.expand(graph, &self.branch)?;
            self.pending = Some(fetched);
        }
        let Some(pending) = self.pending.as_mut() else {
            return Ok(None);
        };
        while let Some(rel) = pending.pop_front() {
            if !policy.admits(&self.branch, &rel) {
                continue;
            }
            self.expanded += 1;
            return Ok(Some(self.branch.child(rel)));
        }
        Ok(None)
    }
}

/// Frontier-expansion strategy.
pub trait BranchSelector<G: GraphStore> {
    /// Advance the traversal by one branch, or `None` when exhausted.
    fn next(&mut self, graph: &G) -> TraversalResult<Option<Rc<TraversalBranch>>>;
}

/// Classic depth-first expansion.
pub struct DepthFirstSelector {
    policy: ExpansionPolicy,
    stack: Vec<ExpansionSource>,
}

impl DepthFirstSelector {
    pub(crate) fn new(root: Rc<TraversalBranch>, policy: ExpansionPolicy) -> Self {
        Self {
            policy,
            stack: vec![ExpansionSource::new(root)],
        }
    }
}

impl<G: GraphStore> BranchSelector<G> for DepthFirstSelector {
    fn next(&mut self, graph: &G) -> TraversalResult<Option<Rc<TraversalBranch>>> {
        while let Some(mut source) = self.stack.pop() {
            if let Some(child) = source.next_branch(graph, &self.policy)? {
                self.stack.push(source);
                self.stack.push(ExpansionSource::new(Rc::clone(&child)));
                return Ok(Some(child));
            }
        }
        Ok(None)
    }
}

/// Classic breadth-first expansion.
pub struct BreadthFirstSelector {
    policy: ExpansionPolicy,
    queue: VecDeque<ExpansionSource>,
}

impl BreadthFirstSelector {
    pub(crate) fn new(root: Rc<TraversalBranch>, policy: ExpansionPolicy) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(ExpansionSource::new(root));
        Self { policy, queue }
    }
}

impl<G: GraphStore> BranchSelector<G> for BreadthFirstSelector {
    fn next(&mut self, graph: &G) -> TraversalResult<Option<Rc<TraversalBranch>>> {
        while let Some(mut source) = self.queue.pop_front() {
            if let Some(child) = source.next_branch(graph, &self.policy)? {
                self.queue.push_front(source);
                self.queue.push_back(ExpansionSource::new(Rc::clone(&child)));
                return Ok(Some(child));
            }
        }
        Ok(None)
    }
}

/// Depth-first with super-node throttling.
///
/// A source whose expansion count reaches a multiple of
/// `start_threshold` is parked on a FIFO queue instead of being
/// descended further, so one hub node cannot monopolize the traversal.
pub struct ThrottledSelector {
    policy: ExpansionPolicy,
    start_threshold: usize,
    stack: Vec<ExpansionSource>,
    parked: VecDeque<ExpansionSource>,
}

impl ThrottledSelector {
    pub(crate) fn new(
        root: Rc<TraversalBranch>,
        policy: ExpansionPolicy,
        start_threshold: usize,
    ) -> Self {
        Self {
            policy,
            start_threshold: start_threshold.max(1),
            stack: vec![ExpansionSource::new(root)],
            parked: VecDeque::new(),
        }
    }
}

impl<G: GraphStore> BranchSelector<G> for ThrottledSelector {
    fn next(&mut self, graph: &G) -> TraversalResult<Option<Rc<TraversalBranch>>> {
        loop {
            let mut source = match self.stack.pop() {
                Some(source) => source,
                None => match self.parked.pop_front() {
                    Some(source) => source,
                    None => return Ok(None),
                },
            };
            match source.next_branch(graph, &self.policy)? {
                Some(child) => {
                    if source.expanded() % self.start_threshold == 0 {
                        // 产出达到阈值整数倍：按超级节点挂起，稍后再续扩
                        self.parked.push_back(source);
                    } else {
                        self.stack.push(source);
                    }
                    self.stack.push(ExpansionSource::new(Rc::clone(&child)));
                    return Ok(Some(child));
                }
                None => continue,
            }
        }
    }
}
