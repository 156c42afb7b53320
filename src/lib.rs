//! graph-traversal - Graph traversal and bidirectional shortest-path engine
//!
//! This crate provides the path-finding core consumed by higher layers:
//! single-source traversals (all paths, simple paths, exact depth) and a
//! bidirectional breadth-first shortest-path search with a multi-hop
//! waypoint stitcher on top.

pub mod config;
pub mod core;
pub mod graph;
pub mod pathfinder;
pub mod traversal;

pub use crate::config::TraversalConfig;
pub use crate::core::{
    Direction, NodeId, Relationship, RelationshipId, TraversalError, TraversalResult,
};
pub use crate::graph::{GraphStore, MemoryGraph, Path, PathBuilder, RelationshipExpander};
pub use crate::pathfinder::{
    AllPaths, AllSimplePaths, ExactDepthPathFinder, MultiHopPathFinder, ShortestPath,
};
pub use crate::traversal::{TraversalDescription, Traverser, Uniqueness};
