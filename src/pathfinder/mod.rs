//! 路径查找模块
//!
//! 包含全路径查找、精确深度查找、双向最短路引擎与多跳拼接器

pub mod all_paths;
pub mod exact_depth;
pub mod multi_hop;
pub mod shortest_path;

pub use all_paths::{AllPaths, AllSimplePaths};
pub use exact_depth::{ExactDepthPathFinder, ExactDepthPaths};
pub use multi_hop::MultiHopPathFinder;
pub use shortest_path::ShortestPath;
