//! 遍历框架模块
//!
//! 包含遍历分支、前沿推进策略与单源遍历引擎

pub mod branch;
pub mod selector;
pub mod traverser;

pub use branch::TraversalBranch;
pub use selector::{BranchSelector, BreadthFirstSelector, DepthFirstSelector, ThrottledSelector};
pub use traverser::{BranchOrdering, TraversalDescription, Traverser, Uniqueness};
