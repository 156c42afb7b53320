//! 核心模块
//!
//! 包含遍历引擎的基础类型与统一错误处理

pub mod error;
pub mod types;

pub use error::{GraphError, PathError, TraversalError, TraversalResult};
pub use types::{Direction, NodeId, Relationship, RelationshipId};
