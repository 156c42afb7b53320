//! 统一错误处理
//!
//! 各子模块按需定义自己的错误枚举，再通过 `#[from]` 汇聚到
//! [`TraversalError`]；`TraversalResult<T>` 提供统一的返回类型。
//! 注意"未找到路径"不是错误，以空结果表达。

use thiserror::Error;

use crate::core::types::{NodeId, RelationshipId};

/// 统一的遍历引擎错误类型
#[derive(Error, Debug)]
pub enum TraversalError {
    #[error("图访问错误: {0}")]
    Graph(#[from] GraphError),

    #[error("路径错误: {0}")]
    Path(#[from] PathError),

    #[error("事务错误: {0}")]
    Transaction(#[from] crate::graph::transaction::TransactionError),

    #[error("配置错误: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// 图访问层错误
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("节点不存在: {0}")]
    NodeNotFound(NodeId),

    #[error("关系不存在: {0}")]
    RelationshipNotFound(RelationshipId),
}

/// 路径构造错误
#[derive(Error, Debug)]
pub enum PathError {
    #[error("半路径无法合并，两端不相交: {left} 与 {right}")]
    DisjointMerge { left: NodeId, right: NodeId },

    #[error("航点数量不足，至少需要 2 个，实际 {0} 个")]
    TooFewWaypoints(usize),
}

/// 统一返回类型
pub type TraversalResult<T> = Result<T, TraversalError>;
