//! 图访问模块
//!
//! 包含图读取接口、内存实现、关系扩展器、路径表示与读事务

pub mod expander;
pub mod memory;
pub mod path;
pub mod store;
pub mod transaction;

pub use expander::RelationshipExpander;
pub use memory::MemoryGraph;
pub use path::{Path, PathBuilder};
pub use store::GraphStore;
pub use transaction::{ReadTransaction, TransactionError, TransactionId, TransactionManager};
