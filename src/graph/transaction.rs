use crossbeam_utils::atomic::AtomicCell;
use thiserror::Error;

pub type TransactionId = u64;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Transaction already committed: {0}")]
    AlreadyCommitted(TransactionId),
    #[error("Transaction already rolled back: {0}")]
    AlreadyRolledBack(TransactionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// Read scope opened by each parallel search task.
///
/// The engine never writes, so commit/rollback only close the scope.
/// Dropping an uncommitted scope counts as a rollback and is logged.
#[derive(Debug)]
pub struct ReadTransaction {
    id: TransactionId,
    state: AtomicCell<TxState>,
}

impl ReadTransaction {
    fn new(id: TransactionId) -> Self {
        Self {
            id,
            state: AtomicCell::new(TxState::Active),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.state.load() == TxState::Active
    }

    pub fn commit(&self) -> Result<(), TransactionError> {
        match self.state.load() {
            TxState::Active => {
                self.state.store(TxState::Committed);
                Ok(())
            }
            TxState::Committed => Err(TransactionError::AlreadyCommitted(self.id)),
            TxState::RolledBack => Err(TransactionError::AlreadyRolledBack(self.id)),
        }
    }

    pub fn rollback(&self) -> Result<(), TransactionError> {
        match self.state.load() {
            TxState::Active => {
                self.state.store(TxState::RolledBack);
                Ok(())
            }
            TxState::Committed => Err(TransactionError::AlreadyCommitted(self.id)),
            TxState::RolledBack => Err(TransactionError::AlreadyRolledBack(self.id)),
        }
    }
}

impl Drop for ReadTransaction {
    fn drop(&mut self) {
        if self.state.load() == TxState::Active {
            self.state.store(TxState::RolledBack);
            log::warn!("read transaction {} dropped without commit, rolled back", self.id);
        }
    }
}

/// Hands out read transactions; shared across stitcher threads.
#[derive(Debug)]
pub struct TransactionManager {
    next_id: AtomicCell<TransactionId>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self {
            next_id: AtomicCell::new(1),
        }
    }

    pub fn begin_read(&self) -> ReadTransaction {
        ReadTransaction::new(self.next_id.fetch_add(1))
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}
