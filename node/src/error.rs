use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] badged_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] badged_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] badged_store_lmdb::LmdbError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session already stopped")]
    SessionStopped,

    #[error("shutdown timeout")]
    ShutdownTimeout,
}
