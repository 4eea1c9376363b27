use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("store error: {0}")]
    Store(#[from] badged_store::StoreError),

    #[error("failed to encode badge set: {0}")]
    Encode(String),
}
