use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database '{0}' is missing")]
    MissingDatabase(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for badged_store::StoreError {
    fn from(e: LmdbError) -> Self {
        badged_store::StoreError::Backend(e.to_string())
    }
}
