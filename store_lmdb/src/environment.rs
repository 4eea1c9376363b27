//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::kv::LmdbKvStore;
use crate::LmdbError;

/// Name of the database holding ledger keys.
pub const KV_DB_NAME: &str = "kv";

/// Named databases the environment is expected to contain.
pub(crate) const EXPECTED_DATABASES: &[&str] = &[KV_DB_NAME];

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    kv_db: Database<Str, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    ///
    /// The directory is created if it does not exist yet.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this
        // process and its memory map is never mutated outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let kv_db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some(KV_DB_NAME))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            kv_db,
            path: path.to_path_buf(),
        })
    }

    /// The key/value store view over this environment.
    pub fn kv_store(&self) -> LmdbKvStore {
        LmdbKvStore {
            env: Arc::clone(&self.env),
            kv_db: self.kv_db,
        }
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
