use cppdoc_store_db::StoreDb;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{CatalogError, Result, ServerError};

/// Idle handles kept around for reuse.
const MAX_IDLE: usize = 16;

/// Read-only handles to the catalog database.
///
/// Every query runs on the blocking pool with a handle of its own; the lock
/// only guards the list of idle handles.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    idle: Arc<Mutex<Vec<StoreDb>>>,
}

impl Store {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            idle: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a read-only handle off the async worker.
    ///
    /// Handles are opened on demand; a failed open is retried by the next
    /// caller.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreDb) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        let idle = self.idle.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let reused = idle.blocking_lock().pop();
            let db = match reused {
                Some(db) => db,
                None => {
                    let db = StoreDb::open_readonly(&path)?;
                    log::debug!("opened catalog database {}", path.display());
                    db
                }
            };

            let result = f(&db);

            let mut idle = idle.blocking_lock();
            if idle.len() < MAX_IDLE {
                idle.push(db);
            }
            result
        })
        .await
        .map_err(|e| {
            CatalogError::from(ServerError::Task {
                reason: e.to_string(),
            })
        })?
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(PathBuf::from("cppdoc.sqlite3"))
    }
}
