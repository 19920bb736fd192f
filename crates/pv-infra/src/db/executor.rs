use std::sync::Arc;

use anyhow::Result;
use diesel::SqliteConnection;
use tokio::task;

use crate::db::pool::DbPool;

/// Runs Diesel work on the blocking thread pool.
///
/// The save flow keeps several database writes in flight at once on the async
/// runtime; pushing each unit of Diesel work through `spawn_blocking` keeps
/// those writes from stalling the runtime workers.
#[derive(Clone)]
pub struct SqliteExecutor {
    pool: Arc<DbPool>,
}

impl SqliteExecutor {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|err| anyhow::anyhow!("database task failed to join: {err}"))?
    }
}
