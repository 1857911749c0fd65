use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::AppError;
use crate::models::Db;
use crate::store;

// Shared by all handlers. The mutex serializes every load/modify/save
// cycle and every schedule run, so a run always sees one consistent
// snapshot of the calendar.
pub struct AppState {
    pub config: Config,
    db_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            db_lock: Mutex::new(()),
        })
    }

    pub async fn read<T>(
        &self,
        f: impl FnOnce(&Db) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.db_lock.lock().await;
        let db = store::load_db(&self.config.db_path)?;
        f(&db)
    }

    // Nothing is written when `f` fails.
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut Db) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.db_lock.lock().await;
        let mut db = store::load_db(&self.config.db_path)?;
        let out = f(&mut db)?;
        store::save_db(&self.config.db_path, &db)?;
        Ok(out)
    }
}

// Local time with the current system offset
pub fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}
