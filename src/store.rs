use std::{fs, io, path::Path};

use tracing::info;

use crate::error::StoreError;
use crate::models::Db;

// A missing file is a fresh install: default preferences, no tasks.
pub fn load_db(path: &Path) -> Result<Db, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} not found, starting with defaults", path.display());
            return Ok(Db::default());
        }
        Err(e) => return Err(e.into()),
    };
    let db: Db = serde_json::from_str(&text)?;
    Ok(db)
}

// Write to a temp file and rename so readers never see a half-written db.
pub fn save_db(path: &Path, db: &Db) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("json.tmp");
    let text = serde_json::to_string_pretty(db)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
