use crate::core::db;
use crate::core::error;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ulid::Ulid;

/// The DB Broker is the single doorway to the catalog database.
/// It serializes in-process access and records an audit event for every
/// store touch; the core itself never writes to stdout or a log file.
pub struct DbBroker {
    audit_log_path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BrokerEvent {
    pub ts: String,
    pub event_id: String,
    pub actor: String,
    pub op: String,
    pub db_id: String,
    pub status: String,
}

/// Unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

impl DbBroker {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            audit_log_path: data_dir.join("broker.events.jsonl"),
        }
    }

    /// Execute a closure with a serialized connection to the catalog DB.
    ///
    /// The connection is handed out mutably so write paths can open a
    /// `rusqlite` transaction scoped to the closure.
    pub fn with_conn<F, R>(
        &self,
        db_path: &Path,
        actor: &str,
        op_name: &str,
        f: F,
    ) -> Result<R, error::ShelfError>
    where
        F: FnOnce(&mut Connection) -> Result<R, error::ShelfError>,
    {
        static DB_LOCK: Mutex<()> = Mutex::new(());
        let _lock = DB_LOCK.lock().unwrap();

        let db_id = db_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mut conn = db::db_connect(&db_path.to_string_lossy())?;

        let result = f(&mut conn);

        let status = if result.is_ok() { "success" } else { "error" };
        self.log_event(actor, op_name, &db_id, status)?;

        result
    }

    fn log_event(
        &self,
        actor: &str,
        op: &str,
        db_id: &str,
        status: &str,
    ) -> Result<(), error::ShelfError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let ev = BrokerEvent {
            ts: now_epoch_z(),
            event_id: Ulid::new().to_string(),
            actor: actor.to_string(),
            op: op.to_string(),
            db_id: db_id.to_string(),
            status: status.to_string(),
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_log_path)
            .map_err(error::ShelfError::IoError)?;

        writeln!(f, "{}", serde_json::to_string(&ev).unwrap()).map_err(error::ShelfError::IoError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_epoch_z_format() {
        let ts = now_epoch_z();
        assert!(ts.ends_with('Z'));
        assert!(ts.trim_end_matches('Z').parse::<u64>().is_ok());
    }
}
