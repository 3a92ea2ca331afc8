//! Shared handler state.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// SQLite connection shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` while holding the connection lock.
    pub fn with_conn<R>(
        &self,
        op: impl FnOnce(&Connection) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::internal("database connection lock poisoned"))?;
        op(&conn)
    }
}
