use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};

use crate::api::SessionUser;
use crate::errors::ClientError;

/// Where the logged-in user record lives between runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<SessionUser>, ClientError>;

    fn save(&self, user: &SessionUser) -> Result<(), ClientError>;

    fn clear(&self) -> Result<(), ClientError>;

    /// When the stored record was last written, if the store can tell.
    fn saved_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Ephemeral store; forgotten when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<SessionUser>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held (0 or 1).
    pub fn len(&self) -> usize {
        self.slot().map(|guard| guard.iter().count()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<SessionUser>>, ClientError> {
        self.user
            .lock()
            .map_err(|err| ClientError::SessionStore(err.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionUser>, ClientError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, user: &SessionUser) -> Result<(), ClientError> {
        *self.slot()? = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Persists the record as JSON, staging writes through a temporary file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionUser>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, user: &SessionUser) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(user)?;
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn saved_at(&self) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}
