//! JSON file storage for the session token pair.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use studio_core::error::StorageError;
use studio_core::{Result, TokenPair, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn corrupt(err: impl std::fmt::Display) -> StorageError {
    StorageError::Corrupt {
        message: err.to_string(),
    }
}

/// On-disk layout. Every entry is a string; the user is JSON-encoded.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// A [`TokenStore`] backed by a single JSON file.
///
/// Writes go to a temporary file that is renamed over the session file, so
/// readers see either the old pair or the new one. Concurrent processes are
/// serialized with an advisory lock on a sibling `.lock` file. On Unix the
/// session file is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to `path`. Parent directories are created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the session file was last written, if it holds a session.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let _lock = self.lock(false)?;
        Ok(self.read()?.updated_at)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Take the advisory lock; released when the returned file is dropped.
    fn lock(&self, exclusive: bool) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(StorageError::from)?;

        if exclusive {
            lock_file.lock_exclusive().map_err(StorageError::from)?;
        } else {
            lock_file.lock_shared().map_err(StorageError::from)?;
        }
        Ok(lock_file)
    }

    fn read(&self) -> Result<StoredSession> {
        if !self.path.exists() {
            return Ok(StoredSession::default());
        }

        let content = fs::read_to_string(&self.path).map_err(StorageError::from)?;
        if content.trim().is_empty() {
            return Ok(StoredSession::default());
        }
        Ok(serde_json::from_str(&content).map_err(corrupt)?)
    }

    fn write(&self, session: &StoredSession) -> Result<()> {
        let content = serde_json::to_string_pretty(session).map_err(corrupt)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let tmp_path = self.path.with_file_name(tmp_name);

        let result = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;

            #[cfg(unix)]
            {
                let mut perms = file.metadata()?.permissions();
                perms.set_mode(0o600);
                fs::set_permissions(&tmp_path, perms)?;
            }

            file.write_all(content.as_bytes())?;
            file.sync_data()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::from(err).into());
        }
        Ok(())
    }

    /// Read-modify-write under the exclusive lock.
    fn update(&self, apply: impl FnOnce(&mut StoredSession)) -> Result<()> {
        let _lock = self.lock(true)?;
        let mut session = self.read()?;
        apply(&mut session);
        session.updated_at = Some(Utc::now());
        self.write(&session)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load_tokens(&self) -> Result<Option<TokenPair>> {
        let _lock = self.lock(false)?;
        let session = self.read()?;

        let lone = session.access_token.is_some() != session.refresh_token.is_some();
        if lone {
            warn!(path = %self.path.display(), "Session file holds a lone token; treating as signed out");
        }
        Ok(TokenPair::from_parts(
            session.access_token,
            session.refresh_token,
        ))
    }

    async fn load_user(&self) -> Result<Option<serde_json::Value>> {
        let _lock = self.lock(false)?;
        match self.read()?.user {
            Some(user) => Ok(Some(serde_json::from_str(&user).map_err(corrupt)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, tokens), fields(path = %self.path.display()))]
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.update(|session| {
            session.access_token = Some(tokens.access().as_str().to_string());
            session.refresh_token = Some(tokens.refresh().as_str().to_string());
        })?;
        debug!("Stored token pair");
        Ok(())
    }

    #[instrument(skip(self, tokens, user), fields(path = %self.path.display()))]
    async fn save_session(&self, tokens: &TokenPair, user: &serde_json::Value) -> Result<()> {
        let user = serde_json::to_string(user).map_err(corrupt)?;
        self.update(|session| {
            session.access_token = Some(tokens.access().as_str().to_string());
            session.refresh_token = Some(tokens.refresh().as_str().to_string());
            session.user = Some(user);
        })?;
        debug!("Stored session");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<()> {
        let _lock = self.lock(true)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session file");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use studio_core::traits::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("session.json"))
    }

    #[tokio::test]
    async fn missing_file_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.load_tokens().await.unwrap().is_none());
        assert!(store.load_user().await.unwrap().is_none());
        assert!(store.updated_at().unwrap().is_none());
    }

    #[tokio::test]
    async fn session_written_with_local_storage_keys() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let user = json!({"id": "u1", "email": "owner@studio.example"});

        store
            .save_session(&TokenPair::from_strings("A1", "R1"), &user)
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[ACCESS_TOKEN_KEY], "A1");
        assert_eq!(raw[REFRESH_TOKEN_KEY], "R1");
        // The user entry is itself a JSON-encoded string.
        let encoded = raw[USER_KEY].as_str().unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(encoded).unwrap(), user);

        assert_eq!(store.load_user().await.unwrap(), Some(user));
        assert!(store.updated_at().unwrap().is_some());
    }

    #[tokio::test]
    async fn save_tokens_replaces_pair_and_keeps_user() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .save_session(&TokenPair::from_strings("A1", "R1"), &json!({"id": "u1"}))
            .await
            .unwrap();

        store
            .save_tokens(&TokenPair::from_strings("A2", "R2"))
            .await
            .unwrap();

        let tokens = store.load_tokens().await.unwrap().unwrap();
        assert_eq!(tokens, TokenPair::from_strings("A2", "R2"));
        assert_eq!(store.load_user().await.unwrap().unwrap()["id"], "u1");
    }

    #[tokio::test]
    async fn lone_token_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"accessToken": "A1"}"#).unwrap();

        assert!(store.load_tokens().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .save_tokens(&TokenPair::from_strings("A1", "R1"))
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
        assert!(store.load_tokens().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let err = store.load_tokens().await.unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[tokio::test]
    async fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for i in 0..3 {
            store
                .save_tokens(&TokenPair::from_strings(format!("A{i}"), format!("R{i}")))
                .await
                .unwrap();
        }

        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_private() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .save_tokens(&TokenPair::from_strings("A1", "R1"))
            .await
            .unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
