//! Credential persistence.
//!
//! The browser build kept the bearer token in `localStorage`; the terminal
//! client keeps it in a small file. Only the session store and the HTTP
//! layer's 401 handler ever write through this trait.

use std::{fs, io, path::PathBuf};

use mockall::automock;
use thiserror::Error;

/// Errors raised by credential storage.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// Underlying filesystem failure.
    #[error("credential storage error")]
    Io(#[from] io::Error),
}

/// Durable storage for the bearer credential.
#[automock]
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend cannot be read.
    fn load(&self) -> Result<Option<String>, CredentialStoreError>;

    /// Persist a credential, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend cannot be written.
    fn save(&self, token: &str) -> Result<(), CredentialStoreError>;

    /// Remove the persisted credential. Removing an absent credential is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend cannot be written.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// File-backed [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store persisting to the given path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, CredentialStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();

                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, token)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credential"))
    }

    #[test]
    fn load_returns_none_when_missing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        assert_eq!(store.load()?, None);

        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.save("token-123")?;

        assert_eq!(store.load()?, Some("token-123".to_string()));

        Ok(())
    }

    #[test]
    fn clear_removes_credential_and_is_idempotent() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.save("token-123")?;
        store.clear()?;
        store.clear()?;

        assert_eq!(store.load()?, None);

        Ok(())
    }

    #[test]
    fn whitespace_only_file_loads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.save("  \n")?;

        assert_eq!(store.load()?, None);

        Ok(())
    }
}
