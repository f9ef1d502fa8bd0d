//! Token store backed by one file per key inside a directory.
//!
//! Files are written to a staging name and renamed into place, so a reader
//! never observes a partially written token.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::TokenPair;
use crate::domain::ports::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStore, TokenStoreError};

/// Token store persisting each token as a file in one directory.
#[derive(Debug)]
pub struct DirTokenStore {
    dir: Dir,
    path: PathBuf,
    writes: Mutex<()>,
}

impl DirTokenStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TokenStoreError> {
        let root = path.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|error| io_error(root, &error))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|error| io_error(root, &error))?;
        debug!(path = %root.display(), "token directory opened");
        Ok(Self {
            dir,
            path: root.to_path_buf(),
            writes: Mutex::new(()),
        })
    }

    /// Directory the tokens live in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_key(&self, key: &str) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        let raw = match self.dir.read_to_string(key) {
            Ok(raw) => Zeroizing::new(raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&self.path.join(key), &error)),
        };
        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(TokenStoreError::invalid_token(key));
        }
        Ok(Some(Zeroizing::new(token.to_owned())))
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let staging = format!(".{key}.tmp");
        self.dir
            .write(&staging, value.as_bytes())
            .map_err(|error| io_error(&self.path.join(&staging), &error))?;
        self.dir
            .rename(&staging, &self.dir, key)
            .map_err(|error| io_error(&self.path.join(key), &error))
    }

    fn remove_key(&self, key: &str) -> Result<(), TokenStoreError> {
        match self.dir.remove_file(key) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.path.join(key), &error)),
        }
    }
}

fn io_error(path: &Path, error: &io::Error) -> TokenStoreError {
    TokenStoreError::io(format!("{}: {error}", path.display()))
}

impl TokenStore for DirTokenStore {
    fn access_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        self.read_key(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        self.read_key(REFRESH_TOKEN_KEY)
    }

    fn store(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_key(ACCESS_TOKEN_KEY, tokens.access())?;
        self.write_key(REFRESH_TOKEN_KEY, tokens.refresh())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        self.remove_key(ACCESS_TOKEN_KEY)?;
        self.remove_key(REFRESH_TOKEN_KEY)
    }
}
