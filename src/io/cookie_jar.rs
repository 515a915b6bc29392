use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::atomic_write;
use super::lock::{self, LockError, WriteLock};

/// Bytes escaped in stored values: everything except the unreserved marks
/// that URI components leave alone.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Path every cookie is scoped to
pub const ROOT_PATH: &str = "/";

/// A single cookie record as stored on disk. `value` is percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl StoredCookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JarFile {
    #[serde(default)]
    cookies: Vec<StoredCookie>,
}

/// Error type for cookie jar operations
#[derive(Debug, thiserror::Error)]
pub enum JarError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cookie jar {path} is not valid JSON: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// File-backed key-value store with per-entry expiry, modeled on a browser
/// cookie store scoped to path `/`.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CookieJar { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `value` under `name`, expiring `days` from now. Overwrites any
    /// prior value. A non-positive `days` writes an already-expired cookie,
    /// which deletes it.
    pub fn set(&self, name: &str, value: &str, days: i64) -> Result<(), JarError> {
        self.set_at(name, value, days, Utc::now())
    }

    pub fn set_at(
        &self,
        name: &str,
        value: &str,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<(), JarError> {
        let cookie = StoredCookie {
            name: name.to_string(),
            value: utf8_percent_encode(value, COOKIE_VALUE).to_string(),
            path: ROOT_PATH.to_string(),
            expires: now + Duration::days(days),
        };
        self.update(now, |cookies| {
            cookies.retain(|c| c.name != cookie.name);
            cookies.push(cookie);
        })
    }

    /// Current decoded value of `name`, or None if absent or expired
    pub fn get(&self, name: &str) -> Result<Option<String>, JarError> {
        self.get_at(name, Utc::now())
    }

    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Result<Option<String>, JarError> {
        let jar = self.read()?;
        Ok(jar
            .cookies
            .iter()
            .filter(|c| c.name == name && c.path == ROOT_PATH && c.is_live(now))
            .last()
            .map(|c| percent_decode_str(&c.value).decode_utf8_lossy().into_owned()))
    }

    /// Delete `name` by overwriting it with an expiry in the past
    pub fn remove(&self, name: &str) -> Result<(), JarError> {
        self.set(name, "", -1)
    }

    fn read(&self) -> Result<JarFile, JarError> {
        if !self.path.exists() {
            return Ok(JarFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| JarError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(JarFile::default());
        }
        serde_json::from_str(&content).map_err(|e| JarError::ParseError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Locked read-modify-write. Expired cookies are pruned on every write.
    fn update(
        &self,
        now: DateTime<Utc>,
        mutate: impl FnOnce(&mut Vec<StoredCookie>),
    ) -> Result<(), JarError> {
        let dir = super::parent_dir(&self.path);
        fs::create_dir_all(dir).map_err(|e| JarError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let _lock = WriteLock::acquire(&self.path, lock::DEFAULT_WAIT)?;

        let mut jar = match self.read() {
            Ok(jar) => jar,
            Err(JarError::ParseError { path, source }) => {
                warn!(path = %path.display(), error = %source, "cookie jar unreadable, starting fresh");
                back_up(&path);
                JarFile::default()
            }
            Err(e) => return Err(e),
        };

        mutate(&mut jar.cookies);
        jar.cookies.retain(|c| c.is_live(now));

        let content = serde_json::to_string_pretty(&jar).map_err(|e| JarError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| JarError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Copy an unreadable jar to `<name>.json.bak` before it is replaced.
/// Returns the backup path if the copy was made.
fn back_up(path: &Path) -> Option<PathBuf> {
    let bak = path.with_extension("json.bak");
    match fs::copy(path, &bak) {
        Ok(_) => {
            warn!(backup = %bak.display(), "kept a copy of the unreadable cookie jar");
            Some(bak)
        }
        Err(e) => {
            warn!(backup = %bak.display(), error = %e, "could not back up cookie jar");
            None
        }
    }
}
