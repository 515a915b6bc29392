use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Longest wait for another process to finish writing
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Exclusive advisory lock on a single data file, held until dropped.
///
/// The lock lives on a sibling `<file>.lock` that is never deleted, so every
/// process contends on the same inode. The TUI and any number of CLI runs
/// take it around each read-modify-write of the cookie jar.
#[derive(Debug)]
pub struct WriteLock {
    file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {path}: another jot process is writing")]
    Busy { path: PathBuf },
}

/// `cookies.json` -> `cookies.json.lock`
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("jot"));
    name.push(".lock");
    target.with_file_name(name)
}

impl WriteLock {
    /// Lock `target`, polling with backoff for up to `wait`
    pub fn acquire(target: &Path, wait: Duration) -> Result<Self, LockError> {
        let path = lock_path(target);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::Open {
                path: path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + wait;
        let mut pause = Duration::from_millis(2);
        while !try_lock(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Busy { path });
            }
            std::thread::sleep(pause);
            pause = (pause * 2).min(Duration::from_millis(50));
        }
        Ok(WriteLock { file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        unlock(&self.file);
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor belongs to `file`, which outlives the call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: as above
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> bool {
    true
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}
