use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// A file system watcher for the cookie jar.
///
/// Another `jot` process logging in or out rewrites the jar; the TUI polls
/// this each tick and re-derives its view state when it fires.
pub struct JarWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl JarWatcher {
    /// Start watching `jar_path`. The parent directory must exist.
    pub fn start(jar_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = super::parent_dir(jar_path).to_path_buf();
        let file_name = jar_path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic writes land as a rename onto the jar's name
                let touches_jar = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_jar {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(JarWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. True if the jar changed since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

/// Directory that must exist before a watcher can be started on `jar_path`
pub fn watch_dir(jar_path: &Path) -> PathBuf {
    super::parent_dir(jar_path).to_path_buf()
}
