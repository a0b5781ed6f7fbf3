use std::path::{Path, PathBuf};

use crossbeam_channel::{unbounded, Receiver};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Keeps the OS watcher alive alongside the channel it feeds.
pub struct SnapshotWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl SnapshotWatcher {
    /// Drain pending change notifications; true if any arrived.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while self.changes.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

/// Watch the file's directory, since dump tools usually replace the file
/// rather than rewrite it in place.
pub fn watch_file(path: &Path) -> notify::Result<SnapshotWatcher> {
    let target: PathBuf = path.to_path_buf();
    let file_name = target.file_name().map(|name| name.to_os_string());
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (sender, changes) = unbounded::<()>();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        let Ok(event) = event else {
            return;
        };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }
        let touches_target = event
            .paths
            .iter()
            .any(|changed| changed.file_name().map(|n| n.to_os_string()) == file_name);
        if touches_target {
            let _ = sender.send(());
        }
    })?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;

    Ok(SnapshotWatcher {
        _watcher: watcher,
        changes,
    })
}
