//! Process-scoped bookkeeping for the hot file.
//!
//! The framework treats the presence of the hot file as "a dev server is
//! running", so it must disappear when the process goes away. Cleanup runs
//! from a single termination watcher per process, however many plugin
//! instances were created.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{PluginError, Result};

/// Delay before announcing a freshly created hot-file directory, so the
/// message lands after the host's own startup banner.
pub const HOT_DIR_LOG_DELAY: Duration = Duration::from_millis(200);

/// Hot files written by the plugins of a session, and whether its exit handlers run.
#[derive(Debug)]
pub struct PluginSession {
    hot_files: Mutex<Vec<PathBuf>>,
    handlers_bound: AtomicBool,
    watch_stdin: bool,
}

impl Default for PluginSession {
    fn default() -> Self {
        Self {
            hot_files: Mutex::new(Vec::new()),
            handlers_bound: AtomicBool::new(false),
            watch_stdin: true,
        }
    }
}

impl PluginSession {
    /// A private session; most callers want [`PluginSession::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The session shared by every plugin in this process.
    pub fn global() -> Arc<Self> {
        static SESSION: OnceLock<Arc<PluginSession>> = OnceLock::new();
        SESSION.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Whether closing stdin terminates the process. On by default: a host
    /// spawned by the framework exits when its parent goes away.
    pub fn with_stdin_watch(mut self, watch: bool) -> Self {
        self.watch_stdin = watch;
        self
    }

    /// Whether the termination watcher is installed.
    pub fn handlers_bound(&self) -> bool {
        self.handlers_bound.load(Ordering::Acquire)
    }

    /// Hot files written so far and not yet cleaned.
    pub fn hot_files(&self) -> Vec<PathBuf> {
        self.hot_files.lock().clone()
    }

    /// Write `contents` to the hot file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// `HotFile` when the directory or the file cannot be written.
    pub fn write_hot_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| PluginError::hot_file(dir, e))?;
                announce_directory(dir.to_path_buf());
            }
        }

        fs::write(path, contents).map_err(|e| PluginError::hot_file(path, e))?;
        debug!(path = %path.display(), contents, "hot file written");

        let mut hot_files = self.hot_files.lock();
        if !hot_files.iter().any(|written| written == path) {
            hot_files.push(path.to_path_buf());
        }

        Ok(())
    }

    /// Remove every hot file this session wrote. Safe to call repeatedly.
    pub fn clean(&self) {
        for path in self.hot_files.lock().drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "hot file removed"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove hot file"),
            }
        }
    }

    /// Spawn the termination watcher on the current tokio runtime.
    ///
    /// Returns `true` if this call installed it. Later calls, and calls made
    /// outside a runtime, do nothing.
    pub fn install_exit_handlers(self: &Arc<Self>) -> bool {
        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime; hot file cleanup handlers not installed");
            return false;
        };

        if self.handlers_bound.swap(true, Ordering::AcqRel) {
            return false;
        }

        let session = Arc::clone(self);
        handle.spawn(async move {
            let reason = wait_for_termination(session.watch_stdin).await;
            info!(reason, "shutting down");
            session.clean();
            std::process::exit(0);
        });

        true
    }
}

/// A session going away takes its hot files with it. The global session is
/// never dropped; it relies on `clean` and the termination watcher.
impl Drop for PluginSession {
    fn drop(&mut self) {
        self.clean();
    }
}

fn announce_directory(dir: PathBuf) {
    let announce = move || {
        let dir = fs::canonicalize(&dir).unwrap_or(dir);
        info!("Hot file directory created {}", dir.display());
    };

    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(HOT_DIR_LOG_DELAY).await;
                announce();
            });
        }
        Err(_) => announce(),
    }
}

/// Resolves with the name of whichever termination event fired first.
#[cfg(unix)]
async fn wait_for_termination(watch_stdin: bool) -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate()).ok();
    let mut hangup = signal(SignalKind::hangup()).ok();

    tokio::select! {
        Ok(()) = tokio::signal::ctrl_c() => "interrupt",
        _ = recv(&mut terminate) => "terminate",
        _ = recv(&mut hangup) => "hangup",
        _ = stdin_closed(watch_stdin) => "stdin closed",
    }
}

#[cfg(not(unix))]
async fn wait_for_termination(watch_stdin: bool) -> &'static str {
    tokio::select! {
        Ok(()) = tokio::signal::ctrl_c() => "interrupt",
        _ = stdin_closed(watch_stdin) => "stdin closed",
    }
}

#[cfg(unix)]
async fn recv(signal: &mut Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending().await,
    }
}

/// Drain stdin until it reports end of file; never resolves when unwatched.
async fn stdin_closed(watch: bool) {
    use tokio::io::AsyncReadExt;

    if !watch {
        return std::future::pending().await;
    }

    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 1024];
    loop {
        match stdin.read(&mut buf).await {
            Ok(0) => return,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "stdin unreadable; not watching it");
                std::future::pending::<()>().await;
            }
        }
    }
}
