//! Storage path resolution for the durable event log.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the full storage directory.
pub const STORAGE_DIR_ENV: &str = "WARDEN_STORAGE_DIR";

/// Returns the directory used for durable event-log storage.
///
/// `WARDEN_STORAGE_DIR` wins when set. Otherwise a platform-appropriate
/// data directory is used, namespaced by the current project directory
/// name:
/// - Linux: `~/.local/share/Warden/<project>`
/// - macOS: `~/Library/Application Support/Warden/<project>`
/// - Windows: `%LOCALAPPDATA%\Warden\<project>`
pub fn data_storage_path() -> PathBuf {
    if let Ok(dir) = env::var(STORAGE_DIR_ENV) {
        return PathBuf::from(dir);
    }

    let project = project_directory_name();
    let base = if cfg!(target_os = "windows") {
        let local = env::var("LOCALAPPDATA")
            .or_else(|_| env::var("APPDATA"))
            .unwrap_or_else(|_| "C:\\tmp".to_string());
        PathBuf::from(local)
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        if cfg!(target_os = "macos") {
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
        } else {
            PathBuf::from(home).join(".local").join("share")
        }
    };

    base.join("Warden").join(project)
}

/// Name of the current project directory, used to namespace storage.
///
/// Falls back to `"warden_default"` when the working directory cannot be
/// resolved.
pub fn project_directory_name() -> String {
    env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "warden_default".to_string())
}
