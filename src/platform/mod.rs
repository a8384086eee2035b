// Linkcatalog platform abstraction
// Resolves where settings and the catalog database live on each OS.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "LINKCATALOG_DATA_DIR";

/// Returns the platform-specific configuration directory for Linkcatalog.
///
/// - **Linux**: `~/.config/linkcatalog` (or `$XDG_CONFIG_HOME/linkcatalog`)
/// - **macOS**: `~/Library/Application Support/Linkcatalog`
/// - **Windows**: `%APPDATA%/Linkcatalog`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding the catalog database.
///
/// `$LINKCATALOG_DATA_DIR` wins when set; otherwise the platform default
/// (`~/.local/share/linkcatalog` on Linux, same as config on macOS/Windows).
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
