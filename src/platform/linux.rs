// Linkcatalog platform paths for Linux
// Config: ~/.config/linkcatalog
// Data:   ~/.local/share/linkcatalog

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/linkcatalog` if set, otherwise `~/.config/linkcatalog`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("linkcatalog"),
        _ => home_dir().join(".config").join("linkcatalog"),
    }
}

/// Uses `$XDG_DATA_HOME/linkcatalog` if set, otherwise `~/.local/share/linkcatalog`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("linkcatalog"),
        _ => home_dir().join(".local").join("share").join("linkcatalog"),
    }
}
