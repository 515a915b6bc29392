use std::path::PathBuf;

/// Default config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("jot").join("config.toml")
}

/// Directory for the cookie jar and log file, respecting XDG_DATA_HOME
pub fn data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_dir.join("jot")
}

pub fn default_cookie_file() -> PathBuf {
    data_dir().join("cookies.json")
}

pub fn default_log_file() -> PathBuf {
    data_dir().join("jot.log")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
