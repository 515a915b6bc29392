use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

use super::{atomic_write, parent_dir, paths};

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {path}: {message}")]
    Invalid { path: PathBuf, message: String },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let text = read_text(path)?;
    let config: ClientConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config).map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(config)
}

/// Values that parse but cannot work
fn validate(config: &ClientConfig) -> Result<(), String> {
    if config.session.token_days < 1 {
        return Err(format!(
            "session.token_days must be at least 1 (got {})",
            config.session.token_days
        ));
    }
    Ok(())
}

/// Load the effective config: the file at `path` (or the default location),
/// with `api_url` taking precedence over the file's base URL when given.
pub fn load_config(
    path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<ClientConfig, ConfigError> {
    let path = path.map_or_else(paths::config_path, Path::to_path_buf);
    let mut config = read_config(&path)?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    Ok(config)
}

/// Persist a new base URL, preserving the rest of the file's formatting.
pub fn set_base_url(path: &Path, url: &str) -> Result<(), ConfigError> {
    let text = read_text(path)?;
    let mut doc: toml_edit::DocumentMut =
        text.parse().map_err(|e| ConfigError::EditError {
            path: path.to_path_buf(),
            source: e,
        })?;
    set_base_url_in(&mut doc, url);

    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    fs::create_dir_all(parent_dir(path)).map_err(write_err)?;
    atomic_write(path, doc.to_string().as_bytes()).map_err(write_err)
}

/// Update `[api] base_url` in the config document
pub fn set_base_url_in(doc: &mut toml_edit::DocumentMut, url: &str) {
    if !doc.contains_key("api") {
        doc["api"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["api"]["base_url"] = toml_edit::value(url);
}

fn read_text(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
