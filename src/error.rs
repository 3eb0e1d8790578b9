use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("`{0}` is not installed or not in PATH.")]
    MissingTool(String),

    /// The package manager ran but exited with a non-zero status.
    #[error("`{tool} install` failed in {dir}.")]
    InstallFailed { tool: String, dir: String },

    /// The package manager could not be started at all.
    #[error("`{tool} install` could not be started in {dir}: {source}")]
    InstallSpawn {
        tool: String,
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteEnv {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
