//! Provisioning plan: which directories get installed and which get `.env` files.
//!
//! The built-in plan matches the demo repository layout. A `demo-setup.yaml`
//! in the project root can override any field; missing fields keep their
//! defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProvisionError, Result};

pub const NPM: &str = "npm";
pub const YARN: &str = "yarn";

/// Tools checked during preflight, in lookup order.
pub const REQUIRED_TOOLS: [&str; 2] = [NPM, YARN];

pub const CONFIG_FILE_NAME: &str = "demo-setup.yaml";

pub const DEFAULT_COMPANION_ORIGIN: &str = "http://localhost:8000";

const DEFAULT_NPM_DIRS: [&str; 4] = [
    "./demo/bank-app/frontend",
    "./demo/bank-app/backend",
    "./demo/dmv-app/frontend",
    "./demo/dmv-app/backend",
];
const DEFAULT_YARN_DIR: &str = "./snap";
const DEFAULT_BACKEND_ENV_DIRS: [&str; 2] = ["./demo/bank-app/backend", "./demo/dmv-app/backend"];
const DEFAULT_SNAP_ENV_DIR: &str = "./snap/packages/snap";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionPlan {
    /// Directories where `npm install` runs, in order
    pub npm_dirs: Vec<PathBuf>,
    /// Directory where `yarn install` runs after all npm installs
    pub yarn_dir: PathBuf,
    /// Directories that receive the wallet key and Infura ID
    pub backend_env_dirs: Vec<PathBuf>,
    /// Directory that receives the Infura ID and companion origin
    pub snap_env_dir: PathBuf,
    pub companion_origin: String,
}

impl Default for ProvisionPlan {
    fn default() -> Self {
        Self {
            npm_dirs: DEFAULT_NPM_DIRS.iter().map(PathBuf::from).collect(),
            yarn_dir: PathBuf::from(DEFAULT_YARN_DIR),
            backend_env_dirs: DEFAULT_BACKEND_ENV_DIRS.iter().map(PathBuf::from).collect(),
            snap_env_dir: PathBuf::from(DEFAULT_SNAP_ENV_DIR),
            companion_origin: DEFAULT_COMPANION_ORIGIN.to_string(),
        }
    }
}

/// One `<tool> install` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallStep<'a> {
    pub tool: &'static str,
    pub dir: &'a Path,
}

impl ProvisionPlan {
    /// All npm installs followed by the single yarn install.
    pub fn install_steps(&self) -> Vec<InstallStep<'_>> {
        self.npm_dirs
            .iter()
            .map(|dir| InstallStep { tool: NPM, dir })
            .chain(std::iter::once(InstallStep {
                tool: YARN,
                dir: &self.yarn_dir,
            }))
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProvisionError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| ProvisionError::Config(format!("Invalid {}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file parses as null, which serde_yaml rejects for structs.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve the plan for a project root.
    ///
    /// An explicit path must exist. Otherwise `<root>/demo-setup.yaml` is used
    /// when present, and the built-in plan when not.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ProvisionError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "loading plan from explicit config");
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading plan from project config");
            Self::load(&candidate)
        } else {
            tracing::debug!("using built-in plan");
            Ok(Self::default())
        }
    }
}

/// Resolve a plan directory against the project root.
pub fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() || root == Path::new(".") {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
