//! `.env` rendering and writing.
//!
//! Values are interpolated verbatim between double quotes. A value that
//! itself contains `"` or a line break produces a file most dotenv parsers
//! will misread; that case is logged, not rewritten.

use std::path::{Path, PathBuf};

use console::style;

use crate::config::{resolve, ProvisionPlan};
use crate::error::{ProvisionError, Result};
use crate::secrets::{Secrets, INFURA_ID_VAR, WALLET_KEY_VAR};

pub const ENV_FILE_NAME: &str = ".env";
pub const COMPANION_ORIGIN_VAR: &str = "COMPANION_APP_ORIGIN";

/// Writes file contents, replacing anything already at the path.
pub trait EnvWriter {
    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl EnvWriter for FsWriter {
    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Ordered `KEY="value"` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(&'static str, String)>,
}

impl EnvFile {
    pub fn backend(secrets: &Secrets) -> Self {
        Self {
            entries: vec![
                (WALLET_KEY_VAR, secrets.wallet_private_key.clone()),
                (INFURA_ID_VAR, secrets.infura_project_id.clone()),
            ],
        }
    }

    pub fn snap(secrets: &Secrets, companion_origin: &str) -> Self {
        Self {
            entries: vec![
                (INFURA_ID_VAR, secrets.infura_project_id.clone()),
                (COMPANION_ORIGIN_VAR, companion_origin.to_string()),
            ],
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if breaks_quoting(value) {
                tracing::warn!(key = *key, "value contains a quote or line break; .env may not parse");
            }
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push_str("\"\n");
        }
        out
    }
}

fn breaks_quoting(value: &str) -> bool {
    value.contains(['"', '\n', '\r'])
}

/// Render and write one file, returning the path written.
fn write_one(writer: &dyn EnvWriter, root: &Path, dir: &Path, file: &EnvFile) -> Result<PathBuf> {
    let path = resolve(root, dir).join(ENV_FILE_NAME);
    writer
        .write(&path, &file.render())
        .map_err(|source| ProvisionError::WriteEnv {
            path: path.clone(),
            source,
        })?;
    println!("{} Wrote .env file to {}", style("✅").green(), dir.display());
    Ok(path)
}

/// Write every backend file, then the snap file. Stops at the first failure.
pub fn write_env_files(
    writer: &dyn EnvWriter,
    root: &Path,
    plan: &ProvisionPlan,
    secrets: &Secrets,
) -> Result<Vec<PathBuf>> {
    let backend = EnvFile::backend(secrets);
    let mut written = Vec::with_capacity(plan.backend_env_dirs.len() + 1);

    for dir in &plan.backend_env_dirs {
        written.push(write_one(writer, root, dir, &backend)?);
    }

    let snap = EnvFile::snap(secrets, &plan.companion_origin);
    written.push(write_one(writer, root, &plan.snap_env_dir, &snap)?);

    tracing::info!(count = written.len(), "env files written");
    Ok(written)
}
