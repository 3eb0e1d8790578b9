//! Package manager invocations.

use std::path::Path;

use async_trait::async_trait;
use console::style;

use crate::config::{resolve, InstallStep};
use crate::error::{ProvisionError, Result};

/// Runs `<tool> install` in a working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns whether the command exited successfully.
    ///
    /// An `Err` means the process could not be started.
    async fn install(&self, tool: &str, dir: &Path) -> std::io::Result<bool>;
}

/// Spawns the real package manager with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn install(&self, tool: &str, dir: &Path) -> std::io::Result<bool> {
        let status = tokio::process::Command::new(tool)
            .arg("install")
            .current_dir(dir)
            .status()
            .await?;

        tracing::debug!(tool, dir = %dir.display(), code = ?status.code(), "install exited");
        Ok(status.success())
    }
}

/// Run every step in order, stopping at the first failure.
pub async fn run_installs(
    runner: &dyn CommandRunner,
    root: &Path,
    steps: &[InstallStep<'_>],
) -> Result<()> {
    for step in steps {
        let shown = step.dir.display().to_string();
        println!(
            "🔧 Running {} in {}...",
            style(format!("`{} install`", step.tool)).cyan(),
            shown
        );

        let dir = resolve(root, step.dir);
        match runner.install(step.tool, &dir).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ProvisionError::InstallFailed {
                    tool: step.tool.to_string(),
                    dir: shown,
                })
            }
            Err(source) => {
                return Err(ProvisionError::InstallSpawn {
                    tool: step.tool.to_string(),
                    dir: shown,
                    source,
                })
            }
        }
    }

    tracing::info!(count = steps.len(), "all installs succeeded");
    Ok(())
}
