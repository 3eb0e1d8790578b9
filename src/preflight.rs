//! Pre-flight checks before provisioning
//!
//! Verifies every required package manager is on PATH before anything is
//! prompted, installed or written.

use std::path::PathBuf;

use crate::error::{ProvisionError, Result};

/// Resolves executable names the way the shell would.
pub trait ToolLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Looks tools up in the process PATH.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }
}

/// Fail on the first tool that cannot be found.
pub fn verify_tools_available(locator: &dyn ToolLocator, tools: &[&str]) -> Result<()> {
    for tool in tools {
        match locator.locate(tool) {
            Some(path) => tracing::debug!(tool, path = %path.display(), "found tool"),
            None => return Err(ProvisionError::MissingTool(tool.to_string())),
        }
    }
    Ok(())
}
