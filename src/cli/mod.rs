use std::path::PathBuf;

use clap::Parser;

use crate::config::ProvisionPlan;
use crate::env_file::FsWriter;
use crate::error::Result;
use crate::install::ProcessRunner;
use crate::preflight::PathLocator;
use crate::provisioner::Provisioner;
use crate::secrets::{EnvSecrets, SecretSource, TerminalPrompt};

#[derive(Parser, Debug)]
#[command(name = "demo-setup")]
#[command(version)]
#[command(about = "Install demo app dependencies and write their .env files")]
#[command(long_about = "Checks that npm and yarn are available, asks for a wallet private key and an Infura project ID, runs every install, then writes the backend and snap .env files.\n\nStops at the first failure.")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Project root that the plan's directories are relative to
    #[arg(long, env = "DEMO_SETUP_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Plan override file (default: <root>/demo-setup.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read WALLET_PRIVATE_KEY and INFURA_PROJECT_ID from the environment instead of prompting
    #[arg(long)]
    pub from_env: bool,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let plan = ProvisionPlan::discover(&self.root, self.config.as_deref())?;

        let mut prompt = TerminalPrompt;
        let mut env = EnvSecrets;
        let secrets: &mut dyn SecretSource = if self.from_env {
            &mut env
        } else {
            &mut prompt
        };

        Provisioner {
            root: self.root,
            plan,
            locator: &PathLocator,
            secrets,
            runner: &ProcessRunner,
            writer: &FsWriter,
        }
        .run()
        .await
    }
}
