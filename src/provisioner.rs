//! Provisioner - runs the four setup phases in order.
//!
//! tool check -> secrets -> installs -> env files. Any error aborts the
//! remaining phases; nothing already done is rolled back.

use std::path::PathBuf;

use console::style;

use crate::config::{ProvisionPlan, REQUIRED_TOOLS};
use crate::env_file::{write_env_files, EnvWriter};
use crate::error::Result;
use crate::install::{run_installs, CommandRunner};
use crate::preflight::{verify_tools_available, ToolLocator};
use crate::secrets::{collect, SecretSource};

pub struct Provisioner<'a> {
    pub root: PathBuf,
    pub plan: ProvisionPlan,
    pub locator: &'a dyn ToolLocator,
    pub secrets: &'a mut dyn SecretSource,
    pub runner: &'a dyn CommandRunner,
    pub writer: &'a dyn EnvWriter,
}

impl Provisioner<'_> {
    pub async fn run(&mut self) -> Result<()> {
        println!("{}\n", style("🚀 Project setup starting...").bold().cyan());

        tracing::info!("checking required tools");
        verify_tools_available(self.locator, &REQUIRED_TOOLS)?;

        let secrets = collect(&mut *self.secrets)?;

        let steps = self.plan.install_steps();
        tracing::info!(count = steps.len(), root = %self.root.display(), "running installs");
        run_installs(self.runner, &self.root, &steps).await?;

        write_env_files(self.writer, &self.root, &self.plan, &secrets)?;

        println!(
            "\n{}",
            style("✅ Setup complete! You're ready to go.").green().bold()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::env_file::FsWriter;
    use crate::error::ProvisionError;

    struct Locator(&'static [&'static str]);

    impl ToolLocator for Locator {
        fn locate(&self, tool: &str) -> Option<PathBuf> {
            self.0.iter().any(|t| *t == tool).then(|| PathBuf::from(tool))
        }
    }

    /// Returns fixed answers and counts how often it was asked.
    struct FixedSecrets {
        wallet: &'static str,
        infura: &'static str,
        asked: usize,
    }

    impl FixedSecrets {
        fn new(wallet: &'static str, infura: &'static str) -> Self {
            Self {
                wallet,
                infura,
                asked: 0,
            }
        }
    }

    impl SecretSource for FixedSecrets {
        fn read(&mut self, _name: &str, _prompt: &str) -> Result<String> {
            self.asked += 1;
            Ok(if self.asked == 1 { self.wallet } else { self.infura }.to_string())
        }
    }

    struct Runner {
        calls: Mutex<Vec<String>>,
        fail_tool: Option<&'static str>,
    }

    impl Runner {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_tool: None,
            }
        }

        fn failing(tool: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_tool: Some(tool),
            }
        }

        fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandRunner for Runner {
        async fn install(&self, tool: &str, _dir: &Path) -> std::io::Result<bool> {
            self.calls.lock().unwrap().push(tool.to_string());
            Ok(self.fail_tool != Some(tool))
        }
    }

    /// Project root with every env directory already created.
    fn project() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let plan = ProvisionPlan::default();
        for dir in plan.backend_env_dirs.iter().chain([&plan.snap_env_dir]) {
            std::fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        temp_dir
    }

    fn env_files(root: &Path) -> Vec<PathBuf> {
        vec![
            root.join("demo/bank-app/backend/.env"),
            root.join("demo/dmv-app/backend/.env"),
            root.join("snap/packages/snap/.env"),
        ]
    }

    #[tokio::test]
    async fn test_full_run_writes_expected_files() {
        let project = project();
        let mut secrets = FixedSecrets::new(" 0xABC ", "proj123\n");
        let runner = Runner::ok();

        Provisioner {
            root: project.path().to_path_buf(),
            plan: ProvisionPlan::default(),
            locator: &Locator(&["npm", "yarn"]),
            secrets: &mut secrets,
            runner: &runner,
            writer: &FsWriter,
        }
        .run()
        .await
        .unwrap();

        assert_eq!(runner.count(), 5);

        let files = env_files(project.path());
        for backend in &files[..2] {
            assert_eq!(
                std::fs::read_to_string(backend).unwrap(),
                "WALLET_PRIVATE_KEY=\"0xABC\"\nINFURA_PROJECT_ID=\"proj123\"\n"
            );
        }
        assert_eq!(
            std::fs::read_to_string(&files[2]).unwrap(),
            "INFURA_PROJECT_ID=\"proj123\"\nCOMPANION_APP_ORIGIN=\"http://localhost:8000\"\n"
        );
    }

    #[tokio::test]
    async fn test_missing_tool_stops_before_prompt() {
        let cases: [&'static [&'static str]; 3] = [&["yarn"], &["npm"], &[]];
        for present in cases {
            let project = project();
            let mut secrets = FixedSecrets::new("k", "i");
            let runner = Runner::ok();

            let err = Provisioner {
                root: project.path().to_path_buf(),
                plan: ProvisionPlan::default(),
                locator: &Locator(present),
                secrets: &mut secrets,
                runner: &runner,
                writer: &FsWriter,
            }
            .run()
            .await
            .unwrap_err();

            assert!(matches!(err, ProvisionError::MissingTool(_)));
            assert_eq!(secrets.asked, 0);
            assert_eq!(runner.count(), 0);
            assert!(env_files(project.path()).iter().all(|p| !p.exists()));
        }
    }

    #[tokio::test]
    async fn test_install_failure_writes_nothing() {
        let project = project();
        let mut secrets = FixedSecrets::new("k", "i");
        let runner = Runner::failing("yarn");

        let err = Provisioner {
            root: project.path().to_path_buf(),
            plan: ProvisionPlan::default(),
            locator: &Locator(&["npm", "yarn"]),
            secrets: &mut secrets,
            runner: &runner,
            writer: &FsWriter,
        }
        .run()
        .await
        .unwrap_err();

        assert!(matches!(err, ProvisionError::InstallFailed { ref tool, .. } if tool == "yarn"));
        assert_eq!(runner.count(), 5);
        assert!(env_files(project.path()).iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn test_first_npm_failure_skips_remaining_installs() {
        let project = project();
        let mut secrets = FixedSecrets::new("k", "i");
        let runner = Runner::failing("npm");

        let result = Provisioner {
            root: project.path().to_path_buf(),
            plan: ProvisionPlan::default(),
            locator: &Locator(&["npm", "yarn"]),
            secrets: &mut secrets,
            runner: &runner,
            writer: &FsWriter,
        }
        .run()
        .await;

        assert!(result.is_err());
        assert_eq!(runner.count(), 1);
    }

    #[tokio::test]
    async fn test_second_run_overwrites_identically() {
        let project = project();
        let mut snapshots = Vec::new();

        for _ in 0..2 {
            let mut secrets = FixedSecrets::new("0xABC", "proj123");
            Provisioner {
                root: project.path().to_path_buf(),
                plan: ProvisionPlan::default(),
                locator: &Locator(&["npm", "yarn"]),
                secrets: &mut secrets,
                runner: &Runner::ok(),
                writer: &FsWriter,
            }
            .run()
            .await
            .unwrap();

            let contents: Vec<String> = env_files(project.path())
                .iter()
                .map(|p| std::fs::read_to_string(p).unwrap())
                .collect();
            snapshots.push(contents);
        }

        assert_eq!(snapshots[0], snapshots[1]);
    }
}
