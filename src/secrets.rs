//! Operator-supplied secrets.
//!
//! Values are trimmed and otherwise accepted as-is: no length or format
//! checks, empty strings included.

use std::io::{BufRead, IsTerminal, Write};

use console::Term;
use dialoguer::Input;

use crate::error::{ProvisionError, Result};

pub const WALLET_KEY_VAR: &str = "WALLET_PRIVATE_KEY";
pub const INFURA_ID_VAR: &str = "INFURA_PROJECT_ID";

const WALLET_KEY_PROMPT: &str = "🔑 Enter your Ethereum wallet private key";
const INFURA_ID_PROMPT: &str = "🔌 Enter your Infura testnet project ID";

#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    pub wallet_private_key: String,
    pub infura_project_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("wallet_private_key", &"<redacted>")
            .field("infura_project_id", &"<redacted>")
            .finish()
    }
}

/// Where the two secrets come from.
pub trait SecretSource {
    /// Obtain one raw value. `name` is the variable it will be written as.
    fn read(&mut self, name: &str, prompt: &str) -> Result<String>;
}

/// Asks for the wallet key, then the Infura ID.
pub fn collect(source: &mut dyn SecretSource) -> Result<Secrets> {
    let wallet_private_key = source.read(WALLET_KEY_VAR, WALLET_KEY_PROMPT)?.trim().to_string();
    let infura_project_id = source.read(INFURA_ID_VAR, INFURA_ID_PROMPT)?.trim().to_string();

    Ok(Secrets {
        wallet_private_key,
        infura_project_id,
    })
}

/// Prompts on standard input.
///
/// Uses a dialoguer prompt when attached to a terminal. Piped or redirected
/// input falls back to reading plain lines.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl SecretSource for TerminalPrompt {
    fn read(&mut self, name: &str, prompt: &str) -> Result<String> {
        // dialoguer draws on stderr and refuses to run without a terminal there.
        if !std::io::stdin().is_terminal() || !Term::stderr().is_term() {
            tracing::debug!("stdin is not a terminal, reading plain lines");
            let stdin = std::io::stdin();
            return LinePrompt::new(stdin.lock(), std::io::stdout()).read(name, prompt);
        }

        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }
}

/// Writes the prompt and reads one line. End of input reads as empty.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> SecretSource for LinePrompt<R, W> {
    fn read(&mut self, _name: &str, prompt: &str) -> Result<String> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }
}

/// Reads secrets from environment variables named after the `.env` keys.
#[derive(Debug, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn read(&mut self, name: &str, _prompt: &str) -> Result<String> {
        std::env::var(name).map_err(|_| {
            ProvisionError::Config(format!("{} is not set in the environment", name))
        })
    }
}
