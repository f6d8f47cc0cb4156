//! Shell session state and the read/process loop

use crate::boot::CoreImage;
use crate::error::{VshError, VshResult};
use crate::path;
use crate::terminal::Terminal;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use vos_sdk::FileSystem;

pub const DEFAULT_PROMPT: &str = "{cwd}> ";
pub const DEFAULT_LOOP_DELAY: Duration = Duration::from_millis(100);

/// What the loop should do after a line has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Continue,
    Stop,
}

/// One interactive session: the current directory plus the collaborators
/// every command runs against.
pub struct Shell {
    pub cwd: String,
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) terminal: Arc<dyn Terminal>,
    commands: BTreeSet<String>,
    prompt: String,
    loop_delay: Duration,
}

#[derive(Clone)]
pub struct ShellBuilder {
    fs: Arc<dyn FileSystem>,
    terminal: Arc<dyn Terminal>,
    prompt: String,
    loop_delay: Duration,
    image: Option<CoreImage>,
}

impl ShellBuilder {
    pub fn new(fs: Arc<dyn FileSystem>, terminal: Arc<dyn Terminal>) -> Self {
        Self {
            fs,
            terminal,
            prompt: DEFAULT_PROMPT.to_string(),
            loop_delay: DEFAULT_LOOP_DELAY,
            image: None,
        }
    }

    /// Prompt template; `{cwd}` expands to the current directory.
    pub fn prompt(mut self, template: impl Into<String>) -> Self {
        self.prompt = template.into();
        self
    }

    pub fn loop_delay(mut self, delay: Duration) -> Self {
        self.loop_delay = delay;
        self
    }

    /// Interpreter definition the session is built from. Without one the
    /// built-in canonical image is used.
    pub fn image(mut self, image: CoreImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn terminal(&self) -> &Arc<dyn Terminal> {
        &self.terminal
    }

    pub fn build(self) -> Shell {
        let image = self.image.unwrap_or_else(CoreImage::canonical);
        Shell {
            cwd: "/".to_string(),
            fs: self.fs,
            terminal: self.terminal,
            commands: image.commands.into_iter().collect(),
            prompt: self.prompt,
            loop_delay: self.loop_delay,
        }
    }
}

impl Shell {
    pub fn new(fs: Arc<dyn FileSystem>, terminal: Arc<dyn Terminal>) -> Self {
        ShellBuilder::new(fs, terminal).build()
    }

    pub fn is_enabled(&self, command: &str) -> bool {
        self.commands.contains(command)
    }

    pub fn prompt(&self) -> String {
        self.prompt.replace("{cwd}", &self.cwd)
    }

    /// Absolutizes a command argument against the current directory.
    pub fn resolve_path(&self, arg: Option<&String>) -> String {
        path::resolve(arg.map(String::as_str), &self.cwd)
    }

    /// Runs until `exit` or until the terminal closes. Failures inside one
    /// iteration are reported and the loop carries on.
    pub async fn run(&mut self) {
        tracing::info!(cwd = %self.cwd, "shell started");
        self.terminal.write_line("Welcome to vos");

        loop {
            tokio::time::sleep(self.loop_delay).await;

            match self.step().await {
                Ok(LineStatus::Continue) => {}
                Ok(LineStatus::Stop) => break,
                Err(VshError::TerminalClosed) => {
                    tracing::info!("terminal closed, stopping shell");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "shell iteration failed");
                    self.terminal.write_error(&format!("Error in shell: {e}"));
                }
            }
        }

        tracing::info!("shell stopped");
    }

    /// One loop iteration: read a line and, unless it is blank, process it.
    pub async fn step(&mut self) -> VshResult<LineStatus> {
        let input = self.terminal.read_line(&self.prompt()).await?;
        if input.trim().is_empty() {
            return Ok(LineStatus::Continue);
        }

        let status = self.process_line(&input).await?;
        if status == LineStatus::Continue {
            self.terminal.clear_input().await?;
        }
        Ok(status)
    }
}
