//! Command dispatch and pipeline execution

use crate::error::{VshError, VshResult};
use crate::parser;
use crate::path;
use crate::shell::{LineStatus, Shell};

mod builtins_fs;
mod builtins_shell;
mod builtins_text;

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Output text, possibly empty.
    Text(String),
    /// Stop the shell.
    Terminate,
    /// Nothing was produced at all.
    NoValue,
}

impl Outcome {
    pub fn text(s: impl Into<String>) -> Self {
        Outcome::Text(s.into())
    }

    pub fn empty() -> Self {
        Outcome::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Outcome::Text(s) => Some(s),
            _ => None,
        }
    }
}

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command: {name}. Type \"help\" for available commands.")
}

impl Shell {
    /// Runs a single command with the output of the previous pipeline
    /// segment as `piped` (empty for the first one).
    pub async fn execute(
        &mut self,
        name: &str,
        args: &[String],
        piped: &str,
    ) -> VshResult<Outcome> {
        tracing::debug!(command = name, ?args, piped_len = piped.len(), "execute");

        if !self.is_enabled(name) {
            return Ok(Outcome::Text(unknown_command(name)));
        }

        if let Some(result) = self.try_execute_text_builtin(name, args, piped).await {
            return result;
        }

        if let Some(result) = self.try_execute_fs_builtin(name, args).await {
            return result;
        }

        if let Some(result) = self.try_execute_shell_builtin(name, args).await {
            return result;
        }

        Ok(Outcome::Text(unknown_command(name)))
    }

    /// Parses and runs one raw line: threads each segment's text into the
    /// next, then writes the final result to the redirection target or
    /// prints it.
    pub async fn process_line(&mut self, raw: &str) -> VshResult<LineStatus> {
        let line = match parser::parse(raw) {
            Ok(line) => line,
            Err(VshError::Parse(msg)) => {
                self.terminal.write_error(&format!("Error: {msg}"));
                return Ok(LineStatus::Continue);
            }
            Err(e) => return Err(e),
        };

        let target = line
            .redirect
            .as_deref()
            .map(|t| path::resolve(Some(t), &self.cwd));

        let mut last = Outcome::NoValue;
        for segment in &line.segments {
            let piped = last.as_text().unwrap_or("");
            let outcome = match segment {
                Some(seg) => self.execute(&seg.name, &seg.args, piped).await?,
                None => self.execute("", &[], piped).await?,
            };
            if outcome == Outcome::Terminate {
                return Ok(LineStatus::Stop);
            }
            last = outcome;
        }

        match (target, last) {
            (Some(target), Outcome::Text(text)) => {
                self.fs.write_file(&target, &text).await?;
                self.terminal
                    .write_line(&format!("Output written to {target}"));
            }
            (Some(target), _) => {
                self.terminal
                    .write_line(&format!("No output to write to {target}"));
            }
            (None, Outcome::Text(text)) if !text.trim().is_empty() => {
                self.terminal.write_line(&text);
            }
            (None, _) => {}
        }

        Ok(LineStatus::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellBuilder;
    use crate::terminal::BufferedTerminal;
    use std::sync::Arc;
    use vos_core::MemoryFs;
    use vos_sdk::FileSystem;

    fn new_shell() -> (Shell, Arc<MemoryFs>, Arc<BufferedTerminal>) {
        let fs = Arc::new(MemoryFs::new());
        let terminal = Arc::new(BufferedTerminal::new());
        let shell = ShellBuilder::new(fs.clone(), terminal.clone()).build();
        (shell, fs, terminal)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (mut shell, _, _) = new_shell();
        let out = shell.execute("frobnicate", &args(&["x"]), "").await.unwrap();
        assert_eq!(
            out,
            Outcome::text("Unknown command: frobnicate. Type \"help\" for available commands.")
        );
    }

    #[tokio::test]
    async fn test_pipe_threads_output() {
        let (mut shell, _, terminal) = new_shell();
        let status = shell.process_line("echo hello | grep hel").await.unwrap();
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(terminal.lines(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_pipe_with_no_match_prints_nothing() {
        let (mut shell, _, terminal) = new_shell();
        shell.process_line("echo hello | grep world").await.unwrap();
        assert!(terminal.lines().is_empty());
        assert!(terminal.errors().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_writes_file() {
        let (mut shell, fs, terminal) = new_shell();
        shell.process_line("echo data > /out.txt").await.unwrap();

        assert_eq!(fs.read_file("/out.txt").await.unwrap(), "data");
        assert_eq!(terminal.lines(), vec!["Output written to /out.txt"]);
    }

    #[tokio::test]
    async fn test_redirect_relative_target() {
        let (mut shell, fs, _) = new_shell();
        fs.create_directory("/home").await.unwrap();
        shell.process_line("cd home").await.unwrap();
        shell.process_line("echo notes > todo.txt").await.unwrap();

        assert_eq!(fs.read_file("/home/todo.txt").await.unwrap(), "notes");
    }

    #[tokio::test]
    async fn test_redirect_writes_empty_output() {
        let (mut shell, fs, _) = new_shell();
        shell.process_line("echo > /empty.txt").await.unwrap();
        assert_eq!(fs.read_file("/empty.txt").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_redirect_of_empty_command() {
        let (mut shell, fs, terminal) = new_shell();
        shell.process_line("> /none.txt").await.unwrap();

        assert_eq!(
            fs.read_file("/none.txt").await.unwrap(),
            "Unknown command: . Type \"help\" for available commands."
        );
        assert_eq!(terminal.lines(), vec!["Output written to /none.txt"]);
    }

    #[tokio::test]
    async fn test_empty_redirect_target() {
        let (mut shell, fs, terminal) = new_shell();
        let status = shell.process_line("echo data >  ").await.unwrap();

        assert_eq!(status, LineStatus::Continue);
        assert_eq!(
            terminal.errors(),
            vec!["Error: No output file specified after '>'."]
        );
        assert!(terminal.lines().is_empty());
        assert_eq!(fs.list_files("/").await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_exit_short_circuits_pipeline() {
        let (mut shell, fs, terminal) = new_shell();
        let status = shell.process_line("exit | echo never > /never.txt").await.unwrap();

        assert_eq!(status, LineStatus::Stop);
        assert_eq!(terminal.lines(), vec!["Exiting shell"]);
        assert!(!fs.exists("/never.txt").await);
    }

    #[tokio::test]
    async fn test_failure_propagates_after_partial_effects() {
        let (mut shell, fs, _) = new_shell();
        let result = shell.process_line("touch /a.txt | cat /missing").await;

        assert!(matches!(result, Err(VshError::Fs(_))));
        assert!(fs.exists("/a.txt").await);
    }

    #[tokio::test]
    async fn test_empty_segment_is_an_unknown_command() {
        let (mut shell, _, terminal) = new_shell();
        shell.process_line("echo a | | grep a").await.unwrap();

        assert!(terminal.errors().is_empty());
        assert_eq!(
            terminal.lines(),
            vec!["Unknown command: . Type \"help\" for available commands."]
        );
    }
}
