//! Interactive terminal backed by rustyline.
//!
//! The line editor blocks, so it lives on its own thread and the shell talks
//! to it over channels.

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use vsh::{Terminal, VshError, VshResult};

enum Request {
    ReadLine {
        prompt: String,
        reply: oneshot::Sender<VshResult<String>>,
    },
    ClearScreen {
        reply: oneshot::Sender<VshResult<()>>,
    },
    SaveHistory {
        reply: oneshot::Sender<VshResult<()>>,
    },
}

pub struct ConsoleTerminal {
    requests: mpsc::UnboundedSender<Request>,
}

fn editor_error(err: ReadlineError) -> VshError {
    match err {
        ReadlineError::Io(e) => VshError::Io(e),
        other => VshError::Runtime(other.to_string()),
    }
}

fn build_editor(max_history: usize) -> Result<DefaultEditor, ReadlineError> {
    let config = Config::builder()
        .max_history_size(max_history)?
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();
    DefaultEditor::with_config(config)
}

struct EditorThread {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorThread {
    fn run(mut self, mut requests: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = requests.blocking_recv() {
            match request {
                Request::ReadLine { prompt, reply } => {
                    let _ = reply.send(self.read_line(&prompt));
                }
                Request::ClearScreen { reply } => {
                    let _ = reply.send(self.editor.clear_screen().map_err(editor_error));
                }
                Request::SaveHistory { reply } => {
                    let _ = reply.send(self.save_history());
                }
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> VshResult<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Ok(String::new()),
            Err(ReadlineError::Eof) => Err(VshError::TerminalClosed),
            Err(e) => Err(editor_error(e)),
        }
    }

    fn save_history(&mut self) -> VshResult<()> {
        let Some(path) = &self.history else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.editor.save_history(path).map_err(editor_error)
    }
}

impl ConsoleTerminal {
    /// Starts the editor thread. `history` is loaded now (a missing file is
    /// fine) and written back by [`ConsoleTerminal::save_history`].
    pub fn new(history: Option<PathBuf>, max_history: usize) -> VshResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        std::thread::Builder::new()
            .name("vsh-console".to_string())
            .spawn(move || {
                let mut editor = match build_editor(max_history) {
                    Ok(editor) => editor,
                    Err(e) => {
                        let _ = ready_tx.send(Err(editor_error(e)));
                        return;
                    }
                };
                if let Some(path) = &history {
                    if let Err(e) = editor.load_history(path) {
                        tracing::debug!(path = %path.display(), error = %e, "no history loaded");
                    }
                }
                let _ = ready_tx.send(Ok(()));
                EditorThread { editor, history }.run(rx);
            })?;

        ready_rx
            .recv()
            .map_err(|_| VshError::Runtime("console thread exited during startup".to_string()))??;

        Ok(Self { requests: tx })
    }

    pub async fn save_history(&self) -> VshResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::SaveHistory { reply })?;
        rx.await.map_err(|_| VshError::TerminalClosed)?
    }

    fn send(&self, request: Request) -> VshResult<()> {
        self.requests
            .send(request)
            .map_err(|_| VshError::TerminalClosed)
    }
}

#[async_trait]
impl Terminal for ConsoleTerminal {
    async fn read_line(&self, prompt: &str) -> VshResult<String> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::ReadLine {
            prompt: prompt.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| VshError::TerminalClosed)?
    }

    async fn clear_terminal(&self) -> VshResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::ClearScreen { reply })?;
        rx.await.map_err(|_| VshError::TerminalClosed)?
    }

    async fn clear_input(&self) -> VshResult<()> {
        // rustyline hands over whole lines; nothing is left pending.
        Ok(())
    }

    fn write_line(&self, line: &str) {
        println!("{line}");
    }

    fn write_error(&self, line: &str) {
        eprintln!("{line}");
    }
}
