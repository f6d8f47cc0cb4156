//! Line-oriented terminal device the shell reads from and writes to.

use crate::error::{VshError, VshResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Terminal collaborator. `write_line` and `write_error` are the info and
/// error channels; everything the user sees goes through them.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Suspends until a line is available. Returns
    /// [`VshError::TerminalClosed`] once no further input can arrive.
    async fn read_line(&self, prompt: &str) -> VshResult<String>;

    async fn clear_terminal(&self) -> VshResult<()>;

    /// Discards any input typed but not yet consumed.
    async fn clear_input(&self) -> VshResult<()>;

    fn write_line(&self, line: &str);

    fn write_error(&self, line: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Prompt(String),
    Line(String),
    Error(String),
    ScreenCleared,
    InputCleared,
}

/// In-memory terminal: replays queued input lines and records everything
/// written to it.
#[derive(Debug, Default)]
pub struct BufferedTerminal {
    input: Mutex<VecDeque<String>>,
    events: Mutex<Vec<TerminalEvent>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BufferedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: Mutex::new(lines.into_iter().map(Into::into).collect()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn push_input(&self, line: impl Into<String>) {
        lock(&self.input).push_back(line.into());
    }

    pub fn events(&self) -> Vec<TerminalEvent> {
        lock(&self.events).clone()
    }

    /// Everything written on the info channel, in order.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Line(l) => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    /// Everything written on the error channel, in order.
    pub fn errors(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Error(l) => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn take_events(&self) -> Vec<TerminalEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    fn record(&self, event: TerminalEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl Terminal for BufferedTerminal {
    async fn read_line(&self, prompt: &str) -> VshResult<String> {
        self.record(TerminalEvent::Prompt(prompt.to_string()));
        lock(&self.input).pop_front().ok_or(VshError::TerminalClosed)
    }

    async fn clear_terminal(&self) -> VshResult<()> {
        self.record(TerminalEvent::ScreenCleared);
        Ok(())
    }

    async fn clear_input(&self) -> VshResult<()> {
        self.record(TerminalEvent::InputCleared);
        Ok(())
    }

    fn write_line(&self, line: &str) {
        self.record(TerminalEvent::Line(line.to_string()));
    }

    fn write_error(&self, line: &str) {
        self.record(TerminalEvent::Error(line.to_string()));
    }
}
