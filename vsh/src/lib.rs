//! vsh - self-installing interactive shell for the vos virtual filesystem
//!
//! This crate provides:
//! - A line-oriented shell with `|` pipelines and a single `>` redirection
//! - Built-in commands (ls, cat, grep, cp, ...) running against any
//!   [`vos_sdk::FileSystem`]
//! - A bootloader that installs the core image on first run and builds every
//!   session from the persisted copy
//! - A [`Terminal`] abstraction with an in-memory implementation for
//!   scripted sessions and tests

pub mod boot;
pub mod error;
pub mod eval;
pub mod help;
pub mod parser;
pub mod path;
pub mod shell;
pub mod terminal;

pub use boot::{Bootloader, CoreImage, InstallStatus};
pub use error::{VshError, VshResult};
pub use eval::Outcome;
pub use parser::parse;
pub use shell::{LineStatus, Shell, ShellBuilder};
pub use terminal::{BufferedTerminal, Terminal, TerminalEvent};
