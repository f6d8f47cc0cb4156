//! Drive vsh from your own Rust application.
//!
//! Run:  cargo run -p vsh --example embed

use std::sync::Arc;
use vos_core::MemoryFs;
use vsh::{Bootloader, BufferedTerminal, ShellBuilder, TerminalEvent, VshResult};

fn print_transcript(label: &str, terminal: &BufferedTerminal) {
    println!("\n== {label} ==");
    for event in terminal.take_events() {
        match event {
            TerminalEvent::Line(line) => println!("{line}"),
            TerminalEvent::Error(line) => println!("error: {line}"),
            _ => {}
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> VshResult<()> {
    let fs = Arc::new(MemoryFs::new());
    let terminal = Arc::new(BufferedTerminal::new());

    let builder = ShellBuilder::new(fs.clone(), terminal.clone()).prompt("embed:{cwd}$ ");
    let Some(mut shell) = Bootloader::new(builder, "/sys/core.json").start().await else {
        print_transcript("boot failed", &terminal);
        return Ok(());
    };
    print_transcript("boot", &terminal);

    for line in [
        "mkdir /projects",
        "cd /projects",
        "echo hello from embed > greeting.txt",
        "cat greeting.txt | grep hello",
        "ls /",
    ] {
        shell.process_line(line).await?;
        print_transcript(line, &terminal);
    }

    let snapshot = fs.snapshot()?;
    println!("\nfilesystem now holds {} entries", snapshot.len());
    Ok(())
}
