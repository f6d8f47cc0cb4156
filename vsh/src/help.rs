pub struct CommandHelp {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
}

/// Built-in command table, in the order `help` lists it.
pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "ls",
        summary: "List directory contents",
        usage: "ls [DIR]",
    },
    CommandHelp {
        name: "cat",
        summary: "Print a file",
        usage: "cat FILE",
    },
    CommandHelp {
        name: "help",
        summary: "Show available commands",
        usage: "help [COMMAND]",
    },
    CommandHelp {
        name: "exit",
        summary: "Exit the shell",
        usage: "exit",
    },
    CommandHelp {
        name: "clear",
        summary: "Clear the terminal screen",
        usage: "clear",
    },
    CommandHelp {
        name: "cd",
        summary: "Change the current directory",
        usage: "cd [DIR]",
    },
    CommandHelp {
        name: "echo",
        summary: "Display a line of text",
        usage: "echo [STRING]...",
    },
    CommandHelp {
        name: "mkdir",
        summary: "Create a directory",
        usage: "mkdir DIR",
    },
    CommandHelp {
        name: "rmdir",
        summary: "Remove an empty directory",
        usage: "rmdir DIR",
    },
    CommandHelp {
        name: "rm",
        summary: "Remove a file",
        usage: "rm FILE",
    },
    CommandHelp {
        name: "touch",
        summary: "Create an empty file",
        usage: "touch FILE",
    },
    CommandHelp {
        name: "cp",
        summary: "Copy a file",
        usage: "cp SOURCE DEST",
    },
    CommandHelp {
        name: "mv",
        summary: "Move a file",
        usage: "mv SOURCE DEST",
    },
    CommandHelp {
        name: "pwd",
        summary: "Print the current directory",
        usage: "pwd",
    },
    CommandHelp {
        name: "grep",
        summary: "Keep piped lines containing a pattern",
        usage: "... | grep PATTERN",
    },
];

pub fn get_help(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|c| c.name == name)
}

pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

pub fn format_help(cmd: &CommandHelp) -> String {
    format!("{} - {}\nUsage: {}", cmd.name, cmd.summary, cmd.usage)
}

/// The one-line `help` answer for the given command names.
pub fn format_help_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.into_iter().collect();
    format!("Available commands: {}", names.join(", "))
}
