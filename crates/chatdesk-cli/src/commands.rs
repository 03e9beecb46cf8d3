//! REPL command parsing.

use anyhow::{Result, bail};

/// Command names with their help text, in display order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/list", "List sessions, newest first"),
    ("/open", "/open <id> - select a session"),
    ("/delete", "/delete <id> - remove a session from the list"),
    ("/rename", "/rename <id> <title> - change a session title"),
    ("/new", "Start a new chat (clears the selection)"),
    ("/show", "Show the current session"),
    ("/goto", "/goto <location> - navigate like a typed URL"),
    ("/back", "Go back in history"),
    ("/forward", "Go forward in history"),
    ("/where", "Print the current location"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    Open(String),
    Delete(String),
    Rename { id: String, title: String },
    New,
    Show,
    Goto(String),
    Back,
    Forward,
    Where,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "/list" | "/ls" => Self::List,
            "/open" => Self::Open(required(name, rest, "<id>")?),
            "/delete" | "/rm" => Self::Delete(required(name, rest, "<id>")?),
            "/rename" => {
                let Some((id, title)) = rest.split_once(char::is_whitespace) else {
                    bail!("usage: /rename <id> <title>");
                };
                Self::Rename {
                    id: id.to_string(),
                    title: title.trim().to_string(),
                }
            }
            "/new" => Self::New,
            "/show" => Self::Show,
            "/goto" => Self::Goto(required(name, rest, "<location>")?),
            "/back" => Self::Back,
            "/forward" => Self::Forward,
            "/where" => Self::Where,
            "/help" | "?" => Self::Help,
            "/quit" | "/exit" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command: {} (try /help)", other),
        };
        Ok(command)
    }
}

fn required(name: &str, rest: &str, placeholder: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("usage: {} {}", name, placeholder);
    }
    Ok(rest.to_string())
}
