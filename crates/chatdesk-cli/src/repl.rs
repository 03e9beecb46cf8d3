use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use chatdesk_application::{DashboardView, SessionDashboard};
use chatdesk_core::navigation::{Location, NavigationMode, Navigator};
use chatdesk_core::session::{MessageRole, Resolution, Session};
use chatdesk_infrastructure::InMemoryHistory;

use crate::commands::{COMMANDS, ReplCommand};

/// Commands whose first argument is a session id.
const ID_COMMANDS: &[&str] = &["/open", "/delete", "/rename"];

/// Characters of the last message shown under each list entry.
const PREVIEW_CHARS: usize = 60;

/// CLI helper for rustyline: completes command names and, after `/open`,
/// `/delete` and `/rename`, the ids of the sessions currently listed.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
    session_ids: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
            session_ids: Vec::new(),
        }
    }

    fn set_session_ids(&mut self, view: &DashboardView) {
        self.session_ids = view.sessions.iter().map(|s| s.id.clone()).collect();
    }

    /// Replacement start and candidates for the word under the cursor.
    fn candidates<'a>(&'a self, line: &'a str) -> (usize, Vec<&'a str>) {
        if let Some((start, partial)) = id_argument(line) {
            let ids = self
                .session_ids
                .iter()
                .map(String::as_str)
                .filter(|id| id.starts_with(partial))
                .collect();
            return (start, ids);
        }

        if line.starts_with('/') && !line.contains(' ') {
            let commands = self
                .commands
                .iter()
                .map(String::as_str)
                .filter(|cmd| cmd.starts_with(line))
                .collect();
            return (0, commands);
        }

        (0, Vec::new())
    }
}

/// Locates a partially typed session id: `/open ab` yields `(6, "ab")`.
/// Only the first argument of an id command qualifies.
fn id_argument(line: &str) -> Option<(usize, &str)> {
    let (command, rest) = line.split_once(' ')?;
    if !ID_COMMANDS.contains(&command) {
        return None;
    }
    let partial = rest.trim_start();
    if partial.contains(char::is_whitespace) {
        return None;
    }
    Some((line.len() - partial.len(), partial))
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((command, rest)) => Owned(format!("{} {}", command.bright_cyan(), rest)),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, candidates) = self.candidates(line);
        let typed = line.len() - start;
        candidates
            .into_iter()
            .find(|candidate| candidate.len() > typed)
            .map(|candidate| candidate[typed..].to_string())
    }
}

impl Validator for CliHelper {}

/// Runs the interactive dashboard until `/quit` or EOF.
///
/// The history stack stands in for the browser: `/goto`, `/back` and
/// `/forward` move it and then report the new location to the dashboard.
pub async fn run(dashboard: SessionDashboard, history: Arc<InMemoryHistory>) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== chatdesk ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, /quit to exit.".bright_black());
    println!();

    dashboard.mount().await;
    let view = dashboard.view().await;
    print_list(&view);
    print_resolution(&view);
    if let Some(helper) = rl.helper_mut() {
        helper.set_session_ids(&view);
    }

    loop {
        let prompt = format!("{} >> ", history.current());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match ReplCommand::parse(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };
                if command == ReplCommand::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                execute(&dashboard, &history, command).await;
                if let Some(helper) = rl.helper_mut() {
                    helper.set_session_ids(&dashboard.view().await);
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    dashboard.teardown();
    Ok(())
}

async fn execute(dashboard: &SessionDashboard, history: &InMemoryHistory, command: ReplCommand) {
    match command {
        ReplCommand::List => print_list(&dashboard.view().await),
        ReplCommand::Open(id) => {
            dashboard.select(&id).await;
            print_resolution(&dashboard.view().await);
        }
        ReplCommand::Delete(id) => {
            dashboard.delete(&id).await;
            print_list(&dashboard.view().await);
        }
        ReplCommand::Rename { id, title } => {
            if dashboard.rename(&id, &title).await {
                println!("{}", format!("Renamed {} to \"{}\"", id, title).green());
            } else {
                println!("{}", format!("No session with id {}", id).yellow());
            }
        }
        ReplCommand::New => {
            dashboard.new_session().await;
            println!("{}", "New chat. Nothing is selected.".bright_black());
        }
        ReplCommand::Show => print_resolution(&dashboard.view().await),
        ReplCommand::Goto(location) => {
            history.navigate(Location::new(location), NavigationMode::Push);
            follow(dashboard, history.current()).await;
        }
        ReplCommand::Back => match history.back() {
            Some(location) => follow(dashboard, location).await,
            None => println!("{}", "Already at the oldest entry.".bright_black()),
        },
        ReplCommand::Forward => match history.forward() {
            Some(location) => follow(dashboard, location).await,
            None => println!("{}", "Already at the newest entry.".bright_black()),
        },
        ReplCommand::Where => {
            println!("{}", history.current().to_string().bright_white());
            for (index, entry) in history.entries().iter().enumerate() {
                println!("  {}", format!("{}: {}", index, entry).bright_black());
            }
        }
        ReplCommand::Help => {
            for (name, help) in COMMANDS {
                println!("  {:<10} {}", name.bright_cyan(), help.bright_black());
            }
        }
        ReplCommand::Quit => {}
    }
}

async fn follow(dashboard: &SessionDashboard, location: Location) {
    dashboard.on_location_changed(&location).await;
    print_resolution(&dashboard.view().await);
}

fn print_list(view: &DashboardView) {
    if view.list_load_failed {
        println!("{}", "Could not load the session list.".yellow());
    }
    if view.sessions.is_empty() {
        println!("{}", "No sessions.".bright_black());
        return;
    }

    let current_id = view.current.as_ref().map(|s| s.id.as_str());
    for session in &view.sessions {
        let marker = if Some(session.id.as_str()) == current_id {
            "*".bright_green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {}  {}  {}",
            marker,
            session.id.bright_black(),
            session.title.bright_white(),
            session
                .updated_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
        if let Some(message) = session.last_message() {
            println!("    {}", preview(&message.content).bright_black());
        }
    }
}

fn print_resolution(view: &DashboardView) {
    match &view.resolution {
        Resolution::Resolved(session) => print_session(session),
        Resolution::Failed(failure) => {
            println!("{}", format!("{} ({})", failure, failure.id()).red());
        }
        Resolution::Resolving { id } => {
            println!("{}", format!("Loading {}...", id).bright_black());
        }
        Resolution::ResolvedNone | Resolution::Unresolved => {
            println!("{}", "No chat selected.".bright_black());
        }
    }
}

fn print_session(session: &Session) {
    println!("{}", format!("[{}] {}", session.id, session.title).bright_magenta());
    for message in &session.messages {
        match message.role {
            MessageRole::User => {
                for line in message.content.lines() {
                    println!("{}", format!("> {}", line).green());
                }
            }
            MessageRole::Assistant => {
                for line in message.content.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
    }
    println!();
}

/// First line of `content`, cut to `PREVIEW_CHARS` characters.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() <= PREVIEW_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut)
}
