//! Chat-bot text commands, executed against the same core as the HTTP API.

use chrono::{DateTime, Utc};

use crate::db::models::{Match, MatchId};
use crate::roster::{RosterError, RosterService};

pub const WELCOME: &str = "Welcome to Sport Manager! Use /help for available commands.";

pub const HELP: &str = "Available commands:
/matches - show upcoming matches
/join [ID] - join a match
/leave [ID] - leave a match";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Matches,
    Join(MatchId),
    Leave(MatchId),
    /// Known command with a missing or malformed argument.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// `None` for plain text; commands start with `/` and may carry a
    /// `@BotName` suffix as sent in group chats.
    pub fn parse(text: &str) -> Option<Command> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);
        let arg = parts.next();

        let cmd = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "matches" => Command::Matches,
            "join" => match arg.and_then(|a| a.parse::<MatchId>().ok()) {
                Some(id) => Command::Join(id),
                None => Command::Usage("/join [ID]"),
            },
            "leave" => match arg.and_then(|a| a.parse::<MatchId>().ok()) {
                Some(id) => Command::Leave(id),
                None => Command::Usage("/leave [ID]"),
            },
            other => Command::Unknown(other.to_owned()),
        };
        Some(cmd)
    }
}

/// Run `cmd` on behalf of `sender` and produce the reply text.
pub async fn execute(svc: &RosterService, cmd: Command, sender: &str) -> String {
    match cmd {
        Command::Start => WELCOME.to_owned(),
        Command::Help => HELP.to_owned(),
        Command::Usage(usage) => format!("Usage: {usage}"),
        Command::Unknown(name) => format!("Unknown command /{name}. Use /help."),
        Command::Matches => match svc.list_matches().await {
            Ok(matches) => render_matches(&matches, Utc::now()),
            Err(e) => failure_reply(&e),
        },
        Command::Join(id) => match svc.join(id, sender).await {
            Ok(()) => format!("{sender}, you are in for match #{id}."),
            Err(e) => failure_reply(&e),
        },
        Command::Leave(id) => match svc.leave(id, sender).await {
            Ok(()) => format!("{sender}, you left match #{id}."),
            Err(e) => failure_reply(&e),
        },
    }
}

/// Active matches scheduled at or after `now`, one line each.
pub fn render_matches(matches: &[Match], now: DateTime<Utc>) -> String {
    let lines: Vec<String> = matches
        .iter()
        .filter(|m| m.status.is_active() && m.date >= now)
        .map(|m| {
            format!(
                "#{} {} - {}, {} ({}/{})",
                m.id,
                m.date.format("%a %d %b %H:%M"),
                m.venue_name,
                m.location,
                m.roster_size(),
                m.max_players
            )
        })
        .collect();

    if lines.is_empty() {
        "No upcoming matches.".to_owned()
    } else {
        format!("Upcoming matches:\n{}", lines.join("\n"))
    }
}

fn failure_reply(err: &RosterError) -> String {
    match err {
        RosterError::MatchNotFound(id) => format!("Match #{id} does not exist."),
        RosterError::CapacityExceeded { match_id, .. } => format!("Match #{match_id} is full."),
        RosterError::PlayerNotFound(name) => format!("I don't know a player called {name}."),
        RosterError::EmptyName => "I could not tell your name.".to_owned(),
        RosterError::DuplicatePlayer(name) => format!("{name} is already registered."),
        RosterError::Persistence(e) => {
            log::error!("bot command failed: {e}");
            "Something went wrong, please try again later.".to_owned()
        }
    }
}
