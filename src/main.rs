//! # Vizedit - live editor panel
//!
//! Opens one editor panel against a simulator backend and drives it from
//! stdin, the way a menu or keyboard shortcut would in the browser.
//!
//! ## Quick Start
//!
//! ```bash
//! # Edit a script against a local backend
//! cargo run -- --url ws://localhost:8080/viz_component model.py
//!
//! # Then type commands: show, hide, toggle, status, text, send, quit
//! ```

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vizedit_channel::WsConnector;
use vizedit_core::{Config, EventHandler, Geometry, PanelEvent, SessionId, Visibility, help};
use vizedit_panel::{Host, Panel};

/// Vizedit - live-editing panel for a simulator backend
#[derive(Parser, Debug)]
#[command(name = "vizedit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to seed the editor with
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Backend component endpoint (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Session id to attach to (random if omitted)
    #[arg(short, long, value_name = "ID")]
    session: Option<String>,

    /// Config file to load instead of the default one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// A line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Hide,
    Toggle,
    Status,
    Text,
    Set(String),
    Append(String),
    Undo,
    Send,
    Help { group: String, field: String },
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let command = match word {
            "show" => Self::Show,
            "hide" => Self::Hide,
            "toggle" => Self::Toggle,
            "status" => Self::Status,
            "text" => Self::Text,
            "set" => Self::Set(rest.to_string()),
            "append" => Self::Append(rest.to_string()),
            "undo" => Self::Undo,
            "send" => Self::Send,
            "help" => {
                let (group, field) = rest
                    .trim()
                    .split_once(' ')
                    .ok_or(CommandError::Usage("help <group> <field>"))?;
                Self::Help {
                    group: group.to_string(),
                    field: field.trim().to_string(),
                }
            }
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// What `status` prints.
#[derive(Serialize)]
struct Status<'a> {
    session: &'a str,
    visibility: Visibility,
    geometry: Geometry,
    chars: usize,
}

/// Runs one command; returns false when the session should end.
fn execute(panel: &mut Panel, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Show => panel.show()?,
        Command::Hide => panel.hide()?,
        Command::Toggle => panel.toggle()?,
        Command::Status => {
            let text = panel.text();
            let status = Status {
                session: panel.session_id().as_str(),
                visibility: panel.visibility(),
                geometry: panel.geometry(),
                chars: text.chars().count(),
            };
            println!("{}", serde_json::to_string(&status)?);
        }
        Command::Text => println!("{}", panel.text()),
        Command::Set(text) => panel.set_text(&text),
        Command::Append(text) => panel.edit(|buffer| {
            let end = buffer.len_chars();
            buffer.insert(end, &text)
        })?,
        Command::Undo => panel.edit(|buffer| buffer.undo())?,
        Command::Send => panel.send_content()?,
        Command::Help { group, field } => match help::lookup(&group, &field) {
            Some(entry) => println!("{}\n{}", entry.summary, entry.description),
            None => println!("no help for {group}.{field}"),
        },
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Vizedit v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(url) = args.url {
        config.channel.url = url;
    }

    let session = match args.session {
        Some(id) => id.parse::<SessionId>()?,
        None => SessionId::generate(),
    };
    let initial_text = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => String::new(),
    };

    let host = Host::new(WsConnector::new(config.channel.url.clone()), config);
    let mut events = EventHandler::new(host.events());
    let mut panel = host
        .on_create(session, &initial_text)
        .await
        .map_err(|e| anyhow::anyhow!("Could not open editor: {}", e))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if !execute(&mut panel, command)? {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            event = events.next() => match event {
                Some(PanelEvent::Disconnected(id)) => {
                    eprintln!("session {id} disconnected");
                    break;
                }
                Some(event) => tracing::debug!("{:?}", event),
                None => break,
            },
        }
    }

    panel.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["vizedit"]);
        assert!(args.file.is_none());
        assert!(args.url.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_with_file_and_session() {
        let args = Args::parse_from(["vizedit", "-s", "42", "-vv", "model.py"]);
        assert_eq!(args.file, Some(PathBuf::from("model.py")));
        assert_eq!(args.session.as_deref(), Some("42"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("toggle".parse::<Command>(), Ok(Command::Toggle));
        assert_eq!(" show ".parse::<Command>(), Ok(Command::Show));
        assert_eq!("set y = 2".parse::<Command>(), Ok(Command::Set("y = 2".into())));
        assert_eq!(
            "help ensemble radius".parse::<Command>(),
            Ok(Command::Help {
                group: "ensemble".into(),
                field: "radius".into()
            })
        );
        assert_eq!(
            "help ensemble".parse::<Command>(),
            Err(CommandError::Usage("help <group> <field>"))
        );
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown("jump".into()))
        );
    }
}
