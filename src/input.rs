use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::catalog::{parse_filter, SortMode};
use crate::events::Event;
use crate::state::{CreatureType, Rarity};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid value for `{command}`: {value}")]
    InvalidValue { command: &'static str, value: String },
}

/// Parse one input line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Event>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "connect" => Event::Connect,
        "disconnect" => Event::Disconnect,
        "buy" | "bid" => Event::Buy {
            asset_id: required("buy", arg)?.to_string(),
        },
        // Bare `search` clears the term
        "search" => Event::Search {
            term: arg.to_string(),
        },
        "type" => Event::FilterType(
            parse_filter::<CreatureType>(required("type", arg)?).map_err(|_| invalid("type", arg))?,
        ),
        "rarity" => Event::FilterRarity(
            parse_filter::<Rarity>(required("rarity", arg)?).map_err(|_| invalid("rarity", arg))?,
        ),
        "sort" => Event::Sort(
            required("sort", arg)?
                .parse::<SortMode>()
                .map_err(|_| invalid("sort", arg))?,
        ),
        "reset" => Event::ResetFilters,
        "list" | "ls" => Event::List,
        "show" => Event::Show {
            asset_id: required("show", arg)?.to_string(),
        },
        "profile" => Event::Profile,
        "trading" | "trade" => Event::Trading,
        "help" | "?" => Event::Help,
        "quit" | "exit" => Event::Shutdown,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(event))
}

fn required<'a>(command: &'static str, arg: &'a str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidValue {
        command,
        value: value.to_string(),
    }
}

/// Spawns a task that reads stdin lines and sends parsed events.
/// EOF sends Shutdown.
pub fn spawn(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(Some(event)) => {
                        if tx.send(event).await.is_err() {
                            debug!("event loop gone, stopping input feed");
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }

        let _ = tx.send(Event::Shutdown).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Event {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_wallet_commands() {
        assert!(matches!(parse("connect"), Event::Connect));
        assert!(matches!(parse("DISCONNECT"), Event::Disconnect));
        match parse("buy pokemarket-12") {
            Event::Buy { asset_id } => assert_eq!(asset_id, "pokemarket-12"),
            other => panic!("Expected Buy, got {:?}", other),
        }
        assert_eq!(
            parse_command("buy").unwrap_err(),
            CommandError::MissingArgument("buy")
        );
    }

    #[test]
    fn test_search_keeps_inner_spaces() {
        match parse("search  ho oh ") {
            Event::Search { term } => assert_eq!(term, "ho oh"),
            other => panic!("Expected Search, got {:?}", other),
        }
        match parse("search") {
            Event::Search { term } => assert!(term.is_empty()),
            other => panic!("Expected Search, got {:?}", other),
        }
    }

    #[test]
    fn test_filters() {
        assert!(matches!(
            parse("type fire"),
            Event::FilterType(Some(CreatureType::Fire))
        ));
        assert!(matches!(parse("type All"), Event::FilterType(None)));
        assert!(matches!(
            parse("rarity legendary"),
            Event::FilterRarity(Some(Rarity::Legendary))
        ));
        assert!(matches!(parse("sort price_desc"), Event::Sort(SortMode::PriceDesc)));
        assert_eq!(
            parse_command("sort cheapest").unwrap_err(),
            CommandError::InvalidValue {
                command: "sort",
                value: "cheapest".to_string()
            }
        );
    }

    #[test]
    fn test_views() {
        assert!(matches!(parse("list"), Event::List));
        assert!(matches!(parse("Trading"), Event::Trading));
        assert!(matches!(parse("trade"), Event::Trading));
        assert!(matches!(parse("profile"), Event::Profile));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("mint pokemarket-1").unwrap_err(),
            CommandError::Unknown("mint".to_string())
        );
    }
}
