use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use flashdeck_core::Clock;
use flashdeck_core::model::{DeckId, Rating};
use services::{
    BackendConfig, HttpBackend, LearnLoopService, SessionError, SessionEvent, SessionObserver,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingDeckId,
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingDeckId => write!(f, "--deck-id is required"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-secs value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct Args {
    deck_id: DeckId,
    base_url: Option<String>,
    fetch_timeout: Option<Duration>,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let mut deck_id = None;
    let mut base_url = None;
    let mut fetch_timeout = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--deck-id" => {
                let raw = require_value(&mut args, "--deck-id")?;
                deck_id = Some(DeckId::new(raw));
            }
            "--base-url" => {
                base_url = Some(require_value(&mut args, "--base-url")?);
            }
            "--timeout-secs" => {
                let raw = require_value(&mut args, "--timeout-secs")?;
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidTimeout { raw: raw.clone() })?;
                fetch_timeout = Some(Duration::from_secs(secs));
            }
            other => return Err(ArgsError::UnknownArg(other.to_string())),
        }
    }

    Ok(Args {
        deck_id: deck_id.ok_or(ArgsError::MissingDeckId)?,
        base_url,
        fetch_timeout,
    })
}

/// Renders session events on the terminal.
struct TerminalSurface;

impl SessionObserver for TerminalSurface {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { total } => {
                println!("Session started: {total} cards due.");
            }
            SessionEvent::CardPresented { card } => {
                println!();
                println!("Q: {}", card.question);
            }
            SessionEvent::CountersChanged(counters) => {
                println!(
                    "[again {} | good {} | easy {} | remaining {}/{}]",
                    counters.again(),
                    counters.good(),
                    counters.easy(),
                    counters.remaining(),
                    counters.total()
                );
            }
            SessionEvent::Ended => {
                println!();
                println!("Session finished.");
            }
            SessionEvent::StartFailed { reason } => {
                eprintln!("Could not start session: {reason}");
            }
        }
    }
}

/// Prompt for one rating, or `None` when the user quits.
fn read_rating(stdin: &io::Stdin) -> io::Result<Option<Rating>> {
    let mut line = String::new();
    loop {
        print!("[a]gain / [g]ood / [e]asy / [q]uit: ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim() {
            "a" | "again" => return Ok(Some(Rating::Again)),
            "g" | "good" => return Ok(Some(Rating::Good)),
            "e" | "easy" => return Ok(Some(Rating::Easy)),
            "q" | "quit" => return Ok(None),
            _ => println!("Unrecognized rating."),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = match args.base_url {
        Some(base_url) => BackendConfig::new(base_url),
        None => BackendConfig::from_env(),
    };

    log::debug!("using backend at {}", config.base_url);
    let backend = Arc::new(HttpBackend::new(config));
    let mut service =
        LearnLoopService::new(Clock::default(), backend).with_observer(Arc::new(TerminalSurface));
    if let Some(timeout) = args.fetch_timeout {
        service = service.with_fetch_timeout(timeout);
    }

    let mut session = match service.start_session(&args.deck_id).await {
        Ok(session) => session,
        Err(SessionError::Empty) => {
            println!("No cards due for learning in this deck.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let stdin = io::stdin();
    while !session.is_complete() {
        let Some(card) = session.current_card() else {
            break;
        };
        let answer = card.answer.clone();

        print!("Press Enter to show the answer... ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        println!("A: {answer}");

        let Some(rating) = read_rating(&stdin)? else {
            break;
        };
        if let Err(err) = service.rate_current(&mut session, rating).await {
            // Rollback already happened; the same card is presented again.
            eprintln!("Rating not saved: {err}");
        }
    }

    let stats = service.end_session(&mut session).await?;
    println!(
        "Deck: {} cards | new {} | learning {} | mastered {}",
        stats.total_cards, stats.to_learn_count, stats.learning_count, stats.mastered_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        parse_args(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn parses_deck_and_base_url() {
        let args = parse(&["--deck-id", "d7", "--base-url", "http://host:5000"]).unwrap();
        assert_eq!(args.deck_id, DeckId::new("d7"));
        assert_eq!(args.base_url.as_deref(), Some("http://host:5000"));
        assert!(args.fetch_timeout.is_none());
    }

    #[test]
    fn deck_id_is_required() {
        let err = parse(&["--base-url", "http://host"]).unwrap_err();
        assert!(matches!(err, ArgsError::MissingDeckId));
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = parse(&["--deck-id", "d1", "--frobnicate"]).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownArg(arg) if arg == "--frobnicate"));
    }

    #[test]
    fn parses_timeout_secs() {
        let args = parse(&["--deck-id", "d1", "--timeout-secs", "3"]).unwrap();
        assert_eq!(args.fetch_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = parse(&["--deck-id", "d1", "--timeout-secs", "soon"]).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidTimeout { raw } if raw == "soon"));
    }
}
