//! Terminal Blockfall runner (default binary).
//!
//! Starts a session from `BLOCKFALL_*` environment variables, forwards key
//! presses to it from a blocking input thread and redraws on every published
//! snapshot. Logs go to stderr and are filtered by `RUST_LOG`.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use blockfall::input::key_command;
use blockfall::runtime::{Command, RuntimeConfig, Session, SessionHandle};
use blockfall::term::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let (session, handle) = Session::from_config(&config);
    let task = session.spawn();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &handle).await;

    // Always try to restore terminal state.
    let _ = term.exit();

    // The loop can also end on a draw error; make sure the session stops.
    let _ = handle.send(Command::Shutdown).await;
    let lifetime = task.await?;
    result?;

    println!(
        "best {}  games {}  lines {}  time {}s",
        lifetime.high_score,
        lifetime.total_games_played,
        lifetime.total_lines_cleared,
        lifetime.total_time
    );
    Ok(())
}

async fn run(term: &mut TerminalRenderer, handle: &SessionHandle) -> Result<()> {
    let input = handle.clone();
    std::thread::spawn(move || read_keys(input));

    let mut snapshots = handle.subscribe();
    loop {
        let snap = snapshots.borrow_and_update().clone();
        term.draw(&snap, &handle.lifetime())?;

        if snapshots.changed().await.is_err() {
            return Ok(());
        }
    }
}

fn read_keys(handle: SessionHandle) {
    loop {
        let command = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key_command(key),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "terminal input failed");
                Some(Command::Shutdown)
            }
        };

        if let Some(command) = command {
            if handle.blocking_send(command).is_err() || command == Command::Shutdown {
                return;
            }
        }
    }
}
