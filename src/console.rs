//! Terminal front-end for the status viewer.
//!
//! Shows a spinner while loading, prints the formatted summary once loaded,
//! and on failure offers a `[r]etry / [q]uit` prompt read from `input`.

use std::io::{self, Write};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::SPINNER_INTERVAL_MS;
use crate::viewer::{render_text, StatusViewer, ViewState, LOADING_TEXT};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

const RETRY_PROMPT: &str = "[r]etry / [q]uit: ";

/// How the console behaves while waiting and after a failure
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    /// Animate a spinner while loading (only sensible on a terminal)
    pub animate: bool,
    /// Offer the retry prompt after a failure
    pub prompt: bool,
}

/// Final state the console session ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded,
    Failed,
}

enum Choice {
    Retry,
    Quit,
    Unknown,
}

fn parse_choice(line: &str) -> Choice {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "r" | "retry" => Choice::Retry,
        "q" | "quit" => Choice::Quit,
        _ => Choice::Unknown,
    }
}

/// Drives `viewer` until it loads or the user gives up.
pub async fn run<R, W>(
    viewer: &mut StatusViewer,
    input: R,
    out: &mut W,
    options: ConsoleOptions,
) -> io::Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        wait_for_settle(viewer, out, options.animate).await?;
        write!(out, "{}", render_text(viewer.state()))?;

        match viewer.state() {
            ViewState::Loaded(_) => return Ok(Outcome::Loaded),
            ViewState::Error(_) if !options.prompt => return Ok(Outcome::Failed),
            ViewState::Error(_) => {}
            ViewState::Loading => return Ok(Outcome::Failed),
        }

        loop {
            write!(out, "{}", RETRY_PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                return Ok(Outcome::Failed);
            };

            match parse_choice(&line) {
                Choice::Retry => {
                    viewer.retry();
                    break;
                }
                Choice::Quit => return Ok(Outcome::Failed),
                Choice::Unknown => writeln!(out, "Unrecognized choice '{}'", line.trim())?,
            }
        }
    }
}

async fn wait_for_settle<W: Write>(
    viewer: &mut StatusViewer,
    out: &mut W,
    animate: bool,
) -> io::Result<()> {
    if !viewer.is_pending() {
        return Ok(());
    }

    if !animate {
        writeln!(out, "{}", LOADING_TEXT)?;
        viewer.settle().await;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(SPINNER_INTERVAL_MS));
    let mut frame = 0usize;
    loop {
        tokio::select! {
            _ = viewer.settle() => break,
            _ = ticker.tick() => {
                write!(out, "\r{} {}", LOADING_TEXT, SPINNER_FRAMES[frame % SPINNER_FRAMES.len()])?;
                out.flush()?;
                frame += 1;
            }
        }
    }
    // Clear the spinner line
    write!(out, "\r\x1b[2K")?;
    Ok(())
}
