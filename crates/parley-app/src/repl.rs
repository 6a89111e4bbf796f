//! Line-oriented chat loop.

use std::io::Write;

use parley_ai::ChatSession;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Blank,
    Say(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    match line.trim() {
        "" => Command::Blank,
        "/quit" | "/exit" => Command::Quit,
        text => Command::Say(text),
    }
}

/// Read lines from `input` until EOF or `/quit`, printing each reply.
pub async fn run<R, W>(session: &mut ChatSession, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let assistant = session.config().assistant_name.clone();
    let user = session.config().user_name.clone();
    let mut lines = input.lines();

    loop {
        write!(out, "{user}: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse(&line) {
            Command::Quit => break,
            Command::Blank => continue,
            Command::Say(text) => match session.send_turn(text).await {
                Ok(result) if result.is_success() => {
                    writeln!(out, "{assistant}: {}", result.text())?
                }
                Ok(result) => writeln!(out, "error: {}", result.display_text())?,
                Err(e) => {
                    tracing::error!("Turn failed: {e}");
                    writeln!(out, "error: {e}")?;
                }
            },
        }
    }

    let tracker = session.tracker();
    tracing::info!(
        tokens = tracker.total_tokens(),
        calls = tracker.call_count(),
        failed = tracker.failed_calls(),
        "Session finished"
    );
    Ok(())
}
