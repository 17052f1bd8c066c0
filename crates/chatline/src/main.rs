//! A terminal front-end for `chatline`.

#[macro_use]
extern crate tracing;

use std::io::{ErrorKind, Write as _};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chatline::core::ToolCallRecord;
use chatline::{ChatHost, ChatUi, MessageId, Settings, Starter};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!("using {} at {}", settings.model(), settings.base_url());

    let ui = TerminalUi::new();
    let mut host = ChatHost::from_settings(settings);
    print_starters(host.starters());
    let mut session = host.start_session(&ui).await;

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        ui.settle();
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                host.end_session(session);
                session = host.start_session(&ui).await;
                continue;
            }
            _ => {}
        }

        let message = starter_message(line, host.starters()).unwrap_or(line);
        if message != line {
            println!("{}{}", BAR_CHAR.bright_green(), message.bright_white());
        }
        host.handle_message(session, &ui, message).await;
    }

    ui.settle();
    ExitCode::SUCCESS
}

/// Renders assistant messages as spinners that freeze when settled.
///
/// A message stays live (and editable) until the next message is shown or
/// the prompt comes back.
struct TerminalUi {
    style: ProgressStyle,
    next_id: AtomicU64,
    live: Mutex<Vec<(MessageId, ProgressBar)>>,
}

impl TerminalUi {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", BAR_CHAR,
            ]);
        Self {
            style,
            next_id: AtomicU64::new(1),
            live: Mutex::new(Vec::new()),
        }
    }

    fn live(&self) -> MutexGuard<'_, Vec<(MessageId, ProgressBar)>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Freezes every live message.
    fn settle(&self) {
        for (_, bar) in self.live().drain(..) {
            bar.finish();
        }
    }
}

#[async_trait]
impl ChatUi for TerminalUi {
    async fn send(&self, content: &str) -> MessageId {
        self.settle();

        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let bar = ProgressBar::new_spinner();
        bar.set_style(self.style.clone());
        bar.set_message(content.bright_white().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.live().push((id, bar));
        id
    }

    async fn update(&self, id: MessageId, content: &str) {
        let mut live = self.live();
        match live.iter().position(|(live_id, _)| *live_id == id) {
            Some(pos) => {
                let (_, bar) = live.remove(pos);
                bar.finish_with_message(content.bright_white().to_string());
            }
            None => {
                println!("{}{}", BAR_CHAR.bright_cyan(), content.bright_white())
            }
        }
    }

    async fn step(&self, record: &ToolCallRecord) {
        let line = format!(
            "{}{} {} {}",
            BAR_CHAR.bright_yellow(),
            record.name.bold(),
            record.arguments.dimmed(),
            record.output.dimmed()
        );
        match self.live().last() {
            Some((_, bar)) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

fn print_starters(starters: &[Starter]) {
    println!("{}Try one of these, or type a message:", BAR_CHAR.bright_green());
    for (idx, starter) in starters.iter().enumerate() {
        println!(
            "{}  /{}  {}: {}",
            BAR_CHAR.bright_green(),
            idx + 1,
            starter.label.bold(),
            starter.message
        );
    }
    println!(
        "{}  /new starts over, /quit leaves",
        BAR_CHAR.bright_green()
    );
}

/// Maps `/1`, `/2`, ... to the starter prompts.
fn starter_message<'a>(line: &str, starters: &'a [Starter]) -> Option<&'a str> {
    let idx: usize = line.strip_prefix('/')?.parse().ok()?;
    let starter = starters.get(idx.checked_sub(1)?)?;
    Some(starter.message)
}

/// Reads the next line, skipping lines that are not valid UTF-8.
///
/// Returns `None` at EOF or on a read error.
async fn read_line<R>(lines: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(line) => return line,
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!("skipping unreadable input: {}", err);
            }
            Err(err) => {
                error!("error reading input: {}", err);
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_skips_invalid_utf8() {
        let input: &[u8] = b"\xff\xfe\nhello\n";
        let mut lines = input.lines();

        assert_eq!(read_line(&mut lines).await.as_deref(), Some("hello"));
        assert_eq!(read_line(&mut lines).await, None);
    }

    #[test]
    fn test_starter_message() {
        assert_eq!(
            starter_message("/1", &chatline::STARTERS),
            Some(chatline::STARTERS[0].message)
        );
        assert_eq!(
            starter_message("/2", &chatline::STARTERS),
            Some(chatline::STARTERS[1].message)
        );
        assert_eq!(starter_message("/0", &chatline::STARTERS), None);
        assert_eq!(starter_message("/3", &chatline::STARTERS), None);
        assert_eq!(starter_message("/new", &chatline::STARTERS), None);
    }
}
