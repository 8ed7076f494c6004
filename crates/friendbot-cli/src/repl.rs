//! Interactive chat loop.
//!
//! Submissions never block input: each one runs as its own task and its
//! reply is appended when it arrives, so replies to overlapping submissions
//! may land in completion order.

use std::borrow::Cow;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use friendbot_core::{Conversation, Credential, DEFAULT_HISTORY_WINDOW};
use friendbot_planner::{Reply, ResponsePlanner};

use crate::render;

/// Shortest simulated typing time for replies produced offline.
const MIN_TYPING_MS: u64 = 1000;
/// Spread added on top of the minimum.
const TYPING_SPREAD_MS: usize = 2000;

/// Chat loop options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Wait 1-3 s before showing a reply produced offline.
    pub typing_delay: bool,
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Say(String),
    SetKey(Option<String>),
    Help,
    Quit,
    Blank,
}

impl Input {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        match trimmed.split_once(char::is_whitespace) {
            Some(("/key", rest)) => Self::SetKey(Some(rest.trim().to_string())),
            _ => match trimmed {
                "/key" => Self::SetKey(None),
                "/help" => Self::Help,
                "/quit" | "/exit" => Self::Quit,
                _ => Self::Say(line.to_string()),
            },
        }
    }
}

/// Run the chat on stdin/stdout until `/quit` or end of input.
pub async fn run(planner: ResponsePlanner, credential: Option<Credential>, options: Options) {
    render::print_banner(credential.is_some());
    let lines = spawn_line_reader(BufReader::new(tokio::io::stdin()));
    chat_loop(planner, credential, options, lines).await;
}

/// Read lines on a task of their own.
///
/// Bytes that are not UTF-8 are replaced instead of ending input. The
/// channel closes at end of input or on a read error.
fn spawn_line_reader<R>(mut reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if line_tx.send(decode_line(&buf)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input, no more submissions");
                    break;
                }
            }
        }
    });
    line_rx
}

fn decode_line(bytes: &[u8]) -> String {
    let line = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = line {
        warn!("Input line was not valid UTF-8, invalid bytes replaced");
    }
    line.trim_end_matches(|c| c == '\n' || c == '\r').to_string()
}

/// Drive the conversation from `lines` and return it once input ends and
/// every outstanding reply has been appended, or on `/quit`.
async fn chat_loop(
    planner: ResponsePlanner,
    mut credential: Option<Credential>,
    options: Options,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> Conversation {
    let mut conversation = Conversation::new();
    for message in conversation.messages() {
        render::print_message(message);
    }

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    let mut pending = 0usize;
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    if pending == 0 {
                        break;
                    }
                    continue;
                };

                match Input::parse(&line) {
                    Input::Blank => {}
                    Input::Quit => break,
                    Input::Help => render::print_help(),
                    Input::SetKey(raw) => {
                        credential = raw.and_then(Credential::parse);
                        match &credential {
                            Some(c) => render::print_notice(&format!("API key set ({})", c.masked())),
                            None => render::print_notice("API key cleared, using canned replies"),
                        }
                    }
                    Input::Say(text) => {
                        let history = conversation.context(DEFAULT_HISTORY_WINDOW);
                        if conversation.push_user(text.as_str()).is_err() {
                            continue;
                        }

                        let planner = planner.clone();
                        let credential = credential.clone();
                        let reply_tx = reply_tx.clone();
                        tokio::spawn(async move {
                            let reply = planner
                                .plan(text.trim(), credential.as_ref(), history.as_slice())
                                .await;
                            if options.typing_delay && reply.source.is_offline() {
                                let jitter = planner.canned().random().pick(TYPING_SPREAD_MS + 1);
                                let delay = MIN_TYPING_MS + jitter as u64;
                                tokio::time::sleep(Duration::from_millis(delay)).await;
                            }
                            // Receiver only goes away when the loop exits.
                            reply_tx.send(reply).ok();
                        });

                        pending += 1;
                        render::print_typing(pending);
                    }
                }
            }
            Some(reply) = reply_rx.recv() => {
                pending -= 1;
                debug!(source = ?reply.source, pending, "Reply ready");
                let message = conversation.push_bot(reply.text);
                render::print_message(message);
                if !input_open && pending == 0 {
                    break;
                }
            }
        }
    }

    conversation
}
