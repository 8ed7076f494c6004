//! Friendbot CLI - chat with the friendly bot from a terminal.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use friendbot_client::{ClientConfig, HttpCompletionClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use friendbot_core::{CannedResponder, Conversation, Credential};
use friendbot_planner::{ChatSession, PlannerConfig, ResponsePlanner};

mod render;
mod repl;

/// Friendbot - a friendly chat bot with canned replies and an optional remote model
#[derive(Parser, Debug)]
#[command(name = "friendbot")]
#[command(about = "Chat with Friendbot", long_about = None)]
struct Cli {
    /// API key for the completion endpoint (omit for canned replies only)
    #[arg(long, env = "FRIENDBOT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat completions endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Token ceiling per reply
    #[arg(long, default_value = "300")]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value = "0.7")]
    temperature: f32,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Accept keys that do not start with the OpenRouter prefix
    #[arg(long)]
    no_prefix_check: bool,

    /// Value for the HTTP-Referer attribution header
    #[arg(long)]
    referer: Option<String>,

    /// Print canned replies immediately instead of simulating typing
    #[arg(long)]
    no_delay: bool,

    /// Answer unmatched messages generically instead of asking for a key
    #[arg(long)]
    no_key_hint: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat (default)
    Chat,

    /// Send one message and print the reply
    Ask {
        /// Message text
        text: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_endpoint(&self.endpoint)
            .with_model(&self.model)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_request_timeout(
                (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            );
        if self.no_prefix_check {
            config = config.with_credential_prefix(None);
        }
        if let Some(referer) = &self.referer {
            config = config.with_referer(referer);
        }
        config
    }

    fn planner(&self) -> Result<ResponsePlanner, Box<dyn std::error::Error>> {
        let client = HttpCompletionClient::new(self.client_config())?;
        Ok(ResponsePlanner::with_config(
            Arc::new(client),
            CannedResponder::new(),
            PlannerConfig {
                credential_hint: !self.no_key_hint,
            },
        ))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let planner = cli.planner()?;
    let credential = Credential::from_option(cli.api_key.clone());

    info!(
        model = %cli.model,
        credential = %credential.as_ref().map(|c| c.masked()).unwrap_or_else(|| "none".to_string()),
        "Starting Friendbot"
    );

    match &cli.command {
        Some(Commands::Ask { text }) => ask(planner, credential, text).await?,
        Some(Commands::Chat) | None => {
            let options = repl::Options {
                typing_delay: !cli.no_delay,
            };
            repl::run(planner, credential, options).await;
        }
    }

    Ok(())
}

async fn ask(
    planner: ResponsePlanner,
    credential: Option<Credential>,
    text: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ChatSession::with_conversation(Conversation::empty(), planner, credential);
    let (reply, _) = session.submit(text).await?;
    println!("{}", reply.text);
    Ok(())
}
