//! Ballot CLI: connect the wallet, show the tallies, cast the vote.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ballot_sync::{ConfigError, SyncConfig, SyncCore, VoteOutcome};
use ballot_types::{Phase, SessionSnapshot};
use ballot_utils::LogFormat;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::render;

#[derive(Parser)]
#[command(name = "ballot", about = "View candidate tallies and cast your vote")]
struct Cli {
    /// JSON-RPC endpoint of the ledger node.
    #[arg(long, env = "BALLOT_LEDGER_ENDPOINT")]
    ledger_endpoint: Option<String>,

    /// Address of the candidate registry contract.
    #[arg(long, env = "BALLOT_REGISTRY")]
    registry: Option<String>,

    /// JSON-RPC endpoint of the wallet provider. Without one, no wallet is detected.
    #[arg(long, env = "BALLOT_WALLET_PROVIDER")]
    wallet_provider: Option<String>,

    /// Give up waiting for a vote confirmation after this many seconds.
    #[arg(long, env = "BALLOT_CONFIRMATION_TIMEOUT")]
    confirmation_timeout: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Print snapshots as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Connect and show the current tallies.
    Status,
    /// Connect and vote for the candidate at INDEX.
    Vote { index: usize },
    /// Connect, keep the view live, and vote by typing a candidate number.
    Watch,
}

impl Cli {
    /// Layer CLI flags and env vars over `base`.
    fn apply(&self, base: SyncConfig) -> SyncConfig {
        SyncConfig {
            ledger_endpoint: self.ledger_endpoint.clone().unwrap_or(base.ledger_endpoint),
            registry_address: self.registry.clone().unwrap_or(base.registry_address),
            wallet_provider: self.wallet_provider.clone().or(base.wallet_provider),
            confirmation_timeout_secs: self.confirmation_timeout.or(base.confirmation_timeout_secs),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.clone().unwrap_or(base.log_format),
            ..base
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let file_config: Option<Result<SyncConfig, ConfigError>> =
        cli.config.as_ref().map(SyncConfig::from_toml_file);
    let base = match &file_config {
        Some(Ok(cfg)) => cfg.clone(),
        _ => SyncConfig::default(),
    };
    let config = cli.apply(base);

    let format = config.log_format.parse::<LogFormat>().unwrap_or_default();
    ballot_utils::init_tracing(format, &config.log_level);

    match (&cli.config, &file_config) {
        (Some(path), Some(Ok(_))) => tracing::info!("Loaded config from {}", path.display()),
        (Some(path), Some(Err(e))) => tracing::warn!(
            "Failed to load config file {}: {e}, using CLI defaults",
            path.display()
        ),
        _ => {}
    }

    tracing::info!(
        ledger = %config.ledger_endpoint,
        registry = %config.registry_address,
        wallet = config.wallet_provider.as_deref().unwrap_or("none"),
        "starting ballot session"
    );
    let core = Arc::new(SyncCore::from_config(&config)?);

    let watching = matches!(cli.command, Command::Watch);
    let snap = match cli.command {
        Command::Status => core.initialize().await,
        Command::Vote { index } => {
            let snap = core.initialize().await;
            if snap.phase != Phase::Error {
                if let VoteOutcome::Dropped(reason) = core.request_vote(index).await {
                    tracing::warn!(index, %reason, "vote not submitted");
                }
            }
            core.snapshot()
        }
        Command::Watch => watch(core.clone(), cli.json).await?,
    };

    if !watching {
        show(&snap, cli.json)?;
    }
    Ok(ExitCode::from(exit_status(&snap)))
}

/// `1` when the session cannot continue, `2` when the last vote attempt
/// failed but may be retried.
fn exit_status(snap: &SessionSnapshot) -> u8 {
    match &snap.error {
        None => 0,
        Some(err) if err.is_fatal() => 1,
        Some(_) => 2,
    }
}

fn show(snap: &SessionSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(snap)?);
    } else {
        println!("{}\n", render(snap));
    }
    Ok(())
}

/// Re-render on every published snapshot and turn typed numbers into votes,
/// until ctrl-c or end of input.
async fn watch(core: Arc<SyncCore>, json: bool) -> anyhow::Result<SessionSnapshot> {
    let mut updates = core.subscribe();
    show(&updates.borrow_and_update().clone(), json)?;

    tokio::spawn({
        let core = core.clone();
        async move { core.initialize().await }
    });

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = updates.borrow_and_update().clone();
                show(&snap, json)?;
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<usize>() {
                    Ok(index) => {
                        let core = core.clone();
                        tokio::spawn(async move {
                            if let VoteOutcome::Dropped(reason) = core.request_vote(index).await {
                                tracing::warn!(index, %reason, "vote not submitted");
                            }
                        });
                    }
                    Err(_) => tracing::warn!(input = line, "expected a candidate number"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    Ok(core.snapshot())
}
