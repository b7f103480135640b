use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use duet::RoomToken;
use duet::client::{
    CloseReason, Notice, SessionConfig, SessionError, SessionOutcome, SyntheticMediaSource,
    start_call, timeout_from_secs,
};
use duet::server::RelayConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Two-party audio/video calls over a tiny signaling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        /// Overrides `DUET_LISTEN_ADDR` (default 0.0.0.0:3000).
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Join a room (or open a new one) and negotiate a call.
    Call {
        /// Room token, or a link fragment such as `#abc`.
        room: Option<String>,

        #[arg(long)]
        relay_url: Option<String>,

        /// STUN/TURN server URL; may be repeated.
        #[arg(long = "ice-server")]
        ice_servers: Vec<String>,

        /// Seconds to wait for the handshake after the peer shows up (0 waits forever).
        #[arg(long)]
        handshake_timeout: Option<u64>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay { listen } => {
            let mut config = RelayConfig::from_env()?;
            if let Some(addr) = listen {
                config.listen_addr = addr;
            }
            println!("{}", "Starting duet relay...".green().bold());
            duet::server::serve(config).await?;
        }
        Commands::Call {
            room,
            relay_url,
            ice_servers,
            handshake_timeout,
        } => {
            let mut config = SessionConfig::from_env()?;
            if let Some(room) = room {
                config.room = RoomToken::from_fragment(&room);
            }
            if let Some(url) = relay_url {
                config.relay_url = url;
            }
            if !ice_servers.is_empty() {
                config.transport.ice_servers = ice_servers;
            }
            if let Some(secs) = handshake_timeout {
                config.handshake_timeout = timeout_from_secs(secs);
            }
            run_call(config).await?;
        }
    }

    Ok(())
}

async fn run_call(mut config: SessionConfig) -> Result<()> {
    let room = config.room.get_or_insert_with(RoomToken::generate).clone();
    println!("{} {}", "Room:".cyan().bold(), room.as_str().bold());
    println!("   Share it with the other participant: duet call {}", room);
    info!("Calling through {}", config.relay_url);

    let (mut handle, mut task) = start_call(&config, Arc::new(SyntheticMediaSource::new()))
        .await
        .with_context(|| format!("Failed to reach relay at {}", config.relay_url))?;
    let mut status = handle.subscribe();
    let mut hung_up = false;

    let outcome = loop {
        tokio::select! {
            joined = &mut task => break joined.context("Session task panicked")?,

            Some(notice) = handle.next_notice() => match notice {
                Notice::RoomFull { room, next } => println!(
                    "{} room {} is full, opening {} instead",
                    "!".yellow().bold(),
                    room,
                    next.as_str().bold()
                ),
                Notice::MediaUnavailable(reason) => println!(
                    "{} could not access camera/microphone: {}",
                    "!".red().bold(),
                    reason
                ),
            },

            Ok(()) = status.changed() => {
                let current = status.borrow_and_update().clone();
                println!("   [{}] {}", current.token, current.state);
            }

            _ = tokio::signal::ctrl_c(), if !hung_up => {
                hung_up = true;
                println!("{}", "Hanging up...".cyan());
                handle.hangup().await;
            }
        }
    };

    report(outcome)
}

fn report(outcome: SessionOutcome) -> Result<()> {
    let result = outcome.into_result();
    match &result {
        Ok(reason) => info!("Call closed: {:?}", reason),
        Err(e) => error!("Call failed: {}", e),
    }
    match result {
        Ok(CloseReason::Local) => println!("{}", "Call ended.".green().bold()),
        Ok(CloseReason::Remote) => println!("{}", "The other side hung up.".green().bold()),
        Ok(CloseReason::Transport) => println!("{}", "Media connection closed.".yellow().bold()),
        Err(SessionError::HandshakeTimeout(limit)) => {
            anyhow::bail!("No connection within {:?}", limit)
        }
        Err(e) => return Err(e).context("Call failed"),
    }
    Ok(())
}
