#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use muzaklink::config::Config;
use muzaklink::handler::SongLinkHandler;
use muzaklink::resolver::OdesliResolver;
use muzaklink::transport::{BotApiTransport, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "muzaklink",
    version,
    about = "Chat bot that answers streaming links with every platform's version of the song"
)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Missing `default` chat policy fails here, before any polling starts.
    let config = Config::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let transport: Arc<dyn Transport> = Arc::new(
        BotApiTransport::connect(config.token.clone(), config.api_url_base.clone()).await?,
    );
    let resolver = Arc::new(OdesliResolver::new(
        config.odesli_api_key.clone(),
        config.user_country.clone(),
    ));

    let handler = SongLinkHandler::new(Arc::new(config), resolver, Arc::clone(&transport));

    tracing::info!("bot started");

    tokio::select! {
        () = muzaklink::runtime::run(handler, transport) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }

    Ok(())
}
