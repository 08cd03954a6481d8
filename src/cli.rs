use clap::{Parser, Subcommand};
use log::{info, warn};
use songdeck::clients::errors::Result;
use songdeck::config::{Config, ConfigBuilder};
use songdeck::web;

#[derive(Parser)]
#[command(name = "songdeck")]
#[command(version, about = "Song catalog page with Spotify preview playback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the song list page
    Serve {
        /// Base URL of the catalog service
        #[arg(long, env = "CATALOG_URL")]
        catalog_url: Option<String>,
        /// Catalog request timeout in seconds
        #[arg(long, env = "CATALOG_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,
        /// Port previews are served from, defaults to the catalog port
        #[arg(long, env = "PREVIEW_PORT")]
        preview_port: Option<u16>,
        /// Address to listen on
        #[arg(long = "bind", env = "BIND_ADDR")]
        bind_addr: Option<String>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            catalog_url,
            timeout_secs,
            preview_port,
            bind_addr,
        } => {
            let mut builder = ConfigBuilder::new();
            if let Some(url) = catalog_url {
                builder = builder.catalog_url(url);
            }
            if let Some(secs) = timeout_secs {
                builder = builder.timeout_secs(secs);
            }
            if let Some(port) = preview_port {
                builder = builder.preview_port(port);
            }
            if let Some(addr) = bind_addr {
                builder = builder.bind_addr(addr);
            }
            info!("Building config ...");
            serve(builder.build()?).await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let app = web::router(config.app_state()?);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "Serving songs from {} on http://{}",
        config.catalog_url, config.bind_addr
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
}
