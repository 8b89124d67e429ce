use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};
use watchdir::{config::AppConfig, logging, resolve, state::AppState, walk, web};

/// Serve a directory tree for browsing and media playback on the local
/// network.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The directory to serve (defaults to the current directory)
    root: Option<PathBuf>,

    /// The network port to listen on (an OS-assigned port is used when it
    /// cannot be bound)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Do not open the networks page in a browser on startup
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug)?;

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(root) = args.root {
        config.media.root = root;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_browser {
        config.server.open_browser = false;
    }
    config.canonicalize_root().context("invalid media root")?;

    info!("serving {}", config.media.root.display());

    // Advisory inventory of the tree; a failure here is not fatal.
    match walk::collect_files(&config.media.root).await {
        Ok(files) => {
            let playable = files
                .iter()
                .filter(|path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(resolve::is_playable)
                })
                .count();
            info!("found {playable} playable files among {} entries", files.len());
        }
        Err(err) => warn!("could not inventory media root: {err}"),
    }

    let listener = bind_listener(config.server.port).await?;
    let port = listener
        .local_addr()
        .context("listener has no local address")?
        .port();
    info!("{} listening on port {port}", config.server.name);

    let shutdown = Arc::new(Notify::new());
    let state = AppState {
        config: Arc::new(config),
        port,
        shutdown: shutdown.clone(),
    };

    if state.config.server.open_browser {
        let url = format!("http://localhost:{port}/networks");
        if let Err(err) = open::that_detached(&url) {
            warn!("could not open {url}: {err}");
        }
    }

    let router = web::create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

/// Bind the preferred port, falling back to an OS-assigned one when taken.
async fn bind_listener(preferred: u16) -> Result<TcpListener> {
    match TcpListener::bind(("0.0.0.0", preferred)).await {
        Ok(listener) => Ok(listener),
        Err(err) => {
            warn!("port {preferred} unavailable ({err}), asking the OS for one");
            TcpListener::bind(("0.0.0.0", 0))
                .await
                .context("failed to bind fallback port")
        }
    }
}

/// Resolve once either an OS signal or the shutdown endpoint fires.
async fn wait_for_shutdown(shutdown: Arc<Notify>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received Ctrl+C"),
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = shutdown.notified() => info!("shutdown endpoint triggered"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received Ctrl+C"),
            _ = shutdown.notified() => info!("shutdown endpoint triggered"),
        }
    }
}
