//! TutorHub CLI and REST API entry point.
//!
//! Binary name: `tutorhub`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, then
//! dispatches to a maintenance command or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;
use tutorhub_infra::config::load_config;
use tutorhub_infra::data_dir::resolve_data_dir;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tutorhub", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;

    tutorhub_observe::tracing_setup::init_tracing(&config.logging, cli.verbose, cli.quiet)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, data_dir, config).await;

    tutorhub_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(
    cli: Cli,
    data_dir: std::path::PathBuf,
    config: tutorhub_types::config::AppConfig,
) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => {
            cli::migrate::migrate(&data_dir, &config.database, cli.json).await?;
        }

        Commands::Status => {
            let state = AppState::init(data_dir, &config).await?;
            cli::status::status(&state, &config, cli.json).await?;
            state.db_pool.close().await;
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(data_dir, &config).await?;
            let pool = state.db_pool.clone();

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, "REST API listening");
            if !cli.quiet {
                println!(
                    "  {} TutorHub API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            pool.close().await;
            tracing::info!("server stopped");
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal source is ignored and the
/// other one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
