//! buildman CLI and REST API entry point.
//!
//! Binary name: `bman`
//!
//! Parses CLI arguments, opens the store and restores the build manager,
//! then dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use buildman_core::service::LiveFields;
use buildman_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands, InventoryCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,buildman=debug",
        _ => "trace",
    };
    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(filter, otel).map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "bman", &mut std::io::stdout());
        return Ok(());
    }

    let session = cli.session.map(SecretString::from);
    let state = AppState::init(session).await?;
    let json = cli.json;

    match cli.command {
        Commands::List => cli::build::list_builds(&state, json).await?,
        Commands::Show { build } => cli::build::show_build(&state, &build, json).await?,
        Commands::New { name } => cli::build::new_build(&state, name, json).await?,
        Commands::Duplicate { build } => cli::build::duplicate_build(&state, &build, json).await?,
        Commands::Remove { build, force } => {
            cli::build::remove_build(&state, &build, force, json).await?;
        }
        Commands::Edit(args) => cli::build::edit_build(&state, &args, json).await?,

        Commands::Export { output } => {
            cli::transfer::export(&state, output.as_deref(), cli.quiet).await?;
        }
        Commands::Import { file } => cli::transfer::import(&state, &file, json).await?,

        Commands::Apply { build, force } => {
            cli::apply::apply_build(&state, &build, force, json, cli.quiet).await?;
        }
        Commands::Clear => cli::apply::clear(&state, json).await?,
        Commands::Status => cli::apply::status(&state, json).await?,

        Commands::Live => cli::live::live(&state, json).await?,
        Commands::ImportLive {
            build,
            fraction,
            skill,
            army,
        } => {
            let fields = LiveFields {
                fraction,
                skill,
                army,
            };
            cli::live::import_live(&state, &build, fields, json).await?;
        }
        Commands::Inventory { action } => match action {
            InventoryCommand::Sync => cli::live::sync_inventory(&state, json).await?,
            InventoryCommand::List => cli::live::list_inventory(&state, json)?,
        },
        Commands::Catalog { resource } => cli::catalog::show(&state, resource, json)?,

        Commands::Serve { port, host, .. } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} buildman API listening on {}",
                console::style("⚔").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
}
