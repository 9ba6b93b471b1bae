//! ZPL Relay - forwards ZPL print jobs from a webhook to network label printers.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zpl_relay::{
    config::{CheckConfig, Cli, Command, ServeConfig},
    directory::FileDirectory,
    relay,
    server::{create_router, RouterConfig, PRINT_ROUTE},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("ZPL Relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Printer directory: {}", config.printers.display());
    info!("  Max body size: {} bytes", config.max_body_bytes);

    // Fail fast on a broken directory; it is re-read per request afterwards.
    let directory = FileDirectory::new(&config.printers);
    match directory.load().await {
        Ok(table) => {
            let active = table.printers().iter().filter(|p| p.active).count();
            info!(
                "  Printers: {} configured, {} active",
                table.len(),
                active
            );
            if active == 0 {
                warn!("  No active printers; every print request will be rejected");
            }
        }
        Err(e) => {
            error!("Failed to load printer directory: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let router_config = build_router_config(&config);
    let router = create_router(directory, router_config);

    let addr = config.bind_address();
    info!("Server listening on: http://{}", addr);
    info!("  Webhook: http://{}{}?token=<token>", addr, PRINT_ROUTE);
    warn!("  GET requests carry token and ZPL in the query string; they may appear in access logs");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "zpl_relay=debug,tower_http=debug"
    } else {
        "zpl_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    RouterConfig::new()
        .with_max_body_bytes(config.max_body_bytes)
        .with_tracing(!config.no_tracing)
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("ZPL Relay Directory Check");
    println!("═════════════════════════");
    println!();

    let directory = FileDirectory::new(&config.printers);
    let table = match directory.load().await {
        Ok(table) => {
            println!("✓ Directory: {}", directory.path().display());
            table
        }
        Err(e) => {
            println!("✗ Directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    if table.is_empty() {
        println!("  (no printers configured)");
    }

    let mut unreachable = 0;
    for printer in table.printers() {
        let state = if printer.active { "active" } else { "inactive" };
        println!(
            "  {} ({}:{}, timeout {}s, token {}) [{}]",
            printer.name,
            printer.host,
            relay::resolve_port(printer),
            relay::resolve_timeout(printer).as_secs(),
            printer.masked_token(),
            state
        );

        if config.probe && printer.active {
            match relay::probe(printer).await {
                Ok(()) => println!("    ✓ reachable"),
                Err(e) => {
                    println!("    ✗ {}", e);
                    unreachable += 1;
                }
            }
        }
    }

    println!();
    println!("═════════════════════════");
    if unreachable > 0 {
        println!("✗ {} printer(s) unreachable", unreachable);
        return ExitCode::FAILURE;
    }

    println!("✓ All checks passed!");
    ExitCode::SUCCESS
}
