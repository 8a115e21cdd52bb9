// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio: entry point.

use clap::Parser;
use folio_app::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialise tracing (structured logging) on stderr; stdout carries results.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("folio starting");

    if let Err(error) = folio_app::run(cli).await {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
