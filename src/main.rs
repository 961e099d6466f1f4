// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! cpl - Commit Policy Linter

use clap::Parser;
use cpl::cli::{run, Cli};
use cpl::CplError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        // Lint failures are already reported with their issues.
        if !matches!(e, CplError::Lint(_)) {
            eprintln!("Error: {}", e);
        } else {
            tracing::debug!("{}", e);
        }
        std::process::exit(e.exit_code());
    }
}

/// Set up logging/tracing.
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::try_new("cpl=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
