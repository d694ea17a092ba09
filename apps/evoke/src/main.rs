//! evoke - source package build tool for the evox package manager
//!
//! Thin CLI over the evoke-builder pipeline: build the package in the
//! current directory, bump its release counter or scaffold a new package.

mod cli;
mod create;

use crate::cli::{Cli, Commands};
use clap::Parser;
use evoke_builder::Builder;
use evoke_errors::{Result, UserFacingError};
use evoke_metadata::{increment_release, paths};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e.user_message());
        if let Some(hint) = e.user_hint() {
            eprintln!("hint: {hint}");
        }
        process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build => {
            let report = Builder::new()?.build(Path::new(".")).await?;
            println!("built {}", report.archive.display());
            if report.dependencies.is_empty() {
                println!("no runtime dependencies detected");
            } else {
                println!("runtime dependencies: {}", report.dependencies.join(" "));
            }
            Ok(())
        }
        Commands::Increment => {
            let release = increment_release(Path::new(paths::PKGINFO)).await?;
            println!("pkgrel is now {release}");
            Ok(())
        }
        Commands::Create {
            name,
            version,
            description,
            source,
            maintainer,
            license,
            url,
        } => {
            let root = create::create_package(&create::CreateRequest {
                name,
                version,
                description,
                source,
                maintainer,
                license,
                url,
            })
            .await?;
            println!("created package {}", root.display());
            Ok(())
        }
    }
}
