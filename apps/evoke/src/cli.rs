//! Command line definitions

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "evoke",
    version,
    about = "Source package build tool for the evox package manager"
)]
pub struct Cli {
    /// Raise log verbosity to debug
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the package in the current directory
    Build,

    /// Increment the package release counter (pkgrel)
    Increment,

    /// Scaffold a new package directory
    Create {
        name: String,
        version: String,
        description: String,
        /// Download URL; literal name/version occurrences become templates
        source: String,
        maintainer: Option<String>,
        license: Option<String>,
        url: Option<String>,
    },
}
