//! CLI argument definitions using clap
//!
//! Commands:
//! - stockroom serve [--host <host>] [--port <port>]

use clap::{Parser, Subcommand};

/// stockroom - inventory and product management REST API
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Host to bind, overriding STOCKROOM_HOST
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding STOCKROOM_PORT
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
