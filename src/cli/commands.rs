//! CLI command implementations

use std::net::SocketAddr;

use super::args::Command;
use super::errors::{CliError, CliResult};
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::observability::{Logger, Severity};

/// Dispatch the parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { host, port } => serve(host, port),
    }
}

/// Load configuration, apply CLI overrides and run the server until
/// shutdown.
pub fn serve(host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if config.socket_addr().parse::<SocketAddr>().is_err() {
        return Err(CliError::Config(format!(
            "invalid listen address: {}",
            config.socket_addr()
        )));
    }
    config.environment.init();

    Logger::log(
        Severity::Info,
        "serve_command",
        &[
            ("addr", &config.socket_addr()),
            ("environment", &format!("{:?}", config.environment)),
        ],
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Io)?;

    let server = HttpServer::with_config(config);
    runtime.block_on(server.start()).map_err(CliError::Io)
}
