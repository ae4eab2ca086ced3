use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod netif;
mod server;

#[derive(Parser, Debug)]
#[command(name = "dirserve")]
#[command(about = "Serve a directory tree or a single file over HTTP")]
#[command(version)]
struct Cli {
    /// Root directory or a file allowed to be visited
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// HTTP server port
    #[arg(short = 'p', long = "port", default_value_t = 8000)]
    port: u16,

    /// Network interface to bind to
    #[arg(short = 'i', long = "interface", value_name = "NAME")]
    interface: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        logger::log_fatal(&err);
        process::exit(config::FATAL_EXIT_CODE);
    }
}

/// Startup sequence: resolve the serve root, pick a bind address, then
/// hand over to the accept loop. Every error here is fatal; there is
/// no degraded mode.
fn run(cli: &Cli) -> Result<(), error::StartupError> {
    let (root_dir, scope) = config::resolve_root(cli.file.as_deref())?;
    let ip = netif::resolve_bind_address(cli.interface.as_deref())?;

    let cfg = config::ServeConfig {
        root_dir,
        scope,
        bind_addr: SocketAddr::new(ip, cli.port),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(error::StartupError::Runtime)?;

    runtime.block_on(server::run(cfg))
}
