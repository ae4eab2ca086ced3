//! Fatal startup errors.
//!
//! Everything here aborts the process before the first connection is
//! accepted; per-request failures never use these types.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot serve '{path}': {source}")]
    Root { path: String, source: io::Error },

    #[error("failed to enumerate network interfaces: {0}")]
    Interfaces(#[source] io::Error),

    #[error("network interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("no usable IPv4 address on interface '{0}'")]
    NoUsableAddress(String),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to listen on {addr}: {source}")]
    Listen { addr: SocketAddr, source: io::Error },
}
