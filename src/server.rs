//! Listener setup and the accept loop.
//!
//! One spawned task per connection; hyper's HTTP/1 machinery provides
//! all the concurrency the handlers need. The shared config is
//! read-only, so connections never coordinate with each other.

use crate::config::ServeConfig;
use crate::error::StartupError;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Bind the configured address and serve until the process is killed.
///
/// A bind failure is the last possible fatal error; accept failures
/// after that are logged and the loop keeps going.
pub async fn run(cfg: ServeConfig) -> Result<(), StartupError> {
    let addr = cfg.bind_addr;
    let listener =
        create_listener(addr).map_err(|source| StartupError::Listen { addr, source })?;
    logger::log_server_start(&addr);

    let cfg = Arc::new(cfg);
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => handle_connection(stream, peer, Arc::clone(&cfg)),
            Err(err) => logger::log_error(&format!("fail to accept connection: {err}.")),
        }
    }
}

/// Serve one connection on its own task.
fn handle_connection(stream: TcpStream, peer: SocketAddr, cfg: Arc<ServeConfig>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let cfg = Arc::clone(&cfg);
                async move { handler::handle_request(req, &cfg, peer.ip()).await }
            }),
        );

        // A client hanging up mid-response lands here; the response is
        // already gone, so there is nothing to do beyond recording it.
        if let Err(err) = conn.await {
            logger::log_error(&format!("fail to serve connection: {err:?}."));
        }
    });
}

/// Create a `TcpListener` ready for the tokio accept loop.
///
/// `SO_REUSEADDR` lets a restarted process rebind a port still in
/// TIME_WAIT.
fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn listener_binds_ephemeral_port() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        let listener = create_listener(addr).unwrap();
        let bound = listener.local_addr().unwrap();
        assert_ne!(bound.port(), 0);
    }
}
