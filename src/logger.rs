//! Operational logging.
//!
//! One timestamped line per event, all on stderr. Access lines follow
//! the `[<client-ip>] <status> <path>` format; everything else is free
//! text. Nothing logged here ever reaches a client.

use chrono::Local;
use hyper::StatusCode;
use std::net::{IpAddr, SocketAddr};

fn write_line(message: &str) {
    eprintln!("{} {message}", Local::now().format("%Y.%m.%d %H:%M:%S"));
}

pub fn log_server_start(addr: &SocketAddr) {
    write_line(&format!("serving on http://{addr}."));
}

pub fn log_interface_choice(name: &str) {
    write_line(&format!("choosing interface: {name}."));
}

/// One line per completed request.
pub fn log_access(client: IpAddr, status: StatusCode, path: &str) {
    write_line(&format!("[{client}] {} {path}", status.as_u16()));
}

pub fn log_error(message: &str) {
    write_line(message);
}

pub fn log_fatal(err: &impl std::fmt::Display) {
    write_line(&err.to_string());
}
