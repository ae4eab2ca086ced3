//! Bind-address discovery.
//!
//! The listen address is the first IPv4 address of a named network
//! interface, or of the first interface the OS reports when none is
//! named. Which interface comes first is environment-dependent; on a
//! typical Linux machine it is the loopback device.

use crate::error::StartupError;
use crate::logger;
use std::net::IpAddr;

pub fn resolve_bind_address(interface: Option<&str>) -> Result<IpAddr, StartupError> {
    let addrs = if_addrs::get_if_addrs().map_err(StartupError::Interfaces)?;

    let name = match interface {
        Some(name) => {
            if !addrs.iter().any(|entry| entry.name == name) {
                return Err(StartupError::InterfaceNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => match addrs.first() {
            Some(first) => first.name.clone(),
            None => return Err(StartupError::InterfaceNotFound("<default>".to_string())),
        },
    };

    // One entry per (interface, address); scan only the chosen
    // interface for an IPv4 address.
    let ip = addrs
        .iter()
        .filter(|entry| entry.name == name)
        .map(if_addrs::Interface::ip)
        .find(IpAddr::is_ipv4)
        .ok_or_else(|| StartupError::NoUsableAddress(name.clone()))?;

    logger::log_interface_choice(&name);
    Ok(ip)
}
