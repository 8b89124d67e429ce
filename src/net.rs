use std::net::{IpAddr, Ipv4Addr};
use tracing::warn;

/// Externally reachable IPv4 addresses of one network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddresses {
    pub name: String,
    pub addresses: Vec<Ipv4Addr>,
}

/// Snapshot the host's reachable IPv4 addresses, grouped by interface.
///
/// Loopback addresses and non-IPv4 families are dropped, and interfaces left
/// with no qualifying address are omitted entirely. The OS is consulted on
/// every call, so interfaces coming up or down are reflected immediately. A
/// failed enumeration is logged and degrades to an empty result rather than
/// failing the request.
pub fn interface_addresses() -> Vec<InterfaceAddresses> {
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => group_addresses(interfaces),
        Err(err) => {
            warn!("failed to enumerate network interfaces: {err}");
            Vec::new()
        }
    }
}

/// Pure grouping step, separate so it can be fed synthetic interface data.
/// Interfaces keep first-seen order; addresses keep enumeration order.
pub fn group_addresses(interfaces: Vec<(String, IpAddr)>) -> Vec<InterfaceAddresses> {
    let mut grouped: Vec<InterfaceAddresses> = Vec::new();
    for (name, address) in interfaces {
        let IpAddr::V4(address) = address else {
            continue;
        };
        if address.is_loopback() {
            continue;
        }
        match grouped.iter_mut().find(|group| group.name == name) {
            Some(group) => group.addresses.push(address),
            None => grouped.push(InterfaceAddresses {
                name,
                addresses: vec![address],
            }),
        }
    }
    grouped
}
