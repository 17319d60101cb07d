use crate::details::icmp::IpVersion;
use crate::details::{PingError, PingResult};
use std::net::IpAddr;

/// A resolved destination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Target {
    pub ip_addr: IpAddr,
    pub ip_version: IpVersion,
}

impl From<IpAddr> for Target {
    fn from(ip_addr: IpAddr) -> Self {
        // IPv4-mapped IPv6 addresses are pinged over IPv4.
        let ip_addr = match ip_addr {
            IpAddr::V6(ipv6) => ipv6.to_ipv4_mapped().map_or(ip_addr, IpAddr::V4),
            IpAddr::V4(_) => ip_addr,
        };
        Target { ip_addr, ip_version: IpVersion::of(&ip_addr) }
    }
}

/// Resolves a literal address or a host name; the first address found wins.
pub fn resolve(host: &str) -> PingResult<Target> {
    if let Ok(ip_addr) = host.parse::<IpAddr>() {
        return Ok(Target::from(ip_addr));
    }
    let addresses = dns_lookup::lookup_host(host).map_err(|e| {
        tracing::debug!("lookup of {host} failed: {e}");
        PingError::Resolution { host: host.to_owned() }
    })?;
    addresses
        .first()
        .map(|ip_addr| Target::from(*ip_addr))
        .ok_or_else(|| PingError::Resolution { host: host.to_owned() })
}
