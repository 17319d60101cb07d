use socket2::{Domain, Protocol};
use std::net::IpAddr;

pub(crate) const IPV4_MAX_HEADER_LEN: usize = 60;
pub(crate) const IPV6_HEADER_LEN: usize = 40;

/// The two address families a ping session can run over.
///
/// Everything that differs between ICMP and ICMPv6 (message types, socket protocol, where the
/// hop count lives in a received datagram) is keyed off this type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    pub fn of(ip_addr: &IpAddr) -> IpVersion {
        match ip_addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }

    pub fn is_ipv6(self) -> bool {
        self == IpVersion::V6
    }

    /// Label printed in front of the hop count of a reply.
    pub fn hop_label(self) -> &'static str {
        match self {
            IpVersion::V4 => "ttl",
            IpVersion::V6 => "hlim",
        }
    }

    pub(crate) fn domain(self) -> Domain {
        match self {
            IpVersion::V4 => Domain::IPV4,
            IpVersion::V6 => Domain::IPV6,
        }
    }

    pub(crate) fn protocol(self) -> Protocol {
        match self {
            IpVersion::V4 => Protocol::ICMPV4,
            IpVersion::V6 => Protocol::ICMPV6,
        }
    }

    /// Size of the buffer a reply to a request of `request_len` bytes is read into.
    ///
    /// IPv4 raw sockets hand over the IP header as well; IPv6 raw sockets do not, but the buffer
    /// is never smaller than a base header so the hop limit can always be read.
    pub(crate) fn receive_buffer_len(self, request_len: usize) -> usize {
        match self {
            IpVersion::V4 => request_len + IPV4_MAX_HEADER_LEN,
            IpVersion::V6 => request_len.max(IPV6_HEADER_LEN),
        }
    }

    /// The part of the receive buffer handed to the decoder after `received` bytes were read.
    pub(crate) fn datagram(self, buf: &[u8], received: usize) -> &[u8] {
        let len = match self {
            IpVersion::V4 => received,
            IpVersion::V6 => received.max(IPV6_HEADER_LEN),
        };
        &buf[..len.min(buf.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn of_ip_addr() {
        assert_eq!(IpVersion::V4, IpVersion::of(&IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(IpVersion::V6, IpVersion::of(&IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn hop_label() {
        assert_eq!("ttl", IpVersion::V4.hop_label());
        assert_eq!("hlim", IpVersion::V6.hop_label());
    }

    #[test]
    fn receive_buffer_len() {
        assert_eq!(124, IpVersion::V4.receive_buffer_len(64));
        assert_eq!(64, IpVersion::V6.receive_buffer_len(64));
        assert_eq!(40, IpVersion::V6.receive_buffer_len(16));
    }

    #[test]
    fn datagram() {
        let buf = [0u8; 64];
        assert_eq!(16, IpVersion::V4.datagram(&buf, 16).len());
        assert_eq!(40, IpVersion::V6.datagram(&buf, 16).len());
        assert_eq!(64, IpVersion::V6.datagram(&buf, 64).len());
        assert_eq!(64, IpVersion::V4.datagram(&buf, 100).len());
    }
}
