use super::{Dial, TSocket};
use crate::details::icmp::IpVersion;
use socket2::{SockAddr, Type};
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::{io, time::Duration};

/// A raw ICMP or ICMPv6 socket connected to a single destination.
pub(crate) struct RawSocket {
    socket: socket2::Socket,
}

impl RawSocket {
    pub(crate) fn connect(ip_addr: IpAddr, ip_version: IpVersion) -> Result<Self, io::Error> {
        tracing::trace!("creating RawSocket for {ip_addr}");
        let socket = socket2::Socket::new(ip_version.domain(), Type::RAW, Some(ip_version.protocol()))?;
        let addr: SockAddr = SocketAddr::new(ip_addr, 0).into();
        socket.connect(&addr)?;
        Ok(RawSocket { socket })
    }
}

impl TSocket for RawSocket {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        // `Read` is implemented for `&Socket`, which spares us the `MaybeUninit` cast.
        (&self.socket).read(buf)
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(Some(timeout))
    }
}

/// Opens a fresh [`RawSocket`] per probe.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RawSocketDialer;

impl Dial for RawSocketDialer {
    type Socket = RawSocket;

    fn dial(&self, ip_addr: IpAddr, ip_version: IpVersion) -> io::Result<RawSocket> {
        RawSocket::connect(ip_addr, ip_version)
    }
}
