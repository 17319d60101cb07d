use super::IpVersion;
use std::net::IpAddr;
use std::{io, time::Duration};

pub(crate) mod raw_socket;

/// A connected datagram socket speaking ICMP or ICMPv6.
pub(crate) trait TSocket: Send + Sync {
    fn send(&self, buf: &[u8]) -> io::Result<usize>;
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()>;
}

/// Opens one socket per probe. The socket is closed when it is dropped.
pub(crate) trait Dial {
    type Socket: TSocket;

    fn dial(&self, ip_addr: IpAddr, ip_version: IpVersion) -> io::Result<Self::Socket>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::details::icmp::echo::tests::{ipv4_header, reply_datagram};

    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub(crate) enum OnDial {
        ReturnErr,
        ReturnDefault,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub(crate) enum OnSend {
        ReturnErr,
        ReturnDefault,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub(crate) enum OnReceive {
        ReturnWouldBlock,
        ReturnErr,
        /// Reply to the last request sent on this socket.
        ReturnEchoReply { ttl: u8 },
        /// The last request itself, as the loopback interface hands it to an IPv4 raw socket.
        ReturnEchoRequest,
        /// Reply to the last request, but carrying another process' identifier.
        ReturnForeignReply,
        ReturnTruncated,
    }

    #[derive(Default)]
    struct MockState {
        on_receive: VecDeque<OnReceive>,
        sent: Vec<Vec<u8>>,
        read_timeouts: Vec<Duration>,
        dialed: usize,
        closed: usize,
    }

    /// Hands out [`SocketMock`]s which all share one receive script.
    ///
    /// Once the script runs dry every receive would block.
    #[derive(Clone)]
    pub(crate) struct DialMock {
        on_dial: OnDial,
        on_send: OnSend,
        state: Arc<Mutex<MockState>>,
    }

    impl DialMock {
        pub(crate) fn new(on_dial: OnDial, on_send: OnSend, on_receive: &[OnReceive]) -> Self {
            let state = MockState { on_receive: on_receive.iter().copied().collect(), ..MockState::default() };
            Self { on_dial, on_send, state: Arc::new(Mutex::new(state)) }
        }

        pub(crate) fn replying(on_receive: &[OnReceive]) -> Self {
            Self::new(OnDial::ReturnDefault, OnSend::ReturnDefault, on_receive)
        }

        pub(crate) fn should_dial_number_of_sockets(&self, n: usize) -> &Self {
            assert_eq!(n, self.state.lock().unwrap().dialed);
            self
        }

        pub(crate) fn should_close_number_of_sockets(&self, n: usize) -> &Self {
            assert_eq!(n, self.state.lock().unwrap().closed);
            self
        }

        pub(crate) fn should_send_number_of_messages(&self, n: usize) -> &Self {
            assert_eq!(n, self.state.lock().unwrap().sent.len());
            self
        }

        pub(crate) fn sent(&self) -> Vec<Vec<u8>> {
            self.state.lock().unwrap().sent.clone()
        }

        pub(crate) fn read_timeouts(&self) -> Vec<Duration> {
            self.state.lock().unwrap().read_timeouts.clone()
        }
    }

    impl Dial for DialMock {
        type Socket = SocketMock;

        fn dial(&self, _ip_addr: IpAddr, ip_version: IpVersion) -> io::Result<SocketMock> {
            if self.on_dial == OnDial::ReturnErr {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "simulating dial error in mock"));
            }
            self.state.lock().unwrap().dialed += 1;
            Ok(SocketMock { ip_version, on_send: self.on_send, state: self.state.clone(), last_sent: Mutex::new(None) })
        }
    }

    pub(crate) struct SocketMock {
        ip_version: IpVersion,
        on_send: OnSend,
        state: Arc<Mutex<MockState>>,
        last_sent: Mutex<Option<Vec<u8>>>,
    }

    impl SocketMock {
        fn datagram(&self, on_receive: OnReceive) -> io::Result<Vec<u8>> {
            let last_sent = self.last_sent.lock().unwrap().clone();
            let request =
                last_sent.ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "nothing sent on this socket"))?;
            Ok(match on_receive {
                OnReceive::ReturnEchoReply { ttl } => reply_datagram(self.ip_version, &request, ttl),
                OnReceive::ReturnForeignReply => {
                    let mut datagram = reply_datagram(self.ip_version, &request, 64);
                    let offset = datagram.len() - request.len();
                    datagram[offset + 4] ^= 0xFF;
                    datagram
                }
                OnReceive::ReturnEchoRequest => match self.ip_version {
                    IpVersion::V4 => {
                        let mut datagram = ipv4_header(64, request.len());
                        datagram.extend_from_slice(&request);
                        datagram
                    }
                    IpVersion::V6 => request,
                },
                OnReceive::ReturnTruncated => match self.ip_version {
                    IpVersion::V4 => vec![0x4F, 0, 0, 20],
                    IpVersion::V6 => vec![129, 0],
                },
                OnReceive::ReturnWouldBlock | OnReceive::ReturnErr => unreachable!(),
            })
        }
    }

    impl Drop for SocketMock {
        fn drop(&mut self) {
            if let Ok(mut state) = self.state.lock() {
                state.closed += 1;
            }
        }
    }

    impl TSocket for SocketMock {
        fn send(&self, buf: &[u8]) -> io::Result<usize> {
            if self.on_send == OnSend::ReturnErr {
                return Err(io::Error::new(io::ErrorKind::Other, "simulating error in mock"));
            }
            self.state.lock().unwrap().sent.push(buf.to_vec());
            *self.last_sent.lock().unwrap() = Some(buf.to_vec());
            Ok(buf.len())
        }

        fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
            let on_receive = self.state.lock().unwrap().on_receive.pop_front().unwrap_or(OnReceive::ReturnWouldBlock);
            let datagram = match on_receive {
                OnReceive::ReturnWouldBlock => {
                    return Err(io::Error::new(io::ErrorKind::WouldBlock, "simulating would-block in mock"));
                }
                OnReceive::ReturnErr => {
                    return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "simulating error in mock"));
                }
                other => self.datagram(other)?,
            };
            if buf.len() < datagram.len() {
                return Err(io::Error::new(io::ErrorKind::Other, "buffer too small"));
            }
            buf[..datagram.len()].copy_from_slice(&datagram);
            Ok(datagram.len())
        }

        fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
            self.state.lock().unwrap().read_timeouts.push(timeout);
            Ok(())
        }
    }
}
