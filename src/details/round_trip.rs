use crate::details::icmp::{Dial, EchoCodec, SequenceNumber, TSocket, Ttl};
use crate::details::{PingError, PingResult};
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant, SystemTime};

// A zero read timeout means "block forever" to the socket layer.
const MIN_READ_TIMEOUT: Duration = Duration::from_micros(1);

/// Outcome of a successful probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PingReply {
    pub ttl: Ttl,
    pub round_trip_time: Duration,
}

/// Sends one Echo Request and waits for its reply, on a socket that lives only as long as the
/// attempt.
pub(crate) struct RoundTrip<D> {
    dialer: D,
    ip_addr: IpAddr,
    codec: EchoCodec,
    timeout: Duration,
}

impl<D> RoundTrip<D>
where
    D: Dial,
{
    pub(crate) fn new(dialer: D, ip_addr: IpAddr, codec: EchoCodec, timeout: Duration) -> Self {
        RoundTrip { dialer, ip_addr, codec, timeout }
    }

    pub(crate) fn ping_once(&self, sequence_number: SequenceNumber) -> PingResult<PingReply> {
        let ip_version = self.codec.ip_version();
        // (1) Dial. The socket is closed when it goes out of scope, whatever the outcome.
        let socket = self.dialer.dial(self.ip_addr, ip_version).map_err(PingError::Dial)?;

        // (2) Send.
        let request = self.codec.encode(sequence_number)?;
        socket.send(&request)?;
        let deadline = Instant::now() + self.timeout;
        tracing::trace!("echo request {sequence_number} sent to {}", self.ip_addr);

        // (3) Receive until a matching reply shows up or the deadline passes.
        let mut buf = vec![0u8; ip_version.receive_buffer_len(self.codec.request_len())];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PingError::Timeout);
            }
            socket.set_read_timeout(remaining.max(MIN_READ_TIMEOUT))?;

            let received = match socket.recv(&mut buf) {
                Ok(received) => received,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    return Err(PingError::Timeout);
                }
                Err(e) => return Err(e.into()),
            };
            let receive_time = SystemTime::now();

            match self.codec.decode(ip_version.datagram(&buf, received))? {
                Some(reply)
                    if reply.identifier == self.codec.identifier() && reply.sequence_number == sequence_number =>
                {
                    return Ok(PingReply {
                        ttl: reply.ttl,
                        round_trip_time: reply.send_timestamp.elapsed_at(receive_time),
                    });
                }
                Some(reply) => {
                    tracing::debug!(
                        "skipping echo reply with identifier {:#06x} and sequence {}",
                        reply.identifier,
                        reply.sequence_number
                    );
                }
                None => {}
            }
        }
    }
}
