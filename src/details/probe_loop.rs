use crate::details::icmp::{Dial, IpVersion, SequenceNumber};
use crate::details::round_trip::{PingReply, RoundTrip};
use crate::details::{PingError, PingResult, SessionStats, StopCondition};
use crate::ProbeMode;
use std::io::Write;
use std::net::IpAddr;
use std::time::Duration;

/// Drives a session: one probe at a time, a fixed pause after each, until the count is used up
/// or a stop is requested.
pub(crate) struct ProbeLoop<'a, D> {
    round_trip: RoundTrip<D>,
    ip_addr: IpAddr,
    ip_version: IpVersion,
    mode: ProbeMode,
    interval: Duration,
    stop: &'a StopCondition,
}

impl<'a, D> ProbeLoop<'a, D>
where
    D: Dial,
{
    pub(crate) fn new(
        round_trip: RoundTrip<D>,
        ip_addr: IpAddr,
        mode: ProbeMode,
        interval: Duration,
        stop: &'a StopCondition,
    ) -> Self {
        ProbeLoop { round_trip, ip_addr, ip_version: IpVersion::of(&ip_addr), mode, interval, stop }
    }

    /// Runs the session, writing one line per probe to `out`.
    pub(crate) fn run<W: Write>(&self, out: &mut W) -> SessionStats {
        let mut stats = SessionStats::new();
        let mut sequence_number = SequenceNumber::start_value();
        let mut iteration: u64 = 0;

        while self.mode.allows(iteration) {
            // (1) Probe.
            let result = self.round_trip.ping_once(sequence_number);

            // (2) Report and record.
            self.report(out, sequence_number, &result);
            stats.record(&result);
            iteration += 1;
            sequence_number = sequence_number.next();

            // (3) Pause, then check termination.
            if self.stop.wait_timeout(self.interval) {
                tracing::debug!("stop requested after {iteration} probes");
                break;
            }
        }
        stats
    }

    fn report<W: Write>(&self, out: &mut W, sequence_number: SequenceNumber, result: &PingResult<PingReply>) {
        let written = match result {
            Ok(PingReply { ttl, round_trip_time }) => writeln!(
                out,
                "Packet from {}: icmp_seq={} {}={} time={:.3} ms",
                self.ip_addr,
                sequence_number,
                self.ip_version.hop_label(),
                ttl,
                round_trip_time.as_secs_f64() * 1000.0
            ),
            Err(e) => {
                if let PingError::Dial(_) = e {
                    tracing::warn!("{e}");
                } else {
                    tracing::debug!("icmp_seq {sequence_number}: {e}");
                }
                writeln!(out, "Request timeout for icmp_seq {sequence_number}")
            }
        };
        if let Err(e) = written {
            tracing::error!("failed to write probe result: {e}");
        }
    }
}
