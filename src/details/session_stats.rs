use crate::details::round_trip::PingReply;
use crate::details::PingResult;
use std::fmt;

/// Counters and round-trip samples of one ping session.
///
/// `received <= transmitted` and `rtt_samples().len() == received` hold after every call to
/// [`SessionStats::record`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    transmitted: u64,
    received: u64,
    rtt_samples: Vec<f64>,
}

/// Round-trip statistics in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RttSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        SessionStats::default()
    }

    /// Records the outcome of one probe.
    #[allow(clippy::cast_precision_loss)]
    pub fn record(&mut self, result: &PingResult<PingReply>) {
        if let Ok(reply) = result {
            self.push_sample(reply.round_trip_time.as_nanos() as f64 / 1_000_000.0);
        }
        self.transmitted += 1;
    }

    pub(crate) fn push_sample(&mut self, rtt_millis: f64) {
        self.received += 1;
        self.rtt_samples.push(rtt_millis);
    }

    pub fn transmitted(&self) -> u64 {
        self.transmitted
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn rtt_samples(&self) -> &[f64] {
        &self.rtt_samples
    }

    /// Percentage of probes without a reply; 0 when nothing was sent.
    #[allow(clippy::cast_precision_loss)]
    pub fn packet_loss(&self) -> f64 {
        if self.transmitted == 0 {
            return 0.0;
        }
        (1.0 - self.received as f64 / self.transmitted as f64) * 100.0
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn rtt_summary(&self) -> RttSummary {
        let Some(&first) = self.rtt_samples.first() else {
            return RttSummary::default();
        };
        let n = self.rtt_samples.len() as f64;
        let (min, max, sum) = self
            .rtt_samples
            .iter()
            .fold((first, first, 0.0), |(min, max, sum), &rtt| (min.min(rtt), max.max(rtt), sum + rtt));
        let avg = sum / n;
        let variance = self.rtt_samples.iter().map(|rtt| (rtt - avg) * (rtt - avg)).sum::<f64>() / n;
        RttSummary { min, avg, max, std_dev: variance.sqrt() }
    }

    pub fn report(&self) -> StatsReport<'_> {
        StatsReport(self)
    }
}

/// The closing statistics block, as printed when the session ends.
pub struct StatsReport<'a>(&'a SessionStats);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        let RttSummary { min, avg, max, std_dev } = stats.rtt_summary();
        writeln!(f, "--- Statistics ---")?;
        writeln!(
            f,
            "{} packets transmitted, {} packets received, {:.3}% packet loss",
            stats.transmitted,
            stats.received,
            stats.packet_loss()
        )?;
        write!(f, "round-trip min/avg/max/std-dev = {min:.3}/{avg:.3}/{max:.3}/{std_dev:.3} ms")
    }
}
