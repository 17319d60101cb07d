use crate::details::{Dial, EchoCodec, ProbeLoop, RawSocketDialer, RoundTrip};
use crate::{PingError, PingResult, SessionStats, StopCondition, Target};
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_DATA_SIZE: usize = 56;
/// The echo data has to fit the 8 byte send timestamp.
pub const MIN_DATA_SIZE: usize = 8;
/// Largest echo data one IPv4 datagram can carry: 65535 minus the IPv4 and ICMP headers.
pub const MAX_DATA_SIZE: usize = 65_507;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// When a session ends on its own.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProbeMode {
    /// Send exactly this many probes (more than zero).
    Bounded(u64),
    /// Keep going until stopped.
    Unbounded,
}

impl ProbeMode {
    /// Maps a `-c` count: 0 means unbounded, negative counts are rejected.
    pub fn from_count(count: i64) -> PingResult<ProbeMode> {
        match u64::try_from(count) {
            Ok(0) => Ok(ProbeMode::Unbounded),
            Ok(count) => Ok(ProbeMode::Bounded(count)),
            Err(_) => Err(PingError::Usage("ping: count must be a positive number".to_owned())),
        }
    }

    pub(crate) fn allows(self, iteration: u64) -> bool {
        match self {
            ProbeMode::Bounded(count) => iteration < count,
            ProbeMode::Unbounded => true,
        }
    }
}

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PingConfig {
    pub mode: ProbeMode,
    pub data_size: usize,
    /// Pause after each probe. Not shortened by the time the probe took.
    pub interval: Duration,
    /// How long to wait for each reply.
    pub timeout: Duration,
}

impl Default for PingConfig {
    fn default() -> Self {
        PingConfig {
            mode: ProbeMode::Unbounded,
            data_size: DEFAULT_DATA_SIZE,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PingConfig {
    pub fn validate(&self) -> PingResult<()> {
        if self.data_size < MIN_DATA_SIZE {
            return Err(PingError::Usage(format!(
                "ping: packet size {} is too small, minimum is {MIN_DATA_SIZE}",
                self.data_size
            )));
        }
        if self.data_size > MAX_DATA_SIZE {
            return Err(PingError::Usage(format!(
                "ping: packet size {} is too large, maximum is {MAX_DATA_SIZE}",
                self.data_size
            )));
        }
        if self.mode == ProbeMode::Bounded(0) {
            return Err(PingError::Usage("ping: count must be a positive number".to_owned()));
        }
        if self.timeout.is_zero() {
            return Err(PingError::Usage("ping: timeout must be greater than zero".to_owned()));
        }
        Ok(())
    }
}

/// The line printed before the first probe.
pub fn banner(host: &str, target: &Target, config: &PingConfig) -> String {
    format!("PING {host} ({}): {} data bytes", target.ip_addr, config.data_size)
}

/// Identifier carried by every Echo Request of this process.
#[allow(clippy::cast_possible_truncation)]
pub fn session_identifier() -> u16 {
    (std::process::id() & 0xFFFF) as u16
}

/// Pings `target` over raw sockets until the configured count is reached or `stop` is raised.
///
/// One line per probe is written to `out`; the statistics are returned for the caller to report.
pub fn run<W: Write>(config: &PingConfig, target: &Target, stop: &StopCondition, out: &mut W) -> PingResult<SessionStats> {
    run_with_dialer(config, target, stop, out, RawSocketDialer)
}

fn run_with_dialer<D, W>(
    config: &PingConfig,
    target: &Target,
    stop: &StopCondition,
    out: &mut W,
    dialer: D,
) -> PingResult<SessionStats>
where
    D: Dial,
    W: Write,
{
    config.validate()?;
    let codec = EchoCodec::new(target.ip_version, session_identifier(), config.data_size)?;
    let round_trip = RoundTrip::new(dialer, target.ip_addr, codec, config.timeout);
    let probe_loop = ProbeLoop::new(round_trip, target.ip_addr, config.mode, config.interval, stop);
    Ok(probe_loop.run(out))
}
