use crate::{PingConfig, PingError, PingResult, ProbeMode, DEFAULT_DATA_SIZE};
use argh::FromArgs;

pub const USAGE: &str = "usage: ping [-c count] [-s packetsize] [-v] host";

#[derive(FromArgs, Debug)]
/// ping - send ICMP ECHO_REQUEST packets to a network host
struct Args {
    #[argh(option, short = 'c', default = "0")]
    /// stop after sending <count> ECHO_REQUEST packets; 0 pings until interrupted
    count: i64,

    #[argh(option, short = 's', default = "DEFAULT_DATA_SIZE")]
    /// number of data bytes to send (at least 8)
    packet_size: usize,

    #[argh(switch, short = 'v')]
    /// print diagnostics to standard error
    verbose: bool,

    #[argh(positional)]
    /// host name or IP address
    host: String,
}

/// A validated command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub host: String,
    pub config: PingConfig,
    pub verbose: bool,
}

/// Parses a full command line, program name first.
///
/// Every failure, `--help` included, comes back as [`PingError::Usage`] carrying the text to
/// print.
pub fn parse<S: AsRef<str>>(args: &[S]) -> PingResult<Invocation> {
    let command = args.first().map_or("ping", AsRef::as_ref);
    let rest: Vec<&str> = args.iter().skip(1).map(AsRef::as_ref).collect();

    let args = Args::from_args(&[command], &rest).map_err(|early_exit| match early_exit.status {
        Ok(()) => PingError::Usage(early_exit.output),
        Err(()) => PingError::Usage(format!("{}\n{USAGE}", early_exit.output.trim_end())),
    })?;

    let config = PingConfig {
        mode: ProbeMode::from_count(args.count)?,
        data_size: args.packet_size,
        ..PingConfig::default()
    };
    config.validate()?;

    Ok(Invocation { host: args.host, config, verbose: args.verbose })
}
