pub use generic_error::GenericError;
pub(crate) use icmp::{Dial, EchoCodec, RawSocketDialer};
pub use icmp::{IpVersion, Ttl};
pub use ping_error::PingError;
pub use ping_result::PingResult;
pub(crate) use probe_loop::ProbeLoop;
pub use resolver::{resolve, Target};
pub(crate) use round_trip::RoundTrip;
pub use round_trip::PingReply;
pub use session_stats::{RttSummary, SessionStats, StatsReport};
pub use stop_condition::{stop_on_signals, StopCondition};

mod generic_error;
pub(crate) mod icmp;
mod ping_error;
mod ping_result;
mod probe_loop;
mod resolver;
mod round_trip;
mod session_stats;
mod stop_condition;
