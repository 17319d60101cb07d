#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use details::{
    resolve, stop_on_signals, GenericError, IpVersion, PingError, PingReply, PingResult, RttSummary,
    SessionStats, StatsReport, StopCondition, Target, Ttl,
};
pub use ping::*;

pub mod cli;
mod details;
mod ping;
