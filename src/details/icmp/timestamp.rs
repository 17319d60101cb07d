use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub(crate) const TIMESTAMP_LEN: usize = 8;

/// Wall-clock send time in nanoseconds since the Unix epoch, as carried in the echo payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct SendTimestamp(u64);

impl SendTimestamp {
    pub(crate) fn now() -> SendTimestamp {
        SendTimestamp(unix_nanos(SystemTime::now()))
    }

    pub(crate) fn to_le_bytes(self) -> [u8; TIMESTAMP_LEN] {
        self.0.to_le_bytes()
    }

    pub(crate) fn from_le_bytes(bytes: [u8; TIMESTAMP_LEN]) -> SendTimestamp {
        SendTimestamp(u64::from_le_bytes(bytes))
    }

    /// Time elapsed between this timestamp and `now`; zero if the clock went backwards.
    pub(crate) fn elapsed_at(self, now: SystemTime) -> Duration {
        Duration::from_nanos(unix_nanos(now).saturating_sub(self.0))
    }
}

impl From<u64> for SendTimestamp {
    fn from(nanos: u64) -> Self {
        SendTimestamp(nanos)
    }
}

impl From<SendTimestamp> for u64 {
    fn from(timestamp: SendTimestamp) -> Self {
        timestamp.0
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|since_epoch| u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
