use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Cooperative cancellation shared between the probe loop and whoever wants it to stop.
#[derive(Clone, Default)]
pub struct StopCondition {
    condition: Arc<(Mutex<bool>, Condvar)>,
}

impl StopCondition {
    pub fn new() -> Self {
        StopCondition::default()
    }

    pub fn set_should_stop(&self) {
        let (lock, cvar) = &*self.condition;
        let mut should_stop = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *should_stop = true;
        cvar.notify_all();
    }

    pub fn get_should_stop(&self) -> bool {
        let (lock, _) = &*self.condition;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps for `timeout` unless a stop is requested first; returns whether to stop.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.condition;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (should_stop, _) = cvar
            .wait_timeout_while(guard, timeout, |should_stop| !*should_stop)
            .unwrap_or_else(PoisonError::into_inner);
        *should_stop
    }
}

/// Spawns a thread which raises `stop` on SIGINT or SIGTERM.
///
/// The thread keeps listening for the life of the process. Signals after the first are only
/// logged, the session winds down after the probe in flight.
pub fn stop_on_signals(stop: &StopCondition) -> io::Result<JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let stop = stop.clone();
    std::thread::Builder::new().name("signals".to_owned()).spawn(move || {
        for signal in signals.forever() {
            on_signal(&stop, signal);
        }
    })
}

// Returns whether a stop had already been requested.
fn on_signal(stop: &StopCondition, signal: i32) -> bool {
    if stop.get_should_stop() {
        tracing::warn!("received signal {signal} again, waiting for the probe in flight");
        true
    } else {
        tracing::debug!("received signal {signal}, stopping");
        stop.set_should_stop();
        false
    }
}
