use std::time::{Duration, Instant};

use more_asserts as ma;
use signal_hook::consts::SIGTERM;

use ping_echo::StopCondition;

#[test]
fn sigterm_raises_the_stop_condition() {
    let stop = StopCondition::new();
    let listener = ping_echo::stop_on_signals(&stop).unwrap();

    signal_hook::low_level::raise(SIGTERM).unwrap();

    let start = Instant::now();
    assert!(stop.wait_timeout(Duration::from_secs(5)));
    ma::assert_lt!(start.elapsed(), Duration::from_secs(5));

    // A second signal is absorbed by the listener, which keeps running.
    signal_hook::low_level::raise(SIGTERM).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(stop.get_should_stop());
    assert!(!listener.is_finished());
}
