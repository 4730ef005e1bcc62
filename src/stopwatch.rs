//! A resumable stopwatch for measuring play time.
//!
//! The board engine has no notion of time; the session layer runs one of
//! these and hands the accumulated seconds to the statistics code when a game
//! ends.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    /// When the current run started, `None` while stopped.
    running_since: Option<Instant>,
    /// Time accumulated over the completed runs.
    accumulated: Duration,
}

impl Stopwatch {
    /// Starts (or resumes) the stopwatch. Starting an already-running
    /// stopwatch banks the current run first, so no time is lost.
    pub fn start(&mut self) {
        self.accumulated = self.elapsed();
        self.running_since = Some(Instant::now());
    }

    /// Stops the stopwatch, banking the current run.
    pub fn stop(&mut self) {
        self.accumulated = self.elapsed();
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// The total time accumulated across all runs, including the current one.
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Stopwatch;
    use std::time::Duration;

    const SLEEP: Duration = Duration::from_millis(50);
    // generous, CI machines stall
    const TOLERANCE: Duration = Duration::from_millis(25);

    fn assert_close(actual: Duration, expected: Duration) {
        let difference = if actual > expected {
            actual - expected
        } else {
            expected - actual
        };

        assert!(
            difference <= TOLERANCE,
            "expected about {:?}, measured {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn a_never_started_stopwatch_reads_zero() {
        let stopwatch = Stopwatch::default();

        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }

    #[test]
    fn a_running_stopwatch_accumulates_time() {
        let mut stopwatch = Stopwatch::default();
        stopwatch.start();

        std::thread::sleep(SLEEP);

        assert!(stopwatch.is_running());
        assert_close(stopwatch.elapsed(), SLEEP);
    }

    #[test]
    fn a_stopped_stopwatch_holds_its_reading() {
        let mut stopwatch = Stopwatch::default();
        stopwatch.start();
        std::thread::sleep(SLEEP);
        stopwatch.stop();

        let frozen = stopwatch.elapsed();
        std::thread::sleep(SLEEP);

        assert_eq!(stopwatch.elapsed(), frozen);
    }

    #[test]
    fn resuming_keeps_adding_to_the_accumulated_time() {
        let mut stopwatch = Stopwatch::default();

        stopwatch.start();
        std::thread::sleep(SLEEP);
        stopwatch.stop();

        stopwatch.start();
        std::thread::sleep(SLEEP);
        stopwatch.stop();

        assert_close(stopwatch.elapsed(), SLEEP * 2);
    }

    #[test]
    fn rapid_toggling_loses_no_measurable_time() {
        let mut stopwatch = Stopwatch::default();
        stopwatch.start();

        for _ in 0..1000 {
            stopwatch.stop();
            stopwatch.start();
        }
        stopwatch.stop();

        assert_close(stopwatch.elapsed(), Duration::ZERO);
    }
}
