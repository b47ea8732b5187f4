//! Frozen-stream detection
//!
//! A stalled feed produces no error: samples stop arriving and the surface
//! clock simply stops advancing. The detector samples that clock on a fixed
//! cadence and counts consecutive probes without progress while the surface
//! claims to be rendering. Crossing the threshold signals the manager to
//! rebuild the transport.

use std::time::Duration;

/// Compares successive playback-clock samples to spot a frozen feed.
#[derive(Debug)]
pub struct StallDetector {
    threshold: u32,
    last_clock: Option<Duration>,
    frozen_probes: u32,
}

impl StallDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            last_clock: None,
            frozen_probes: 0,
        }
    }

    /// Feed one probe. Returns `true` when the freeze threshold is crossed;
    /// the counter resets so the replacement session gets a full window
    /// before the next trigger.
    ///
    /// The current clock value is recorded regardless of outcome. The first
    /// probe after a reset has nothing to compare against and never counts
    /// as frozen.
    pub fn sample(&mut self, clock: Duration, is_rendering: bool) -> bool {
        let frozen = is_rendering && self.last_clock == Some(clock);
        self.last_clock = Some(clock);

        if frozen {
            self.frozen_probes += 1;
        } else {
            self.frozen_probes = 0;
        }

        if self.frozen_probes >= self.threshold {
            self.frozen_probes = 0;
            true
        } else {
            false
        }
    }

    /// Forget the recorded sample and counter. Called when the session
    /// changes.
    pub fn reset(&mut self) {
        self.last_clock = None;
        self.frozen_probes = 0;
    }

    /// Consecutive no-progress probes observed so far.
    pub fn frozen_probes(&self) -> u32 {
        self.frozen_probes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    #[test]
    fn test_recovery_after_three_frozen_probes() {
        let mut detector = StallDetector::new(3);

        // Rendering starts with the clock at 5s.
        assert!(!detector.sample(secs(5), true));

        // Clock sequence 5, 5, 5, 6: the trigger fires on the third
        // consecutive equal reading, before the clock advances.
        assert!(!detector.sample(secs(5), true));
        assert!(!detector.sample(secs(5), true));
        assert!(detector.sample(secs(5), true));
        assert_eq!(detector.frozen_probes(), 0);
        assert!(!detector.sample(secs(6), true));
    }

    #[test]
    fn test_progress_resets_counter() {
        let mut detector = StallDetector::new(3);

        detector.sample(secs(5), true);
        detector.sample(secs(5), true);
        detector.sample(secs(5), true);
        assert_eq!(detector.frozen_probes(), 2);

        // The clock advances, the freeze window starts over.
        assert!(!detector.sample(secs(6), true));
        assert_eq!(detector.frozen_probes(), 0);

        assert!(!detector.sample(secs(6), true));
        assert!(!detector.sample(secs(6), true));
        assert!(detector.sample(secs(6), true));
    }

    #[test]
    fn test_no_counting_while_not_rendering() {
        let mut detector = StallDetector::new(3);

        for _ in 0..10 {
            assert!(!detector.sample(secs(5), false));
        }
        assert_eq!(detector.frozen_probes(), 0);

        // A paused surface going back to rendering still needs the full
        // window.
        assert!(!detector.sample(secs(5), true));
        assert!(!detector.sample(secs(5), true));
        assert!(detector.sample(secs(5), true));
    }

    #[test]
    fn test_reset_forgets_last_sample() {
        let mut detector = StallDetector::new(3);

        detector.sample(secs(5), true);
        detector.sample(secs(5), true);
        detector.reset();
        assert_eq!(detector.frozen_probes(), 0);

        // First probe after reset records without comparing.
        assert!(!detector.sample(secs(5), true));
        assert_eq!(detector.frozen_probes(), 0);
    }
}
