//! Clock and timing utilities.
//!
//! Everything in the control pipeline is driven by explicit timestamps
//! (nanoseconds on a monotonic clock) handed in by the host. Nothing in the
//! pipeline sleeps or schedules callbacks: timers are [`Deadline`] values
//! compared against the current time whenever a sample or frame arrives.

use std::time::Instant;

/// Nanoseconds per millisecond.
pub const NS_PER_MS: u64 = 1_000_000;

/// Monotonic clock anchored to the moment a viewer session started.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl MonotonicClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the epoch.
    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Convert nanoseconds to fractional milliseconds.
pub fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / NS_PER_MS as f64
}

/// Convert milliseconds to nanoseconds. Negative input saturates to zero.
pub fn ms_to_ns(ms: f64) -> u64 {
    (ms.max(0.0) * NS_PER_MS as f64) as u64
}

/// A point in time after which something should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    due_ns: u64,
}

impl Deadline {
    /// A deadline `delay_ms` after `now_ns`.
    pub fn after(now_ns: u64, delay_ms: f64) -> Self {
        Self {
            due_ns: now_ns.saturating_add(ms_to_ns(delay_ms)),
        }
    }

    /// An absolute deadline.
    pub fn at(due_ns: u64) -> Self {
        Self { due_ns }
    }

    /// When the deadline expires.
    pub fn due_ns(&self) -> u64 {
        self.due_ns
    }

    /// Whether the deadline has been reached at `now_ns`.
    pub fn is_due(&self, now_ns: u64) -> bool {
        now_ns >= self.due_ns
    }

    /// Keep whichever of two deadlines expires first.
    pub fn earliest(current: Option<Deadline>, candidate: Deadline) -> Deadline {
        match current {
            Some(existing) if existing <= candidate => existing,
            _ => candidate,
        }
    }
}

/// Fixed-rate frame pacer for driving render ticks from an arbitrary clock.
///
/// Unlike the display refresh callback a browser would provide, replays and
/// tests need to know how many frames *would* have been rendered between two
/// timestamps.
#[derive(Debug)]
pub struct FramePacer {
    interval_ns: u64,
    next_due_ns: Option<u64>,
}

impl FramePacer {
    /// Create a pacer targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            next_due_ns: None,
        }
    }

    /// Collect the frame timestamps due up to and including `now_ns`.
    ///
    /// The first call always yields exactly one frame at `now_ns`, which
    /// anchors the schedule.
    pub fn due_frames(&mut self, now_ns: u64) -> Vec<u64> {
        let mut due = Vec::new();
        let mut next = match self.next_due_ns {
            None => {
                self.next_due_ns = Some(now_ns + self.interval_ns);
                return vec![now_ns];
            }
            Some(next) => next,
        };
        while next <= now_ns {
            due.push(next);
            next += self.interval_ns;
        }
        self.next_due_ns = Some(next);
        due
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.interval_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = MonotonicClock::start();
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(b >= a);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ms_ns_conversion() {
        assert_eq!(ms_to_ns(200.0), 200_000_000);
        assert!((ns_to_ms(16_670_000) - 16.67).abs() < 1e-9);
        assert_eq!(ms_to_ns(-5.0), 0);
    }

    #[test]
    fn test_deadline_due() {
        let deadline = Deadline::after(1_000, 0.5);
        assert_eq!(deadline.due_ns(), 501_000);
        assert!(!deadline.is_due(500_999));
        assert!(deadline.is_due(501_000));
    }

    #[test]
    fn test_earliest_keeps_sooner_deadline() {
        let soon = Deadline::at(100);
        let late = Deadline::at(200);
        assert_eq!(Deadline::earliest(Some(soon), late), soon);
        assert_eq!(Deadline::earliest(Some(late), soon), soon);
        assert_eq!(Deadline::earliest(None, late), late);
    }

    #[test]
    fn test_frame_pacer() {
        let mut pacer = FramePacer::new(60);
        assert_eq!(pacer.due_frames(0), vec![0]); // first call anchors
        assert!(pacer.due_frames(1_000_000).is_empty()); // 1ms later, too soon
        assert_eq!(pacer.due_frames(17_000_000).len(), 1); // ~16.67ms interval
        assert_eq!(pacer.due_frames(100_000_000).len(), 5);
    }
}
