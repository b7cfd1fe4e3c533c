//! Auto-refresh timing

use crate::consts::cli_consts::refresh;
use std::time::{Duration, Instant};

/// When the next collection fetch is due. While paused no refresh is ever
/// due; resuming makes one due immediately.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Instant,
    paused: bool,
}

impl RefreshSchedule {
    /// A schedule whose first refresh is due at `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_secs(refresh::MIN_INTERVAL_SECS)),
            next_due: now,
            paused: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time left until the next refresh, `None` while paused.
    pub fn due_in(&self, now: Instant) -> Option<Duration> {
        if self.paused {
            None
        } else {
            Some(self.next_due.saturating_duration_since(now))
        }
    }

    pub fn mark_refreshed(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    /// Returns whether the schedule changed.
    pub fn pause(&mut self) -> bool {
        let changed = !self.paused;
        self.paused = true;
        changed
    }

    /// Returns whether the schedule changed. A resumed schedule is due at once.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.next_due = now;
        true
    }

    /// Change the interval, clamped to the minimum. A pending refresh is
    /// brought forward if the new interval would make it due sooner.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval.max(Duration::from_secs(refresh::MIN_INTERVAL_SECS));
        let latest = now + self.interval;
        if self.next_due > latest {
            self.next_due = latest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIN: Duration = Duration::from_secs(300);

    #[test]
    fn first_refresh_is_immediate() {
        let now = Instant::now();
        let schedule = RefreshSchedule::new(FIVE_MIN, now);
        assert_eq!(schedule.due_in(now), Some(Duration::ZERO));
    }

    #[test]
    fn refresh_reschedules_one_interval_ahead() {
        let now = Instant::now();
        let mut schedule = RefreshSchedule::new(FIVE_MIN, now);
        schedule.mark_refreshed(now);
        assert_eq!(schedule.due_in(now), Some(FIVE_MIN));
        assert_eq!(
            schedule.due_in(now + Duration::from_secs(100)),
            Some(Duration::from_secs(200))
        );
        assert_eq!(schedule.due_in(now + FIVE_MIN * 2), Some(Duration::ZERO));
    }

    #[test]
    fn pause_and_resume() {
        let now = Instant::now();
        let mut schedule = RefreshSchedule::new(FIVE_MIN, now);
        schedule.mark_refreshed(now);

        assert!(schedule.pause());
        assert!(!schedule.pause());
        assert_eq!(schedule.due_in(now), None);

        let later = now + Duration::from_secs(10);
        assert!(schedule.resume(later));
        assert!(!schedule.resume(later));
        assert_eq!(schedule.due_in(later), Some(Duration::ZERO));
    }

    #[test]
    fn interval_is_clamped_and_pulls_in_deadline() {
        let now = Instant::now();
        let mut schedule = RefreshSchedule::new(Duration::from_secs(1), now);
        assert_eq!(schedule.interval(), Duration::from_secs(5));

        schedule.set_interval(FIVE_MIN, now);
        schedule.mark_refreshed(now);
        schedule.set_interval(Duration::from_secs(30), now);
        assert_eq!(schedule.due_in(now), Some(Duration::from_secs(30)));
    }
}
