//! # Redraw clock
//!
//! Redraws happen on input, and additionally on a slow timer so that anything animated (cursor
//! rings, marching ants) keeps moving. While a pressure-sensitive pen is in use the timer speeds
//! up to keep the brush preview under the pen. The clock never touches the document.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct RedrawClock {
    idle: Duration,
    tablet: Duration,
    tablet_active: bool,
    last_redraw: Option<Instant>,
}
impl Default for RedrawClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), Duration::from_millis(15))
    }
}
impl RedrawClock {
    #[must_use]
    pub fn new(idle: Duration, tablet: Duration) -> Self {
        Self {
            idle,
            tablet,
            tablet_active: false,
            last_redraw: None,
        }
    }
    #[must_use]
    pub fn from_settings(settings: &crate::settings::ClockSettings) -> Self {
        Self::new(
            Duration::from_millis(settings.idle_ms),
            Duration::from_millis(settings.tablet_ms),
        )
    }
    pub fn set_tablet_active(&mut self, active: bool) {
        if active != self.tablet_active {
            log::trace!("redraw clock tablet mode: {active}");
        }
        self.tablet_active = active;
    }
    /// Current redraw period.
    #[must_use]
    pub fn interval(&self) -> Duration {
        if self.tablet_active {
            self.tablet
        } else {
            self.idle
        }
    }
    /// Should a redraw happen at `now`? Always true before the first redraw.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_redraw
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval())
    }
    /// When the next timed redraw is due, or None if it already is.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let last = self.last_redraw?;
        self.interval()
            .checked_sub(now.saturating_duration_since(last))
            .filter(|remaining| !remaining.is_zero())
    }
    pub fn mark_redrawn(&mut self, now: Instant) {
        self.last_redraw = Some(now);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn tablet_speeds_up() {
        let mut clock = RedrawClock::default();
        assert_eq!(clock.interval(), Duration::from_millis(300));
        clock.set_tablet_active(true);
        assert_eq!(clock.interval(), Duration::from_millis(15));
    }
    #[test]
    fn due_after_interval() {
        let mut clock = RedrawClock::default();
        let start = Instant::now();
        assert!(clock.is_due(start));
        clock.mark_redrawn(start);
        assert!(!clock.is_due(start + Duration::from_millis(100)));
        assert_eq!(
            clock.time_until_due(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert!(clock.is_due(start + Duration::from_millis(300)));
        assert_eq!(clock.time_until_due(start + Duration::from_millis(400)), None);
    }
}
