//! Trailing-edge debounce.

use std::time::Duration;

/// Holds the latest value until no new value has arrived for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the timer.
    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let mut debouncer = Debouncer::from_millis(140);
        debouncer.push(1, ms(0));
        assert_eq!(debouncer.poll(ms(139)), None);
        assert_eq!(debouncer.poll(ms(140)), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_latest_value_wins_and_resets_timer() {
        let mut debouncer = Debouncer::from_millis(250);
        debouncer.push("a", ms(0));
        debouncer.push("b", ms(200));
        assert_eq!(debouncer.poll(ms(300)), None);
        assert_eq!(debouncer.poll(ms(450)), Some("b"));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut debouncer = Debouncer::from_millis(10);
        debouncer.push((), ms(0));
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(ms(100)), None);
    }
}
