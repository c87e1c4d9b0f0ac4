use std::time::{Duration, Instant};

/// A simple debouncer that tracks when an action should be triggered
/// after a period of inactivity
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The duration to wait after the last event before triggering
    delay: Duration,
    /// When the last event occurred
    last_event: Option<Instant>,
    /// Whether we have a pending trigger
    pending: bool,
}

impl Debouncer {
    /// Create a new debouncer with the specified delay in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
            pending: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register that an event occurred
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    /// Register an event at a known instant
    pub fn trigger_at(&mut self, now: Instant) {
        self.last_event = Some(now);
        self.pending = true;
    }

    /// Check if enough time has passed to execute the debounced action
    /// Returns true if the action should be executed
    pub fn should_execute(&mut self) -> bool {
        self.should_execute_at(Instant::now())
    }

    pub fn should_execute_at(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }

        if let Some(last) = self.last_event {
            if now.saturating_duration_since(last) >= self.delay {
                self.pending = false;
                self.last_event = None;
                return true;
            }
        }
        false
    }

    /// Get the time remaining before the action will trigger
    /// Returns None if no action is pending
    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        if !self.pending {
            return None;
        }

        self.last_event.map(|last| {
            let elapsed = now.saturating_duration_since(last);
            self.delay.saturating_sub(elapsed)
        })
    }

    /// Reset the debouncer, canceling any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
        self.pending = false;
    }

    /// Check if there's a pending action
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Coalesces render requests: any number of requests between two frames
/// produce exactly one render on the next frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    pending: bool,
    requests: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    /// Consume the pending flag; true when a render is due this frame
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total requests seen, coalesced or not
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);
        debouncer.trigger_at(start);
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(100)));

        // A new keystroke restarts the quiet period
        debouncer.trigger_at(start + Duration::from_millis(200));
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(400)));
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(400)),
            Some(Duration::from_millis(100))
        );
        assert!(debouncer.should_execute_at(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_reset_cancels() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(10);
        debouncer.trigger_at(start);
        debouncer.reset();
        assert!(!debouncer.should_execute_at(start + Duration::from_secs(1)));
        assert_eq!(debouncer.time_remaining_at(start), None);
    }

    #[test]
    fn test_render_requests_coalesce() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request();
        scheduler.request();
        scheduler.request();
        assert!(scheduler.take());
        assert!(!scheduler.take());
        assert_eq!(scheduler.request_count(), 3);
    }
}
