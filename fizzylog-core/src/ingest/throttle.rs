use std::time::{Duration, Instant};

/// Lets one diagnostic through per interval and counts the rest.
#[derive(Debug)]
pub(crate) struct LogThrottle {
    interval: Duration,
    last: Option<Instant>,
    suppressed: u64,
}

impl LogThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            suppressed: 0,
        }
    }

    /// `Some(n)` when a message may be emitted now, where `n` is how many
    /// were swallowed since the previous one. `None` otherwise.
    pub(crate) fn check(&mut self) -> Option<u64> {
        self.check_at(Instant::now())
    }

    pub(crate) fn check_at(&mut self, now: Instant) -> Option<u64> {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => {
                self.suppressed += 1;
                None
            }
            _ => {
                self.last = Some(now);
                Some(std::mem::take(&mut self.suppressed))
            }
        }
    }
}
