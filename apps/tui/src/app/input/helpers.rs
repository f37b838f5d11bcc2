use std::time::{Duration, Instant};

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Drops step events that arrive faster than `min_interval`, e.g. key
/// auto-repeat bursts.
#[derive(Debug, Clone)]
pub struct StepThrottle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl StepThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        let allowed = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.min_interval);
        if allowed {
            self.last = Some(now);
        }
        allowed
    }
}
