use std::time::{Duration, Instant};

/// Minimum wall-clock spacing between simulation steps
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Lets at most one step through per `min_interval`, however fast the
/// render loop spins.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval: Duration,
    last: Option<Instant>,
}

impl FrameGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}
