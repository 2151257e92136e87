use std::time::Duration;

/// Recurring schedule advanced by elapsed time instead of a wall clock, so
/// the same code runs under the real event loop and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: Duration,
    carried: Duration,
    active: bool,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            carried: Duration::ZERO,
            active: false,
        }
    }

    /// (Re)arm the schedule; time carried from an earlier run is dropped
    pub fn start(&mut self) {
        self.carried = Duration::ZERO;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.carried = Duration::ZERO;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of periods completed during `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.active || self.period.is_zero() {
            return 0;
        }
        self.carried += elapsed;
        let mut fired = 0;
        while self.carried >= self.period {
            self.carried -= self.period;
            fired += 1;
        }
        fired
    }
}

/// Single-shot, cancelable delay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delay {
    remaining: Option<Duration>,
}

impl Delay {
    /// Schedule the delay, replacing any pending one
    pub fn schedule(&mut self, after: Duration) {
        self.remaining = Some(after);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Returns true exactly once, when the delay runs out
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        match self.remaining {
            Some(left) if elapsed >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - elapsed);
                false
            }
            None => false,
        }
    }
}
