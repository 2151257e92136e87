use std::time::Duration;

use crate::schedule::Interval;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Notifications emitted by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerNotice {
    Tick(u32),
    Expired,
}

/// Snapshot read by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    pub remaining: u32,
    pub duration: u32,
    pub running: bool,
}

impl TimerState {
    /// Fraction of time left, for progress gauges
    pub fn ratio(&self) -> f64 {
        if self.duration == 0 {
            0.0
        } else {
            f64::from(self.remaining) / f64::from(self.duration)
        }
    }
}

/// Restartable countdown ticking once per second.
///
/// It only reports what happened; it never touches the session.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    state: TimerState,
    interval: Interval,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::default(),
            interval: Interval::new(TICK_PERIOD),
        }
    }

    /// A timer already counting down from `duration_secs`
    pub fn started(duration_secs: u32) -> Self {
        let mut timer = Self::new();
        timer.start(duration_secs);
        timer
    }

    pub fn start(&mut self, duration_secs: u32) {
        // cancel the previous schedule before arming a new one
        self.interval.cancel();
        self.state = TimerState {
            remaining: duration_secs,
            duration: duration_secs,
            running: true,
        };
        self.interval.start();
    }

    pub fn stop(&mut self) {
        self.interval.cancel();
        self.state.running = false;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// One scheduled tick. Does nothing once stopped or expired.
    pub fn tick(&mut self) -> Vec<TimerNotice> {
        if !self.state.running {
            return Vec::new();
        }
        self.state.remaining = self.state.remaining.saturating_sub(1);
        let mut notices = vec![TimerNotice::Tick(self.state.remaining)];
        if self.state.remaining == 0 {
            self.stop();
            notices.push(TimerNotice::Expired);
        }
        notices
    }

    /// Fire one tick for every whole second in `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerNotice> {
        let due = self.interval.advance(elapsed);
        let mut notices = Vec::new();
        for _ in 0..due {
            if !self.state.running {
                break;
            }
            notices.extend(self.tick());
        }
        notices
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen reader style announcement: every 5 seconds, then every second
/// during the final 5.
pub fn announcement(remaining: u32) -> Option<String> {
    if remaining <= 5 || remaining % 5 == 0 {
        Some(format!("Time remaining: {remaining} seconds"))
    } else {
        None
    }
}
