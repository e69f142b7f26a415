use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    Expired,
}

/// Remaining-time counter advanced by a cooperative one-second tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
}

impl Countdown {
    pub const fn new(secs: u32) -> Self {
        Self {
            remaining_secs: secs,
        }
    }

    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub const fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Takes one second off. Reports `Expired` on the tick that reaches zero and on any later one.
    pub fn tick(&mut self) -> TickOutcome {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_secs)
        }
    }
}

/// Wall-clock span of a session, fed with timestamps by the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.ended_at = None;
    }

    /// Freezes the elapsed time; only the first stop after a start counts.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_some() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    /// How many whole seconds have passed since the session started, 0 if it hasn't started
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u64
        } else {
            0
        }
    }
}
