// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Daily wall-clock trigger.
//!
//! ```text
//! run_forever(trigger, cycle_fn, token)
//!   due = first trigger strictly after start
//!   loop:
//!     token cancelled?        --> exit
//!     clock.now() >= due?     --> cycle_fn(token).await
//!                                 token cancelled? --> exit
//!                                 due = next trigger after clock.now()
//!     select! { sleep(poll), token.cancelled() --> exit }
//! ```
//!
//! `due` is recomputed from the clock after the cycle returns, so a cycle
//! that runs past the next trigger time skips that day instead of firing
//! twice.

#[cfg(test)]
mod tests;

use chrono::{Days, Local, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A time of day, `HH:MM`, at which a cycle is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    time: NaiveTime,
}

impl DailyTrigger {
    #[must_use]
    pub const fn new(time: NaiveTime) -> Self {
        Self { time }
    }

    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// First occurrence of the trigger strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time);
        if today > now {
            today
        } else {
            today.checked_add_days(Days::new(1)).unwrap_or(NaiveDateTime::MAX)
        }
    }
}

impl Default for DailyTrigger {
    fn default() -> Self {
        Self::new(NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default())
    }
}

impl FromStr for DailyTrigger {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self::new)
            .map_err(|_| ConfigError::InvalidValue {
                section: "schedule".to_string(),
                key: "at".to_string(),
                message: format!("expected a time of day as HH:MM, got '{s}'"),
            })
    }
}

impl std::fmt::Display for DailyTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))
    }
}

/// Polls a [`Clock`] and runs a cycle once per day.
pub struct Scheduler<C = SystemClock> {
    clock: C,
    poll_interval: Duration,
}

impl Scheduler<SystemClock> {
    /// Scheduler on the system clock.
    #[must_use]
    pub const fn system(poll_interval: Duration) -> Self {
        Self::new(SystemClock, poll_interval)
    }
}

impl<C: Clock> Scheduler<C> {
    #[must_use]
    pub const fn new(clock: C, poll_interval: Duration) -> Self {
        Self {
            clock,
            poll_interval,
        }
    }

    /// Run `cycle_fn` every time `trigger` comes due until `token` is cancelled.
    ///
    /// `cycle_fn` receives `token` so an interrupt during a cycle reaches it;
    /// the scheduler exits once that cycle returns. Returns the number of
    /// cycles started.
    pub async fn run_forever<F, Fut>(
        &self,
        trigger: DailyTrigger,
        mut cycle_fn: F,
        token: CancellationToken,
    ) -> u32
    where
        F: FnMut(CancellationToken) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut fired = 0;
        let mut due = trigger.next_after(self.clock.now());
        info!(at = %trigger, next = %due, "scheduler started");

        loop {
            if token.is_cancelled() {
                break;
            }

            let now = self.clock.now();
            if now >= due {
                info!(due = %due, "trigger reached, starting cycle");
                fired += 1;
                cycle_fn(token.clone()).await;
                if token.is_cancelled() {
                    break;
                }
                due = trigger.next_after(self.clock.now());
                info!(next = %due, "next cycle scheduled");
                continue;
            }

            debug!(now = %now, due = %due, "waiting for trigger");
            tokio::select! {
                () = token.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!(cycles = fired, "scheduler stopped");
        fired
    }
}
