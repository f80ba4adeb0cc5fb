// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{Clock, DailyTrigger, Scheduler};

fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

/// Replays a fixed list of readings, then cancels the token.
struct ScriptedClock {
    readings: Mutex<VecDeque<NaiveDateTime>>,
    last: Mutex<NaiveDateTime>,
    token: CancellationToken,
}

impl ScriptedClock {
    fn new(readings: Vec<NaiveDateTime>, token: CancellationToken) -> Self {
        let last = *readings.last().unwrap();
        Self {
            readings: Mutex::new(readings.into()),
            last: Mutex::new(last),
            token,
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> NaiveDateTime {
        let next = self.readings.lock().unwrap().pop_front();
        match next {
            Some(reading) => {
                *self.last.lock().unwrap() = reading;
                reading
            }
            None => {
                self.token.cancel();
                *self.last.lock().unwrap()
            }
        }
    }
}

async fn run_script(readings: Vec<NaiveDateTime>) -> (u32, usize) {
    let token = CancellationToken::new();
    let clock = ScriptedClock::new(readings, token.clone());
    let scheduler = Scheduler::new(clock, Duration::from_millis(1));
    let calls = Arc::new(Mutex::new(0_usize));

    let counter = calls.clone();
    let fired = scheduler
        .run_forever(
            "06:00".parse().unwrap(),
            move |_token| {
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                }
            },
            token,
        )
        .await;

    let calls = *calls.lock().unwrap();
    (fired, calls)
}

#[test]
fn test_trigger_parsing() {
    let trigger: DailyTrigger = "06:00".parse().unwrap();
    assert_eq!(trigger.time(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    assert_eq!(trigger, DailyTrigger::default());
    assert_eq!("23:59".parse::<DailyTrigger>().unwrap().to_string(), "23:59");

    for bad in ["", "6am", "24:00", "06:60", "06-00"] {
        assert!(bad.parse::<DailyTrigger>().is_err(), "'{bad}' should be rejected");
    }
}

#[test]
fn test_next_after_is_strictly_later() {
    let trigger = DailyTrigger::default();
    assert_eq!(trigger.next_after(at(1, 5, 0, 0)), at(1, 6, 0, 0));
    assert_eq!(trigger.next_after(at(1, 6, 0, 0)), at(2, 6, 0, 0));
    assert_eq!(trigger.next_after(at(1, 23, 0, 0)), at(2, 6, 0, 0));
}

#[tokio::test]
async fn test_fires_once_per_day() {
    let (fired, calls) = run_script(vec![
        at(1, 5, 59, 0),  // start: due day 1 06:00
        at(1, 5, 59, 30), // wait
        at(1, 6, 0, 0),   // fire
        at(1, 6, 0, 5),   // after cycle: due day 2 06:00
        at(1, 6, 0, 30),  // same day, no second run
        at(1, 23, 59, 0),
        at(2, 5, 59, 0),
        at(2, 6, 0, 1),   // fire
        at(2, 6, 30, 0),  // after cycle: due day 3 06:00
        at(2, 7, 0, 0),
    ])
    .await;

    assert_eq!(fired, 2);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_start_exactly_at_trigger_waits_for_next_day() {
    let (fired, _) = run_script(vec![at(1, 6, 0, 0), at(1, 6, 0, 0), at(1, 6, 0, 30)]).await;
    assert_eq!(fired, 0);
}

#[tokio::test]
async fn test_long_cycle_skips_missed_trigger() {
    let (fired, _) = run_script(vec![
        at(1, 5, 0, 0),
        at(1, 6, 0, 0), // fire
        at(2, 7, 0, 0), // cycle ran past day 2 06:00: next is day 3
        at(2, 8, 0, 0),
        at(2, 23, 0, 0),
    ])
    .await;
    assert_eq!(fired, 1);
}

#[tokio::test]
async fn test_cancel_while_waiting_exits_without_cycle() {
    let token = CancellationToken::new();
    let scheduler = Scheduler::system(Duration::from_secs(3600));
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    // trigger is at least a minute away from any start time
    let now = super::SystemClock.now();
    let trigger = DailyTrigger::new(now.time() - chrono::TimeDelta::minutes(1));

    let fired = tokio::time::timeout(
        Duration::from_secs(5),
        scheduler.run_forever(trigger, |_| async {}, token),
    )
    .await
    .expect("scheduler should stop promptly");
    assert_eq!(fired, 0);
}

#[tokio::test]
async fn test_interrupt_during_cycle_reaches_cycle_and_stops_scheduler() {
    let token = CancellationToken::new();
    let clock = ScriptedClock::new(
        vec![at(1, 5, 0, 0), at(1, 6, 0, 0), at(1, 6, 1, 0), at(1, 6, 2, 0)],
        token.clone(),
    );
    let scheduler = Scheduler::new(clock, Duration::from_millis(1));
    let seen_cancelled = Arc::new(Mutex::new(false));

    let seen = seen_cancelled.clone();
    let interrupt = token.clone();
    let fired = scheduler
        .run_forever(
            DailyTrigger::default(),
            move |cycle_token| {
                let seen = seen.clone();
                let interrupt = interrupt.clone();
                async move {
                    // Ctrl+C arrives mid-cycle
                    interrupt.cancel();
                    *seen.lock().unwrap() = cycle_token.is_cancelled();
                }
            },
            token,
        )
        .await;

    assert_eq!(fired, 1);
    assert!(*seen_cancelled.lock().unwrap());
}
