//! Wall-clock slot scheduler for the daily tick window

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Timelike};
use tokio::sync::Mutex;

use crate::tick::Ticker;

/// A cron-style cadence: every `interval_minutes` minutes, aligned to
/// the wall clock, during hours `start_hour..=end_hour`.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub interval_minutes: u32,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Schedule {
    pub fn in_window(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }

    /// First slot strictly after `now`: minute aligned to the
    /// interval, second zero, hour inside the window. Config
    /// validation guarantees the window is non-empty, so a slot
    /// always exists within the next day.
    pub fn next_slot<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DateTime<Tz> {
        let mut slot = now.clone()
            - Duration::seconds(i64::from(now.second()))
            - Duration::nanoseconds(i64::from(now.nanosecond()));
        loop {
            slot += Duration::minutes(1);
            if slot.minute() % self.interval_minutes == 0 && self.in_window(slot.hour()) {
                return slot;
            }
        }
    }
}

pub struct Scheduler {
    schedule: Schedule,
    ticker: Arc<Ticker>,
    busy: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(schedule: Schedule, ticker: Ticker) -> Self {
        Self {
            schedule,
            ticker: Arc::new(ticker),
            busy: Arc::new(Mutex::new(())),
        }
    }

    /// Runs forever: one immediate tick at startup, then one per
    /// schedule slot. Tick failures are logged and never terminate
    /// the process; there is no shutdown procedure.
    pub async fn run(&self) {
        self.spawn_tick();

        loop {
            let next = self.schedule.next_slot(Local::now());
            wait_until(next).await;
            self.spawn_tick();
        }
    }

    /// Fires a tick as an independent task. A tick still in flight
    /// from an earlier slot holds the busy lock, and the new slot is
    /// skipped rather than overlapped.
    fn spawn_tick(&self) {
        let ticker = Arc::clone(&self.ticker);
        let busy = Arc::clone(&self.busy);
        tokio::spawn(async move {
            let Ok(_guard) = busy.try_lock() else {
                log::warn!("previous tick still running, skipping this slot");
                return;
            };
            if let Err(e) = ticker.run().await {
                log::error!("tick failed: {}", e);
            }
        });
    }
}

/// Sleeps until the wall clock reaches `target`. tokio's timer runs
/// on the monotonic clock, so a wall-clock adjustment during the
/// sleep can wake this early; re-check and keep sleeping on any
/// shortfall so a slot never fires before its wall-clock time.
async fn wait_until(target: DateTime<Local>) {
    loop {
        let now = Local::now();
        if now >= target {
            return;
        }
        let wait = (target - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const EVERY_5_IN_7_TO_16: Schedule = Schedule {
        interval_minutes: 5,
        start_hour: 7,
        end_hour: 16,
    };

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, hour, min, sec).unwrap()
    }

    #[test]
    fn before_window_aligns_to_window_start() {
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(6, 55, 0)), at(7, 0, 0));
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(0, 12, 30)), at(7, 0, 0));
    }

    #[test]
    fn inside_window_advances_to_next_aligned_minute() {
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(12, 30, 0)), at(12, 35, 0));
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(12, 31, 0)), at(12, 35, 0));
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(12, 34, 59)), at(12, 35, 0));
    }

    #[test]
    fn slot_is_strictly_after_now() {
        // Exactly on a slot boundary the next firing is one interval
        // later, not the same instant again.
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(7, 0, 0)), at(7, 5, 0));
    }

    #[test]
    fn last_slot_of_the_day_is_16_55() {
        assert_eq!(EVERY_5_IN_7_TO_16.next_slot(at(16, 50, 1)), at(16, 55, 0));

        let next = EVERY_5_IN_7_TO_16.next_slot(at(16, 55, 0));
        assert_eq!(next, at(7, 0, 0) + Duration::days(1));

        let next = EVERY_5_IN_7_TO_16.next_slot(at(17, 0, 0));
        assert_eq!(next, at(7, 0, 0) + Duration::days(1));
    }

    #[test]
    fn simulated_clock_fires_only_inside_the_window() {
        // 06:55, 07:00, 12:30, 16:55, 17:00 must tick only at 07:00,
        // 12:30 and 16:55.
        assert!(!EVERY_5_IN_7_TO_16.in_window(6));
        assert!(!EVERY_5_IN_7_TO_16.in_window(17));
        assert!(EVERY_5_IN_7_TO_16.in_window(7));
        assert!(EVERY_5_IN_7_TO_16.in_window(16));
        for (hour, min) in [(7, 0), (12, 30), (16, 55)] {
            let just_before = at(hour, min, 0) - Duration::seconds(1);
            assert_eq!(EVERY_5_IN_7_TO_16.next_slot(just_before), at(hour, min, 0));
        }
    }

    #[tokio::test]
    async fn wait_until_returns_at_once_for_past_targets() {
        let start = std::time::Instant::now();
        wait_until(Local::now() - Duration::hours(1)).await;
        assert!(start.elapsed() < std::time::Duration::from_millis(100));
    }

    #[tokio::test]
    async fn wait_until_does_not_return_before_the_target() {
        let target = Local::now() + Duration::milliseconds(80);
        wait_until(target).await;
        assert!(Local::now() >= target);
    }

    #[test]
    fn hourly_interval_fires_on_the_hour() {
        let hourly = Schedule {
            interval_minutes: 60,
            start_hour: 7,
            end_hour: 16,
        };
        assert_eq!(hourly.next_slot(at(7, 0, 0)), at(8, 0, 0));
        assert_eq!(hourly.next_slot(at(9, 59, 59)), at(10, 0, 0));
    }
}
