use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{Instant, interval_at};

pub const RESEND_COOLDOWN_SECS: u32 = 60;
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Seconds left before a new code may be requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResendCountdown {
    remaining: u32,
    can_resend: bool,
}

impl ResendCountdown {
    pub fn new() -> Self {
        Self::with_seconds(RESEND_COOLDOWN_SECS)
    }

    pub fn with_seconds(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            can_resend: seconds == 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.can_resend
    }

    /// Advances one second. Returns false once the countdown has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.can_resend = true;
        }
        !self.can_resend
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// `m:ss`, as shown next to the resend prompt.
    pub fn formatted(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl Default for ResendCountdown {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub generation: u64,
}

/// One-second ticker feeding a [`ResendCountdown`].
///
/// The ticking task is aborted when the timer is dropped.
#[derive(Debug)]
pub struct CountdownTimer {
    generation: u64,
    handle: AbortHandle,
}

impl CountdownTimer {
    pub fn start(generation: u64, ticks: mpsc::UnboundedSender<CountdownTick>) -> Self {
        let first_tick = Instant::now() + TICK_PERIOD;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first_tick, TICK_PERIOD);
            loop {
                interval.tick().await;
                if ticks.send(CountdownTick { generation }).is_err() {
                    break;
                }
            }
        })
        .abort_handle();

        tracing::debug!(generation, "Countdown timer started");
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(generation = self.generation, "Countdown timer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_resend_exactly_at_zero() {
        let mut countdown = ResendCountdown::new();
        for _ in 0..RESEND_COOLDOWN_SECS - 1 {
            assert!(countdown.tick());
            assert!(!countdown.can_resend());
        }
        assert_eq!(countdown.remaining(), 1);
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.can_resend());
    }

    #[test]
    fn test_reset_restores_full_cooldown() {
        let mut countdown = ResendCountdown::with_seconds(1);
        countdown.tick();
        assert!(countdown.can_resend());

        countdown.reset();
        assert_eq!(countdown.remaining(), RESEND_COOLDOWN_SECS);
        assert!(!countdown.can_resend());
    }

    #[test]
    fn test_formatted() {
        assert_eq!(ResendCountdown::new().formatted(), "1:00");
        assert_eq!(ResendCountdown::with_seconds(9).formatted(), "0:09");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_every_second() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = CountdownTimer::start(7, tx);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        let tick = rx.recv().await.unwrap();
        assert_eq!(tick, CountdownTick { generation: 7 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = CountdownTimer::start(1, tx);
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        // The task held the only sender; once aborted the channel closes.
        assert_eq!(rx.recv().await, None);
    }
}
