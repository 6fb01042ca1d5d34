//! Wake-up recovery background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::messages::{EngineMessage, EngineSender};
use crate::timer::Clock;

/// Extra wall-clock progress tolerated before a gap counts as a sleep
pub const SUSPEND_TOLERANCE_MS: i64 = 2_000;

/// Whether the host was asleep during one check period
///
/// The monotonic clock stops while the machine is suspended and a stalled
/// process falls behind its own schedule; either shows up as wall-clock time
/// or monotonic time running well past the check period.
pub fn detect_resume(wall_elapsed_ms: i64, monotonic_elapsed_ms: i64, period: Duration) -> bool {
    let period_ms = i64::try_from(period.as_millis()).unwrap_or(i64::MAX);
    wall_elapsed_ms - monotonic_elapsed_ms > SUSPEND_TOLERANCE_MS
        || monotonic_elapsed_ms > period_ms.saturating_add(SUSPEND_TOLERANCE_MS)
}

/// Background task that checks for system wake-up and triggers a countdown refresh
pub async fn wake_up_recovery_task(engine_tx: EngineSender, clock: Arc<dyn Clock>, period: Duration) {
    info!("Starting wake-up recovery task (every {}s)", period.as_secs());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut last_wall = clock.now_ms();
    let mut last_monotonic = Instant::now();

    loop {
        ticker.tick().await;

        let wall = clock.now_ms();
        let monotonic = Instant::now();
        let wall_elapsed = wall - last_wall;
        let monotonic_elapsed = i64::try_from(monotonic.duration_since(last_monotonic).as_millis()).unwrap_or(i64::MAX);
        last_wall = wall;
        last_monotonic = monotonic;

        if detect_resume(wall_elapsed, monotonic_elapsed, period) {
            info!(
                "System wake-up detected ({}ms wall, {}ms monotonic), refreshing countdown",
                wall_elapsed, monotonic_elapsed
            );
            if engine_tx.send(EngineMessage::VisibilityResumed).is_err() {
                debug!("Engine queue closed, stopping wake-up recovery task");
                break;
            }
        } else if engine_tx.is_closed() {
            debug!("Engine queue closed, stopping wake-up recovery task");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tasks::messages::engine_channel,
        timer::EpochMillis,
    };
    use std::sync::atomic::{AtomicI64, Ordering};
    use tokio::time::timeout;

    const PERIOD: Duration = Duration::from_secs(5);

    #[test]
    fn steady_progress_is_not_a_resume() {
        assert!(!detect_resume(5_000, 5_000, PERIOD));
        assert!(!detect_resume(5_900, 5_400, PERIOD));
    }

    #[test]
    fn wall_clock_jump_is_a_resume() {
        assert!(detect_resume(65_000, 5_000, PERIOD));
    }

    #[test]
    fn stalled_schedule_is_a_resume() {
        assert!(detect_resume(40_000, 40_000, PERIOD));
    }

    #[test]
    fn backwards_wall_clock_is_not_a_resume() {
        assert!(!detect_resume(-3_600_000, 5_000, PERIOD));
    }

    /// Wall clock that leaps a minute on every read, like a host waking up
    struct LeapingClock(AtomicI64);

    impl Clock for LeapingClock {
        fn now_ms(&self) -> EpochMillis {
            self.0.fetch_add(60_000, Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn wall_clock_leap_posts_visibility_resumed() {
        let (engine_tx, mut engine_rx) = engine_channel();
        let clock = Arc::new(LeapingClock(AtomicI64::new(0)));
        let task = tokio::spawn(wake_up_recovery_task(engine_tx, clock, Duration::from_millis(20)));

        let message = timeout(Duration::from_secs(2), engine_rx.recv())
            .await
            .expect("no resume detected")
            .unwrap();
        assert!(matches!(message, EngineMessage::VisibilityResumed));

        drop(engine_rx);
        timeout(Duration::from_secs(2), task)
            .await
            .expect("task kept running after the queue closed")
            .unwrap();
    }
}
