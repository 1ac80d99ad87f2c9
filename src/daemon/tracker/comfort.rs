use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::info;

/// The soothing content the tracker can ask for. Playback itself lives outside the daemon;
/// this is only the trigger signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortKind {
    ComfortAudio,
    VoiceNote,
    BreakReminder,
}

/// Receiver of comfort triggers. The production sink logs them for the companion apps; tests
/// record them.
#[async_trait]
pub trait ComfortSink: Send + Sync {
    async fn trigger(&self, kind: ComfortKind) -> Result<()>;
}

pub struct LoggingComfortSink;

#[async_trait]
impl ComfortSink for LoggingComfortSink {
    async fn trigger(&self, kind: ComfortKind) -> Result<()> {
        match kind {
            ComfortKind::ComfortAudio => info!("Playing comfort audio"),
            ComfortKind::VoiceNote => info!("Playing voice note"),
            ComfortKind::BreakReminder => info!("Time for a break"),
        }
        Ok(())
    }
}

pub const COMFORT_THRESHOLD: i64 = -5;
pub const NEGATIVE_REWARD_THRESHOLD: i64 = -10;
pub const BREAK_INTERVAL: Duration = Duration::from_secs(2700);

/// Decides when the tracker should reach for comfort content: a points threshold with
/// alternating content kinds, a fixed-interval break reminder and a standing warning
/// threshold.
pub struct ComfortPolicy {
    last_break: Instant,
}

impl ComfortPolicy {
    pub fn new(now: Instant) -> Self {
        Self { last_break: now }
    }

    /// At or below the comfort threshold, alternate the content kind by parity of the running
    /// total so sustained slumps don't replay the same thing every tick.
    pub fn comfort_action(&self, points: i64) -> Option<ComfortKind> {
        if points > COMFORT_THRESHOLD {
            return None;
        }
        if points % 2 == 0 {
            Some(ComfortKind::ComfortAudio)
        } else {
            Some(ComfortKind::VoiceNote)
        }
    }

    /// True once per break interval; the timer resets exactly at firing.
    pub fn break_due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_break) > BREAK_INTERVAL {
            self.last_break = now;
            true
        } else {
            false
        }
    }

    /// Standing advisory, no state change attached.
    pub fn warning_due(&self, points: i64) -> bool {
        points <= NEGATIVE_REWARD_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{BREAK_INTERVAL, ComfortKind, ComfortPolicy};

    #[test]
    fn no_comfort_above_threshold() {
        let policy = ComfortPolicy::new(Instant::now());
        assert_eq!(policy.comfort_action(0), None);
        assert_eq!(policy.comfort_action(-4), None);
    }

    #[test]
    fn comfort_kind_alternates_by_parity() {
        let policy = ComfortPolicy::new(Instant::now());
        assert_eq!(policy.comfort_action(-5), Some(ComfortKind::VoiceNote));
        assert_eq!(policy.comfort_action(-6), Some(ComfortKind::ComfortAudio));
        assert_eq!(policy.comfort_action(-7), Some(ComfortKind::VoiceNote));
        assert_eq!(policy.comfort_action(-8), Some(ComfortKind::ComfortAudio));
    }

    #[tokio::test(start_paused = true)]
    async fn break_fires_once_per_interval_and_resets() {
        let mut policy = ComfortPolicy::new(Instant::now());

        tokio::time::advance(BREAK_INTERVAL / 2).await;
        assert!(!policy.break_due(Instant::now()));

        tokio::time::advance(BREAK_INTERVAL / 2 + Duration::from_secs(1)).await;
        assert!(policy.break_due(Instant::now()));
        // The reset happened at firing, so the very next check is quiet.
        assert!(!policy.break_due(Instant::now()));

        tokio::time::advance(BREAK_INTERVAL + Duration::from_secs(1)).await;
        assert!(policy.break_due(Instant::now()));
    }

    #[test]
    fn warning_is_a_standing_signal() {
        let policy = ComfortPolicy::new(Instant::now());
        assert!(!policy.warning_due(-9));
        assert!(policy.warning_due(-10));
        assert!(policy.warning_due(-25));
    }
}
