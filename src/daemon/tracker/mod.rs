use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    state::{actor::StateHandle, character::CharacterChannel, notes::NoteLog},
    utils::clock::Clock,
    window_api::WindowManager,
};

use classify::{Classification, classify};
use comfort::{ComfortKind, ComfortPolicy, ComfortSink};

pub mod classify;
pub mod comfort;

/// The focus tracking loop. Samples the foreground window on a fixed cadence, turns the
/// classification into point deltas, character states, note lines and comfort triggers.
///
/// A failed tick is logged and skipped; the loop itself only ends on cancellation.
pub struct FocusTracker {
    state: StateHandle,
    character: CharacterChannel,
    notes: NoteLog,
    comfort: Box<dyn ComfortSink>,
    producer: Box<dyn WindowManager>,
    policy: ComfortPolicy,
    shutdown: CancellationToken,
    poll_interval: Duration,
    clock: Box<dyn Clock>,
    /// Read-mirror of the document's counter, refreshed from every delta reply. Idle ticks
    /// reuse the last known total.
    points: i64,
}

impl FocusTracker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: StateHandle,
        character: CharacterChannel,
        notes: NoteLog,
        comfort: Box<dyn ComfortSink>,
        producer: Box<dyn WindowManager>,
        shutdown: CancellationToken,
        poll_interval: Duration,
        clock: Box<dyn Clock>,
        initial_points: i64,
    ) -> Self {
        let policy = ComfortPolicy::new(clock.instant());
        Self {
            state,
            character,
            notes,
            comfort,
            producer,
            policy,
            shutdown,
            poll_interval,
            clock,
            points: initial_points,
        }
    }

    /// Executes the tracker event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut tick_point = self.clock.instant();
        loop {
            tick_point += self.poll_interval;

            if let Err(e) = self.tick().await {
                error!("Encountered an error during a focus tick {e:?}");
            }

            tokio::select! {
                // Cancelation means we stop execution of the event loop, dropping our state
                // handle with it.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(tick_point) => ()
            }
        }
    }

    async fn tick(&mut self) -> Result<()> {
        // A lost sample aborts the tick; no foreground window is simply idle time.
        let title = match self.producer.get_active_window_title()? {
            Some(title) => title.to_lowercase(),
            None => "idle".to_string(),
        };

        let classification = classify(&title);
        debug!("Current window '{title}' is {classification:?}");

        match classification {
            Classification::Distracted => {
                self.points = self.state.adjust_points(-1).await?;
                info!("Distracted, points at {}", self.points);
                self.append_note(&format!("Distracted: {title}")).await;

                if let Some(kind) = self.policy.comfort_action(self.points) {
                    self.trigger_comfort(kind).await;
                }
            }
            Classification::Working => {
                self.points = self.state.adjust_points(1).await?;
                info!("Working, points at {}", self.points);
                self.append_note(&format!("Working on: {title}")).await;
            }
            Classification::Idle => {
                debug!("Idle");
            }
        }

        if self.policy.break_due(self.clock.instant()) {
            self.trigger_comfort(ComfortKind::BreakReminder).await;
        }

        if self.policy.warning_due(self.points) {
            warn!("Avoid distractions for 10 minutes!");
        }

        if let Err(e) = self.character.publish(classification.character_state()).await {
            error!("Failed to publish character state {e:?}");
        }
        Ok(())
    }

    async fn append_note(&self, line: &str) {
        // Notes are a user-facing journal, so days are local days.
        let today = self.clock.time().with_timezone(&chrono::Local).date_naive();
        if let Err(e) = self.notes.append(today, line).await {
            error!("Failed to append note {e:?}");
        }
    }

    async fn trigger_comfort(&self, kind: ComfortKind) {
        if let Err(e) = self.comfort.trigger(kind).await {
            error!("Failed to trigger comfort action {kind:?} {e:?}");
        }
    }
}
