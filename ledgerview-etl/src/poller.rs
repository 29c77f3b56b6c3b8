//! Integration status poller.
//!
//! State machine with two phases. `Idle` never touches the network on its
//! own; `Polling` owns a fixed-period interval that exists only while the
//! last known status says the job is processing.
//!
//! ```text
//!            status.is_processing == true
//!   Idle  ───────────────────────────────▶  Polling  (new interval, first tick after one period)
//!         ◀───────────────────────────────
//!            status.is_processing == false  (interval dropped)
//! ```
//!
//! Completion is edge-triggered: [`PollerEvent::Completed`] fires when a
//! status arrives that is finished and successful while the previous status
//! was still processing.

use std::time::Duration;

use chrono::Utc;
use ledgerview_core::IntegrationStatus;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::client::EtlApi;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub const TRIGGER_REJECTED_MESSAGE: &str = "Failed to start integration";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollerState {
    pub status: Option<IntegrationStatus>,
    /// Dismissible message from the last failed request
    pub error: Option<String>,
    pub is_triggering: bool,
}

impl PollerState {
    pub fn is_processing(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.is_processing)
    }

    /// The trigger action is unavailable while a run is active or starting
    pub fn can_trigger(&self) -> bool {
        !self.is_processing() && !self.is_triggering
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Polling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Trigger,
    Poll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollerEvent {
    StatusChanged(IntegrationStatus),
    Error { origin: ErrorOrigin, message: String },
    ErrorCleared,
    PhaseChanged(PollPhase),
    /// The trigger request was accepted
    Triggered,
    /// A trigger command arrived while a run was active or starting
    TriggerIgnored,
    /// A processing run finished successfully
    Completed(IntegrationStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerCommand {
    Trigger,
    /// Poll once now, regardless of phase
    Refresh,
    DismissError,
    Shutdown,
}

pub struct IntegrationPoller<A> {
    api: A,
    state: PollerState,
    phase: PollPhase,
    interval: Duration,
    events: mpsc::UnboundedSender<PollerEvent>,
}

impl<A: EtlApi> IntegrationPoller<A> {
    pub fn new(api: A, interval: Duration) -> (Self, mpsc::UnboundedReceiver<PollerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Self {
            api,
            state: PollerState::default(),
            phase: PollPhase::Idle,
            interval,
            events: tx,
        };
        (poller, rx)
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    fn emit(&self, event: PollerEvent) {
        // receiver gone means nobody is watching; keep running regardless
        let _ = self.events.send(event);
    }

    fn set_error(&mut self, origin: ErrorOrigin, message: String) {
        self.state.error = Some(message.clone());
        self.emit(PollerEvent::Error { origin, message });
    }

    fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.emit(PollerEvent::ErrorCleared);
        }
    }

    /// Replace the held status, firing completion on a processing -> done edge.
    fn apply_status(&mut self, status: IntegrationStatus) {
        let was_processing = self.state.is_processing();
        let completed = was_processing && status.is_completed();

        self.state.status = Some(status.clone());
        self.emit(PollerEvent::StatusChanged(status.clone()));

        if completed {
            tracing::info!(
                "Integration completed: {} records processed",
                status.records_processed
            );
            self.emit(PollerEvent::Completed(status));
        }
    }

    pub fn dismiss_error(&mut self) {
        self.clear_error();
    }

    /// Fetch the current status. Failures keep the stale status.
    pub async fn poll_once(&mut self) {
        match self.api.integration_status().await {
            Ok(envelope) => match envelope.into_payload() {
                Ok(status) => {
                    tracing::debug!(
                        "Integration status: processing={} success={} message={:?}",
                        status.is_processing,
                        status.success,
                        status.message
                    );
                    self.clear_error();
                    self.apply_status(status);
                }
                Err(message) => {
                    tracing::warn!("Integration status rejected: {}", message);
                    let message = if message.is_empty() {
                        "Failed to get status".to_string()
                    } else {
                        message
                    };
                    self.set_error(ErrorOrigin::Poll, message);
                }
            },
            Err(e) => {
                tracing::error!("Integration status request failed: {}", e);
                self.set_error(ErrorOrigin::Poll, e.to_string());
            }
        }
    }

    /// Start a run. On acceptance the status switches to "starting" at once,
    /// without waiting for the next poll.
    pub async fn trigger(&mut self) {
        self.state.is_triggering = true;
        self.clear_error();

        match self.api.trigger_integration().await {
            Ok(envelope) if envelope.success => {
                tracing::info!("Integration triggered: {}", envelope.message);
                self.emit(PollerEvent::Triggered);
                self.apply_status(IntegrationStatus::starting(Utc::now()));
            }
            Ok(envelope) => {
                tracing::warn!("Integration trigger rejected: {}", envelope.message);
                self.set_error(ErrorOrigin::Trigger, TRIGGER_REJECTED_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::error!("Integration trigger failed: {}", e);
                self.set_error(ErrorOrigin::Trigger, e.to_string());
            }
        }

        self.state.is_triggering = false;
    }

    /// Bring the phase in line with the held status, recreating or dropping
    /// the interval on a change.
    fn sync_phase(&mut self, ticker: &mut Option<Interval>) {
        let wanted = if self.state.is_processing() {
            PollPhase::Polling
        } else {
            PollPhase::Idle
        };
        if wanted == self.phase {
            return;
        }

        match wanted {
            PollPhase::Polling => {
                let mut interval =
                    tokio::time::interval_at(Instant::now() + self.interval, self.interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
            }
            PollPhase::Idle => *ticker = None,
        }

        tracing::debug!("Poller phase {:?} -> {:?}", self.phase, wanted);
        self.phase = wanted;
        self.emit(PollerEvent::PhaseChanged(wanted));
    }

    /// Drive the poller until `Shutdown` arrives or every command sender is
    /// dropped. Performs the initial status load first.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<PollerCommand>) -> PollerState {
        let mut ticker: Option<Interval> = None;

        self.poll_once().await;
        self.sync_phase(&mut ticker);

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(PollerCommand::Trigger) => {
                        if self.state.can_trigger() {
                            self.trigger().await;
                        } else {
                            tracing::info!("Trigger ignored: integration already running");
                            self.emit(PollerEvent::TriggerIgnored);
                        }
                    }
                    Some(PollerCommand::Refresh) => self.poll_once().await,
                    Some(PollerCommand::DismissError) => self.dismiss_error(),
                    Some(PollerCommand::Shutdown) | None => break,
                },
                _ = next_tick(&mut ticker) => self.poll_once().await,
            }

            self.sync_phase(&mut ticker);
        }

        tracing::debug!("Poller stopped");
        self.state
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_trigger() {
        let mut state = PollerState::default();
        assert!(state.can_trigger());

        state.is_triggering = true;
        assert!(!state.can_trigger());

        state.is_triggering = false;
        state.status = Some(IntegrationStatus::starting(Utc::now()));
        assert!(!state.can_trigger());
    }
}
