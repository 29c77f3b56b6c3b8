//! `integrate` and `watch`: drive the status poller on a background task and
//! follow its events until the run finishes or the user interrupts.

use std::time::Duration;

use anyhow::{Context, Result};
use ledgerview_core::IntegrationStatus;
use ledgerview_etl::{
    EtlApi, ErrorOrigin, IntegrationPoller, PollPhase, PollerCommand, PollerEvent,
};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Trigger a run; with `wait` follow it to the end
    Trigger { wait: bool },
    /// Follow the run that is active right now
    Watch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(IntegrationStatus),
    Failed(IntegrationStatus),
    /// Trigger accepted and the caller asked not to wait
    Started,
    /// Trigger skipped because a run is already active; caller asked not to wait
    AlreadyRunning,
    TriggerFailed(String),
    /// Nothing to watch: the first status was not processing
    NotRunning(IntegrationStatus),
    /// Nothing to watch: the first status check failed
    Unavailable(String),
    Interrupted,
}

pub async fn follow<A>(api: A, interval: Duration, mode: Mode) -> Result<Outcome>
where
    A: EtlApi + 'static,
{
    let (poller, mut events) = IntegrationPoller::new(api, interval);
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(poller.run(cmd_rx));

    if matches!(mode, Mode::Trigger { .. }) {
        // queued behind the initial status load
        let _ = cmd_tx.send(PollerCommand::Trigger);
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut seen_processing = false;
    let mut initial = true;
    let mut phase = PollPhase::Idle;

    let outcome = loop {
        tokio::select! {
            ev = events.recv() => {
                let Some(ev) = ev else {
                    // poller exited on its own
                    break Outcome::Interrupted;
                };
                match ev {
                    PollerEvent::StatusChanged(status) => {
                        print_status_line(&status);
                        let first = std::mem::replace(&mut initial, false);
                        if status.is_processing {
                            seen_processing = true;
                        } else if seen_processing && !status.success {
                            break Outcome::Failed(status);
                        } else if first && mode == Mode::Watch {
                            break Outcome::NotRunning(status);
                        }
                    }
                    PollerEvent::Triggered => {
                        println!("Integration started");
                        if mode == (Mode::Trigger { wait: false }) {
                            break Outcome::Started;
                        }
                    }
                    PollerEvent::TriggerIgnored => {
                        if mode == (Mode::Trigger { wait: false }) {
                            break Outcome::AlreadyRunning;
                        }
                        println!("Integration already running; following the active run");
                    }
                    PollerEvent::Error { origin: ErrorOrigin::Trigger, message } => {
                        break Outcome::TriggerFailed(message);
                    }
                    PollerEvent::Error { origin: ErrorOrigin::Poll, message } => {
                        let first = std::mem::replace(&mut initial, false);
                        if first && mode == Mode::Watch {
                            break Outcome::Unavailable(message);
                        }
                        if phase == PollPhase::Polling {
                            eprintln!("Status check failed: {message} (retrying)");
                        } else {
                            eprintln!("Status check failed: {message}");
                        }
                    }
                    PollerEvent::ErrorCleared => {}
                    PollerEvent::PhaseChanged(next) => {
                        tracing::debug!("Poller is now {}", phase_name(next));
                        phase = next;
                    }
                    PollerEvent::Completed(status) => break Outcome::Completed(status),
                }
            }
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    tracing::warn!("Ctrl-C handler unavailable: {}", e);
                }
                break Outcome::Interrupted;
            }
        }
    };

    let _ = cmd_tx.send(PollerCommand::Shutdown);
    let state = handle.await.context("poller task")?;
    tracing::debug!(
        "Poller finished: processing={} error={:?}",
        state.is_processing(),
        state.error
    );

    Ok(outcome)
}

fn print_status_line(status: &IntegrationStatus) {
    println!(
        "[{}] {} ({} records)",
        status.phase_label(),
        status.message,
        status.records_processed
    );
}

fn phase_name(phase: PollPhase) -> &'static str {
    match phase {
        PollPhase::Idle => "idle",
        PollPhase::Polling => "polling",
    }
}
