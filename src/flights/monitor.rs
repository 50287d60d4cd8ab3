//! Background flight monitoring.
//!
//! # Data Flow
//! ```text
//! POST / (toggle)
//!     → FlightMonitor::start (child TraceContext moved into the task)
//!     → FlightServiceClient::stream_flights
//!     → broadcast::Sender<FlightEvent> (consumed by the UI layer)
//!
//! POST / (toggle again)
//!     → FlightMonitor::stop → MonitorSwitch off → stream dropped
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;

use crate::correlation::TraceContext;
use crate::flights::client::{FlightServiceClient, StreamEnd};
use crate::flights::types::FlightEvent;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_BUFFER: usize = 256;

/// Epoch value meaning "no run active".
const OFF: u64 = 0;

/// Shared on/off state for the monitoring stream.
///
/// Each start hands out a [`MonitorRun`] tagged with a fresh epoch. A run
/// stays live only while its epoch is the current one, so a run cancelled by
/// `turn_off` stays cancelled even if another run starts before it notices.
#[derive(Debug, Clone, Default)]
pub struct MonitorSwitch {
    inner: Arc<SwitchState>,
}

#[derive(Debug, Default)]
struct SwitchState {
    current: AtomicU64,
    last_epoch: AtomicU64,
    changed: Notify,
}

impl MonitorSwitch {
    pub fn is_on(&self) -> bool {
        self.inner.current.load(Ordering::Acquire) != OFF
    }

    /// Turn on. Returns `None` if a run is already active.
    pub fn try_turn_on(&self) -> Option<MonitorRun> {
        let epoch = self.inner.last_epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner
            .current
            .compare_exchange(OFF, epoch, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| MonitorRun {
                switch: self.clone(),
                epoch,
            })
    }

    /// Cancel the active run. Returns whether one was active.
    pub fn turn_off(&self) -> bool {
        let was_on = self.inner.current.swap(OFF, Ordering::AcqRel) != OFF;
        self.inner.changed.notify_waiters();
        was_on
    }
}

/// One monitoring run, owned by the task that streams for it.
#[derive(Debug)]
pub struct MonitorRun {
    switch: MonitorSwitch,
    epoch: u64,
}

impl MonitorRun {
    /// True until this run is turned off or has finished.
    pub fn is_live(&self) -> bool {
        self.switch.inner.current.load(Ordering::Acquire) == self.epoch
    }

    /// Resolves once this run is no longer live.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.switch.inner.changed.notified();
            if !self.is_live() {
                return;
            }
            notified.await;
        }
    }

    /// Clear the switch if this run still owns it. Returns whether it did.
    pub fn finish(&self) -> bool {
        let owned = self
            .switch
            .inner
            .current
            .compare_exchange(self.epoch, OFF, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if owned {
            self.switch.inner.changed.notify_waiters();
        }
        owned
    }
}

/// Starts and stops the flight status stream.
pub struct FlightMonitor {
    client: FlightServiceClient,
    switch: MonitorSwitch,
    events: broadcast::Sender<FlightEvent>,
}

impl FlightMonitor {
    pub fn new(client: FlightServiceClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            client,
            switch: MonitorSwitch::default(),
            events,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.switch.is_on()
    }

    /// Receive monitoring output.
    pub fn subscribe(&self) -> broadcast::Receiver<FlightEvent> {
        self.events.subscribe()
    }

    /// Start streaming on behalf of `ctx`. Returns `None` if already running.
    pub fn start(&self, ctx: &mut TraceContext) -> Option<JoinHandle<()>> {
        let run = self.switch.try_turn_on()?;

        let task_ctx = ctx.child();
        tracing::info!(request_id = %task_ctx.activity(), "Flight monitoring started");

        let client = self.client.clone();
        let events = self.events.clone();
        Some(tokio::spawn(run_monitor(client, task_ctx, run, events)))
    }

    /// Stop streaming. Returns whether monitoring was running.
    pub fn stop(&self) -> bool {
        let was_on = self.switch.turn_off();
        if was_on {
            tracing::info!("Flight monitoring stop requested");
        }
        was_on
    }

    /// Flip monitoring on or off. Returns the new state.
    pub fn toggle(&self, ctx: &mut TraceContext) -> bool {
        if self.is_monitoring() {
            self.stop();
            false
        } else {
            // Losing a race with a concurrent start still leaves monitoring on.
            self.start(ctx);
            true
        }
    }
}

async fn run_monitor(
    client: FlightServiceClient,
    mut ctx: TraceContext,
    run: MonitorRun,
    events: broadcast::Sender<FlightEvent>,
) {
    match client.stream_flights(&mut ctx, &run, &events).await {
        Ok(StreamEnd::Cancelled) => {
            let _ = events.send(FlightEvent::now("Monitoring is stopped on request"));
        }
        Ok(StreamEnd::Closed) => {
            if run.finish() {
                let _ = events.send(FlightEvent::now("Flight service closed the status stream"));
            }
        }
        Err(e) => {
            tracing::warn!(request_id = %ctx.activity(), error = %e, "Flight monitoring failed");
            if run.finish() {
                let _ = events.send(FlightEvent::now(format!(
                    "Stopping monitoring flights: {}. Start monitoring again to retry.",
                    e
                )));
            }
        }
    }
    tracing::debug!(request_id = %ctx.activity(), "Flight monitoring task finished");
}
