use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use veloo_core::{KeyValueStore, RequestGateway};

use crate::countdown::CountdownTick;
use crate::dropdown::DocumentClicks;
use crate::flow::{FlowSignal, OnboardingFlow, UiEvent};
use crate::snapshot::FlowSnapshot;
use crate::ticket::Settled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("The onboarding flow has stopped")]
pub struct FlowStopped;

/// Host side of a running flow.
///
/// Dropping the handle closes the event channel, which ends the flow task.
#[derive(Debug)]
pub struct FlowHandle {
    events: mpsc::UnboundedSender<UiEvent>,
    clicks: DocumentClicks,
    snapshots: watch::Receiver<FlowSnapshot>,
    signals: mpsc::UnboundedReceiver<FlowSignal>,
    task: JoinHandle<()>,
}

impl FlowHandle {
    pub fn send(&self, event: UiEvent) -> Result<(), FlowStopped> {
        self.events.send(event).map_err(|_| FlowStopped)
    }

    /// Reports a click anywhere in the document.
    pub fn click(&self) {
        self.clicks.publish();
    }

    pub fn clicks(&self) -> &DocumentClicks {
        &self.clicks
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.clone()
    }

    pub async fn next_signal(&mut self) -> Option<FlowSignal> {
        self.signals.recv().await
    }

    /// Closes the event channel and waits for the flow task to finish.
    pub async fn shutdown(self) {
        let Self { events, task, .. } = self;
        drop(events);
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Onboarding flow task failed");
        }
    }
}

/// Mounts a flow and drives it on its own task.
///
/// # Arguments
/// * `gateway` - Transport for registration and OTP calls
/// * `store` - Durable key-value storage
///
/// # Returns
/// A [`FlowHandle`] for feeding events in and observing snapshots and signals
#[tracing::instrument(name = "runtime::spawn", skip_all)]
pub async fn spawn<G, S>(gateway: Arc<G>, store: S) -> FlowHandle
where
    G: RequestGateway + ?Sized + 'static,
    S: KeyValueStore + 'static,
{
    let clicks = DocumentClicks::new();
    let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
    let flow = OnboardingFlow::mount(gateway, store, clicks.clone(), ticks_tx).await;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (snapshots_tx, snapshots_rx) = watch::channel(flow.snapshot());
    let (signals_tx, signals_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run(flow, events_rx, ticks_rx, snapshots_tx, signals_tx));

    FlowHandle {
        events: events_tx,
        clicks,
        snapshots: snapshots_rx,
        signals: signals_rx,
        task,
    }
}

async fn run<G, S>(
    mut flow: OnboardingFlow<G, S>,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
    mut ticks: mpsc::UnboundedReceiver<CountdownTick>,
    snapshots: watch::Sender<FlowSnapshot>,
    signals: mpsc::UnboundedSender<FlowSignal>,
) where
    G: RequestGateway + ?Sized + 'static,
    S: KeyValueStore,
{
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled>();

    loop {
        let signal = tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let step = flow.handle(event).await;
                if let Some(pending) = step.dispatch {
                    let call = flow.perform(pending);
                    let settled_tx = settled_tx.clone();
                    tokio::spawn(async move {
                        // The receiver only goes away when the flow has stopped.
                        let _ = settled_tx.send(call.await);
                    });
                }
                step.signal
            }
            Some(settled) = settled_rx.recv() => flow.settle(settled).await,
            Some(tick) = ticks.recv() => {
                flow.on_tick(tick);
                None
            }
            Some(_) = flow.next_outside_click() => {
                flow.close_dropdowns();
                None
            }
        };

        let next = flow.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if let Some(signal) = signal {
            if signals.send(signal).is_err() {
                tracing::debug!(?signal, "No host is listening for flow signals");
            }
        }
    }

    tracing::debug!("Onboarding flow stopped");
}
