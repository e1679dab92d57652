//! Live order view worker
//!
//! ```text
//!  LiveOrders ──commands──▶ Worker ──owns──▶ OrderView
//!                             ▲   │
//!      pump(gen) ──(gen, ev)──┘   ├──watch──▶ ViewSnapshot readers
//!        ▲                        └──broadcast──▶ NewOrderAlert listeners
//!   OrderSubscription
//! ```
//!
//! One task owns the view and handles commands and store events one at a
//! time. Each subscription gets its own pump task tagging events with the
//! generation it was opened for; switching filters cancels the old pump and
//! any event it already queued is dropped by the view as stale.

use super::view::{Applied, NewOrderAlert, OrderView};
use crate::config::LiveConfig;
use crate::error::{LiveError, LiveResult};
use crate::store::{OrderFilter, OrderQuery, OrderStore, OrderSubscription, StoreEvent};
use resto_core::models::Order;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const COMMAND_BUFFER: usize = 32;
const ALERT_CAPACITY: usize = 64;

/// Read-only copy of the view, published after every visible change
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub generation: u64,
    pub filter: OrderFilter,
    pub loading: bool,
    /// Newest first, at most `page_size`
    pub orders: Vec<Order>,
    /// Selected order as currently visible
    pub selected: Option<Order>,
}

impl ViewSnapshot {
    fn of(view: &OrderView) -> Self {
        Self {
            generation: view.generation(),
            filter: view.filter(),
            loading: view.is_loading(),
            orders: view.orders().to_vec(),
            selected: view.selected().cloned(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.orders.iter().map(|o| o.id.as_str()).collect()
    }

    /// Snapshot for `generation` has arrived
    pub fn is_ready(&self, generation: u64) -> bool {
        self.generation == generation && !self.loading
    }
}

enum Command {
    SetFilter {
        filter: OrderFilter,
        respond_to: oneshot::Sender<LiveResult<u64>>,
    },
    Select {
        id: Option<String>,
        respond_to: oneshot::Sender<Option<Order>>,
    },
}

struct Worker {
    store: Arc<dyn OrderStore>,
    view: OrderView,
    events_tx: mpsc::Sender<(u64, StoreEvent)>,
    pump: Option<CancellationToken>,
    snapshot_tx: watch::Sender<ViewSnapshot>,
    alerts_tx: broadcast::Sender<NewOrderAlert>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::Receiver<(u64, StoreEvent)>,
    ) {
        tracing::info!(limit = self.view.limit(), "Live order worker started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // Every handle is gone
                    None => break,
                },

                Some((generation, event)) = events.recv() => {
                    self.handle_event(generation, event);
                }
            }
        }

        if let Some(pump) = self.pump.take() {
            pump.cancel();
        }
        tracing::info!("Live order worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetFilter { filter, respond_to } => {
                let result = self.set_filter(filter).await;
                let _ = respond_to.send(result);
            }
            Command::Select { id, respond_to } => {
                match id {
                    Some(id) => {
                        self.view.select_order(id);
                    }
                    None => self.view.clear_selection(),
                }
                self.publish();
                let _ = respond_to.send(self.view.selected().cloned());
            }
        }
    }

    async fn set_filter(&mut self, filter: OrderFilter) -> LiveResult<u64> {
        if let Some(previous) = self.pump.take() {
            previous.cancel();
        }

        let generation = self.view.set_filter(filter);
        self.publish();

        let query = OrderQuery::new(filter, self.view.limit());
        let subscription = self.store.subscribe(query).await.map_err(|e| {
            tracing::warn!(generation, filter = %filter, error = %e, "Live query failed");
            e
        })?;

        let token = self.shutdown.child_token();
        tokio::spawn(pump(
            generation,
            subscription,
            self.events_tx.clone(),
            token.clone(),
        ));
        self.pump = Some(token);

        tracing::info!(generation, filter = %filter, "Live query subscribed");
        Ok(generation)
    }

    fn handle_event(&mut self, generation: u64, event: StoreEvent) {
        let kind = event.kind();
        match self.view.apply_event(generation, event) {
            Applied::Changed { alerts } => {
                tracing::debug!(generation, kind, size = self.view.len(), "View updated");
                self.publish();
                for alert in alerts {
                    tracing::info!(
                        order_id = %alert.order_id,
                        order_number = alert.order_number,
                        "New order"
                    );
                    // No listener is fine
                    let _ = self.alerts_tx.send(alert);
                }
            }
            Applied::Stale | Applied::Unchanged => {}
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(ViewSnapshot::of(&self.view));
    }
}

/// Forward one subscription's events, tagged with its generation
async fn pump(
    generation: u64,
    mut subscription: OrderSubscription,
    events: mpsc::Sender<(u64, StoreEvent)>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,

            event = subscription.next() => match event {
                Some(event) => {
                    if events.send((generation, event)).await.is_err() {
                        break;
                    }
                }
                None => {
                    tracing::warn!(generation, "Store closed the live query");
                    break;
                }
            },
        }
    }
    tracing::debug!(generation, "Subscription pump stopped");
}

/// Handle to the live order view
///
/// Dropping every handle stops the worker; [`LiveOrders::shutdown`] also
/// waits for it.
pub struct LiveOrders {
    commands: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ViewSnapshot>,
    alerts_tx: broadcast::Sender<NewOrderAlert>,
    shutdown: CancellationToken,
    worker: JoinHandle<()>,
}

impl LiveOrders {
    /// Start the worker and open the first live query
    ///
    /// Returns once the query is open; the snapshot may still be on its way.
    pub async fn spawn(
        store: Arc<dyn OrderStore>,
        config: &LiveConfig,
        filter: OrderFilter,
    ) -> LiveResult<Self> {
        let view = OrderView::new(filter, config.page_size);
        let (snapshot_tx, snapshot_rx) = watch::channel(ViewSnapshot::of(&view));
        let (alerts_tx, _) = broadcast::channel(ALERT_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer.max(1));
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let shutdown = CancellationToken::new();

        let worker = Worker {
            store,
            view,
            events_tx,
            pump: None,
            snapshot_tx,
            alerts_tx: alerts_tx.clone(),
            shutdown: shutdown.clone(),
        };
        let handle = tokio::spawn(worker.run(commands_rx, events_rx));

        let live = Self {
            commands: commands_tx,
            snapshot_rx,
            alerts_tx,
            shutdown,
            worker: handle,
        };
        live.set_filter(filter).await?;
        Ok(live)
    }

    /// Replace the filter
    ///
    /// The view is empty and loading until the new snapshot arrives. Returns
    /// the new generation.
    pub async fn set_filter(&self, filter: OrderFilter) -> LiveResult<u64> {
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(Command::SetFilter { filter, respond_to })
            .await
            .map_err(|_| LiveError::Closed)?;
        response.await.map_err(|_| LiveError::Closed)?
    }

    /// Open the detail view on `id`; `None` while it is not visible
    pub async fn select_order(&self, id: impl Into<String>) -> LiveResult<Option<Order>> {
        self.select(Some(id.into())).await
    }

    pub async fn clear_selection(&self) -> LiveResult<()> {
        self.select(None).await.map(|_| ())
    }

    async fn select(&self, id: Option<String>) -> LiveResult<Option<Order>> {
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(Command::Select { id, respond_to })
            .await
            .map_err(|_| LiveError::Closed)?;
        response.await.map_err(|_| LiveError::Closed)
    }

    pub fn current(&self) -> ViewSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Change notifications
    pub fn watch(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn alerts(&self) -> broadcast::Receiver<NewOrderAlert> {
        self.alerts_tx.subscribe()
    }

    /// Wait for the first snapshot satisfying `predicate`
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&ViewSnapshot) -> bool,
    ) -> LiveResult<ViewSnapshot> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| LiveError::Closed)?
            .clone();
        Ok(snapshot)
    }

    /// Stop the worker and its pump
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.worker.await {
            tracing::error!("Live order worker panicked: {:?}", e);
        }
    }
}
