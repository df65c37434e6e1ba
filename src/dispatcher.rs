use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, MutexGuard, RwLock,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
};

use tokio::{sync::Notify, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::{
    clients::webhook::WebhookClient,
    models::{endpoint::Endpoint, status::WorkerState, webhook::DeliveryOutcome},
};

const MODE_RUN: u8 = 0;
const MODE_HALT: u8 = 1;
const MODE_DRAIN: u8 = 2;

/// Pending messages plus the stop signal shared with the worker.
struct MessageQueue {
    pending: Mutex<VecDeque<String>>,
    mode: AtomicU8,
    running: AtomicBool,
    wake: Notify,
}

enum Next {
    Deliver(String),
    Wait,
    Exit,
}

impl MessageQueue {
    fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            mode: AtomicU8::new(MODE_HALT),
            running: AtomicBool::new(false),
            wake: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, message: String) {
        self.lock().push_back(message);
        self.wake.notify_one();
    }

    fn signal(&self, mode: u8) {
        self.mode.store(mode, Ordering::SeqCst);
        self.wake.notify_one();
    }

    fn next(&self) -> Next {
        let mut pending = self.lock();

        match self.mode.load(Ordering::SeqCst) {
            MODE_HALT => Next::Exit,
            mode => match pending.pop_front() {
                Some(message) => Next::Deliver(message),
                None if mode == MODE_DRAIN => Next::Exit,
                None => Next::Wait,
            },
        }
    }
}

/// Clears the running flag when the worker exits, including by panic.
struct RunningGuard(Arc<MessageQueue>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::SeqCst);
    }
}

struct WorkerSlot {
    handle: Option<JoinHandle<()>>,
}

/// Ordered, unbounded announcement queue drained by a single background
/// worker.
///
/// Producers call [`Dispatcher::enqueue`] from any thread without touching
/// the network. The worker posts one message at a time, in enqueue order,
/// using the endpoint captured when it was started.
///
/// The async worker lock only serialises start, stop and reconfigure;
/// [`Dispatcher::state`] and [`Dispatcher::endpoint`] never wait on it.
pub struct Dispatcher {
    queue: Arc<MessageQueue>,
    client: WebhookClient,
    endpoint: RwLock<Endpoint>,
    worker: tokio::sync::Mutex<WorkerSlot>,
}

impl Dispatcher {
    pub fn new(client: WebhookClient, endpoint: Endpoint) -> Self {
        Self {
            queue: Arc::new(MessageQueue::new()),
            client,
            endpoint: RwLock::new(endpoint),
            worker: tokio::sync::Mutex::new(WorkerSlot { handle: None }),
        }
    }

    pub fn enqueue(&self, message: impl Into<String>) {
        self.queue.push(message.into());
    }

    pub fn pending_len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn pending_messages(&self) -> Vec<String> {
        self.queue.lock().iter().cloned().collect()
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn state(&self) -> WorkerState {
        if self.queue.running.load(Ordering::SeqCst) {
            WorkerState::Running
        } else {
            WorkerState::Stopped
        }
    }

    /// Spawns the worker for the current endpoint. Starting an already
    /// running dispatcher does nothing; an unusable endpoint leaves it
    /// stopped while messages keep queueing.
    pub async fn start(&self) -> WorkerState {
        let mut slot = self.worker.lock().await;
        self.start_locked(&mut slot)
    }

    /// Stops after the in-flight delivery completes. Queued messages stay
    /// queued for the next start.
    pub async fn stop(&self) {
        let mut slot = self.worker.lock().await;
        self.stop_locked(&mut slot, MODE_HALT).await;
    }

    /// Delivers everything already queued, then stops.
    pub async fn shutdown(&self) {
        let mut slot = self.worker.lock().await;
        self.stop_locked(&mut slot, MODE_DRAIN).await;
    }

    /// Stop, swap the endpoint, start. No delivery straddles the swap.
    pub async fn reconfigure(&self, endpoint: Endpoint) -> WorkerState {
        let mut slot = self.worker.lock().await;

        self.stop_locked(&mut slot, MODE_HALT).await;
        info!(
            webhook_id = %endpoint.webhook_id,
            enabled = endpoint.enabled,
            "Announce endpoint reconfigured"
        );
        *self
            .endpoint
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = endpoint;

        self.start_locked(&mut slot)
    }

    fn start_locked(&self, slot: &mut WorkerSlot) -> WorkerState {
        if slot.handle.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Announce worker already running, ignoring start");
            return WorkerState::Running;
        }

        let endpoint = self.endpoint();
        if !endpoint.is_usable() {
            info!(
                pending = self.pending_len(),
                "Announcements disabled, worker not started"
            );
            return WorkerState::Stopped;
        }

        self.queue.signal(MODE_RUN);

        let queue = Arc::clone(&self.queue);
        let client = self.client.clone();

        info!(
            destination = %endpoint.destination_path(),
            "Announce: using webhook URL"
        );

        self.queue.running.store(true, Ordering::SeqCst);
        slot.handle = Some(tokio::spawn(run_worker(queue, client, endpoint)));
        WorkerState::Running
    }

    async fn stop_locked(&self, slot: &mut WorkerSlot, mode: u8) {
        let Some(handle) = slot.handle.take() else {
            debug!("Announce worker not running, nothing to stop");
            return;
        };

        self.queue.signal(mode);

        if let Err(e) = handle.await {
            error!(error = %e, "Announce worker terminated abnormally");
        }

        info!(pending = self.pending_len(), "Announce worker stopped");
    }
}

async fn run_worker(queue: Arc<MessageQueue>, client: WebhookClient, endpoint: Endpoint) {
    let _running = RunningGuard(Arc::clone(&queue));

    loop {
        match queue.next() {
            Next::Deliver(message) => deliver(&client, &endpoint, &message).await,
            Next::Wait => queue.wake.notified().await,
            Next::Exit => break,
        }
    }
}

async fn deliver(client: &WebhookClient, endpoint: &Endpoint, message: &str) {
    match client.send(endpoint, message).await {
        Ok(DeliveryOutcome::Delivered { status }) => {
            debug!(status, "Announcement delivered");
        }
        Ok(DeliveryOutcome::Rejected { status, body }) => {
            warn!(status, body = %body, "Announce: webhook rejected message");
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Announce: error while sending message");
        }
    }
}
