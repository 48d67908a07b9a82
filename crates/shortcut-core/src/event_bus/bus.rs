use super::types::OrchestratorEvent;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Broadcast-based event bus for run lifecycle events.
///
/// Uses `tokio::broadcast` so multiple subscribers can receive the same events.
/// Slow subscribers will miss events (lagged) rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OrchestratorEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    ///
    /// Capacity determines how many events can be buffered before slow
    /// subscribers start missing events. 256 is a reasonable default.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on.
    ///
    /// Each subscription gets an independent copy of every event. Dropping
    /// the handle, or calling [`Subscription::unsubscribe`], detaches it.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Feed every future event to `callback` on a background task.
    ///
    /// The callback runs off the publishing path, so a slow or panicking
    /// listener never stalls a run. Must be called inside a tokio runtime.
    pub fn listen<F>(&self, mut callback: F) -> ListenerHandle
    where
        F: FnMut(OrchestratorEvent) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                callback(event);
            }
            debug!("Event listener stopped: bus closed");
        });
        ListenerHandle { task }
    }

    /// Publish an event to all active subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// If there are no subscribers, the event is silently dropped.
    pub fn publish(&self, event: OrchestratorEvent) -> usize {
        // send() returns Err if there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    /// Get the current number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<OrchestratorEvent>,
}

impl Subscription {
    /// Wait for the next event.
    ///
    /// Events dropped because this subscriber lagged are skipped with a
    /// warning. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<OrchestratorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<OrchestratorEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagged, events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain every event currently buffered.
    pub fn drain(&mut self) -> Vec<OrchestratorEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Detach from the bus.
    pub fn unsubscribe(self) {}
}

/// Handle returned by [`EventBus::listen`].
#[derive(Debug)]
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Whether the listener task is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the listener.
    pub fn unsubscribe(self) {
        self.task.abort();
    }

    /// Wait for the listener to handle every event and exit.
    ///
    /// The listener exits once every clone of the bus is dropped, so drop
    /// them before awaiting this.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "Event listener ended abnormally");
        }
    }
}
