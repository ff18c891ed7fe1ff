//! NFC hardware availability events.
//!
//! There is a single event kind: the radio state changed. Subscribers get
//! the fresh [`NfcStatus`] either through a callback registered with
//! [`NfcDispatcher::subscribe`] or through a crossbeam channel. Delivery is
//! fire-and-forget on whatever thread the transport dispatches from and
//! must not block the caller.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use tracing::trace;

/// Snapshot of the NFC radio state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NfcStatus {
    /// Whether the radio is currently enabled
    pub enabled: bool,
    /// Whether the device has NFC hardware at all
    pub support: bool,
}

impl NfcStatus {
    /// Radio present and enabled.
    pub const fn available() -> Self {
        Self {
            enabled: true,
            support: true,
        }
    }
}

type Handler = Box<dyn Fn(NfcStatus) + Send + Sync>;

/// Fan-out point for NFC state-change events.
///
/// The transport pushes into this; callback handlers and channel receivers
/// hang off it. Handler removal is keyed by the id baked into the
/// [`NfcSubscription`], not by handler identity.
#[derive(Default)]
pub struct NfcDispatcher {
    handlers: Mutex<Vec<(u64, Handler)>>,
    senders: Mutex<Vec<Sender<NfcStatus>>>,
    next_id: AtomicU64,
}

impl fmt::Debug for NfcDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NfcDispatcher")
            .field("handlers", &self.handlers.lock().len())
            .field("channels", &self.senders.lock().len())
            .finish()
    }
}

impl NfcDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for state changes.
    ///
    /// Dropping the returned subscription (or calling
    /// [`NfcSubscription::unsubscribe`]) removes exactly this handler;
    /// removal after the dispatcher is gone is a no-op.
    pub fn subscribe(
        self: &Arc<Self>,
        handler: impl Fn(NfcStatus) + Send + Sync + 'static,
    ) -> NfcSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().push((id, Box::new(handler)));
        NfcSubscription {
            id,
            dispatcher: Arc::downgrade(self),
        }
    }

    /// Get a channel receiver for state changes.
    ///
    /// The sender side is dropped automatically once the receiver is gone.
    pub fn channel(&self) -> Receiver<NfcStatus> {
        let (sender, receiver) = unbounded();
        self.senders.lock().push(sender);
        receiver
    }

    /// Deliver a state change to every live subscriber.
    pub fn dispatch(&self, status: NfcStatus) {
        trace!(enabled = status.enabled, support = status.support, "NFC state change");
        for (_, handler) in self.handlers.lock().iter() {
            handler(status);
        }
        // Disconnected receivers fall out of the list here.
        self.senders
            .lock()
            .retain(|sender| sender.send(status).is_ok());
    }

    fn unsubscribe(&self, id: u64) {
        self.handlers.lock().retain(|(handler_id, _)| *handler_id != id);
    }

    #[cfg(test)]
    fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }
}

/// Handle to a registered NFC state-change callback.
///
/// Dropping it unregisters the handler.
#[derive(Debug)]
pub struct NfcSubscription {
    id: u64,
    dispatcher: Weak<NfcDispatcher>,
}

impl NfcSubscription {
    /// Remove the handler explicitly. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for NfcSubscription {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.upgrade() {
            dispatcher.unsubscribe(self.id);
        }
    }
}
