//! Exclusive-channel session management.
//!
//! The physical card channel is a shared exclusive resource: only one
//! operation may be in flight at a time. The gate serializes operations
//! with an async mutex and tracks whether an explicit session is open so
//! that grouped operations skip the per-operation hardware handshake.

use std::sync::atomic::{AtomicBool, Ordering};

use async_lock::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::Result;
use crate::transport::CardTransport;

pub(crate) struct ChannelGate {
    lock: Mutex<()>,
    explicit_open: AtomicBool,
}

impl ChannelGate {
    pub(crate) const fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            explicit_open: AtomicBool::new(false),
        }
    }

    /// Acquire the channel for one operation. Second caller waits for the
    /// first; operations never interleave.
    pub(crate) async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Whether an explicit session currently owns the hardware handshake.
    pub(crate) fn is_explicit_open(&self) -> bool {
        self.explicit_open.load(Ordering::Acquire)
    }

    /// Open an explicit session. Idempotent: a second open reuses the
    /// already established channel.
    pub(crate) async fn open(&self, transport: &dyn CardTransport) -> Result<()> {
        let _guard = self.lock.lock().await;
        if self.explicit_open.load(Ordering::Acquire) {
            return Ok(());
        }
        transport.begin_session().await?;
        self.explicit_open.store(true, Ordering::Release);
        debug!("explicit card session opened");
        Ok(())
    }

    /// Close the explicit session. A no-op when none is open.
    pub(crate) async fn close(&self, transport: &dyn CardTransport) {
        let _guard = self.lock.lock().await;
        if self.explicit_open.swap(false, Ordering::AcqRel) {
            transport.end_session().await;
            debug!("explicit card session closed");
        }
    }
}

impl std::fmt::Debug for ChannelGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelGate")
            .field("explicit_open", &self.is_explicit_open())
            .finish()
    }
}
