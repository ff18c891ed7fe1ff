//! Transport layer for card communication.
//!
//! A [`CardTransport`] owns the hardware channel to one physical card slot
//! (NFC field, reader, or an emulated card) and performs typed round trips.
//! The wire encoding of commands is the transport's business and out of
//! scope here.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::{CardCommand, ResponsePayload};
use crate::error::Result;
use crate::events::{NfcDispatcher, NfcStatus};
use crate::types::{CardId, Message};

/// One typed request to the card.
///
/// `pinned_card_id` ties the request to a specific card when several might
/// be presented; the transport fails the round trip with a mismatch error
/// when a different card answers. `initial_message` is purely on-screen
/// guidance during the interaction and never reaches the card.
#[derive(Debug, Clone)]
pub struct CardRequest {
    /// Card the request is pinned to, if any
    pub pinned_card_id: Option<CardId>,
    /// UI guidance shown while the user holds the card
    pub initial_message: Option<Message>,
    /// The command to execute
    pub command: CardCommand,
}

impl CardRequest {
    /// Request with no pinning and no UI message.
    pub const fn new(command: CardCommand) -> Self {
        Self {
            pinned_card_id: None,
            initial_message: None,
            command,
        }
    }
}

/// One typed response from the card.
#[derive(Debug, Clone)]
pub struct CardResponse {
    /// The card that served the request
    pub card_id: CardId,
    /// Operation-specific response data
    pub payload: ResponsePayload,
}

/// Trait for card transport connections.
///
/// Implementors provide the session handshake, typed round trips, and the
/// NFC radio status. The channel is exclusive: the caller serializes round
/// trips, the transport does not need to.
#[async_trait]
pub trait CardTransport: fmt::Debug + Send + Sync {
    /// Perform the hardware handshake that opens the channel.
    async fn begin_session(&self) -> Result<()>;

    /// Release the hardware channel.
    async fn end_session(&self);

    /// Execute one command round trip inside an open session.
    async fn transmit(&self, request: CardRequest) -> Result<CardResponse>;

    /// Snapshot of the NFC radio state.
    fn nfc_status(&self) -> NfcStatus;

    /// Attach the dispatcher the transport should push NFC state changes
    /// into. Transports without state-change signalling may ignore this.
    fn bind_events(&self, dispatcher: Arc<NfcDispatcher>) {
        let _ = dispatcher;
    }
}

// A shared transport is itself a transport; lets callers keep a handle on
// the concrete transport after handing it to a client.
#[async_trait]
impl<T: CardTransport + ?Sized> CardTransport for Arc<T> {
    async fn begin_session(&self) -> Result<()> {
        (**self).begin_session().await
    }

    async fn end_session(&self) {
        (**self).end_session().await;
    }

    async fn transmit(&self, request: CardRequest) -> Result<CardResponse> {
        (**self).transmit(request).await
    }

    fn nfc_status(&self) -> NfcStatus {
        (**self).nfc_status()
    }

    fn bind_events(&self, dispatcher: Arc<NfcDispatcher>) {
        (**self).bind_events(dispatcher);
    }
}
