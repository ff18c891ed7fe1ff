//! Session client for NFC wallet cards.
//!
//! A card is a personalized secure element holding wallets (key slots),
//! issuer and user data areas, and a small file store, reached over an NFC
//! radio. This crate provides:
//!
//! - A typed, asynchronous [`CardClient`] with one method per card
//!   operation: scanning, signing, wallet lifecycle, issuer/user data,
//!   file storage, access control and session grouping
//! - The [`CardTransport`] seam behind which the native NFC stack (or the
//!   bundled [`emulator`]) lives
//! - NFC availability events with drop-to-unsubscribe handles
//!
//! Every operation independently acquires the exclusive hardware channel,
//! or reuses a session opened with [`CardClient::start_session`]. The
//! client holds no authoritative card state: reads re-fetch from the card,
//! writes return fresh confirmation records.

#![forbid(unsafe_code)]

mod client;
mod error;
mod events;
mod session;
mod transport;

pub mod commands;
pub mod emulator;
pub mod types;

pub use client::CardClient;
pub use error::{Error, ErrorKind, Result};
pub use events::{NfcDispatcher, NfcStatus, NfcSubscription};
pub use transport::{CardRequest, CardResponse, CardTransport};

pub use types::{Card, CardId, EllipticCurve, Message, Wallet, WalletConfig};

// Re-export the derivation path type used by the signing API.
pub use coins_bip32::path::DerivationPath;
