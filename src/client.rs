//! Card session client.
//!
//! [`CardClient`] is the façade every card operation goes through. Each
//! method independently acquires the exclusive hardware channel (or reuses
//! an explicitly started session), performs one typed round trip, and
//! returns a fresh response record echoing the serving card id.

use std::sync::Arc;

use bytes::Bytes;
use coins_bip32::path::DerivationPath;
use crossbeam_channel::Receiver;
use tracing::debug;

use crate::commands::*;
use crate::error::{Error, Result};
use crate::events::{NfcDispatcher, NfcStatus, NfcSubscription};
use crate::session::ChannelGate;
use crate::transport::{CardRequest, CardResponse, CardTransport};
use crate::types::{Card, CardId, FileSettingsChange, FileToWrite, Message, UserCode, WalletConfig};

/// Asynchronous session client for one card transport.
///
/// Operations are single-outstanding-request: concurrent invocations
/// serialize on the channel rather than interleave, because the hardware
/// cannot multiplex.
#[derive(Debug)]
pub struct CardClient<T: CardTransport> {
    transport: Arc<T>,
    gate: ChannelGate,
    events: Arc<NfcDispatcher>,
}

impl<T: CardTransport> CardClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T) -> Self {
        let transport = Arc::new(transport);
        let events = Arc::new(NfcDispatcher::new());
        transport.bind_events(Arc::clone(&events));
        Self {
            transport,
            gate: ChannelGate::new(),
            events,
        }
    }

    /// Synchronous snapshot of the NFC radio state.
    pub fn nfc_status(&self) -> NfcStatus {
        self.transport.nfc_status()
    }

    /// Register a callback for NFC state changes.
    ///
    /// Dropping the returned subscription removes exactly this handler.
    pub fn on_nfc_state_change(
        &self,
        handler: impl Fn(NfcStatus) + Send + Sync + 'static,
    ) -> NfcSubscription {
        self.events.subscribe(handler)
    }

    /// Channel-based variant of NFC state-change subscription.
    pub fn nfc_state_receiver(&self) -> Receiver<NfcStatus> {
        self.events.channel()
    }

    /// Open an explicit session so several operations share one hardware
    /// handshake. Idempotent.
    pub async fn start_session(&self) -> Result<()> {
        self.check_nfc()?;
        self.gate.open(self.transport.as_ref()).await
    }

    /// Close the explicit session. A no-op when none is open.
    pub async fn stop_session(&self) {
        self.gate.close(self.transport.as_ref()).await;
    }

    /// Read the full card snapshot, including wallets and attestation.
    pub async fn scan_card(
        &self,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<Card> {
        debug!("scanning card");
        let response = self
            .round_trip(CardCommand::Scan, card_id, initial_message)
            .await?;
        match response.payload {
            ResponsePayload::Card(card) => Ok(*card),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Sign an ordered sequence of hashes with the wallet selected by
    /// `wallet_public_key`. Returns one signature per hash, in input order.
    ///
    /// `card_id` is required here: signing must never run against whatever
    /// card happens to be in the field.
    pub async fn sign(
        &self,
        hashes: Vec<Bytes>,
        wallet_public_key: Bytes,
        card_id: CardId,
        derivation_path: Option<DerivationPath>,
        initial_message: Option<Message>,
    ) -> Result<SignResponse> {
        if hashes.is_empty() {
            return Err(Error::InvalidData("no hashes to sign"));
        }
        debug!(hashes = hashes.len(), "signing");
        let command = CardCommand::Sign(SignRequest {
            hashes,
            wallet_public_key,
            derivation_path,
        });
        let response = self
            .round_trip(command, Some(card_id), initial_message)
            .await?;
        match response.payload {
            ResponsePayload::Signatures(signatures) => Ok(SignResponse {
                card_id: response.card_id,
                signatures,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Read issuer data and its signature.
    pub async fn read_issuer_data(
        &self,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<ReadIssuerDataResponse> {
        let response = self
            .round_trip(CardCommand::ReadIssuerData, card_id, initial_message)
            .await?;
        match response.payload {
            ResponsePayload::IssuerData {
                data,
                signature,
                counter,
            } => Ok(ReadIssuerDataResponse {
                card_id: response.card_id,
                data,
                signature,
                counter,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Write issuer data. When the card tracks a counter the write must
    /// strictly increase it, otherwise the card rejects the replay.
    pub async fn write_issuer_data(
        &self,
        data: Bytes,
        signature: Bytes,
        counter: Option<u32>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<WriteIssuerDataResponse> {
        let command = CardCommand::WriteIssuerData(WriteIssuerDataRequest {
            data,
            signature,
            counter,
        });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(WriteIssuerDataResponse {
            card_id: response.card_id,
        })
    }

    /// Read issuer extra data (reassembled from chunks by the transport).
    pub async fn read_issuer_extra_data(
        &self,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<ReadIssuerExtraDataResponse> {
        let response = self
            .round_trip(CardCommand::ReadIssuerExtraData, card_id, initial_message)
            .await?;
        match response.payload {
            ResponsePayload::IssuerExtraData {
                data,
                starting_signature,
                finalizing_signature,
                counter,
            } => Ok(ReadIssuerExtraDataResponse {
                card_id: response.card_id,
                data,
                starting_signature,
                finalizing_signature,
                counter,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Write issuer extra data. The payload is chunked on the wire;
    /// `starting_signature` commits to the write before the first chunk and
    /// `finalizing_signature` covers the assembled payload.
    pub async fn write_issuer_extra_data(
        &self,
        data: Bytes,
        starting_signature: Bytes,
        finalizing_signature: Bytes,
        counter: Option<u32>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<WriteIssuerExtraDataResponse> {
        let command = CardCommand::WriteIssuerExtraData(WriteIssuerExtraDataRequest {
            data,
            starting_signature,
            finalizing_signature,
            counter,
        });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(WriteIssuerExtraDataResponse {
            card_id: response.card_id,
        })
    }

    /// Read user data and user protected data.
    pub async fn read_user_data(
        &self,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<ReadUserDataResponse> {
        let response = self
            .round_trip(CardCommand::ReadUserData, card_id, initial_message)
            .await?;
        match response.payload {
            ResponsePayload::UserData {
                data,
                protected_data,
                counter,
                protected_counter,
            } => Ok(ReadUserDataResponse {
                card_id: response.card_id,
                data,
                protected_data,
                counter,
                protected_counter,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Write user data. Gated by the access code class on the card.
    pub async fn write_user_data(
        &self,
        data: Bytes,
        counter: Option<u32>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<WriteUserDataResponse> {
        let command = CardCommand::WriteUserData(WriteUserDataRequest { data, counter });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(WriteUserDataResponse {
            card_id: response.card_id,
        })
    }

    /// Write user protected data. Requires passcode confirmation on the
    /// card; fails when no passcode is set.
    pub async fn write_user_protected_data(
        &self,
        data: Bytes,
        counter: Option<u32>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<WriteUserDataResponse> {
        let command = CardCommand::WriteUserProtectedData(WriteUserDataRequest { data, counter });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(WriteUserDataResponse {
            card_id: response.card_id,
        })
    }

    /// Create a wallet in a free slot.
    ///
    /// Rejected when the requested curve is outside the card's supported
    /// set or every wallet slot is occupied.
    pub async fn create_wallet(
        &self,
        config: WalletConfig,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<CreateWalletResponse> {
        debug!(curve = %config.curve, "creating wallet");
        let command = CardCommand::CreateWallet(CreateWalletRequest { config });
        let response = self.round_trip(command, card_id, initial_message).await?;
        match response.payload {
            ResponsePayload::Wallet(wallet) => Ok(CreateWalletResponse {
                card_id: response.card_id,
                wallet,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Purge a wallet. Rejected when the wallet is permanent.
    pub async fn purge_wallet(
        &self,
        wallet_public_key: Bytes,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<PurgeWalletResponse> {
        let command = CardCommand::PurgeWallet(PurgeWalletRequest { wallet_public_key });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(PurgeWalletResponse {
            card_id: response.card_id,
        })
    }

    /// Set or change the access code. Rejected when the card settings
    /// forbid it.
    pub async fn set_access_code(
        &self,
        code: UserCode,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<CardId> {
        let command = CardCommand::SetAccessCode(SetUserCodeRequest { code });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(response.card_id)
    }

    /// Set or change the passcode. Rejected when the card settings forbid
    /// it.
    pub async fn set_passcode(
        &self,
        code: UserCode,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<CardId> {
        let command = CardCommand::SetPasscode(SetUserCodeRequest { code });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(response.card_id)
    }

    /// Read files from the card store. Private files are excluded unless
    /// `read_private_files` is set; explicit `indices` restrict the read to
    /// exactly those files and fail on any unknown index.
    pub async fn read_files(
        &self,
        read_private_files: bool,
        indices: Option<Vec<u8>>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<ReadFilesResponse> {
        let command = CardCommand::ReadFiles(ReadFilesRequest {
            read_private_files,
            indices,
        });
        let response = self.round_trip(command, card_id, initial_message).await?;
        match response.payload {
            ResponsePayload::Files(files) => Ok(ReadFilesResponse {
                card_id: response.card_id,
                files,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Write files to the card store. Returns the assigned indices in input
    /// order.
    pub async fn write_files(
        &self,
        files: Vec<FileToWrite>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<WriteFilesResponse> {
        let command = CardCommand::WriteFiles(WriteFilesRequest { files });
        let response = self.round_trip(command, card_id, initial_message).await?;
        match response.payload {
            ResponsePayload::FileIndices(indices) => Ok(WriteFilesResponse {
                card_id: response.card_id,
                indices,
            }),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }

    /// Delete files from the card store. `None` deletes everything.
    pub async fn delete_files(
        &self,
        indices: Option<Vec<u8>>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<DeleteFilesResponse> {
        let command = CardCommand::DeleteFiles(DeleteFilesRequest { indices });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(DeleteFilesResponse {
            card_id: response.card_id,
        })
    }

    /// Change per-file settings.
    pub async fn change_file_settings(
        &self,
        changes: Vec<FileSettingsChange>,
        card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<ChangeFileSettingsResponse> {
        let command = CardCommand::ChangeFileSettings(ChangeFileSettingsRequest { changes });
        let response = self.round_trip(command, card_id, initial_message).await?;
        self.expect_done(&response)?;
        Ok(ChangeFileSettingsResponse {
            card_id: response.card_id,
        })
    }

    /// One exclusive round trip: NFC gate, channel acquisition, transmit.
    /// Without an explicit session the hardware handshake wraps the single
    /// round trip.
    async fn round_trip(
        &self,
        command: CardCommand,
        pinned_card_id: Option<CardId>,
        initial_message: Option<Message>,
    ) -> Result<CardResponse> {
        self.check_nfc()?;
        let _guard = self.gate.acquire().await;

        let explicit = self.gate.is_explicit_open();
        if !explicit {
            self.transport.begin_session().await?;
        }
        let result = self
            .transport
            .transmit(CardRequest {
                pinned_card_id,
                initial_message,
                command,
            })
            .await;
        if !explicit {
            self.transport.end_session().await;
        }
        result
    }

    fn check_nfc(&self) -> Result<()> {
        let status = self.transport.nfc_status();
        if !status.support {
            return Err(Error::NfcUnsupported);
        }
        if !status.enabled {
            return Err(Error::NfcDisabled);
        }
        Ok(())
    }

    fn expect_done(&self, response: &CardResponse) -> Result<()> {
        match response.payload {
            ResponsePayload::Done => Ok(()),
            _ => Err(Error::InvalidData("unexpected response payload")),
        }
    }
}
