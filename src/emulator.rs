//! In-memory card transport.
//!
//! [`CardEmulator`] behaves like a personalized card behind an NFC radio:
//! it enforces the card-side policies the client only observes (supported
//! curves, wallet slots, permanent wallets, monotonic write counters, file
//! visibility, firmware gating, user-code settings flags) and produces
//! deterministic stand-in signatures. Real card cryptography lives in the
//! native transport and is out of scope.
//!
//! The emulator backs the integration test suite and is useful for stubbing
//! the SDK in host applications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use sha2::{Digest, Sha256, Sha512};
use tracing::debug;

use crate::commands::{CardCommand, ResponsePayload, SignRequest, WriteIssuerDataRequest};
use crate::error::{Error, Result};
use crate::events::{NfcDispatcher, NfcStatus};
use crate::transport::{CardRequest, CardResponse, CardTransport};
use crate::types::{
    Attestation, Card, CardId, CardSettings, EllipticCurve, File, FileSettings, FileToWrite,
    FileVisibility, FirmwareVersion, Issuer, LinkedTerminalStatus, Manufacturer, SigningMethod,
    UserCodeType, Wallet, WalletConfig, WalletSettings,
};

// A wallet plus the creation-time personalization the public `Wallet`
// record does not carry.
#[derive(Debug)]
struct WalletSlot {
    wallet: Wallet,
    signing_methods: Vec<SigningMethod>,
}

#[derive(Debug)]
struct EmulatorState {
    present: bool,
    nfc: NfcStatus,

    card_id: CardId,
    batch_id: String,
    card_public_key: Bytes,
    firmware_version: FirmwareVersion,
    manufacturer: Manufacturer,
    issuer: Issuer,
    settings: CardSettings,
    linked_terminal_status: LinkedTerminalStatus,
    supported_curves: Vec<EllipticCurve>,
    attestation: Attestation,
    health: Option<u32>,
    remaining_signatures: Option<u32>,

    wallets: Vec<WalletSlot>,
    // Slot indices are handed out monotonically and never recycled, so a
    // purged wallet's index cannot reappear on a later creation. Wider than
    // the index itself so running past the last index fails instead of
    // wrapping.
    next_wallet_index: u16,
    default_wallet_signatures: Option<u32>,

    access_code: Option<String>,
    passcode: Option<String>,
    // Codes the emulated user will type at the next prompt. `None` stands
    // for a correct entry.
    entered_access_code: Option<String>,
    entered_passcode: Option<String>,

    issuer_data: Bytes,
    issuer_data_signature: Bytes,
    issuer_counter: Option<u32>,

    issuer_extra_data: Bytes,
    issuer_extra_starting_signature: Option<Bytes>,
    issuer_extra_finalizing_signature: Option<Bytes>,
    issuer_extra_counter: Option<u32>,

    user_data: Bytes,
    user_counter: Option<u32>,
    user_protected_data: Option<Bytes>,
    user_protected_counter: Option<u32>,

    files: Vec<File>,
    next_file_index: u16,
}

/// An emulated card behind an emulated NFC radio.
#[derive(Debug)]
pub struct CardEmulator {
    state: Mutex<EmulatorState>,
    events: Mutex<Option<Arc<NfcDispatcher>>>,
    handshakes: AtomicU32,
}

impl CardEmulator {
    /// Start building an emulated card.
    pub fn builder() -> EmulatorBuilder {
        EmulatorBuilder::default()
    }

    /// Emulated card with default personalization.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Identifier of the emulated card.
    pub fn card_id(&self) -> CardId {
        self.state.lock().card_id.clone()
    }

    /// Toggle the emulated NFC radio and notify subscribers.
    pub fn set_nfc_enabled(&self, enabled: bool) {
        let status = {
            let mut state = self.state.lock();
            state.nfc.enabled = enabled;
            state.nfc
        };
        if let Some(dispatcher) = self.events.lock().as_ref() {
            dispatcher.dispatch(status);
        }
    }

    /// Put the card into or take it out of the field. An absent card makes
    /// in-flight and subsequent operations fail as user-cancelled.
    pub fn set_present(&self, present: bool) {
        self.state.lock().present = present;
    }

    /// Number of hardware handshakes performed so far.
    pub fn handshake_count(&self) -> u32 {
        self.handshakes.load(Ordering::SeqCst)
    }

    /// Whether an access code is set on the card.
    pub fn access_code_set(&self) -> bool {
        self.state.lock().access_code.is_some()
    }

    /// Whether a passcode is set on the card.
    pub fn passcode_set(&self) -> bool {
        self.state.lock().passcode.is_some()
    }

    /// Script the code the emulated user types at the next prompt for the
    /// given code class. Without a scripted entry the user is assumed to
    /// type the correct code.
    pub fn enter_user_code(&self, code_type: UserCodeType, code: impl Into<String>) {
        let mut state = self.state.lock();
        match code_type {
            UserCodeType::AccessCode => state.entered_access_code = Some(code.into()),
            UserCodeType::Passcode => state.entered_passcode = Some(code.into()),
        }
    }

    fn check_field(state: &EmulatorState) -> Result<()> {
        if !state.nfc.support {
            return Err(Error::NfcUnsupported);
        }
        if !state.nfc.enabled {
            return Err(Error::NfcDisabled);
        }
        if !state.present {
            return Err(Error::UserCancelled);
        }
        Ok(())
    }

    fn execute(state: &mut EmulatorState, command: CardCommand) -> Result<ResponsePayload> {
        match command {
            CardCommand::Scan => Ok(ResponsePayload::Card(Box::new(Self::snapshot(state)))),
            CardCommand::Sign(request) => Self::sign(state, request),
            CardCommand::ReadIssuerData => Ok(ResponsePayload::IssuerData {
                data: state.issuer_data.clone(),
                signature: state.issuer_data_signature.clone(),
                counter: state.issuer_counter,
            }),
            CardCommand::WriteIssuerData(request) => Self::write_issuer_data(state, request),
            CardCommand::ReadIssuerExtraData => Ok(ResponsePayload::IssuerExtraData {
                data: state.issuer_extra_data.clone(),
                starting_signature: state.issuer_extra_starting_signature.clone(),
                finalizing_signature: state.issuer_extra_finalizing_signature.clone(),
                counter: state.issuer_extra_counter,
            }),
            CardCommand::WriteIssuerExtraData(request) => {
                let counter =
                    Self::advanced_counter(state.issuer_extra_counter, request.counter)?;
                state.issuer_extra_data = request.data;
                state.issuer_extra_starting_signature = Some(request.starting_signature);
                state.issuer_extra_finalizing_signature = Some(request.finalizing_signature);
                state.issuer_extra_counter = counter;
                Ok(ResponsePayload::Done)
            }
            CardCommand::ReadUserData => Ok(ResponsePayload::UserData {
                data: state.user_data.clone(),
                protected_data: state.user_protected_data.clone(),
                counter: state.user_counter,
                protected_counter: state.user_protected_counter,
            }),
            CardCommand::WriteUserData(request) => {
                Self::confirm_access_code(state)?;
                let counter = Self::advanced_counter(state.user_counter, request.counter)?;
                state.user_data = request.data;
                state.user_counter = counter;
                Ok(ResponsePayload::Done)
            }
            CardCommand::WriteUserProtectedData(request) => {
                Self::confirm_passcode(state)?;
                let counter =
                    Self::advanced_counter(state.user_protected_counter, request.counter)?;
                state.user_protected_data = Some(request.data);
                state.user_protected_counter = counter;
                Ok(ResponsePayload::Done)
            }
            CardCommand::CreateWallet(request) => Self::create_wallet(state, request.config),
            CardCommand::PurgeWallet(request) => {
                let position = state
                    .wallets
                    .iter()
                    .position(|slot| slot.wallet.public_key == request.wallet_public_key)
                    .ok_or(Error::WalletNotFound)?;
                if state.wallets[position].wallet.settings.is_permanent {
                    return Err(Error::PurgeForbidden);
                }
                state.wallets.remove(position);
                Ok(ResponsePayload::Done)
            }
            CardCommand::SetAccessCode(request) => {
                if !state.settings.is_setting_access_code_allowed {
                    return Err(Error::SettingUserCodeForbidden(UserCodeType::AccessCode));
                }
                state.access_code = Some(request.code.as_str().to_string());
                Ok(ResponsePayload::Done)
            }
            CardCommand::SetPasscode(request) => {
                if !state.settings.is_setting_passcode_allowed {
                    return Err(Error::SettingUserCodeForbidden(UserCodeType::Passcode));
                }
                state.passcode = Some(request.code.as_str().to_string());
                Ok(ResponsePayload::Done)
            }
            CardCommand::ReadFiles(request) => {
                let selected: Vec<File> = match request.indices {
                    Some(indices) => {
                        let mut files = Vec::with_capacity(indices.len());
                        for index in indices {
                            let file = state
                                .files
                                .iter()
                                .find(|file| file.index == index)
                                .ok_or(Error::FileIndexOutOfRange { index })?;
                            files.push(file.clone());
                        }
                        files
                    }
                    None => state.files.clone(),
                };
                let files = selected
                    .into_iter()
                    .filter(|file| {
                        request.read_private_files
                            || file.settings.visibility == FileVisibility::Public
                    })
                    .collect();
                Ok(ResponsePayload::Files(files))
            }
            CardCommand::WriteFiles(request) => Self::write_files(state, request.files),
            CardCommand::DeleteFiles(request) => {
                match request.indices {
                    Some(indices) => {
                        for index in &indices {
                            if !state.files.iter().any(|file| file.index == *index) {
                                return Err(Error::FileIndexOutOfRange { index: *index });
                            }
                        }
                        state.files.retain(|file| !indices.contains(&file.index));
                    }
                    None => state.files.clear(),
                }
                Ok(ResponsePayload::Done)
            }
            CardCommand::ChangeFileSettings(request) => {
                for change in &request.changes {
                    if !state.files.iter().any(|file| file.index == change.index) {
                        return Err(Error::FileIndexOutOfRange {
                            index: change.index,
                        });
                    }
                }
                for change in request.changes {
                    if let Some(file) =
                        state.files.iter_mut().find(|file| file.index == change.index)
                    {
                        file.settings = change.settings;
                    }
                }
                Ok(ResponsePayload::Done)
            }
        }
    }

    fn snapshot(state: &EmulatorState) -> Card {
        Card {
            card_id: state.card_id.clone(),
            batch_id: state.batch_id.clone(),
            card_public_key: state.card_public_key.clone(),
            firmware_version: state.firmware_version,
            manufacturer: state.manufacturer.clone(),
            issuer: state.issuer.clone(),
            settings: state.settings,
            linked_terminal_status: state.linked_terminal_status,
            supported_curves: state.supported_curves.clone(),
            wallets: state.wallets.iter().map(|slot| slot.wallet.clone()).collect(),
            attestation: state.attestation,
            health: state.health,
            remaining_signatures: state.remaining_signatures,
        }
    }

    fn sign(state: &mut EmulatorState, request: SignRequest) -> Result<ResponsePayload> {
        let count = request.hashes.len() as u32;
        let slot = state
            .wallets
            .iter_mut()
            .find(|slot| slot.wallet.public_key == request.wallet_public_key)
            .ok_or(Error::WalletNotFound)?;

        if !slot.signing_methods.contains(&SigningMethod::SignHash) {
            return Err(Error::SigningMethodNotAllowed);
        }
        let wallet = &mut slot.wallet;

        if request.derivation_path.is_some() {
            if !state.settings.is_hd_wallet_allowed {
                return Err(Error::HdWalletDisabled);
            }
            if !wallet.curve.supports_derivation() {
                return Err(Error::DerivationNotSupported(wallet.curve));
            }
        }
        if let Some(remaining) = wallet.remaining_signatures {
            if remaining < count {
                return Err(Error::NoRemainingSignatures);
            }
            wallet.remaining_signatures = Some(remaining - count);
        }
        if let Some(total) = wallet.total_signed_hashes {
            wallet.total_signed_hashes = Some(total + count);
        }

        let path_bytes = request
            .derivation_path
            .as_ref()
            .map(crate::commands::derivation_path_to_bytes)
            .unwrap_or_default();

        let signatures = request
            .hashes
            .iter()
            .map(|hash| {
                let mut hasher = Sha512::new();
                hasher.update(&wallet.public_key);
                hasher.update(&path_bytes);
                hasher.update(hash);
                Bytes::copy_from_slice(&hasher.finalize()[..64])
            })
            .collect();

        if let Some(remaining) = state.remaining_signatures {
            state.remaining_signatures = Some(remaining.saturating_sub(count));
        }

        Ok(ResponsePayload::Signatures(signatures))
    }

    fn create_wallet(state: &mut EmulatorState, config: WalletConfig) -> Result<ResponsePayload> {
        if !state.supported_curves.contains(&config.curve) {
            return Err(Error::UnsupportedCurve(config.curve));
        }
        if config.signing_methods.is_empty() {
            return Err(Error::InvalidData("wallet needs at least one signing method"));
        }
        if state.wallets.len() >= state.settings.max_wallets_count as usize {
            return Err(Error::WalletSlotsExhausted {
                max: state.settings.max_wallets_count,
            });
        }

        let index =
            u8::try_from(state.next_wallet_index).map_err(|_| Error::WalletIndicesExhausted)?;
        state.next_wallet_index += 1;

        let public_key = Self::wallet_key(&state.card_id, index);
        let chain_code = config.curve.supports_derivation().then(|| {
            let mut hasher = Sha256::new();
            hasher.update(b"chain");
            hasher.update(&public_key);
            Bytes::copy_from_slice(&hasher.finalize())
        });

        let wallet = Wallet {
            public_key,
            chain_code,
            curve: config.curve,
            settings: WalletSettings {
                is_permanent: config.prohibit_purge,
            },
            total_signed_hashes: Some(0),
            remaining_signatures: state.default_wallet_signatures,
            index,
        };
        debug!(index, curve = %config.curve, "wallet created");
        state.wallets.push(WalletSlot {
            wallet: wallet.clone(),
            signing_methods: config.signing_methods,
        });
        Ok(ResponsePayload::Wallet(wallet))
    }

    fn write_issuer_data(
        state: &mut EmulatorState,
        request: WriteIssuerDataRequest,
    ) -> Result<ResponsePayload> {
        let counter = Self::advanced_counter(state.issuer_counter, request.counter)?;
        state.issuer_data = request.data;
        state.issuer_data_signature = request.signature;
        state.issuer_counter = counter;
        Ok(ResponsePayload::Done)
    }

    fn write_files(state: &mut EmulatorState, files: Vec<FileToWrite>) -> Result<ResponsePayload> {
        if !state.settings.is_files_allowed {
            return Err(Error::FilesNotAllowed);
        }
        // Validate the whole batch before storing anything; writes are
        // all-or-nothing.
        if usize::from(state.next_file_index) + files.len() > usize::from(u8::MAX) + 1 {
            return Err(Error::FileIndicesExhausted);
        }
        if files.iter().any(|file| file.required_passcode) {
            Self::confirm_passcode(state)?;
        }
        for file in &files {
            let firmware = state.firmware_version;
            if file.min_firmware_version.is_some_and(|min| firmware < min)
                || file.max_firmware_version.is_some_and(|max| firmware > max)
            {
                return Err(Error::FirmwareGate { firmware });
            }
        }

        let mut indices = Vec::with_capacity(files.len());
        for file in files {
            let index =
                u8::try_from(state.next_file_index).map_err(|_| Error::FileIndicesExhausted)?;
            state.next_file_index += 1;
            state.files.push(File {
                index,
                data: file.data,
                settings: FileSettings {
                    visibility: FileVisibility::Public,
                },
            });
            indices.push(index);
        }
        Ok(ResponsePayload::FileIndices(indices))
    }

    /// Check the passcode prompt: no passcode set fails outright, and a
    /// scripted wrong entry is rejected by the card.
    fn confirm_passcode(state: &mut EmulatorState) -> Result<()> {
        let entered = state.entered_passcode.take();
        let Some(stored) = &state.passcode else {
            return Err(Error::PasscodeRequired);
        };
        if entered.is_some_and(|entered| entered != *stored) {
            return Err(Error::WrongUserCode(UserCodeType::Passcode));
        }
        Ok(())
    }

    /// Check the access-code prompt. A card without an access code accepts
    /// the write unchallenged.
    fn confirm_access_code(state: &mut EmulatorState) -> Result<()> {
        let entered = state.entered_access_code.take();
        let Some(stored) = &state.access_code else {
            return Ok(());
        };
        if entered.is_some_and(|entered| entered != *stored) {
            return Err(Error::WrongUserCode(UserCodeType::AccessCode));
        }
        Ok(())
    }

    /// Apply the monotonic-counter rule: a card that tracks a counter
    /// rejects writes that fail to increase it.
    fn advanced_counter(stored: Option<u32>, provided: Option<u32>) -> Result<Option<u32>> {
        match (stored, provided) {
            (Some(stored), Some(provided)) => {
                if provided <= stored {
                    return Err(Error::NonIncreasingCounter { stored, provided });
                }
                Ok(Some(provided))
            }
            (Some(_), None) => Err(Error::InvalidData("write counter required")),
            (None, provided) => Ok(provided),
        }
    }

    fn wallet_key(card_id: &CardId, index: u8) -> Bytes {
        let mut hasher = Sha256::new();
        hasher.update(b"wallet");
        hasher.update(card_id.as_str());
        hasher.update([index]);
        let digest = hasher.finalize();
        let mut key = Vec::with_capacity(33);
        key.push(0x02);
        key.extend_from_slice(&digest);
        Bytes::from(key)
    }
}

impl Default for CardEmulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardTransport for CardEmulator {
    async fn begin_session(&self) -> Result<()> {
        let state = self.state.lock();
        Self::check_field(&state)?;
        self.handshakes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn end_session(&self) {}

    async fn transmit(&self, request: CardRequest) -> Result<CardResponse> {
        let mut state = self.state.lock();
        Self::check_field(&state)?;

        if let Some(expected) = request.pinned_card_id {
            if expected != state.card_id {
                return Err(Error::CardMismatch {
                    expected,
                    found: state.card_id.clone(),
                });
            }
        }

        let payload = Self::execute(&mut state, request.command)?;
        Ok(CardResponse {
            card_id: state.card_id.clone(),
            payload,
        })
    }

    fn nfc_status(&self) -> NfcStatus {
        self.state.lock().nfc
    }

    fn bind_events(&self, dispatcher: Arc<NfcDispatcher>) {
        *self.events.lock() = Some(dispatcher);
    }
}

/// Builder for [`CardEmulator`] personalization.
#[derive(Debug)]
pub struct EmulatorBuilder {
    card_id: CardId,
    batch_id: String,
    firmware_version: FirmwareVersion,
    settings: CardSettings,
    supported_curves: Vec<EllipticCurve>,
    attestation: Attestation,
    nfc: NfcStatus,
    passcode: Option<String>,
    issuer_data: Bytes,
    issuer_data_signature: Bytes,
    issuer_counter: Option<u32>,
    user_counter: Option<u32>,
    default_wallet_signatures: Option<u32>,
    permanent_wallet_curves: Vec<EllipticCurve>,
}

impl Default for EmulatorBuilder {
    fn default() -> Self {
        Self {
            card_id: CardId::from("CB42000000001234"),
            batch_id: "0042".to_string(),
            firmware_version: "4.52r".parse().expect("static version string"),
            settings: CardSettings::default(),
            supported_curves: vec![EllipticCurve::Secp256k1, EllipticCurve::Ed25519],
            attestation: Attestation::skipped(),
            nfc: NfcStatus::available(),
            passcode: None,
            issuer_data: Bytes::new(),
            issuer_data_signature: Bytes::new(),
            issuer_counter: None,
            user_counter: None,
            default_wallet_signatures: None,
            permanent_wallet_curves: Vec::new(),
        }
    }
}

impl EmulatorBuilder {
    /// Set the card identifier.
    #[must_use]
    pub fn card_id(mut self, card_id: impl Into<CardId>) -> Self {
        self.card_id = card_id.into();
        self
    }

    /// Set the production batch.
    #[must_use]
    pub fn batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = batch_id.into();
        self
    }

    /// Set the firmware version.
    #[must_use]
    pub const fn firmware_version(mut self, version: FirmwareVersion) -> Self {
        self.firmware_version = version;
        self
    }

    /// Replace the personalization-time settings.
    #[must_use]
    pub const fn settings(mut self, settings: CardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the supported curve set. Must stay non-empty.
    #[must_use]
    pub fn supported_curves(mut self, curves: Vec<EllipticCurve>) -> Self {
        assert!(!curves.is_empty(), "supported curve set must not be empty");
        self.supported_curves = curves;
        self
    }

    /// Limit the wallet slot count.
    #[must_use]
    pub const fn max_wallets(mut self, max: u8) -> Self {
        self.settings.max_wallets_count = max;
        self
    }

    /// Set the attestation statuses reported on scan.
    #[must_use]
    pub const fn attestation(mut self, attestation: Attestation) -> Self {
        self.attestation = attestation;
        self
    }

    /// Start with the radio in the given state.
    #[must_use]
    pub const fn nfc_status(mut self, nfc: NfcStatus) -> Self {
        self.nfc = nfc;
        self
    }

    /// Personalize the card with a passcode already set.
    #[must_use]
    pub fn passcode(mut self, code: impl Into<String>) -> Self {
        self.passcode = Some(code.into());
        self
    }

    /// Preload issuer data, its signature, and the stored write counter.
    #[must_use]
    pub fn issuer_data(mut self, data: Bytes, signature: Bytes, counter: Option<u32>) -> Self {
        self.issuer_data = data;
        self.issuer_data_signature = signature;
        self.issuer_counter = counter;
        self
    }

    /// Track a counter on user data writes, starting at the given value.
    #[must_use]
    pub const fn user_counter(mut self, counter: u32) -> Self {
        self.user_counter = Some(counter);
        self
    }

    /// Give freshly created wallets a finite signature budget.
    #[must_use]
    pub const fn signature_budget(mut self, budget: u32) -> Self {
        self.default_wallet_signatures = Some(budget);
        self
    }

    /// Preload a permanent wallet on the given curve.
    #[must_use]
    pub fn with_permanent_wallet(mut self, curve: EllipticCurve) -> Self {
        self.permanent_wallet_curves.push(curve);
        self
    }

    /// Build the emulator.
    pub fn build(self) -> CardEmulator {
        let card_public_key = {
            let mut hasher = Sha512::new();
            hasher.update(b"card");
            hasher.update(self.card_id.as_str());
            let digest = hasher.finalize();
            let mut key = Vec::with_capacity(65);
            key.push(0x04);
            key.extend_from_slice(&digest[..64]);
            Bytes::from(key)
        };

        let mut state = EmulatorState {
            present: true,
            nfc: self.nfc,
            card_id: self.card_id,
            batch_id: self.batch_id,
            card_public_key,
            firmware_version: self.firmware_version,
            manufacturer: Manufacturer {
                name: "TAPCARD".to_string(),
            },
            issuer: Issuer {
                name: "TAPCARD ISSUER".to_string(),
                public_key: Bytes::from_static(&[0x03; 33]),
            },
            settings: self.settings,
            linked_terminal_status: LinkedTerminalStatus::None,
            supported_curves: self.supported_curves,
            attestation: self.attestation,
            health: None,
            remaining_signatures: None,
            wallets: Vec::new(),
            next_wallet_index: 0,
            default_wallet_signatures: self.default_wallet_signatures,
            access_code: None,
            passcode: self.passcode,
            entered_access_code: None,
            entered_passcode: None,
            issuer_data: self.issuer_data,
            issuer_data_signature: self.issuer_data_signature,
            issuer_counter: self.issuer_counter,
            issuer_extra_data: Bytes::new(),
            issuer_extra_starting_signature: None,
            issuer_extra_finalizing_signature: None,
            issuer_extra_counter: None,
            user_data: Bytes::new(),
            user_counter: self.user_counter,
            user_protected_data: None,
            user_protected_counter: None,
            files: Vec::new(),
            next_file_index: 0,
        };

        for curve in self.permanent_wallet_curves {
            let Ok(index) = u8::try_from(state.next_wallet_index) else {
                break;
            };
            state.next_wallet_index += 1;
            let public_key = CardEmulator::wallet_key(&state.card_id, index);
            let chain_code = curve.supports_derivation().then(|| {
                let mut hasher = Sha256::new();
                hasher.update(b"chain");
                hasher.update(&public_key);
                Bytes::copy_from_slice(&hasher.finalize())
            });
            state.wallets.push(WalletSlot {
                wallet: Wallet {
                    public_key,
                    chain_code,
                    curve,
                    settings: WalletSettings { is_permanent: true },
                    total_signed_hashes: Some(0),
                    remaining_signatures: state.default_wallet_signatures,
                    index,
                },
                signing_methods: vec![SigningMethod::SignHash],
            });
        }

        CardEmulator {
            state: Mutex::new(state),
            events: Mutex::new(None),
            handshakes: AtomicU32::new(0),
        }
    }
}
