use std::fmt;

use bytes::Bytes;
use derive_more::Display;

use super::attestation::Attestation;
use super::curve::EllipticCurve;
use super::version::FirmwareVersion;
use super::wallet::Wallet;

/// Unique identifier printed on and reported by a card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct CardId(String);

impl CardId {
    /// Wrap a card identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Full snapshot of a card as returned by a scan.
///
/// The client never holds an authoritative copy: every scan re-fetches this
/// from the card, and mutating operations return fresh confirmation values
/// instead of patching a cached snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Card identifier
    pub card_id: CardId,
    /// Production batch the card belongs to
    pub batch_id: String,
    /// Public key of the card itself (not of any wallet)
    pub card_public_key: Bytes,
    /// Version of the card operating firmware
    pub firmware_version: FirmwareVersion,
    /// Card manufacturer
    pub manufacturer: Manufacturer,
    /// Card issuer
    pub issuer: Issuer,
    /// Personalization-time capability flags
    pub settings: CardSettings,
    /// Whether this client instance is trusted to skip the security delay
    pub linked_terminal_status: LinkedTerminalStatus,
    /// Curves the card can host wallets on; never empty
    pub supported_curves: Vec<EllipticCurve>,
    /// Wallets currently present, ordered by slot index
    pub wallets: Vec<Wallet>,
    /// Self-certification status
    pub attestation: Attestation,
    /// Card health counter, when the firmware reports one
    pub health: Option<u32>,
    /// Card-wide remaining signature budget, when the firmware counts one
    pub remaining_signatures: Option<u32>,
}

/// Capability flags fixed when the card was personalized. Read-only from
/// the client's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSettings {
    /// Whether the access code may be set or changed
    pub is_setting_access_code_allowed: bool,
    /// Whether the passcode may be set or changed
    pub is_setting_passcode_allowed: bool,
    /// Whether the on-card file store is enabled
    pub is_files_allowed: bool,
    /// Whether HD (derived) signing is enabled
    pub is_hd_wallet_allowed: bool,
    /// Number of wallet slots on the card
    pub max_wallets_count: u8,
    /// Delay the card enforces before sensitive commands, in milliseconds
    pub security_delay_ms: u32,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            is_setting_access_code_allowed: true,
            is_setting_passcode_allowed: true,
            is_files_allowed: true,
            is_hd_wallet_allowed: true,
            max_wallets_count: 20,
            security_delay_ms: 15_000,
        }
    }
}

/// Whether the current client instance is the terminal the card trusts to
/// skip the security delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedTerminalStatus {
    /// This client is the linked terminal
    Current,
    /// Some other terminal is linked
    Other,
    /// No terminal is linked
    None,
}

/// Card manufacturer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    /// Manufacturer name
    pub name: String,
}

/// Card issuer identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Issuer {
    /// Issuer name
    pub name: String,
    /// Issuer public key used to verify issuer data signatures
    pub public_key: Bytes,
}

impl fmt::Debug for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issuer")
            .field("name", &self.name)
            .field("public_key", &hex::encode(&self.public_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_display() {
        let id = CardId::from("CB42000000001234");
        assert_eq!(id.to_string(), "CB42000000001234");
        assert_eq!(id.as_str(), "CB42000000001234");
    }
}
