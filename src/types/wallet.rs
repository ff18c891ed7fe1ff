use bytes::Bytes;

use super::curve::EllipticCurve;

/// A key slot on the card.
///
/// `index` is assigned by the card at creation time and stays stable for the
/// lifetime of the wallet; it is never shared with another wallet on the
/// same card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    /// Public key of the wallet
    pub public_key: Bytes,
    /// BIP32 chain code; present only for derivation-capable curves
    pub chain_code: Option<Bytes>,
    /// Curve the wallet key lives on
    pub curve: EllipticCurve,
    /// Per-wallet policy fixed at creation time
    pub settings: WalletSettings,
    /// Total hashes signed by this wallet, when the firmware reports it
    pub total_signed_hashes: Option<u32>,
    /// Signatures the wallet may still produce, when the firmware counts them
    pub remaining_signatures: Option<u32>,
    /// Stable slot index, unique per card
    pub index: u8,
}

/// Wallet policy flags, read-only after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSettings {
    /// A permanent wallet can never be purged
    pub is_permanent: bool,
}

/// Per-wallet policy passed into wallet creation. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Whether the slot may be reused after a purge. Cards that hand out
    /// fresh indices for every creation and never recycle slots record the
    /// flag but ignore it.
    pub is_reusable: bool,
    /// Marks the wallet permanent; purging it will be rejected by the card
    pub prohibit_purge: bool,
    /// Curve to generate the wallet key on
    pub curve: EllipticCurve,
    /// Signing modes the wallet accepts; must not be empty. Hash signing
    /// requests are rejected for wallets created without [`SigningMethod::SignHash`].
    pub signing_methods: Vec<SigningMethod>,
}

impl WalletConfig {
    /// Plain purgeable hash-signing wallet on the given curve.
    pub fn new(curve: EllipticCurve) -> Self {
        Self {
            is_reusable: true,
            prohibit_purge: false,
            curve,
            signing_methods: vec![SigningMethod::SignHash],
        }
    }

    /// Mark the wallet permanent.
    #[must_use]
    pub const fn permanent(mut self) -> Self {
        self.prohibit_purge = true;
        self
    }
}

/// Command classes a wallet is personalized to accept for signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningMethod {
    /// Sign a prehashed digest
    SignHash,
    /// Sign raw data, hashed on the card
    SignRaw,
    /// Sign a digest countersigned by the issuer
    SignHashSignedByIssuer,
    /// Sign raw data countersigned by the issuer
    SignRawSignedByIssuer,
}
