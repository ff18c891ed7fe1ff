use derive_more::Display;

/// Verification status along one attestation dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AttestationStatus {
    /// Verification failed
    Failed,
    /// Verification completed with warnings
    Warning,
    /// Verification was skipped
    Skipped,
    /// Verified against locally cached trust data
    VerifiedOffline,
    /// Fully verified online
    Verified,
}

/// Card-reported self-certification across four independent trust
/// dimensions. No field implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attestation {
    /// Authenticity of the card key
    pub card_key_attestation: AttestationStatus,
    /// Authenticity of the wallet keys
    pub wallet_keys_attestation: AttestationStatus,
    /// Authenticity of the firmware
    pub firmware_attestation: AttestationStatus,
    /// Uniqueness of the card (no cloned identity seen)
    pub card_uniqueness_attestation: AttestationStatus,
}

impl Attestation {
    /// Attestation with every dimension skipped.
    pub const fn skipped() -> Self {
        Self {
            card_key_attestation: AttestationStatus::Skipped,
            wallet_keys_attestation: AttestationStatus::Skipped,
            firmware_attestation: AttestationStatus::Skipped,
            card_uniqueness_attestation: AttestationStatus::Skipped,
        }
    }
}
