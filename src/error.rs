use derive_more::Display;

use crate::types::{CardId, EllipticCurve, UserCodeType};

/// Result type for card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for card operations
///
/// Every operation either fully completes or fails with one of these; there
/// is no partial-success value and no automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device has no NFC hardware
    #[error("NFC is not supported on this device")]
    NfcUnsupported,

    /// NFC hardware is present but the radio is disabled
    #[error("NFC is disabled")]
    NfcDisabled,

    /// The card left the field or the user dismissed the interaction
    #[error("operation cancelled by the user")]
    UserCancelled,

    /// A different card was presented than the one the request was pinned to
    #[error("wrong card presented: expected {expected}, found {found}")]
    CardMismatch {
        /// The card the request was pinned to
        expected: CardId,
        /// The card actually presented
        found: CardId,
    },

    /// The requested curve is not in the card's supported set
    #[error("curve {0} is not supported by this card")]
    UnsupportedCurve(EllipticCurve),

    /// All wallet slots on the card are occupied
    #[error("all {max} wallet slots are occupied")]
    WalletSlotsExhausted {
        /// Slot count of the card
        max: u8,
    },

    /// Every wallet slot index in the card's lifetime has been handed out
    #[error("wallet slot indices exhausted")]
    WalletIndicesExhausted,

    /// No wallet with the given public key exists on the card
    #[error("wallet not found")]
    WalletNotFound,

    /// The wallet is personalized as permanent and cannot be purged
    #[error("wallet is permanent and cannot be purged")]
    PurgeForbidden,

    /// The wallet's signature counter does not cover the request
    #[error("no remaining signatures")]
    NoRemainingSignatures,

    /// A derivation path was given for a wallet whose curve has no chain code
    #[error("curve {0} does not support derivation")]
    DerivationNotSupported(EllipticCurve),

    /// The wallet's personalization does not permit hash signing
    #[error("wallet does not permit hash signing")]
    SigningMethodNotAllowed,

    /// HD (derived) signing is disabled in the card settings
    #[error("HD wallet derivation is disabled on this card")]
    HdWalletDisabled,

    /// Changing the given user code is disabled in the card settings
    #[error("setting the {0} is forbidden by the card settings")]
    SettingUserCodeForbidden(UserCodeType),

    /// The operation requires a passcode and none is set on the card
    #[error("a passcode is required for this operation")]
    PasscodeRequired,

    /// A presented user code did not match
    #[error("wrong {0}")]
    WrongUserCode(UserCodeType),

    /// The file store is disabled in the card settings
    #[error("file storage is not allowed on this card")]
    FilesNotAllowed,

    /// A file index referred to no file on the card
    #[error("file index {index} is out of range")]
    FileIndexOutOfRange {
        /// The offending index
        index: u8,
    },

    /// Every file index in the card's lifetime has been handed out
    #[error("file indices exhausted")]
    FileIndicesExhausted,

    /// The card firmware is outside the file's usable range
    #[error("file is not usable under firmware {firmware}")]
    FirmwareGate {
        /// Firmware version of the card
        firmware: crate::types::FirmwareVersion,
    },

    /// A write counter did not increase over the stored one
    #[error("counter {provided} does not increase over stored counter {stored}")]
    NonIncreasingCounter {
        /// Counter currently stored on the card
        stored: u32,
        /// Counter supplied with the write
        provided: u32,
    },

    /// The card could not be reached over the hardware channel
    #[error("card unreachable")]
    CardUnreachable,

    /// Malformed input or an unexpected response shape
    #[error("invalid data: {0}")]
    InvalidData(&'static str),
}

impl Error {
    /// Coarse classification of the failure, for rendering actionable
    /// guidance ("present the correct card" vs "enable NFC").
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NfcUnsupported | Self::NfcDisabled | Self::CardUnreachable => {
                ErrorKind::HardwareUnavailable
            }
            Self::UserCancelled => ErrorKind::UserCancelled,
            Self::CardMismatch { .. } => ErrorKind::CardMismatch,
            Self::UnsupportedCurve(_)
            | Self::PurgeForbidden
            | Self::DerivationNotSupported(_)
            | Self::SigningMethodNotAllowed
            | Self::HdWalletDisabled
            | Self::SettingUserCodeForbidden(_)
            | Self::PasscodeRequired
            | Self::WrongUserCode(_)
            | Self::FilesNotAllowed
            | Self::FirmwareGate { .. } => ErrorKind::PolicyViolation,
            Self::WalletSlotsExhausted { .. }
            | Self::WalletIndicesExhausted
            | Self::WalletNotFound
            | Self::NoRemainingSignatures
            | Self::FileIndexOutOfRange { .. }
            | Self::FileIndicesExhausted => ErrorKind::ResourceExhausted,
            Self::NonIncreasingCounter { .. } => ErrorKind::ReplayViolation,
            Self::InvalidData(_) => ErrorKind::InvalidData,
        }
    }
}

/// The six user-facing failure classes, plus a catch-all for malformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// NFC disabled or unsupported, or the card cannot be reached
    HardwareUnavailable,
    /// The session was abandoned before completion
    UserCancelled,
    /// The presented card differs from the pinned one
    CardMismatch,
    /// A settings flag forbids the requested action
    PolicyViolation,
    /// A slot, counter or index is exhausted or out of range
    ResourceExhausted,
    /// A write counter failed to increase
    ReplayViolation,
    /// Malformed input or response
    InvalidData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(Error::NfcDisabled.kind(), ErrorKind::HardwareUnavailable);
        assert_eq!(Error::UserCancelled.kind(), ErrorKind::UserCancelled);
        assert_eq!(
            Error::CardMismatch {
                expected: CardId::from("CB01"),
                found: CardId::from("CB02"),
            }
            .kind(),
            ErrorKind::CardMismatch
        );
        assert_eq!(Error::PurgeForbidden.kind(), ErrorKind::PolicyViolation);
        assert_eq!(
            Error::WalletSlotsExhausted { max: 1 }.kind(),
            ErrorKind::ResourceExhausted
        );
        assert_eq!(
            Error::NonIncreasingCounter {
                stored: 5,
                provided: 5,
            }
            .kind(),
            ErrorKind::ReplayViolation
        );
    }
}
