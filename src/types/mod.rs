//! Value types passed across the card session client boundary.

mod attestation;
mod card;
mod curve;
mod file;
mod message;
mod user_code;
mod version;
mod wallet;

pub use attestation::{Attestation, AttestationStatus};
pub use card::{Card, CardId, CardSettings, Issuer, LinkedTerminalStatus, Manufacturer};
pub use curve::EllipticCurve;
pub use file::{File, FileSettings, FileSettingsChange, FileToWrite, FileVisibility};
pub use message::Message;
pub use user_code::{UserCode, UserCodeType};
pub use version::{FirmwareType, FirmwareVersion};
pub use wallet::{SigningMethod, Wallet, WalletConfig, WalletSettings};
