use bytes::Bytes;

use super::version::FirmwareVersion;

/// A file stored on the card, addressed by a stable per-card index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Stable per-card file index
    pub index: u8,
    /// Opaque file payload
    pub data: Bytes,
    /// Current file settings
    pub settings: FileSettings,
}

/// Mutable per-file settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSettings {
    /// Who may read the file
    pub visibility: FileVisibility,
}

/// File read visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVisibility {
    /// Readable by anyone presenting the card
    Public,
    /// Returned only when private files are explicitly requested
    Private,
}

/// A file payload to be written to the card.
///
/// The dual signatures cover multi-chunk integrity: `starting_signature`
/// commits to the payload length and counter before the first chunk,
/// `finalizing_signature` covers the assembled payload. Both are optional
/// for unsigned writes. The firmware bounds gate on which COS versions the
/// file is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    /// Opaque file payload
    pub data: Bytes,
    /// Signature committing to the write before the first chunk
    pub starting_signature: Option<Bytes>,
    /// Signature over the fully assembled payload
    pub finalizing_signature: Option<Bytes>,
    /// Write counter, when the issuer requires replay protection
    pub counter: Option<u32>,
    /// Whether writing this file requires passcode confirmation
    pub required_passcode: bool,
    /// Lowest firmware version the file is usable under
    pub min_firmware_version: Option<FirmwareVersion>,
    /// Highest firmware version the file is usable under
    pub max_firmware_version: Option<FirmwareVersion>,
}

impl FileToWrite {
    /// Unsigned public file write with no firmware bounds.
    pub const fn plain(data: Bytes) -> Self {
        Self {
            data,
            starting_signature: None,
            finalizing_signature: None,
            counter: None,
            required_passcode: false,
            min_firmware_version: None,
            max_firmware_version: None,
        }
    }
}

/// A settings change for one file, used by `change_file_settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSettingsChange {
    /// Index of the file to change
    pub index: u8,
    /// Settings to apply
    pub settings: FileSettings,
}
