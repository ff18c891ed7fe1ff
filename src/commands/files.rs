use crate::types::{CardId, File, FileSettingsChange, FileToWrite};

/// Request to read files from the card store.
#[derive(Debug, Clone)]
pub struct ReadFilesRequest {
    /// Include files whose settings are Private
    pub read_private_files: bool,
    /// Restrict the read to exactly these indices; any unknown index fails
    /// the whole operation
    pub indices: Option<Vec<u8>>,
}

/// Files read from the card store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFilesResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// The selected files
    pub files: Vec<File>,
}

/// Request to write files to the card store.
#[derive(Debug, Clone)]
pub struct WriteFilesRequest {
    /// Files to write, in order
    pub files: Vec<FileToWrite>,
}

/// Confirmation of a file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFilesResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// Index assigned to each written file, in input order
    pub indices: Vec<u8>,
}

/// Request to delete files. `None` deletes every file on the card.
#[derive(Debug, Clone)]
pub struct DeleteFilesRequest {
    /// Indices to delete, or `None` for all
    pub indices: Option<Vec<u8>>,
}

/// Confirmation of a file deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFilesResponse {
    /// Card that served the request
    pub card_id: CardId,
}

/// Request to change per-file settings.
#[derive(Debug, Clone)]
pub struct ChangeFileSettingsRequest {
    /// Changes to apply, one per file
    pub changes: Vec<FileSettingsChange>,
}

/// Confirmation of a settings change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFileSettingsResponse {
    /// Card that served the request
    pub card_id: CardId,
}
