use bytes::Bytes;

use crate::types::CardId;

/// User data read back from the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadUserDataResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// Unprotected user payload
    pub data: Bytes,
    /// Passcode-protected user payload
    pub protected_data: Option<Bytes>,
    /// Write counter for the unprotected payload
    pub counter: Option<u32>,
    /// Write counter for the protected payload
    pub protected_counter: Option<u32>,
}

/// Request to write user data, protected or not depending on the command
/// it is wrapped in.
#[derive(Debug, Clone)]
pub struct WriteUserDataRequest {
    /// User payload
    pub data: Bytes,
    /// Write counter for replay protection
    pub counter: Option<u32>,
}

/// Confirmation of a user data write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteUserDataResponse {
    /// Card that served the request
    pub card_id: CardId,
}
