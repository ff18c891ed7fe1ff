use bytes::Bytes;

use crate::types::CardId;

/// Issuer data read back from the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadIssuerDataResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// Issuer payload
    pub data: Bytes,
    /// Issuer signature over the payload
    pub signature: Bytes,
    /// Stored write counter, if the card tracks one
    pub counter: Option<u32>,
}

/// Request to write issuer data.
///
/// When the card tracks a counter, `counter` must strictly increase over the
/// stored value; the card rejects replays.
#[derive(Debug, Clone)]
pub struct WriteIssuerDataRequest {
    /// Issuer payload
    pub data: Bytes,
    /// Issuer signature over the payload
    pub signature: Bytes,
    /// Write counter for replay protection
    pub counter: Option<u32>,
}

/// Confirmation of an issuer data write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteIssuerDataResponse {
    /// Card that served the request
    pub card_id: CardId,
}

/// Issuer extra data read back from the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadIssuerExtraDataResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// Issuer payload
    pub data: Bytes,
    /// Signature that committed to the write
    pub starting_signature: Option<Bytes>,
    /// Signature over the assembled payload
    pub finalizing_signature: Option<Bytes>,
    /// Stored write counter, if the card tracks one
    pub counter: Option<u32>,
}

/// Request to write issuer extra data.
///
/// Extra data is chunked on the wire; `starting_signature` commits to the
/// payload length and counter before the first chunk and
/// `finalizing_signature` covers the assembled payload. The same
/// monotonic-counter replay rule applies as for plain issuer data.
#[derive(Debug, Clone)]
pub struct WriteIssuerExtraDataRequest {
    /// Issuer payload
    pub data: Bytes,
    /// Signature committing to the write before the first chunk
    pub starting_signature: Bytes,
    /// Signature over the fully assembled payload
    pub finalizing_signature: Bytes,
    /// Write counter for replay protection
    pub counter: Option<u32>,
}

/// Confirmation of an issuer extra data write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteIssuerExtraDataResponse {
    /// Card that served the request
    pub card_id: CardId,
}
