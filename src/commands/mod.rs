//! Typed request/response records, one module per operation group.
//!
//! A [`CardCommand`] travels to the card inside a
//! [`CardRequest`](crate::transport::CardRequest) envelope; the matching
//! [`ResponsePayload`] comes back inside a
//! [`CardResponse`](crate::transport::CardResponse). The public response
//! records the client hands out echo the serving card id on top of the
//! operation-specific fields.

mod access;
mod files;
mod issuer_data;
mod sign;
mod user_data;
mod wallet;

pub use access::SetUserCodeRequest;
pub use files::{
    ChangeFileSettingsRequest, ChangeFileSettingsResponse, DeleteFilesRequest,
    DeleteFilesResponse, ReadFilesRequest, ReadFilesResponse, WriteFilesRequest,
    WriteFilesResponse,
};
pub use issuer_data::{
    ReadIssuerDataResponse, ReadIssuerExtraDataResponse, WriteIssuerDataRequest,
    WriteIssuerDataResponse, WriteIssuerExtraDataRequest, WriteIssuerExtraDataResponse,
};
pub use sign::{SignRequest, SignResponse};
pub use user_data::{ReadUserDataResponse, WriteUserDataRequest, WriteUserDataResponse};
pub use wallet::{CreateWalletRequest, CreateWalletResponse, PurgeWalletRequest, PurgeWalletResponse};

use bytes::{Bytes, BytesMut};
use coins_bip32::path::DerivationPath;

use crate::types::{Card, File, Wallet};

pub(crate) fn derivation_path_to_bytes(path: &DerivationPath) -> Bytes {
    path.iter()
        .fold(BytesMut::new(), |mut bytes, component| {
            bytes.extend_from_slice(&component.to_be_bytes());
            bytes
        })
        .freeze()
}

/// The command set a card transport understands.
#[derive(Debug, Clone)]
pub enum CardCommand {
    /// Read the full card snapshot
    Scan,
    /// Sign a sequence of hashes with one wallet
    Sign(SignRequest),
    /// Read issuer data
    ReadIssuerData,
    /// Write issuer data
    WriteIssuerData(WriteIssuerDataRequest),
    /// Read issuer extra data (chunked on the wire)
    ReadIssuerExtraData,
    /// Write issuer extra data (chunked on the wire)
    WriteIssuerExtraData(WriteIssuerExtraDataRequest),
    /// Read user data and user protected data
    ReadUserData,
    /// Write user data (access code class)
    WriteUserData(WriteUserDataRequest),
    /// Write user protected data (passcode class)
    WriteUserProtectedData(WriteUserDataRequest),
    /// Create a wallet in a free slot
    CreateWallet(CreateWalletRequest),
    /// Purge a wallet
    PurgeWallet(PurgeWalletRequest),
    /// Set or change the access code
    SetAccessCode(SetUserCodeRequest),
    /// Set or change the passcode
    SetPasscode(SetUserCodeRequest),
    /// Read files from the card store
    ReadFiles(ReadFilesRequest),
    /// Write files to the card store
    WriteFiles(WriteFilesRequest),
    /// Delete files from the card store
    DeleteFiles(DeleteFilesRequest),
    /// Change per-file settings
    ChangeFileSettings(ChangeFileSettingsRequest),
}

/// Operation-specific response data, without the card id (the transport
/// envelope carries that).
#[derive(Debug, Clone)]
pub enum ResponsePayload {
    /// Full card snapshot
    Card(Box<Card>),
    /// One signature per requested hash, order-preserving
    Signatures(Vec<Bytes>),
    /// Issuer data with its signature and counter
    IssuerData {
        /// Issuer payload
        data: Bytes,
        /// Issuer signature over the payload
        signature: Bytes,
        /// Stored write counter, if the card tracks one
        counter: Option<u32>,
    },
    /// Issuer extra data with its chunking signatures and counter
    IssuerExtraData {
        /// Issuer payload
        data: Bytes,
        /// Signature committing to the write
        starting_signature: Option<Bytes>,
        /// Signature over the assembled payload
        finalizing_signature: Option<Bytes>,
        /// Stored write counter, if the card tracks one
        counter: Option<u32>,
    },
    /// User data and user protected data
    UserData {
        /// Unprotected user payload
        data: Bytes,
        /// Passcode-protected user payload
        protected_data: Option<Bytes>,
        /// Write counter for the unprotected payload
        counter: Option<u32>,
        /// Write counter for the protected payload
        protected_counter: Option<u32>,
    },
    /// The freshly created wallet
    Wallet(Wallet),
    /// Files read from the card store
    Files(Vec<File>),
    /// Indices assigned to freshly written files
    FileIndices(Vec<u8>),
    /// Confirmation with no operation-specific fields
    Done,
}
