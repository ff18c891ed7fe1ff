use bytes::Bytes;
use coins_bip32::path::DerivationPath;

use crate::types::CardId;

/// Request to sign an ordered sequence of hashes with one wallet.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// Hashes to sign, in the order signatures are expected back
    pub hashes: Vec<Bytes>,
    /// Public key selecting the wallet
    pub wallet_public_key: Bytes,
    /// Optional derivation path below the wallet key
    pub derivation_path: Option<DerivationPath>,
}

/// Signatures produced by the card, one per input hash and in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// One signature per hash, order-preserving
    pub signatures: Vec<Bytes>,
}
