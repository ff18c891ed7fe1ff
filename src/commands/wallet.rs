use bytes::Bytes;

use crate::types::{CardId, Wallet, WalletConfig};

/// Request to create a wallet in a free slot.
#[derive(Debug, Clone)]
pub struct CreateWalletRequest {
    /// Per-wallet policy, immutable after creation
    pub config: WalletConfig,
}

/// Confirmation of a wallet creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWalletResponse {
    /// Card that served the request
    pub card_id: CardId,
    /// The freshly created wallet, including its assigned slot index
    pub wallet: Wallet,
}

/// Request to purge a wallet, selected by its public key.
#[derive(Debug, Clone)]
pub struct PurgeWalletRequest {
    /// Public key of the wallet to purge
    pub wallet_public_key: Bytes,
}

/// Confirmation of a wallet purge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeWalletResponse {
    /// Card that served the request
    pub card_id: CardId,
}
