use derive_more::Display;

/// Elliptic curves a card may host wallets on.
///
/// The set is closed: cards report their supported curves at scan time and
/// wallet creation is rejected for anything outside that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EllipticCurve {
    /// secp256k1
    #[display("secp256k1")]
    Secp256k1,
    /// NIST P-256
    #[display("secp256r1")]
    Secp256r1,
    /// Ed25519
    #[display("ed25519")]
    Ed25519,
    /// BLS12-381 G2
    #[display("bls12381_G2")]
    Bls12381G2,
    /// secp256k1 with BIP-340 (Schnorr) signatures
    #[display("bip0340")]
    Bip0340,
}

impl EllipticCurve {
    /// Whether wallets on this curve carry a chain code and accept
    /// derivation paths when signing.
    pub const fn supports_derivation(&self) -> bool {
        !matches!(self, Self::Bls12381G2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_support() {
        assert!(EllipticCurve::Secp256k1.supports_derivation());
        assert!(EllipticCurve::Ed25519.supports_derivation());
        assert!(!EllipticCurve::Bls12381G2.supports_derivation());
    }
}
