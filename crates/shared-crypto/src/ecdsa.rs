//! # secp256k1 Signer Recovery
//!
//! Ethereum-compatible `ecrecover`: given a 32-byte prehash and an `(r, s, v)`
//! signature, recover the signer's 20-byte address.
//!
//! Only `v ∈ {27, 28}` is accepted; raw recovery ids `0`/`1` are rejected so
//! that a single signature has exactly one wire encoding.

use crate::{keccak256, CryptoError};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use shared_types::{Address, Hash};

/// Wire size of one `r ‖ s ‖ v` record.
pub const SIGNATURE_SIZE: usize = 65;

/// A recoverable ECDSA signature in Ethereum's `(r, s, v)` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// R component (32 bytes).
    pub r: [u8; 32],
    /// S component (32 bytes).
    pub s: [u8; 32],
    /// Recovery id, 27 or 28.
    pub v: u8,
}

impl RecoverableSignature {
    /// Parse a 65-byte `r ‖ s ‖ v` record.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(CryptoError::InvalidLength {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Serialize to the 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

/// Recover the signer address of `digest`.
pub fn recover_signer(
    digest: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| CryptoError::InvalidSignatureFormat)?;

    let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered))
}

/// Derive an Ethereum address from a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed prefix
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    match v {
        27 | 28 => RecoveryId::from_byte(v - 27).ok_or(CryptoError::InvalidRecoveryId(v)),
        _ => Err(CryptoError::InvalidRecoveryId(v)),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Signing helpers shared with dependent crates' tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// Generate a random validator key and its address.
    pub fn generate_keypair() -> (SigningKey, Address) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = address_from_pubkey(signing_key.verifying_key());
        (signing_key, address)
    }

    /// Sign a prehashed digest, producing `v ∈ {27, 28}`.
    pub fn sign(digest: &Hash, key: &SigningKey) -> RecoverableSignature {
        let (sig, recid) = key
            .sign_prehash_recoverable(digest)
            .expect("signing failed");
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        RecoverableSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        }
    }
}
