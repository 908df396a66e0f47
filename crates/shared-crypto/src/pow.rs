//! # Proof-of-Work
//!
//! CKB's Eaglesong PoW and compact difficulty target decoding.
//!
//! A header satisfies its PoW when
//! `eaglesong(content_hash(raw_header) ‖ nonce_le) ≤ target(compact_target)`,
//! with the Eaglesong output read as a big-endian integer.

use crate::{content_hash, CryptoError};
use primitive_types::U256;
use shared_types::Hash;

/// Serialized size of a full CKB header (raw header plus nonce).
pub const HEADER_SIZE: usize = 208;
/// Serialized size of the raw header (everything but the nonce).
pub const RAW_HEADER_SIZE: usize = 192;
/// Size of the message fed to Eaglesong.
pub const POW_MESSAGE_SIZE: usize = 48;

/// Eaglesong hash.
pub fn pow_hash(input: &[u8]) -> Hash {
    let mut output = [0u8; 32];
    eaglesong::eaglesong(input, &mut output);
    output
}

/// Build the Eaglesong input: `pow_hash ‖ nonce (u128 LE)`.
pub fn pow_message(raw_header_hash: &Hash, nonce: u128) -> [u8; POW_MESSAGE_SIZE] {
    let mut message = [0u8; POW_MESSAGE_SIZE];
    message[..32].copy_from_slice(raw_header_hash);
    message[32..].copy_from_slice(&nonce.to_le_bytes());
    message
}

/// Decode a compact target.
///
/// Returns `(target, overflow)`.
pub fn compact_to_target(compact: u32) -> (U256, bool) {
    let exponent = compact >> 24;
    let mut mantissa = U256::from(compact & 0x00ff_ffff);

    let target = if exponent <= 3 {
        mantissa >>= 8 * (3 - exponent) as usize;
        mantissa
    } else {
        let shift = 8 * (exponent - 3) as usize;
        if shift >= 256 {
            U256::zero()
        } else {
            mantissa << shift
        }
    };

    let overflow = !mantissa.is_zero() && exponent > 32;
    (target, overflow)
}

/// Check the PoW of a serialized 208-byte header.
///
/// Returns `Ok(false)` for a zero or overflowing target.
pub fn verify_header_pow(header: &[u8]) -> Result<bool, CryptoError> {
    if header.len() != HEADER_SIZE {
        return Err(CryptoError::InvalidLength {
            expected: HEADER_SIZE,
            actual: header.len(),
        });
    }

    let mut compact = [0u8; 4];
    compact.copy_from_slice(&header[4..8]);
    let (target, overflow) = compact_to_target(u32::from_le_bytes(compact));
    if target.is_zero() || overflow {
        return Ok(false);
    }

    let mut nonce = [0u8; 16];
    nonce.copy_from_slice(&header[RAW_HEADER_SIZE..]);
    let raw_hash = content_hash(&header[..RAW_HEADER_SIZE]);
    let output = pow_hash(&pow_message(&raw_hash, u128::from_le_bytes(nonce)));

    Ok(U256::from_big_endian(&output) <= target)
}
