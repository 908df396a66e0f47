//! # Multisig Verification
//!
//! Strict decoding of concatenated `r ‖ s ‖ v` records and M-of-N signer
//! checking against a [`ValidatorSet`].
//!
//! Checks run in this order, so cheap rejections never reach recovery:
//!
//! 1. blob length is a non-zero multiple of 65
//! 2. record count reaches the threshold
//! 3. each record recovers to a distinct validator

use std::collections::HashSet;

use shared_crypto::{recover_signer, CryptoError, RecoverableSignature, SIGNATURE_SIZE};
use shared_types::{to_hex, Address, Hash};

use crate::domain::{SignatureError, ValidatorSet};

/// Split a signature blob into records.
pub fn parse_signatures(blob: &[u8]) -> Result<Vec<RecoverableSignature>, SignatureError> {
    if blob.is_empty() || blob.len() % SIGNATURE_SIZE != 0 {
        return Err(SignatureError::InvalidLength { len: blob.len() });
    }
    blob.chunks_exact(SIGNATURE_SIZE)
        .map(|record| {
            RecoverableSignature::from_slice(record)
                .map_err(|_| SignatureError::InvalidLength { len: blob.len() })
        })
        .collect()
}

/// Recover every signer of `digest` and require a qualifying set.
///
/// Returns the signers in blob order.
pub fn verify_signatures(
    digest: &Hash,
    blob: &[u8],
    validators: &ValidatorSet,
) -> Result<Vec<Address>, SignatureError> {
    let signatures = parse_signatures(blob)?;
    let required = validators.multisig_threshold();
    if (signatures.len() as u64) < required {
        return Err(SignatureError::BelowThreshold {
            required,
            got: signatures.len() as u64,
        });
    }

    let mut seen = HashSet::with_capacity(signatures.len());
    let mut signers = Vec::with_capacity(signatures.len());
    for signature in &signatures {
        let signer = recover_signer(digest, signature).map_err(|e| match e {
            CryptoError::InvalidRecoveryId(v) => SignatureError::InvalidRecoveryId(v),
            _ => SignatureError::RecoveryFailed,
        })?;
        if !validators.contains(&signer) {
            return Err(SignatureError::UnknownSigner(to_hex(&signer)));
        }
        if !seen.insert(signer) {
            return Err(SignatureError::DuplicateSigner(to_hex(&signer)));
        }
        signers.push(signer);
    }

    if (signers.len() as u64) < required {
        return Err(SignatureError::BelowThreshold {
            required,
            got: signers.len() as u64,
        });
    }
    Ok(signers)
}
