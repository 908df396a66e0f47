//! # Algorithms Module
//!
//! CKB complete binary Merkle tree.

pub mod cbmt;

pub use cbmt::{
    build_proof, build_root, is_left, merge, multi_proof_root, parent, sibling,
    single_proof_root, transactions_root, CbmtProof,
};
