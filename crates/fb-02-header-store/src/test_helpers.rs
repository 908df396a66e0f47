//! Chain-building fixtures.
//!
//! Headers produced here carry no real proof-of-work; use them with
//! `HeaderStoreConfig::for_testing()`.

use crate::domain::StoredHeader;
use fb_01_view_parsers::{Header, HeaderView, RawHeader};
use shared_types::{BlockNumber, Hash};

/// A root header at `number` with a zero parent.
pub fn genesis(number: BlockNumber) -> Header {
    Header {
        raw: RawHeader {
            version: 0,
            compact_target: 0x2000_0000,
            timestamp: 1_600_000_000_000 + number * 8_000,
            number,
            epoch: number,
            transactions_root: [number as u8; 32],
            ..Default::default()
        },
        nonce: 0,
    }
}

/// The next header after `parent`. `salt` distinguishes competing forks.
pub fn child(parent: &Header, salt: u8) -> Header {
    let number = parent.raw.number + 1;
    let mut transactions_root = [number as u8; 32];
    transactions_root[31] = salt;
    Header {
        raw: RawHeader {
            number,
            parent_hash: parent.calc_hash(),
            timestamp: parent.raw.timestamp + 8_000,
            epoch: number,
            transactions_root,
            dao: [salt; 32],
            ..parent.raw.clone()
        },
        nonce: u128::from(salt),
    }
}

/// `count` headers extending `parent`.
pub fn extend(parent: &Header, count: usize, salt: u8) -> Vec<Header> {
    let mut out: Vec<Header> = Vec::with_capacity(count);
    for _ in 0..count {
        let next = child(out.last().unwrap_or(parent), salt);
        out.push(next);
    }
    out
}

/// `child` with an explicit transactions root.
pub fn child_with_tx_root(parent: &Header, transactions_root: Hash) -> Header {
    let mut header = child(parent, 0);
    header.raw.transactions_root = transactions_root;
    header
}

/// Decode owned headers the way the store receives them.
pub fn to_stored(headers: &[Header]) -> Vec<StoredHeader> {
    headers.iter().map(stored).collect()
}

/// Decode one owned header.
pub fn stored(header: &Header) -> StoredHeader {
    let bytes = header.to_bytes();
    let view = HeaderView::from_slice(&bytes).expect("fixture header is 208 bytes");
    StoredHeader::from_view(view)
}
