//! # Molecule Primitives
//!
//! Generic shapes of CKB's molecule encoding:
//!
//! | Shape | Layout |
//! |-------|--------|
//! | struct | fixed-size fields, concatenated |
//! | fixvec | `count: u32 LE ‖ items` (fixed item size) |
//! | table / dynvec | `total: u32 LE ‖ offsets: u32 LE × N ‖ payload` |
//! | option | empty = `None`, otherwise the inner value |
//!
//! Views validate the frame once at construction; accessors afterwards are
//! infallible slices into the original buffer.

use crate::ViewError;
use shared_types::{Address, Hash};

/// Size of a molecule length/offset word.
pub const WORD: usize = 4;

// =============================================================================
// SCALAR READERS
// =============================================================================

/// Read a little-endian `u32` word at `at`. Caller guarantees bounds.
pub(crate) fn word_at(data: &[u8], at: usize) -> usize {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[at..at + WORD]);
    u32::from_le_bytes(buf) as usize
}

fn exact<'a>(name: &'static str, data: &'a [u8], size: usize) -> Result<&'a [u8], ViewError> {
    if data.len() != size {
        return Err(ViewError::SizeMismatch {
            name,
            declared: size,
            actual: data.len(),
        });
    }
    Ok(data)
}

/// Decode a `Uint16` struct.
pub fn read_u16(name: &'static str, data: &[u8]) -> Result<u16, ViewError> {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(exact(name, data, 2)?);
    Ok(u16::from_le_bytes(buf))
}

/// Decode a `Uint32` struct.
pub fn read_u32(name: &'static str, data: &[u8]) -> Result<u32, ViewError> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(exact(name, data, 4)?);
    Ok(u32::from_le_bytes(buf))
}

/// Decode a `Uint64` struct.
pub fn read_u64(name: &'static str, data: &[u8]) -> Result<u64, ViewError> {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(exact(name, data, 8)?);
    Ok(u64::from_le_bytes(buf))
}

/// Decode a `Uint128` struct.
pub fn read_u128(name: &'static str, data: &[u8]) -> Result<u128, ViewError> {
    let mut buf = [0u8; 16];
    buf.copy_from_slice(exact(name, data, 16)?);
    Ok(u128::from_le_bytes(buf))
}

/// Decode a `Byte32` struct.
pub fn read_byte32(name: &'static str, data: &[u8]) -> Result<Hash, ViewError> {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(exact(name, data, 32)?);
    Ok(buf)
}

/// Decode a 20-byte address struct.
pub fn read_address(name: &'static str, data: &[u8]) -> Result<Address, ViewError> {
    let mut buf = [0u8; 20];
    buf.copy_from_slice(exact(name, data, 20)?);
    Ok(buf)
}

/// Decode a single `byte`.
pub fn read_byte(name: &'static str, data: &[u8]) -> Result<u8, ViewError> {
    Ok(exact(name, data, 1)?[0])
}

// =============================================================================
// TABLE / DYNVEC
// =============================================================================

/// Validated table (or dynvec) frame.
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    data: &'a [u8],
    count: usize,
}

impl<'a> TableView<'a> {
    /// Validate a table frame carrying at least `min_fields` fields.
    ///
    /// Extra trailing fields are tolerated so that newer encoders stay
    /// readable.
    pub fn parse(name: &'static str, data: &'a [u8], min_fields: usize) -> Result<Self, ViewError> {
        if data.len() < WORD {
            return Err(ViewError::Truncated {
                name,
                needed: WORD,
                actual: data.len(),
            });
        }
        let total = word_at(data, 0);
        if total != data.len() {
            return Err(ViewError::SizeMismatch {
                name,
                declared: total,
                actual: data.len(),
            });
        }

        let count = if total == WORD {
            0
        } else {
            if total < WORD * 2 {
                return Err(ViewError::Truncated {
                    name,
                    needed: WORD * 2,
                    actual: total,
                });
            }
            let first = word_at(data, WORD);
            if first % WORD != 0 || first < WORD * 2 || first > total {
                return Err(ViewError::InvalidOffset {
                    name,
                    slot: 0,
                    offset: first,
                });
            }
            first / WORD - 1
        };

        if count < min_fields {
            return Err(ViewError::FieldCountMismatch {
                name,
                expected: min_fields,
                actual: count,
            });
        }

        let mut previous = WORD * (count + 1);
        for slot in 0..count {
            let offset = word_at(data, WORD * (slot + 1));
            if offset < previous || offset > total {
                return Err(ViewError::InvalidOffset { name, slot, offset });
            }
            previous = offset;
        }

        Ok(Self { data, count })
    }

    /// Number of fields (or items, for a dynvec).
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Raw bytes of field `index`.
    pub fn field(&self, index: usize) -> Result<&'a [u8], ViewError> {
        if index >= self.count {
            return Err(ViewError::IndexOutOfRange {
                index,
                len: self.count,
            });
        }
        let start = word_at(self.data, WORD * (index + 1));
        let end = if index + 1 == self.count {
            self.data.len()
        } else {
            word_at(self.data, WORD * (index + 2))
        };
        Ok(&self.data[start..end])
    }

    /// Iterate over all fields.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.count).filter_map(move |i| self.field(i).ok())
    }

    /// The whole encoded buffer.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}

// =============================================================================
// FIXVEC
// =============================================================================

/// Validated fixvec frame.
#[derive(Clone, Copy, Debug)]
pub struct FixVecView<'a> {
    items: &'a [u8],
    item_size: usize,
    count: usize,
}

impl<'a> FixVecView<'a> {
    /// Validate a fixvec of `item_size`-byte items.
    pub fn parse(name: &'static str, data: &'a [u8], item_size: usize) -> Result<Self, ViewError> {
        if data.len() < WORD {
            return Err(ViewError::Truncated {
                name,
                needed: WORD,
                actual: data.len(),
            });
        }
        let count = word_at(data, 0);
        let declared = count
            .checked_mul(item_size)
            .and_then(|n| n.checked_add(WORD))
            .unwrap_or(usize::MAX);
        if declared != data.len() {
            return Err(ViewError::SizeMismatch {
                name,
                declared,
                actual: data.len(),
            });
        }
        Ok(Self {
            items: &data[WORD..],
            item_size,
            count,
        })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Raw bytes of item `index`.
    pub fn get(&self, index: usize) -> Result<&'a [u8], ViewError> {
        if index >= self.count {
            return Err(ViewError::IndexOutOfRange {
                index,
                len: self.count,
            });
        }
        let start = index * self.item_size;
        Ok(&self.items[start..start + self.item_size])
    }

    /// Iterate over items.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let item_size = self.item_size.max(1);
        self.items.chunks_exact(item_size).take(self.count)
    }

    /// Concatenated item bytes (for `Bytes`, the payload itself).
    pub fn raw_items(&self) -> &'a [u8] {
        self.items
    }
}

/// Decode a `Bytes` fixvec to its payload.
pub fn read_bytes<'a>(name: &'static str, data: &'a [u8]) -> Result<&'a [u8], ViewError> {
    Ok(FixVecView::parse(name, data, 1)?.raw_items())
}

/// Decode a `Byte32Vec` into owned hashes.
pub fn read_byte32_vec(name: &'static str, data: &[u8]) -> Result<Vec<Hash>, ViewError> {
    FixVecView::parse(name, data, 32)?
        .iter()
        .map(|item| read_byte32(name, item))
        .collect()
}

/// Decode a `Uint64Vec` into owned integers.
pub fn read_u64_vec(name: &'static str, data: &[u8]) -> Result<Vec<u64>, ViewError> {
    FixVecView::parse(name, data, 8)?
        .iter()
        .map(|item| read_u64(name, item))
        .collect()
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Encode a table (or dynvec) from already-encoded fields.
pub fn pack_table<F: AsRef<[u8]>>(fields: &[F]) -> Vec<u8> {
    let header = WORD * (fields.len() + 1);
    let total = header + fields.iter().map(|f| f.as_ref().len()).sum::<usize>();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    let mut offset = header;
    for field in fields {
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += field.as_ref().len();
    }
    for field in fields {
        out.extend_from_slice(field.as_ref());
    }
    out
}

/// Encode a fixvec from fixed-size items.
pub fn pack_fixvec<I: AsRef<[u8]>>(items: &[I]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD + items.iter().map(|i| i.as_ref().len()).sum::<usize>());
    out.extend_from_slice(&(items.len() as u32).to_le_bytes());
    for item in items {
        out.extend_from_slice(item.as_ref());
    }
    out
}

/// Encode a `Bytes` value.
pub fn pack_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD + data.len());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}
