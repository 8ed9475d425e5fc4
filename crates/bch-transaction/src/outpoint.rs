//! Reference to a specific output of a previous transaction.
//!
//! An outpoint pairs the 32-byte transaction identifier (in internal byte
//! order) with the output index. The all-zero hash with index `0xFFFFFFFF`
//! is the null sentinel that marks a coinbase input.

use std::fmt;

use bch_primitives::chainhash::Hash;
use bch_primitives::wire::{WireReader, WireWriter};

use crate::codec::{WireDecode, WireEncode};
use crate::TransactionError;

/// The output index reserved for the null (coinbase) outpoint.
pub const NULL_INDEX: u32 = 0xFFFF_FFFF;

/// A reference to a previous transaction output: txid plus output index.
///
/// The `hash` is stored in internal (little-endian) byte order, the order
/// used on the wire and for hashing. The display/lookup identifier is the
/// byte-reversed form.
///
/// # Wire format
///
/// | Field | Size          |
/// |-------|---------------|
/// | hash  | 32 bytes      |
/// | index | 4 bytes (LE)  |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutPoint {
    /// The identifier of the transaction holding the output being spent.
    pub hash: Hash,
    /// Index of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    /// Create an outpoint from a transaction hash and output index.
    ///
    /// # Arguments
    /// * `hash` - The previous transaction's hash in internal byte order.
    /// * `index` - The output index within that transaction.
    ///
    /// # Returns
    /// A new `OutPoint`.
    pub fn new(hash: Hash, index: u32) -> Self {
        OutPoint { hash, index }
    }

    /// Create the null outpoint used by coinbase inputs.
    ///
    /// # Returns
    /// An `OutPoint` with an all-zero hash and index `0xFFFFFFFF`.
    pub fn null() -> Self {
        OutPoint {
            hash: Hash::default(),
            index: NULL_INDEX,
        }
    }

    /// Check whether this is the null (coinbase) sentinel outpoint.
    ///
    /// # Returns
    /// `true` if the hash is all zeros and the index is `0xFFFFFFFF`.
    pub fn is_null(&self) -> bool {
        self.index == NULL_INDEX && self.hash.is_zero()
    }

    /// Return the referenced transaction's identifier in display order.
    ///
    /// # Returns
    /// The byte-reversed hex string of the hash.
    pub fn txid(&self) -> String {
        self.hash.to_string()
    }
}

impl WireEncode for OutPoint {
    fn write_to(&self, writer: &mut WireWriter) {
        writer.write_bytes(self.hash.as_bytes());
        writer.write_u32_le(self.index);
    }
}

impl WireDecode for OutPoint {
    fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError> {
        let hash_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading outpoint hash: {}", e))
        })?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(hash_bytes);

        let index = reader.read_u32_le().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading outpoint index: {}", e))
        })?;

        Ok(OutPoint {
            hash: Hash::new(arr),
            index,
        })
    }
}

impl fmt::Display for OutPoint {
    /// Display as `txid:index` with the txid in display (reversed) order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}
