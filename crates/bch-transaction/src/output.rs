//! Transaction output: an amount in satoshis and a locking script.

use bch_primitives::wire::{WireReader, WireWriter};
use bch_script::Script;

use crate::codec::{WireDecode, WireEncode};
use crate::TransactionError;

/// A transaction output assigning an amount to a locking script.
///
/// The amount is a signed 64-bit value. Negative amounts only appear in
/// signature-hash placeholder outputs; they are encoded on the wire as the
/// two's-complement unsigned value and rejected by structural validation.
///
/// # Wire format
///
/// | Field          | Size                  |
/// |----------------|-----------------------|
/// | amount         | 8 bytes (LE)          |
/// | locking script | VarInt length + bytes |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    /// The amount in satoshis.
    pub amount: i64,
    /// Script that must be satisfied to spend this output.
    pub locking_script: Script,
}

impl TxOut {
    /// Create an output with the given amount and locking script.
    pub fn new(amount: i64, locking_script: Script) -> Self {
        TxOut {
            amount,
            locking_script,
        }
    }

    /// Create an output paying the given amount to a public key hash.
    ///
    /// # Arguments
    /// * `amount` - The amount in satoshis.
    /// * `pkh` - The 20-byte hash160 of the recipient's public key.
    ///
    /// # Returns
    /// An output with the standard pay-to-public-key-hash locking script.
    pub fn to_public_key_hash(amount: i64, pkh: &[u8; 20]) -> Self {
        TxOut {
            amount,
            locking_script: Script::p2pkh_lock(pkh),
        }
    }
}

impl WireEncode for TxOut {
    fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u64_le(self.amount as u64);
        writer.write_var_bytes(self.locking_script.to_bytes());
    }
}

impl WireDecode for TxOut {
    fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError> {
        let amount = reader.read_u64_le().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading output amount: {}", e))
        })? as i64;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading locking script: {}", e))
        })?;

        Ok(TxOut {
            amount,
            locking_script: Script::from_bytes(script_bytes),
        })
    }
}
