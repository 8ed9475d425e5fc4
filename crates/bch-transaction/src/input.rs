//! Transaction input: an outpoint, an unlocking script, and a sequence.

use bch_primitives::wire::{WireReader, WireWriter};
use bch_script::{Script, ScriptChunk};

use crate::codec::{WireDecode, WireEncode};
use crate::outpoint::OutPoint;
use crate::validation::{ValidationRule, MAX_COINBASE_SCRIPT_LEN, MIN_COINBASE_SCRIPT_LEN};
use crate::TransactionError;

/// The sequence value that disables relative lock-time for an input.
pub const FINAL_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A transaction input spending one previous output.
///
/// # Wire format
///
/// | Field            | Size                    |
/// |------------------|-------------------------|
/// | outpoint         | 36 bytes                |
/// | unlocking script | VarInt length + bytes   |
/// | sequence         | 4 bytes (LE)            |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    /// The previous output being spent.
    pub outpoint: OutPoint,
    /// Script satisfying the previous output's locking script.
    pub unlocking_script: Script,
    /// Sequence number; `FINAL_SEQUENCE` marks the input as final.
    pub sequence: u32,
}

impl TxIn {
    /// Create an input with the given outpoint, unlocking script, and
    /// sequence.
    pub fn new(outpoint: OutPoint, unlocking_script: Script, sequence: u32) -> Self {
        TxIn {
            outpoint,
            unlocking_script,
            sequence,
        }
    }

    /// Create an input whose unlocking script is assembled from chunks.
    ///
    /// # Arguments
    /// * `outpoint` - The previous output being spent.
    /// * `chunks` - Parsed script chunks to re-encode as the unlocking script.
    /// * `sequence` - The sequence number.
    ///
    /// # Returns
    /// A new `TxIn`.
    pub fn from_chunks(outpoint: OutPoint, chunks: &[ScriptChunk], sequence: u32) -> Self {
        TxIn {
            outpoint,
            unlocking_script: Script::from_chunks(chunks),
            sequence,
        }
    }

    /// Create a coinbase input carrying the given script.
    ///
    /// The outpoint is the null sentinel and the sequence is final. The
    /// script length is checked against the consensus bounds for coinbase
    /// scripts.
    ///
    /// # Arguments
    /// * `script` - The coinbase script, between 2 and 100 bytes.
    ///
    /// # Returns
    /// The coinbase input, or a `Validation` error naming
    /// `CoinbaseScriptLength` when the script is out of bounds.
    pub fn coinbase(script: Script) -> Result<Self, TransactionError> {
        let len = script.len();
        if !(MIN_COINBASE_SCRIPT_LEN..=MAX_COINBASE_SCRIPT_LEN).contains(&len) {
            return Err(TransactionError::Validation {
                rule: ValidationRule::CoinbaseScriptLength,
                detail: format!("coinbase script is {} bytes", len),
            });
        }
        Ok(TxIn {
            outpoint: OutPoint::null(),
            unlocking_script: script,
            sequence: FINAL_SEQUENCE,
        })
    }

    /// Check whether this input's sequence disables further replacement.
    pub fn is_final(&self) -> bool {
        self.sequence == FINAL_SEQUENCE
    }
}

impl WireEncode for TxIn {
    fn write_to(&self, writer: &mut WireWriter) {
        self.outpoint.write_to(writer);
        writer.write_var_bytes(self.unlocking_script.to_bytes());
        writer.write_u32_le(self.sequence);
    }
}

impl WireDecode for TxIn {
    fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError> {
        let outpoint = OutPoint::read_from(reader)?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading unlocking script: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading input sequence: {}", e))
        })?;

        Ok(TxIn {
            outpoint,
            unlocking_script: Script::from_bytes(script_bytes),
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bch_primitives::chainhash::Hash;
    use bch_primitives::wire::WireReader;

    #[test]
    fn test_wire_roundtrip() {
        let input = TxIn::new(
            OutPoint::new(Hash::new([0x11; 32]), 1),
            Script::from_hex("483045022100aa").unwrap(),
            0xFFFF_FFFE,
        );
        let bytes = input.to_wire_bytes();
        let mut reader = WireReader::new(&bytes);
        let decoded = TxIn::read_from(&mut reader).unwrap();
        assert_eq!(decoded, input);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_coinbase_bounds() {
        assert!(TxIn::coinbase(Script::from_bytes(&[0u8; 1])).is_err());
        assert!(TxIn::coinbase(Script::from_bytes(&[0u8; 101])).is_err());

        let cb = TxIn::coinbase(Script::from_bytes(&[0u8; 2])).unwrap();
        assert!(cb.outpoint.is_null());
        assert!(cb.is_final());

        let cb = TxIn::coinbase(Script::from_bytes(&[0u8; 100])).unwrap();
        assert_eq!(cb.unlocking_script.len(), 100);
    }

    #[test]
    fn test_is_final() {
        let mut input = TxIn::new(OutPoint::null(), Script::new(), FINAL_SEQUENCE);
        assert!(input.is_final());
        input.sequence = 0;
        assert!(!input.is_final());
    }

    #[test]
    fn test_truncated_fails() {
        // Outpoint present, script length prefix claims more than remains.
        let mut bytes = vec![0u8; 36];
        bytes.push(0x20);
        bytes.extend_from_slice(&[0u8; 4]);
        let mut reader = WireReader::new(&bytes);
        assert!(matches!(
            TxIn::read_from(&mut reader),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }
}
