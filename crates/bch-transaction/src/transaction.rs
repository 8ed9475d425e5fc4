//! The transaction entity and its wire codec.
//!
//! A `Transaction` is treated as an immutable value: the builder methods
//! (`add_input`, `add_output`) consume and return the value, and
//! `update_unlocking_script` returns a modified copy, leaving the original
//! untouched. Identity is the double-SHA256 of the wire encoding.

use std::fmt;

use bch_primitives::chainhash::{double_hash_h, Hash};
use bch_primitives::wire::{WireReader, WireWriter};
use bch_script::Script;

use crate::codec::{read_sequence, write_sequence, WireDecode, WireEncode};
use crate::input::TxIn;
use crate::output::TxOut;
use crate::TransactionError;

/// A Bitcoin Cash transaction.
///
/// # Wire format
///
/// | Field     | Size                     |
/// |-----------|--------------------------|
/// | version   | 4 bytes (LE)             |
/// | inputs    | VarInt count + inputs    |
/// | outputs   | VarInt count + outputs   |
/// | lock_time | 4 bytes (LE)             |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Format version of the transaction.
    pub version: u32,
    /// The inputs spending previous outputs.
    pub inputs: Vec<TxIn>,
    /// The outputs created by this transaction.
    pub outputs: Vec<TxOut>,
    /// Earliest time or block height at which the transaction is final.
    pub lock_time: u32,
}

impl Transaction {
    /// Create an empty transaction with the given version and lock time.
    pub fn new(version: u32, lock_time: u32) -> Self {
        Transaction {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time,
        }
    }

    /// Parse a transaction from its hex-encoded wire bytes.
    ///
    /// # Arguments
    /// * `hex_str` - The hex string of the full wire encoding.
    ///
    /// # Returns
    /// The decoded transaction, or `MalformedEncoding` on bad hex,
    /// truncation, or trailing bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::MalformedEncoding(format!("decoding hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from its wire bytes.
    ///
    /// The entire slice must be consumed; trailing bytes are rejected.
    ///
    /// # Arguments
    /// * `bytes` - The full wire encoding.
    ///
    /// # Returns
    /// The decoded transaction, or `MalformedEncoding` on truncation or
    /// trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(TransactionError::MalformedEncoding(format!(
                "{} trailing bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Serialize the transaction to its wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_wire_bytes()
    }

    /// Serialize the transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the transaction hash: double-SHA256 of the wire bytes, in
    /// internal byte order.
    pub fn hash(&self) -> Hash {
        double_hash_h(&self.to_bytes())
    }

    /// Return the transaction identifier: the hash in display (reversed)
    /// hex order.
    pub fn txid(&self) -> String {
        self.hash().to_string()
    }

    /// Byte length of the wire encoding.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Check whether this is a coinbase transaction: exactly one input
    /// spending the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].outpoint.is_null()
    }

    /// Sum of all output amounts, or `None` if the sum overflows `i64`.
    pub fn total_output_amount(&self) -> Option<i64> {
        self.outputs
            .iter()
            .try_fold(0i64, |acc, out| acc.checked_add(out.amount))
    }

    /// Return a copy of this transaction with the input appended.
    pub fn add_input(mut self, input: TxIn) -> Self {
        self.inputs.push(input);
        self
    }

    /// Return a copy of this transaction with the output appended.
    pub fn add_output(mut self, output: TxOut) -> Self {
        self.outputs.push(output);
        self
    }

    /// Return a copy of this transaction with one input's unlocking script
    /// replaced. The original is left unchanged.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input to update.
    /// * `script` - The replacement unlocking script.
    ///
    /// # Returns
    /// The updated copy, or `SigningPrecondition` if the index is out of
    /// range.
    pub fn update_unlocking_script(
        &self,
        input_index: usize,
        script: Script,
    ) -> Result<Transaction, TransactionError> {
        if input_index >= self.inputs.len() {
            return Err(TransactionError::SigningPrecondition(format!(
                "input index {} out of range for {} inputs",
                input_index,
                self.inputs.len()
            )));
        }
        let mut tx = self.clone();
        tx.inputs[input_index].unlocking_script = script;
        Ok(tx)
    }
}

impl WireEncode for Transaction {
    fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u32_le(self.version);
        write_sequence(writer, &self.inputs);
        write_sequence(writer, &self.outputs);
        writer.write_u32_le(self.lock_time);
    }
}

impl WireDecode for Transaction {
    fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading version: {}", e))
        })?;

        let inputs = read_sequence(reader)?;
        let outputs = read_sequence(reader)?;

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::MalformedEncoding(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
