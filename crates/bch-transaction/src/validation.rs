//! Structural consensus validation for decoded transactions.
//!
//! `validate` checks shape only: counts, sizes, amount ranges, outpoint
//! uniqueness, and script length bounds. Script execution and previous
//! output lookups belong to spend verification, not here.

use std::collections::HashSet;
use std::fmt;

use crate::codec::WireEncode;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Maximum serialized transaction size in bytes.
pub const MAX_TX_SIZE: usize = 1_000_000;

/// Maximum total money supply in satoshis.
pub const MAX_MONEY: i64 = 2_100_000_000_000_000;

/// Maximum size of a locking or unlocking script element in bytes.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Minimum coinbase script length in bytes.
pub const MIN_COINBASE_SCRIPT_LEN: usize = 2;

/// Maximum coinbase script length in bytes.
pub const MAX_COINBASE_SCRIPT_LEN: usize = 100;

/// The structural rule a transaction violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationRule {
    /// The transaction has no inputs.
    EmptyInputs,
    /// The transaction has no outputs.
    EmptyOutputs,
    /// The wire encoding exceeds `MAX_TX_SIZE`.
    OversizedTransaction,
    /// An output amount is negative or above `MAX_MONEY`.
    OutputValueOutOfRange,
    /// The sum of output amounts overflows or exceeds `MAX_MONEY`.
    OutputTotalOutOfRange,
    /// Two inputs spend the same outpoint.
    DuplicateInputs,
    /// A coinbase script is outside the 2..=100 byte bounds.
    CoinbaseScriptLength,
    /// A non-coinbase input references the null outpoint.
    NullPreviousOutput,
    /// A locking script is `MAX_SCRIPT_ELEMENT_SIZE` bytes or longer.
    OversizedLockingScript,
    /// An unlocking script is longer than `MAX_SCRIPT_ELEMENT_SIZE` bytes.
    OversizedUnlockingScript,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationRule::EmptyInputs => "empty inputs",
            ValidationRule::EmptyOutputs => "empty outputs",
            ValidationRule::OversizedTransaction => "oversized transaction",
            ValidationRule::OutputValueOutOfRange => "output value out of range",
            ValidationRule::OutputTotalOutOfRange => "output total out of range",
            ValidationRule::DuplicateInputs => "duplicate inputs",
            ValidationRule::CoinbaseScriptLength => "coinbase script length",
            ValidationRule::NullPreviousOutput => "null previous output",
            ValidationRule::OversizedLockingScript => "oversized locking script",
            ValidationRule::OversizedUnlockingScript => "oversized unlocking script",
        };
        write!(f, "{}", name)
    }
}

fn violation(rule: ValidationRule, detail: String) -> TransactionError {
    TransactionError::Validation { rule, detail }
}

/// Check a transaction against the structural consensus rules.
///
/// # Arguments
/// * `tx` - The transaction to check.
///
/// # Returns
/// `Ok(())` if every rule passes, or a `Validation` error naming the first
/// rule violated.
pub fn validate(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.inputs.is_empty() {
        return Err(violation(
            ValidationRule::EmptyInputs,
            "transaction has no inputs".to_string(),
        ));
    }
    if tx.outputs.is_empty() {
        return Err(violation(
            ValidationRule::EmptyOutputs,
            "transaction has no outputs".to_string(),
        ));
    }

    let size = tx.to_wire_bytes().len();
    if size > MAX_TX_SIZE {
        return Err(violation(
            ValidationRule::OversizedTransaction,
            format!("{} bytes exceeds limit of {}", size, MAX_TX_SIZE),
        ));
    }

    let mut total: i64 = 0;
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.amount < 0 || output.amount > MAX_MONEY {
            return Err(violation(
                ValidationRule::OutputValueOutOfRange,
                format!("output {} has amount {}", i, output.amount),
            ));
        }
        total = total.checked_add(output.amount).ok_or_else(|| {
            violation(
                ValidationRule::OutputTotalOutOfRange,
                format!("output total overflows at output {}", i),
            )
        })?;
        if total > MAX_MONEY {
            return Err(violation(
                ValidationRule::OutputTotalOutOfRange,
                format!("output total {} exceeds limit of {}", total, MAX_MONEY),
            ));
        }
    }

    let distinct: HashSet<_> = tx.inputs.iter().map(|i| i.outpoint).collect();
    if distinct.len() != tx.inputs.len() {
        return Err(violation(
            ValidationRule::DuplicateInputs,
            "two inputs spend the same outpoint".to_string(),
        ));
    }

    if tx.is_coinbase() {
        let len = tx.inputs[0].unlocking_script.len();
        if !(MIN_COINBASE_SCRIPT_LEN..=MAX_COINBASE_SCRIPT_LEN).contains(&len) {
            return Err(violation(
                ValidationRule::CoinbaseScriptLength,
                format!("coinbase script is {} bytes", len),
            ));
        }
    } else {
        for (i, input) in tx.inputs.iter().enumerate() {
            if input.outpoint.is_null() {
                return Err(violation(
                    ValidationRule::NullPreviousOutput,
                    format!("input {} references the null outpoint", i),
                ));
            }
        }
    }

    for (i, output) in tx.outputs.iter().enumerate() {
        if output.locking_script.len() >= MAX_SCRIPT_ELEMENT_SIZE {
            return Err(violation(
                ValidationRule::OversizedLockingScript,
                format!(
                    "output {} locking script is {} bytes",
                    i,
                    output.locking_script.len()
                ),
            ));
        }
    }
    for (i, input) in tx.inputs.iter().enumerate() {
        if input.unlocking_script.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(violation(
                ValidationRule::OversizedUnlockingScript,
                format!(
                    "input {} unlocking script is {} bytes",
                    i,
                    input.unlocking_script.len()
                ),
            ));
        }
    }

    Ok(())
}
