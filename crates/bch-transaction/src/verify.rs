//! Spend verification against resolved previous outputs.
//!
//! Script evaluation itself lives behind the `ScriptInterpreter` trait so
//! callers can plug in a full interpreter without this crate depending on
//! one. This module resolves each input's previous output, builds the spend
//! context, and fails fast on the first input the interpreter rejects.

use std::collections::HashMap;

use bch_script::Script;

use crate::outpoint::OutPoint;
use crate::output::TxOut;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Context handed to the interpreter for one input's script evaluation.
pub struct SpendContext<'a> {
    /// The transaction being verified.
    pub tx: &'a Transaction,
    /// Index of the input whose scripts are being evaluated.
    pub input_index: usize,
    /// Amount of the previous output being spent in satoshis.
    pub amount: i64,
}

/// Evaluates an unlocking/locking script pair for one input.
pub trait ScriptInterpreter {
    /// Evaluate the script pair under the given context and flags.
    ///
    /// # Arguments
    /// * `unlocking_script` - The spending input's unlocking script.
    /// * `locking_script` - The locking script of the output being spent.
    /// * `ctx` - The transaction, input index, and spent amount.
    /// * `flags` - Verification flags.
    ///
    /// # Returns
    /// `true` if the scripts verify.
    fn verify_scripts(
        &self,
        unlocking_script: &Script,
        locking_script: &Script,
        ctx: &SpendContext<'_>,
        flags: u32,
    ) -> bool;
}

/// Verify every input of a transaction against its previous outputs.
///
/// Inputs spending the null outpoint (coinbase) are skipped. Verification
/// stops at the first failure.
///
/// # Arguments
/// * `tx` - The transaction to verify.
/// * `previous_outputs` - The outputs being spent, keyed by outpoint.
/// * `flags` - Verification flags passed through to the interpreter.
/// * `interpreter` - The script interpreter to delegate evaluation to.
///
/// # Returns
/// `Ok(())` if every input verifies, `UnresolvedPreviousOutput` if an
/// input's outpoint is missing from the map, or
/// `ScriptVerificationFailed` naming the first rejected input.
pub fn verify<I: ScriptInterpreter>(
    tx: &Transaction,
    previous_outputs: &HashMap<OutPoint, TxOut>,
    flags: u32,
    interpreter: &I,
) -> Result<(), TransactionError> {
    for (input_index, input) in tx.inputs.iter().enumerate() {
        if input.outpoint.is_null() {
            continue;
        }

        let prev = previous_outputs
            .get(&input.outpoint)
            .ok_or(TransactionError::UnresolvedPreviousOutput(input.outpoint))?;

        let ctx = SpendContext {
            tx,
            input_index,
            amount: prev.amount,
        };

        if !interpreter.verify_scripts(
            &input.unlocking_script,
            &prev.locking_script,
            &ctx,
            flags,
        ) {
            return Err(TransactionError::ScriptVerificationFailed { input_index });
        }
    }
    Ok(())
}

/// Verify a transaction by resolving previous outputs from the full
/// transactions that created them.
///
/// # Arguments
/// * `tx` - The transaction to verify.
/// * `previous_transactions` - Transactions whose outputs `tx` spends.
/// * `flags` - Verification flags passed through to the interpreter.
/// * `interpreter` - The script interpreter to delegate evaluation to.
///
/// # Returns
/// The same results as [`verify`].
pub fn verify_with_transactions<I: ScriptInterpreter>(
    tx: &Transaction,
    previous_transactions: &[Transaction],
    flags: u32,
    interpreter: &I,
) -> Result<(), TransactionError> {
    let mut previous_outputs = HashMap::new();
    for ptx in previous_transactions {
        let hash = ptx.hash();
        for (vout, output) in ptx.outputs.iter().enumerate() {
            previous_outputs.insert(OutPoint::new(hash, vout as u32), output.clone());
        }
    }
    verify(tx, &previous_outputs, flags, interpreter)
}
