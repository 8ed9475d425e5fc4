//! Signing orchestration for pay-to-public-key-hash inputs.

use bch_primitives::ec::PrivateKey;
use bch_script::Script;

use crate::sighash::{
    hash_for_signing, SCRIPT_ENABLE_SIGHASH_FORKID, SIGHASH_ALL, SIGHASH_FORKID,
};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Everything needed to sign one input of a transaction.
#[derive(Clone)]
pub struct SignData {
    /// Locking script of the output being spent.
    pub previous_locking_script: Script,
    /// Amount of the output being spent in satoshis.
    pub amount: i64,
    /// Key authorized to spend the output.
    pub private_key: PrivateKey,
}

/// Produce the signature bytes for one input: a DER signature with the
/// sighash type byte appended.
///
/// The fork-id algorithm is always enabled here; the sighash type must
/// still carry `SIGHASH_FORKID` for the fork-id preimage to be used.
/// Uncompressed keys are rejected before any hashing.
///
/// # Arguments
/// * `tx` - The transaction to sign.
/// * `input_index` - Index of the input the signature is for.
/// * `previous_locking_script` - Locking script of the output being spent.
/// * `sighash_type` - The sighash type byte (with flags).
/// * `amount` - Amount of the output being spent in satoshis.
/// * `private_key` - The signing key; must be compressed.
///
/// # Returns
/// The DER signature with the low byte of the sighash type appended, or a
/// `SigningPrecondition` error.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    previous_locking_script: &Script,
    sighash_type: u32,
    amount: i64,
    private_key: &PrivateKey,
) -> Result<Vec<u8>, TransactionError> {
    if !private_key.is_compressed() {
        return Err(TransactionError::SigningPrecondition(
            "signing requires a compressed key".to_string(),
        ));
    }
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::SigningPrecondition(format!(
            "input index {} out of range for {} inputs",
            input_index,
            tx.inputs.len()
        )));
    }

    let digest = hash_for_signing(
        tx,
        input_index,
        previous_locking_script,
        sighash_type,
        amount,
        SCRIPT_ENABLE_SIGHASH_FORKID,
    )?;

    let signature = private_key.sign(&digest)?;
    let mut bytes = signature.to_der();
    bytes.push((sighash_type & 0xff) as u8);
    Ok(bytes)
}

/// Sign every input of a transaction with `SIGHASH_ALL | SIGHASH_FORKID`,
/// returning a fully signed copy.
///
/// All-or-nothing: a failure on any input leaves nothing partially applied
/// and the original transaction unchanged. One `SignData` entry is required
/// per input, in input order.
///
/// # Arguments
/// * `tx` - The unsigned transaction.
/// * `sign_data` - Per-input signing data, one entry per input.
///
/// # Returns
/// A signed copy of the transaction, or a `SigningPrecondition` error.
pub fn sign(tx: &Transaction, sign_data: &[SignData]) -> Result<Transaction, TransactionError> {
    if sign_data.len() != tx.inputs.len() {
        return Err(TransactionError::SigningPrecondition(format!(
            "{} signing entries for {} inputs",
            sign_data.len(),
            tx.inputs.len()
        )));
    }

    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;

    // The fork-id digest does not commit to unlocking scripts, so every
    // signature can be computed against the unsigned transaction before
    // any script is applied.
    let mut scripts = Vec::with_capacity(sign_data.len());
    for (i, data) in sign_data.iter().enumerate() {
        let sig_bytes = sign_input(
            tx,
            i,
            &data.previous_locking_script,
            sighash_type,
            data.amount,
            &data.private_key,
        )?;

        let mut script = Script::new();
        script.append_push_data(&sig_bytes)?;
        script.append_push_data(&data.private_key.public_key().to_bytes())?;
        scripts.push(script);
    }

    let mut signed = tx.clone();
    for (i, script) in scripts.into_iter().enumerate() {
        signed = signed.update_unlocking_script(i, script)?;
    }
    Ok(signed)
}
