//! Signature hash computation.
//!
//! Two algorithms share one entry point. The fork-id algorithm (BIP143
//! shaped) commits to the spent amount and uses cached prevout, sequence,
//! and output digests. The legacy algorithm serializes a transformed copy
//! of the transaction. Which one runs depends on both the sighash type's
//! FORKID bit and the caller's script flags; the type alone never selects
//! the fork-id path.
//!
//! When replay protection is enabled the fork-id path perturbs the sighash
//! type before hashing, so signatures made under it verify only against
//! verifiers applying the same perturbation.

use bch_primitives::hash::sha256d;
use bch_primitives::wire::WireWriter;
use bch_script::Script;

use crate::codec::WireEncode;
use crate::input::TxIn;
use crate::output::TxOut;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all outputs.
pub const SIGHASH_ALL: u32 = 0x01;
/// Sign no outputs.
pub const SIGHASH_NONE: u32 = 0x02;
/// Sign only the output at the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;
/// Use the fork-id algorithm (combined with a script flag).
pub const SIGHASH_FORKID: u32 = 0x40;
/// Commit only to the signed input.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;
/// The common `ALL | FORKID` combination.
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;
/// Mask selecting the base output mode from a sighash type.
pub const SIGHASH_MASK: u32 = 0x1f;

/// Script flag enabling the fork-id sighash algorithm.
pub const SCRIPT_ENABLE_SIGHASH_FORKID: u32 = 1 << 16;
/// Script flag enabling the replay-protection perturbation.
pub const SCRIPT_ENABLE_REPLAY_PROTECTION: u32 = 1 << 17;

/// Digest returned by the legacy algorithm for out-of-range index cases.
const SENTINEL_HASH: [u8; 32] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Compute the 32-byte digest an input's signature commits to.
///
/// Dispatches to the fork-id algorithm when the sighash type carries
/// `SIGHASH_FORKID` and `script_flags` enables it, otherwise to the legacy
/// algorithm.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input the signature is for.
/// * `prev_locking_script` - The locking script of the output being spent.
/// * `sighash_type` - The sighash type byte (with flags).
/// * `amount` - The amount of the output being spent in satoshis.
/// * `script_flags` - Verification flags controlling algorithm selection.
///
/// # Returns
/// The 32-byte signature digest. In the legacy algorithm an out-of-range
/// input index (or SIGHASH_SINGLE with no matching output) yields the
/// defined sentinel digest rather than an error. In the fork-id algorithm
/// an out-of-range input index is a `SigningPrecondition` error.
pub fn hash_for_signing(
    tx: &Transaction,
    input_index: usize,
    prev_locking_script: &Script,
    sighash_type: u32,
    amount: i64,
    script_flags: u32,
) -> Result<[u8; 32], TransactionError> {
    let forkid_enabled = script_flags & SCRIPT_ENABLE_SIGHASH_FORKID != 0;
    if sighash_type & SIGHASH_FORKID != 0 && forkid_enabled {
        let effective_type = if script_flags & SCRIPT_ENABLE_REPLAY_PROTECTION != 0 {
            replay_protected_sighash_type(sighash_type)
        } else {
            sighash_type
        };
        let preimage = forkid_preimage(tx, input_index, prev_locking_script, effective_type, amount)?;
        return Ok(sha256d(&preimage));
    }

    if input_index >= tx.inputs.len() {
        return Ok(SENTINEL_HASH);
    }
    let base = sighash_type & SIGHASH_MASK;
    if base == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Ok(SENTINEL_HASH);
    }

    let preimage = legacy_preimage(tx, input_index, prev_locking_script, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Perturb a sighash type for replay protection.
///
/// The bits above the low byte are replaced by `0xff0000 | (fork ^ 0xdead)`
/// where `fork` is the original value of those bits; the low byte is kept.
///
/// # Arguments
/// * `sighash_type` - The original sighash type.
///
/// # Returns
/// The perturbed sighash type. A plain `0x41` becomes `0xffdead41`.
pub fn replay_protected_sighash_type(sighash_type: u32) -> u32 {
    let fork_value = sighash_type >> 8;
    let new_fork = 0xff0000 | (fork_value ^ 0xdead);
    (new_fork << 8) | (sighash_type & 0xff)
}

// ---- legacy algorithm ----

/// Build the legacy signature preimage: the transformed transaction's wire
/// bytes followed by the 4-byte sighash type.
///
/// The caller must have handled the sentinel cases; here an out-of-range
/// input index is a `SigningPrecondition` error.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input the signature is for.
/// * `prev_locking_script` - The locking script of the output being spent.
/// * `sighash_type` - The sighash type byte (with flags).
///
/// # Returns
/// The preimage bytes to double-hash.
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_locking_script: &Script,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::SigningPrecondition(format!(
            "input index {} out of range for {} inputs",
            input_index,
            tx.inputs.len()
        )));
    }

    // OP_CODESEPARATOR is removed from the committed script, preserving
    // every other chunk's original push encoding.
    let script_code = prev_locking_script.without_code_separators()?;

    let mut copy = tx.clone();
    for input in copy.inputs.iter_mut() {
        input.unlocking_script = Script::new();
    }
    copy.inputs[input_index].unlocking_script = script_code;

    let base = sighash_type & SIGHASH_MASK;
    if base == SIGHASH_NONE {
        copy.outputs.clear();
        zero_other_sequences(&mut copy.inputs, input_index);
    } else if base == SIGHASH_SINGLE {
        // Keep outputs up to and including the matching index; lower
        // indices become placeholder outputs with amount -1 and an empty
        // script.
        copy.outputs.truncate(input_index + 1);
        for output in copy.outputs.iter_mut().take(input_index) {
            *output = TxOut::new(-1, Script::new());
        }
        zero_other_sequences(&mut copy.inputs, input_index);
    }

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let signed = copy.inputs.swap_remove(input_index);
        copy.inputs = vec![signed];
    }

    let mut writer = WireWriter::with_capacity(copy.size() + 4);
    copy.write_to(&mut writer);
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn zero_other_sequences(inputs: &mut [TxIn], keep_index: usize) {
    for (i, input) in inputs.iter_mut().enumerate() {
        if i != keep_index {
            input.sequence = 0;
        }
    }
}

// ---- fork-id algorithm ----

/// Build the fork-id signature preimage.
///
/// Layout: version, hashPrevouts, hashSequence, the signed input's
/// outpoint, the script code as var-bytes, the spent amount, the signed
/// input's sequence, hashOutputs, lock time, and the sighash type.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input the signature is for.
/// * `prev_locking_script` - The locking script of the output being spent.
/// * `sighash_type` - The (possibly perturbed) sighash type.
/// * `amount` - The amount of the output being spent in satoshis.
///
/// # Returns
/// The preimage bytes to double-hash, or `SigningPrecondition` if the
/// input index is out of range.
pub fn forkid_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_locking_script: &Script,
    sighash_type: u32,
    amount: i64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::SigningPrecondition(format!(
            "input index {} out of range for {} inputs",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let base = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let hash_prevouts = if anyone_can_pay {
        [0u8; 32]
    } else {
        hash_prevouts(&tx.inputs)
    };

    let hash_sequence = if anyone_can_pay || base == SIGHASH_SINGLE || base == SIGHASH_NONE {
        [0u8; 32]
    } else {
        hash_sequence(&tx.inputs)
    };

    let hash_outputs = if base != SIGHASH_SINGLE && base != SIGHASH_NONE {
        hash_outputs(&tx.outputs)
    } else if base == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        sha256d(&tx.outputs[input_index].to_wire_bytes())
    } else {
        [0u8; 32]
    };

    let script_bytes = prev_locking_script.to_bytes();
    let mut writer = WireWriter::with_capacity(156 + script_bytes.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    input.outpoint.write_to(&mut writer);
    writer.write_var_bytes(script_bytes);
    writer.write_u64_le(amount as u64);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn hash_prevouts(inputs: &[TxIn]) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(inputs.len() * 36);
    for input in inputs {
        input.outpoint.write_to(&mut writer);
    }
    sha256d(writer.as_bytes())
}

fn hash_sequence(inputs: &[TxIn]) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(inputs.len() * 4);
    for input in inputs {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

fn hash_outputs(outputs: &[TxOut]) -> [u8; 32] {
    let mut writer = WireWriter::new();
    for output in outputs {
        output.write_to(&mut writer);
    }
    sha256d(writer.as_bytes())
}
