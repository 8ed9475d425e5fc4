//! Tests for the bch-transaction crate.
//!
//! Covers wire parsing and serialization roundtrips, txid computation,
//! coinbase detection, structural validation rules, legacy and fork-id
//! signature hashing (including the BIP143 reference vector and replay
//! protection), signing, and spend verification.

use std::collections::HashMap;

use bch_primitives::chainhash::Hash;
use bch_primitives::ec::{PrivateKey, PublicKey, Signature};
use bch_primitives::hash::{hash160, sha256d};
use bch_script::opcodes::OP_CODESEPARATOR;
use bch_script::Script;

use crate::codec::{WireDecode, WireEncode};
use crate::input::{TxIn, FINAL_SEQUENCE};
use crate::outpoint::OutPoint;
use crate::output::TxOut;
use crate::sighash::{
    self, SCRIPT_ENABLE_REPLAY_PROTECTION, SCRIPT_ENABLE_SIGHASH_FORKID, SIGHASH_ALL,
    SIGHASH_ANYONECANPAY, SIGHASH_FORKID, SIGHASH_NONE, SIGHASH_SINGLE,
};
use crate::signer::{sign, sign_input, SignData};
use crate::transaction::Transaction;
use crate::validation::{self, validate, ValidationRule, MAX_MONEY};
use crate::verify::{verify, verify_with_transactions, ScriptInterpreter, SpendContext};
use crate::TransactionError;

// -----------------------------------------------------------------------
// Raw transaction hex test vectors
// -----------------------------------------------------------------------

/// A standard one-input, two-output transaction.
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// A coinbase transaction.
const COINBASE_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff17033f250d2f43555656452f2c903fb60859897700d02700ffffffff01d864a012000000001976a914d648686cf603c11850f39600e37312738accca8f88ac00000000";

/// A three-input, two-output transaction.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

/// The unsigned transaction from the BIP143 reference vector.
const BIP143_UNSIGNED_TX: &str = "0100000002fff7f7881a8099afa6940d42d1e7f6362bec38171ea3edf433541db4e4ad969f0000000000eeffffffef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a0100000000ffffffff02202cb206000000001976a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac9093510d000000001976a9143bde42dbee7e4dbe6a21b2d50ce2f0167faa815988ac11000000";

/// Expected fork-id preimage for input 1 of the BIP143 vector.
const BIP143_EXPECTED_PREIMAGE: &str = "0100000096b827c8483d4e9b96712b6713a7b68d6e8003a781feba36c31143470b4efd3752b0a642eea2fb7ae638c36f6252b6750293dbe574a806984b8e4d8548339a3bef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a010000001976a9141d0f172a0ecb48aee1be1f2687d2963ae33f71a188ac0046c32300000000ffffffff863ef3e1a92afbfdb97f31ad0fc7683ee943e9abcf2501590ff8f6551f47e5e51100000001000000";

/// A known compressed private key used by the signing tests.
const TEST_KEY_HEX: &str = "ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f";

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

fn p2pkh_script() -> Script {
    Script::from_hex("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap()
}

/// A structurally valid one-input, one-output transaction.
fn valid_tx() -> Transaction {
    Transaction::new(1, 0)
        .add_input(TxIn::new(
            OutPoint::new(Hash::new([0x11; 32]), 0),
            Script::new(),
            FINAL_SEQUENCE,
        ))
        .add_output(TxOut::new(1000, p2pkh_script()))
}

fn rule_of(err: TransactionError) -> ValidationRule {
    match err {
        TransactionError::Validation { rule, .. } => rule,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// -----------------------------------------------------------------------
// Transaction parsing and serialization
// -----------------------------------------------------------------------

#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");

    assert_eq!(tx.version, 1, "version should be 1");
    assert_eq!(tx.inputs.len(), 1, "should have 1 input");
    assert_eq!(tx.outputs.len(), 2, "should have 2 outputs");
    assert_eq!(tx.lock_time, 0, "lock time should be 0");
    assert_eq!(tx.outputs[0].amount, 1500);
    assert_eq!(tx.outputs[1].amount, 3498);
    assert_eq!(
        tx.outputs[1].locking_script.to_hex(),
        "76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac"
    );

    assert_eq!(
        tx.to_hex(),
        SOURCE_RAW_TX,
        "hex roundtrip should produce identical output"
    );
}

#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");

    assert_eq!(tx.version, 2, "version should be 2");
    assert_eq!(tx.inputs.len(), 3, "should have 3 inputs");
    assert_eq!(tx.outputs.len(), 2, "should have 2 outputs");
    assert_eq!(tx.lock_time, 103, "lock time should be 103 (0x67)");

    assert_eq!(
        tx.to_hex(),
        MULTI_INPUT_TX_HEX,
        "multi-input hex roundtrip should produce identical output"
    );
}

#[test]
fn test_from_bytes_roundtrip() {
    let original_bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    let tx = Transaction::from_bytes(&original_bytes).expect("should parse from bytes");
    assert_eq!(tx.to_bytes(), original_bytes);
    assert_eq!(tx.size(), original_bytes.len());
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    bytes.push(0x00);
    assert!(matches!(
        Transaction::from_bytes(&bytes),
        Err(TransactionError::MalformedEncoding(_))
    ));
}

#[test]
fn test_truncated_rejected() {
    let bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    for cut in [3, 10, 40, bytes.len() - 1] {
        assert!(
            Transaction::from_bytes(&bytes[..cut]).is_err(),
            "truncation at {} bytes should fail",
            cut
        );
    }
}

#[test]
fn test_bad_hex_rejected() {
    assert!(matches!(
        Transaction::from_hex("zz00"),
        Err(TransactionError::MalformedEncoding(_))
    ));
}

#[test]
fn test_input_source_txid_bytes() {
    // The outpoint hash carries the 32 raw wire bytes unreversed.
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let raw = hex::decode(SOURCE_RAW_TX).unwrap();
    assert_eq!(
        tx.inputs[0].outpoint.hash.as_bytes(),
        &raw[5..37],
        "outpoint hash bytes should match the raw tx"
    );
    assert_eq!(tx.inputs[0].outpoint.index, 3);
}

#[test]
fn test_txid_is_reversed_hash() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let txid = tx.txid();
    assert_eq!(txid.len(), 64, "txid should be 64 hex chars");

    let mut reversed = *tx.hash().as_bytes();
    reversed.reverse();
    assert_eq!(txid, hex::encode(reversed));

    // Identity is the double-SHA256 of the wire bytes.
    assert_eq!(*tx.hash().as_bytes(), sha256d(&tx.to_bytes()));
}

#[test]
fn test_is_coinbase() {
    let cb = Transaction::from_hex(COINBASE_TX_HEX).unwrap();
    assert!(cb.is_coinbase(), "should detect coinbase transaction");
    assert!(cb.inputs[0].outpoint.is_null());

    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    assert!(!tx.is_coinbase(), "normal tx should not be coinbase");
}

// -----------------------------------------------------------------------
// Builder and functional updates
// -----------------------------------------------------------------------

#[test]
fn test_builder_appends() {
    let tx = Transaction::new(2, 99)
        .add_input(TxIn::new(
            OutPoint::new(Hash::new([0xab; 32]), 1),
            Script::new(),
            0,
        ))
        .add_output(TxOut::new(546, p2pkh_script()))
        .add_output(TxOut::new(1000, p2pkh_script()));

    assert_eq!(tx.version, 2);
    assert_eq!(tx.lock_time, 99);
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.total_output_amount(), Some(1546));
}

#[test]
fn test_update_unlocking_script_leaves_original() {
    let tx = valid_tx();
    let updated = tx
        .update_unlocking_script(0, Script::from_hex("51").unwrap())
        .expect("in-range update should succeed");

    assert!(tx.inputs[0].unlocking_script.is_empty(), "original untouched");
    assert_eq!(updated.inputs[0].unlocking_script.to_hex(), "51");
    assert_ne!(tx.hash(), updated.hash());
}

#[test]
fn test_update_unlocking_script_out_of_range() {
    let tx = valid_tx();
    assert!(matches!(
        tx.update_unlocking_script(1, Script::new()),
        Err(TransactionError::SigningPrecondition(_))
    ));
}

// -----------------------------------------------------------------------
// Structural validation
// -----------------------------------------------------------------------

#[test]
fn test_validate_accepts_real_transactions() {
    for hex_str in [SOURCE_RAW_TX, COINBASE_TX_HEX, MULTI_INPUT_TX_HEX] {
        let tx = Transaction::from_hex(hex_str).unwrap();
        validate(&tx).expect("known-good transaction should validate");
    }
}

#[test]
fn test_validate_empty_inputs() {
    let tx = Transaction::new(1, 0).add_output(TxOut::new(1, p2pkh_script()));
    assert_eq!(rule_of(validate(&tx).unwrap_err()), ValidationRule::EmptyInputs);
}

#[test]
fn test_validate_empty_outputs() {
    let mut tx = valid_tx();
    tx.outputs.clear();
    assert_eq!(rule_of(validate(&tx).unwrap_err()), ValidationRule::EmptyOutputs);
}

#[test]
fn test_validate_oversized_transaction() {
    // ~2500 outputs with 400-byte scripts pushes the encoding past the
    // 1,000,000 byte cap while every script stays under the element limit.
    let mut tx = valid_tx();
    let big_script = Script::from_bytes(&[0x6a; 400]);
    for _ in 0..2500 {
        tx.outputs.push(TxOut::new(1, big_script.clone()));
    }
    assert!(tx.size() > validation::MAX_TX_SIZE);
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OversizedTransaction
    );
}

#[test]
fn test_validate_output_value_range() {
    let mut tx = valid_tx();
    tx.outputs[0].amount = -1;
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OutputValueOutOfRange
    );

    tx.outputs[0].amount = MAX_MONEY + 1;
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OutputValueOutOfRange
    );

    tx.outputs[0].amount = MAX_MONEY;
    validate(&tx).expect("MAX_MONEY itself is in range");
}

#[test]
fn test_validate_output_total_range() {
    // Two outputs each at the cap: no i64 overflow, but the sum exceeds it.
    let mut tx = valid_tx();
    tx.outputs[0].amount = MAX_MONEY;
    tx.outputs.push(TxOut::new(MAX_MONEY, p2pkh_script()));
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OutputTotalOutOfRange
    );
}

#[test]
fn test_validate_duplicate_inputs() {
    let mut tx = valid_tx();
    let dup = tx.inputs[0].clone();
    tx.inputs.push(dup);
    tx.inputs[1].sequence = 0;
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::DuplicateInputs
    );
}

#[test]
fn test_validate_coinbase_script_bounds() {
    let mut cb = Transaction::from_hex(COINBASE_TX_HEX).unwrap();
    cb.inputs[0].unlocking_script = Script::from_bytes(&[0u8; 1]);
    assert_eq!(
        rule_of(validate(&cb).unwrap_err()),
        ValidationRule::CoinbaseScriptLength
    );

    cb.inputs[0].unlocking_script = Script::from_bytes(&[0u8; 101]);
    assert_eq!(
        rule_of(validate(&cb).unwrap_err()),
        ValidationRule::CoinbaseScriptLength
    );

    cb.inputs[0].unlocking_script = Script::from_bytes(&[0u8; 100]);
    validate(&cb).expect("100-byte coinbase script is in bounds");
}

#[test]
fn test_validate_null_outpoint_in_normal_tx() {
    // A null outpoint is only legal in a one-input coinbase.
    let mut tx = valid_tx();
    tx.inputs.push(TxIn::new(OutPoint::null(), Script::new(), 0));
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::NullPreviousOutput
    );
}

#[test]
fn test_validate_locking_script_size() {
    // The locking script bound is strict: 519 passes, 520 fails.
    let mut tx = valid_tx();
    tx.outputs[0].locking_script = Script::from_bytes(&[0x6a; 519]);
    validate(&tx).expect("519-byte locking script should pass");

    tx.outputs[0].locking_script = Script::from_bytes(&[0x6a; 520]);
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OversizedLockingScript
    );
}

#[test]
fn test_validate_unlocking_script_size() {
    // The unlocking script bound is inclusive: 520 passes, 521 fails.
    let mut tx = valid_tx();
    tx.inputs[0].unlocking_script = Script::from_bytes(&[0x00; 520]);
    validate(&tx).expect("520-byte unlocking script should pass");

    tx.inputs[0].unlocking_script = Script::from_bytes(&[0x00; 521]);
    assert_eq!(
        rule_of(validate(&tx).unwrap_err()),
        ValidationRule::OversizedUnlockingScript
    );
}

// -----------------------------------------------------------------------
// Legacy sighash
// -----------------------------------------------------------------------

fn legacy_hash(tx: &Transaction, index: usize, script: &Script, sighash_type: u32) -> [u8; 32] {
    sighash::hash_for_signing(tx, index, script, sighash_type, 0, 0)
        .expect("legacy hash should succeed")
}

/// Decode a legacy preimage back into the transformed transaction it
/// serializes, dropping the trailing sighash type.
fn decode_preimage(preimage: &[u8]) -> (Transaction, u32) {
    let split = preimage.len() - 4;
    let tx = Transaction::from_bytes(&preimage[..split]).expect("preimage body should decode");
    let mut type_bytes = [0u8; 4];
    type_bytes.copy_from_slice(&preimage[split..]);
    (tx, u32::from_le_bytes(type_bytes))
}

#[test]
fn test_legacy_sentinel_for_out_of_range_input() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let hash = legacy_hash(&tx, 99, &p2pkh_script(), SIGHASH_ALL);
    assert_eq!(hash[0], 0x01);
    assert!(hash[1..].iter().all(|&b| b == 0), "sentinel tail is zero");
}

#[test]
fn test_legacy_sentinel_for_single_without_output() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    // Input 2 has no matching output index under SIGHASH_SINGLE.
    let hash = legacy_hash(&tx, 2, &p2pkh_script(), SIGHASH_SINGLE);
    assert_eq!(hash[0], 0x01);
    assert!(hash[1..].iter().all(|&b| b == 0));
}

#[test]
fn test_legacy_all_preimage_structure() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let script = p2pkh_script();
    let preimage = sighash::legacy_preimage(&tx, 1, &script, SIGHASH_ALL).unwrap();
    let (copy, sighash_type) = decode_preimage(&preimage);

    assert_eq!(sighash_type, SIGHASH_ALL);
    assert_eq!(copy.version, tx.version);
    assert_eq!(copy.lock_time, tx.lock_time);
    assert_eq!(copy.outputs, tx.outputs, "ALL keeps every output");
    assert_eq!(copy.inputs.len(), 3);

    // Every unlocking script is cleared except the signed input's, which
    // carries the committed script.
    assert!(copy.inputs[0].unlocking_script.is_empty());
    assert!(copy.inputs[2].unlocking_script.is_empty());
    assert_eq!(copy.inputs[1].unlocking_script, script);

    // Sequences are untouched under ALL.
    for (a, b) in copy.inputs.iter().zip(tx.inputs.iter()) {
        assert_eq!(a.sequence, b.sequence);
        assert_eq!(a.outpoint, b.outpoint);
    }
}

#[test]
fn test_legacy_none_clears_outputs_and_sequences() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let preimage = sighash::legacy_preimage(&tx, 0, &p2pkh_script(), SIGHASH_NONE).unwrap();
    let (copy, _) = decode_preimage(&preimage);

    assert!(copy.outputs.is_empty(), "NONE commits to no outputs");
    assert_eq!(copy.inputs[0].sequence, tx.inputs[0].sequence);
    assert_eq!(copy.inputs[1].sequence, 0);
    assert_eq!(copy.inputs[2].sequence, 0);
}

#[test]
fn test_legacy_single_truncates_with_placeholders() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let preimage = sighash::legacy_preimage(&tx, 1, &p2pkh_script(), SIGHASH_SINGLE).unwrap();
    let (copy, _) = decode_preimage(&preimage);

    assert_eq!(copy.outputs.len(), 2, "outputs truncated to the signed index");
    assert_eq!(copy.outputs[0].amount, -1, "lower index becomes a placeholder");
    assert!(copy.outputs[0].locking_script.is_empty());
    assert_eq!(copy.outputs[1], tx.outputs[1], "matching output kept intact");

    assert_eq!(copy.inputs[0].sequence, 0);
    assert_eq!(copy.inputs[1].sequence, tx.inputs[1].sequence);
    assert_eq!(copy.inputs[2].sequence, 0);
}

#[test]
fn test_legacy_anyone_can_pay_isolates_input() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let script = p2pkh_script();
    let preimage =
        sighash::legacy_preimage(&tx, 2, &script, SIGHASH_ALL | SIGHASH_ANYONECANPAY).unwrap();
    let (copy, _) = decode_preimage(&preimage);

    assert_eq!(copy.inputs.len(), 1, "ACP commits to the signed input only");
    assert_eq!(copy.inputs[0].outpoint, tx.inputs[2].outpoint);
    assert_eq!(copy.inputs[0].unlocking_script, script);
    assert_eq!(copy.outputs, tx.outputs);
}

#[test]
fn test_legacy_strips_code_separators() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let plain = p2pkh_script();

    let mut with_separator = Script::new();
    with_separator.append_opcodes(&[OP_CODESEPARATOR]).unwrap();
    let mut bytes = with_separator.to_bytes().to_vec();
    bytes.extend_from_slice(plain.to_bytes());
    let with_separator = Script::from_bytes(&bytes);

    let preimage = sighash::legacy_preimage(&tx, 0, &with_separator, SIGHASH_ALL).unwrap();
    let (copy, _) = decode_preimage(&preimage);
    assert_eq!(
        copy.inputs[0].unlocking_script, plain,
        "committed script should be the separator-free script"
    );

    assert_eq!(
        sha256d(&preimage),
        legacy_hash(&tx, 0, &plain, SIGHASH_ALL),
        "separator placement must not change the digest"
    );
}

#[test]
fn test_forkid_bit_without_flag_uses_legacy() {
    // The FORKID bit alone does not select the fork-id algorithm; the
    // script flags must enable it too.
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let script = p2pkh_script();
    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;

    let via_dispatch = sighash::hash_for_signing(&tx, 0, &script, sighash_type, 1500, 0).unwrap();
    let legacy = sha256d(&sighash::legacy_preimage(&tx, 0, &script, sighash_type).unwrap());
    assert_eq!(via_dispatch, legacy);

    let forkid = sighash::hash_for_signing(
        &tx,
        0,
        &script,
        sighash_type,
        1500,
        SCRIPT_ENABLE_SIGHASH_FORKID,
    )
    .unwrap();
    assert_ne!(via_dispatch, forkid, "the two algorithms must not collide");
}

// -----------------------------------------------------------------------
// Fork-id sighash
// -----------------------------------------------------------------------

#[test]
fn test_bip143_reference_preimage() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX).unwrap();
    let script_code =
        Script::from_hex("76a9141d0f172a0ecb48aee1be1f2687d2963ae33f71a188ac").unwrap();

    let preimage =
        sighash::forkid_preimage(&tx, 1, &script_code, SIGHASH_ALL, 600_000_000).unwrap();
    assert_eq!(hex::encode(&preimage), BIP143_EXPECTED_PREIMAGE);

    // Spot-check the cached digests inside the preimage.
    assert_eq!(
        hex::encode(&preimage[4..36]),
        "96b827c8483d4e9b96712b6713a7b68d6e8003a781feba36c31143470b4efd37",
        "hashPrevouts"
    );
    assert_eq!(
        hex::encode(&preimage[36..68]),
        "52b0a642eea2fb7ae638c36f6252b6750293dbe574a806984b8e4d8548339a3b",
        "hashSequence"
    );

    assert_eq!(
        hex::encode(sha256d(&preimage)),
        "c37af31116d1b27caf68aae9e3ac82f1477929014d5b917657d0eb49478cb670",
        "signature digest"
    );
}

#[test]
fn test_forkid_preimage_layout() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let script = p2pkh_script();
    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;
    let preimage = sighash::forkid_preimage(&tx, 0, &script, sighash_type, 1500).unwrap();

    // version(4) + hashPrevouts(32) + hashSequence(32) + outpoint(36) +
    // scriptCode(varint + script) + amount(8) + sequence(4) +
    // hashOutputs(32) + locktime(4) + sighashType(4)
    let expected_len = 4 + 32 + 32 + 36 + 1 + script.len() + 8 + 4 + 32 + 4 + 4;
    assert_eq!(preimage.len(), expected_len);

    let tail = &preimage[preimage.len() - 4..];
    assert_eq!(u32::from_le_bytes(tail.try_into().unwrap()), sighash_type);
}

#[test]
fn test_forkid_out_of_range_input_is_error() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let result = sighash::hash_for_signing(
        &tx,
        99,
        &p2pkh_script(),
        SIGHASH_ALL | SIGHASH_FORKID,
        0,
        SCRIPT_ENABLE_SIGHASH_FORKID,
    );
    assert!(matches!(
        result,
        Err(TransactionError::SigningPrecondition(_))
    ));
}

#[test]
fn test_forkid_single_out_of_range_zeroes_hash_outputs() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let preimage = sighash::forkid_preimage(
        &tx,
        2,
        &p2pkh_script(),
        SIGHASH_SINGLE | SIGHASH_FORKID,
        1000,
    )
    .unwrap();
    let hash_outputs_start = preimage.len() - 4 - 4 - 32;
    assert!(
        preimage[hash_outputs_start..hash_outputs_start + 32]
            .iter()
            .all(|&b| b == 0),
        "SINGLE with no matching output commits to a zero hashOutputs"
    );
}

#[test]
fn test_replay_protected_sighash_type() {
    assert_eq!(sighash::replay_protected_sighash_type(0x41), 0xffdead41);
    assert_eq!(sighash::replay_protected_sighash_type(0xc1), 0xffdeadc1);
    // The low byte survives untouched.
    assert_eq!(sighash::replay_protected_sighash_type(0x42) & 0xff, 0x42);
}

#[test]
fn test_replay_protection_changes_digest() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let script = p2pkh_script();
    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;

    let plain = sighash::hash_for_signing(
        &tx,
        0,
        &script,
        sighash_type,
        1500,
        SCRIPT_ENABLE_SIGHASH_FORKID,
    )
    .unwrap();
    let protected = sighash::hash_for_signing(
        &tx,
        0,
        &script,
        sighash_type,
        1500,
        SCRIPT_ENABLE_SIGHASH_FORKID | SCRIPT_ENABLE_REPLAY_PROTECTION,
    )
    .unwrap();
    assert_ne!(plain, protected);

    // The protected digest equals hashing with the perturbed type directly.
    let perturbed = sighash::replay_protected_sighash_type(sighash_type);
    let direct =
        sha256d(&sighash::forkid_preimage(&tx, 0, &script, perturbed, 1500).unwrap());
    assert_eq!(protected, direct);
}

#[test]
fn test_amount_is_committed() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let script = p2pkh_script();
    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;
    let a = sighash::forkid_preimage(&tx, 0, &script, sighash_type, 1500).unwrap();
    let b = sighash::forkid_preimage(&tx, 0, &script, sighash_type, 1501).unwrap();
    assert_ne!(a, b, "changing the spent amount must change the preimage");
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

fn test_key() -> PrivateKey {
    PrivateKey::from_hex(TEST_KEY_HEX).expect("test key hex should parse")
}

#[test]
fn test_sign_input_appends_type_byte() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let key = test_key();
    let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;

    let sig_bytes = sign_input(&tx, 0, &p2pkh_script(), sighash_type, 1500, &key)
        .expect("signing should succeed");

    assert_eq!(*sig_bytes.last().unwrap(), 0x41, "trailing sighash type byte");
    assert_eq!(sig_bytes[0], 0x30, "body is a DER sequence");

    // The DER body verifies against the fork-id digest.
    let sig = Signature::from_der(&sig_bytes[..sig_bytes.len() - 1]).unwrap();
    let digest = sighash::hash_for_signing(
        &tx,
        0,
        &p2pkh_script(),
        sighash_type,
        1500,
        SCRIPT_ENABLE_SIGHASH_FORKID,
    )
    .unwrap();
    assert!(key.public_key().verify(&digest, &sig));
}

#[test]
fn test_sign_input_rejects_uncompressed_key() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let key = test_key().with_compression(false);
    let result = sign_input(&tx, 0, &p2pkh_script(), SIGHASH_ALL | SIGHASH_FORKID, 1500, &key);
    assert!(matches!(
        result,
        Err(TransactionError::SigningPrecondition(_))
    ));
}

#[test]
fn test_sign_input_rejects_bad_index() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let result = sign_input(
        &tx,
        5,
        &p2pkh_script(),
        SIGHASH_ALL | SIGHASH_FORKID,
        1500,
        &test_key(),
    );
    assert!(matches!(
        result,
        Err(TransactionError::SigningPrecondition(_))
    ));
}

#[test]
fn test_sign_requires_entry_per_input() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let data = vec![SignData {
        previous_locking_script: p2pkh_script(),
        amount: 1000,
        private_key: test_key(),
    }];
    assert!(matches!(
        sign(&tx, &data),
        Err(TransactionError::SigningPrecondition(_))
    ));
}

#[test]
fn test_sign_builds_unlocking_scripts() {
    let key = test_key();
    let pubkey = key.public_key();
    let pkh = pubkey.hash160();
    let locking = Script::p2pkh_lock(&pkh);

    let tx = Transaction::new(1, 0)
        .add_input(TxIn::new(
            OutPoint::new(Hash::new([0x22; 32]), 0),
            Script::new(),
            FINAL_SEQUENCE,
        ))
        .add_output(TxOut::new(900, p2pkh_script()));

    let data = vec![SignData {
        previous_locking_script: locking,
        amount: 1000,
        private_key: key,
    }];
    let signed = sign(&tx, &data).expect("signing should succeed");

    // The original is untouched; the copy carries push(sig) push(pubkey).
    assert!(tx.inputs[0].unlocking_script.is_empty());
    let chunks = signed.inputs[0].unlocking_script.chunks().unwrap();
    assert_eq!(chunks.len(), 2);
    let sig_bytes = chunks[0].data.as_ref().unwrap();
    assert_eq!(*sig_bytes.last().unwrap(), 0x41);
    assert_eq!(chunks[1].data.as_ref().unwrap(), &pubkey.to_bytes());
}

// -----------------------------------------------------------------------
// Spend verification
// -----------------------------------------------------------------------

/// Interpreter test double that checks a pay-to-public-key-hash spend for
/// real: parses the unlocking pushes, matches the key hash, recomputes the
/// digest from the signature's trailing type byte, and verifies ECDSA.
struct P2pkhInterpreter;

impl ScriptInterpreter for P2pkhInterpreter {
    fn verify_scripts(
        &self,
        unlocking_script: &Script,
        locking_script: &Script,
        ctx: &SpendContext<'_>,
        flags: u32,
    ) -> bool {
        let chunks = match unlocking_script.chunks() {
            Ok(chunks) => chunks,
            Err(_) => return false,
        };
        if chunks.len() != 2 {
            return false;
        }
        let (sig_bytes, pubkey_bytes) = match (&chunks[0].data, &chunks[1].data) {
            (Some(sig), Some(pk)) => (sig, pk),
            _ => return false,
        };

        let pubkey = match PublicKey::from_bytes(pubkey_bytes) {
            Ok(pk) => pk,
            Err(_) => return false,
        };
        let expected_pkh = match locking_script.public_key_hash() {
            Ok(pkh) => pkh,
            Err(_) => return false,
        };
        if hash160(pubkey_bytes) != expected_pkh[..] {
            return false;
        }

        let (der, type_byte) = match sig_bytes.split_last() {
            Some((last, der)) => (der, *last),
            None => return false,
        };
        let sig = match Signature::from_der(der) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let digest = match sighash::hash_for_signing(
            ctx.tx,
            ctx.input_index,
            locking_script,
            type_byte as u32,
            ctx.amount,
            flags,
        ) {
            Ok(digest) => digest,
            Err(_) => return false,
        };
        pubkey.verify(&digest, &sig)
    }
}

/// Interpreter that rejects everything; used to prove coinbase inputs are
/// never evaluated.
struct RejectAll;

impl ScriptInterpreter for RejectAll {
    fn verify_scripts(&self, _: &Script, _: &Script, _: &SpendContext<'_>, _: u32) -> bool {
        false
    }
}

/// Build a funding transaction paying `amount` to the key, and the signed
/// transaction spending it.
fn funded_spend(key: &PrivateKey, amount: i64) -> (Transaction, Transaction) {
    let pkh = key.public_key().hash160();
    let locking = Script::p2pkh_lock(&pkh);

    let funding = Transaction::new(1, 0)
        .add_input(TxIn::new(
            OutPoint::new(Hash::new([0x33; 32]), 0),
            Script::from_hex("0051").unwrap(),
            FINAL_SEQUENCE,
        ))
        .add_output(TxOut::new(amount, locking.clone()));

    let spend = Transaction::new(1, 0)
        .add_input(TxIn::new(
            OutPoint::new(funding.hash(), 0),
            Script::new(),
            FINAL_SEQUENCE,
        ))
        .add_output(TxOut::new(amount - 200, p2pkh_script()));

    let data = vec![SignData {
        previous_locking_script: locking,
        amount,
        private_key: key.clone(),
    }];
    let signed = sign(&spend, &data).expect("signing should succeed");
    (funding, signed)
}

#[test]
fn test_verify_signed_spend() {
    let key = test_key();
    let (funding, signed) = funded_spend(&key, 5000);

    let mut previous_outputs = HashMap::new();
    previous_outputs.insert(signed.inputs[0].outpoint, funding.outputs[0].clone());

    verify(
        &signed,
        &previous_outputs,
        SCRIPT_ENABLE_SIGHASH_FORKID,
        &P2pkhInterpreter,
    )
    .expect("signed spend should verify");
}

#[test]
fn test_verify_reports_failing_input() {
    let key = test_key();
    let (funding, signed) = funded_spend(&key, 5000);

    // Corrupt one signature byte.
    let mut script_bytes = signed.inputs[0].unlocking_script.to_bytes().to_vec();
    script_bytes[10] ^= 0x01;
    let tampered = signed
        .update_unlocking_script(0, Script::from_bytes(&script_bytes))
        .unwrap();

    let mut previous_outputs = HashMap::new();
    previous_outputs.insert(tampered.inputs[0].outpoint, funding.outputs[0].clone());

    let result = verify(
        &tampered,
        &previous_outputs,
        SCRIPT_ENABLE_SIGHASH_FORKID,
        &P2pkhInterpreter,
    );
    assert!(matches!(
        result,
        Err(TransactionError::ScriptVerificationFailed { input_index: 0 })
    ));
}

#[test]
fn test_verify_unresolved_previous_output() {
    let key = test_key();
    let (_, signed) = funded_spend(&key, 5000);

    let empty = HashMap::new();
    let result = verify(
        &signed,
        &empty,
        SCRIPT_ENABLE_SIGHASH_FORKID,
        &P2pkhInterpreter,
    );
    match result {
        Err(TransactionError::UnresolvedPreviousOutput(op)) => {
            assert_eq!(op, signed.inputs[0].outpoint);
        }
        other => panic!("expected UnresolvedPreviousOutput, got {:?}", other),
    }
}

#[test]
fn test_verify_with_transactions() {
    let key = test_key();
    let (funding, signed) = funded_spend(&key, 5000);

    verify_with_transactions(
        &signed,
        &[funding],
        SCRIPT_ENABLE_SIGHASH_FORKID,
        &P2pkhInterpreter,
    )
    .expect("resolving from the funding transaction should verify");
}

#[test]
fn test_verify_skips_coinbase_inputs() {
    let cb = Transaction::from_hex(COINBASE_TX_HEX).unwrap();
    let empty = HashMap::new();
    verify(&cb, &empty, 0, &RejectAll)
        .expect("coinbase inputs are skipped, not evaluated");
}

// -----------------------------------------------------------------------
// Codec entities
// -----------------------------------------------------------------------

#[test]
fn test_entity_encodings_compose() {
    // Re-encoding each decoded entity reproduces the raw slices.
    let raw = hex::decode(SOURCE_RAW_TX).unwrap();
    let tx = Transaction::from_bytes(&raw).unwrap();

    let input_bytes = tx.inputs[0].to_wire_bytes();
    assert_eq!(&raw[5..5 + input_bytes.len()], &input_bytes[..]);

    let mut reader = bch_primitives::wire::WireReader::new(&input_bytes);
    assert_eq!(TxIn::read_from(&mut reader).unwrap(), tx.inputs[0]);
}
