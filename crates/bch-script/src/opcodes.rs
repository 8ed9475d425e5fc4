//! Bitcoin Script opcode constants and name conversions.
//!
//! Opcode values follow the standard Bitcoin protocol assignments. Push data
//! opcodes 0x01-0x4b (OP_DATA_1 through OP_DATA_75) embed the push length
//! directly in the opcode byte.

// ---- constants / push value ----

/// Push an empty byte array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// Push the next 1 byte of data.
pub const OP_DATA_1: u8 = 0x01;
/// Push the next 20 bytes of data (a Hash160 digest).
pub const OP_DATA_20: u8 = 0x14;
/// Push the next 32 bytes of data (a SHA256 digest).
pub const OP_DATA_32: u8 = 0x20;
/// Push the next 33 bytes of data (a compressed public key).
pub const OP_DATA_33: u8 = 0x21;
/// Push the next 65 bytes of data (an uncompressed public key).
pub const OP_DATA_65: u8 = 0x41;
/// Push the next 75 bytes of data (largest direct push).
pub const OP_DATA_75: u8 = 0x4b;
/// The next byte is the number of bytes to push.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1 onto the stack.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1 onto the stack.
pub const OP_1: u8 = 0x51;
/// Alias for OP_1.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 2 onto the stack.
pub const OP_2: u8 = 0x52;
/// Push the number 3 onto the stack.
pub const OP_3: u8 = 0x53;
/// Push the number 4 onto the stack.
pub const OP_4: u8 = 0x54;
/// Push the number 5 onto the stack.
pub const OP_5: u8 = 0x55;
/// Push the number 6 onto the stack.
pub const OP_6: u8 = 0x56;
/// Push the number 7 onto the stack.
pub const OP_7: u8 = 0x57;
/// Push the number 8 onto the stack.
pub const OP_8: u8 = 0x58;
/// Push the number 9 onto the stack.
pub const OP_9: u8 = 0x59;
/// Push the number 10 onto the stack.
pub const OP_10: u8 = 0x5a;
/// Push the number 11 onto the stack.
pub const OP_11: u8 = 0x5b;
/// Push the number 12 onto the stack.
pub const OP_12: u8 = 0x5c;
/// Push the number 13 onto the stack.
pub const OP_13: u8 = 0x5d;
/// Push the number 14 onto the stack.
pub const OP_14: u8 = 0x5e;
/// Push the number 15 onto the stack.
pub const OP_15: u8 = 0x5f;
/// Push the number 16 onto the stack.
pub const OP_16: u8 = 0x60;

// ---- flow control ----

/// Does nothing.
pub const OP_NOP: u8 = 0x61;
/// Execute the following statements if the top stack value is true.
pub const OP_IF: u8 = 0x63;
/// Execute the following statements if the top stack value is false.
pub const OP_NOTIF: u8 = 0x64;
/// Reserved; transaction is invalid if executed.
pub const OP_VERIF: u8 = 0x65;
/// Reserved; transaction is invalid if executed.
pub const OP_VERNOTIF: u8 = 0x66;
/// Execute if the preceding OP_IF/OP_NOTIF branch was not taken.
pub const OP_ELSE: u8 = 0x67;
/// End an OP_IF/OP_NOTIF/OP_ELSE block.
pub const OP_ENDIF: u8 = 0x68;
/// Fail the script if the top stack value is not true.
pub const OP_VERIFY: u8 = 0x69;
/// Mark the output as unspendable; remaining bytes are data.
pub const OP_RETURN: u8 = 0x6a;

// ---- stack ----

/// Move the top stack item to the alt stack.
pub const OP_TOALTSTACK: u8 = 0x6b;
/// Move the top alt stack item to the stack.
pub const OP_FROMALTSTACK: u8 = 0x6c;
/// Remove the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Copy the second-from-top stack item to the top.
pub const OP_OVER: u8 = 0x78;
/// Swap the top two stack items.
pub const OP_SWAP: u8 = 0x7c;

// ---- splice / bitwise ----

/// Push the length of the top stack item.
pub const OP_SIZE: u8 = 0x82;
/// Push true if the top two items are exactly equal.
pub const OP_EQUAL: u8 = 0x87;
/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;

// ---- arithmetic ----

/// Add one to the top stack item.
pub const OP_1ADD: u8 = 0x8b;
/// Subtract one from the top stack item.
pub const OP_1SUB: u8 = 0x8c;
/// Negate the top stack item.
pub const OP_NEGATE: u8 = 0x8f;
/// Absolute value of the top stack item.
pub const OP_ABS: u8 = 0x90;
/// Boolean negation of the top stack item.
pub const OP_NOT: u8 = 0x91;
/// Add the top two stack items.
pub const OP_ADD: u8 = 0x93;
/// Subtract the top stack item from the second.
pub const OP_SUB: u8 = 0x94;
/// Numeric equality of the top two stack items.
pub const OP_NUMEQUAL: u8 = 0x9c;
/// OP_NUMEQUAL followed by OP_VERIFY.
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
/// Numeric less-than comparison.
pub const OP_LESSTHAN: u8 = 0x9f;
/// Numeric greater-than comparison.
pub const OP_GREATERTHAN: u8 = 0xa0;
/// Minimum of the top two stack items.
pub const OP_MIN: u8 = 0xa3;
/// Maximum of the top two stack items.
pub const OP_MAX: u8 = 0xa4;

// ---- crypto ----

/// RIPEMD160 hash of the top stack item.
pub const OP_RIPEMD160: u8 = 0xa6;
/// SHA1 hash of the top stack item.
pub const OP_SHA1: u8 = 0xa7;
/// SHA256 hash of the top stack item.
pub const OP_SHA256: u8 = 0xa8;
/// RIPEMD160(SHA256(x)) of the top stack item.
pub const OP_HASH160: u8 = 0xa9;
/// SHA256(SHA256(x)) of the top stack item.
pub const OP_HASH256: u8 = 0xaa;
/// Marks the start of the signed script subset for subsequent signatures.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Verify an ECDSA signature against a public key and the signature hash.
pub const OP_CHECKSIG: u8 = 0xac;
/// OP_CHECKSIG followed by OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Verify M-of-N multisignature.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// OP_CHECKMULTISIG followed by OP_VERIFY.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// ---- locktime ----

/// Fail if the transaction locktime is below the top stack value.
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
/// Fail if the input sequence encodes a shorter relative locktime.
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;

/// Convert an opcode byte to its canonical OP_xxx name.
///
/// Push data opcodes 0x01-0x4b have no individual names and render as
/// "OP_DATA"; unassigned bytes render as "OP_UNKNOWN".
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// The canonical opcode name as a static string.
pub fn opcode_to_string(op: u8) -> &'static str {
    match op {
        OP_0 => "OP_FALSE",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_OVER => "OP_OVER",
        OP_SWAP => "OP_SWAP",
        OP_SIZE => "OP_SIZE",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        0x01..=0x4b => "OP_DATA",
        _ => "OP_UNKNOWN",
    }
}
