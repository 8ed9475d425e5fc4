//! BCH SDK - Cryptographic primitives, hashing, and wire encoding.
//!
//! This crate provides the foundational building blocks for the BCH SDK:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
//! - Chain hash type for transaction and block identification
//! - Wire reader/writer and compact-size (VarInt) encoding
//! - Elliptic curve cryptography (secp256k1 keys and signatures)

pub mod hash;
pub mod chainhash;
pub mod wire;
pub mod ec;

mod error;
pub use error::PrimitivesError;
