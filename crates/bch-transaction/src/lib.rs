//! BCH SDK - Transaction model, signing, and verification.
//!
//! Provides the immutable transaction entity model (outpoints, inputs,
//! outputs), the Bitcoin wire codec, consensus-shaped structural validation,
//! legacy and fork-id signature hashing, a signing orchestrator, and a spend
//! verifier that delegates script evaluation to an external interpreter.

pub mod codec;
pub mod outpoint;
pub mod input;
pub mod output;
pub mod transaction;
pub mod validation;
pub mod sighash;
pub mod signer;
pub mod verify;

mod error;
pub use error::TransactionError;
pub use outpoint::OutPoint;
pub use input::TxIn;
pub use output::TxOut;
pub use transaction::Transaction;
pub use signer::SignData;
pub use validation::ValidationRule;

#[cfg(test)]
mod tests;
