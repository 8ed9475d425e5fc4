//! BCH SDK - Script parsing and construction.
//!
//! Provides the Bitcoin Cash Script type, opcode definitions, script chunk
//! parsing, and helpers for building P2PKH locking and unlocking scripts.

pub mod script;
pub mod opcodes;
pub mod chunk;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
