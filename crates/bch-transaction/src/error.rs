use crate::outpoint::OutPoint;
use crate::validation::ValidationRule;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Truncated or malformed bytes encountered during decode.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
    /// A named structural validation rule failed.
    #[error("validation failed ({rule}): {detail}")]
    Validation {
        /// The rule that was violated.
        rule: ValidationRule,
        /// Description of the offending value.
        detail: String,
    },
    /// A signing precondition was violated before any cryptographic work
    /// (uncompressed key, signing-data count mismatch, bad input index).
    #[error("signing precondition: {0}")]
    SigningPrecondition(String),
    /// Spend verification could not resolve an input's previous output.
    #[error("unresolved previous output {0}")]
    UnresolvedPreviousOutput(OutPoint),
    /// The script interpreter rejected an input's script pair.
    #[error("script verification failed at input {input_index}")]
    ScriptVerificationFailed {
        /// Index of the first input that failed.
        input_index: usize,
    },
    /// An unrecognized chain/genesis reference at the network boundary.
    #[error("unknown chain: {0}")]
    UnknownChain(String),
    /// An underlying script error (forwarded from `bch-script`).
    #[error("script error: {0}")]
    Script(#[from] bch_script::ScriptError),
    /// An underlying primitives error (forwarded from `bch-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),
}
