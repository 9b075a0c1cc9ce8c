//! Error types for the PAWA ledger core.

use thiserror::Error;

use crate::units::Amount;

/// Reasons a single ledger operation is rejected.
///
/// A rejected operation leaves balances, allowances and total supply
/// exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid sender: the null address cannot spend or approve")]
    InvalidSender,

    #[error("invalid destination: the null address cannot receive tokens")]
    InvalidDestination,

    #[error("invalid spender: the null address cannot be approved")]
    InvalidSpender,

    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: Amount, needed: Amount },

    #[error("insufficient allowance: have {allowance}, need {needed}")]
    InsufficientAllowance { allowance: Amount, needed: Amount },

    /// A balance or the total supply would leave the 256-bit range.
    #[error("amount out of range")]
    AmountOverflow,
}

/// Errors from parsing or formatting decimal token amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("invalid decimal amount: {0:?}")]
    InvalidFormat(String),

    #[error("too many fractional digits: at most {max}, got {got}")]
    TooManyDecimals { max: u8, got: usize },

    #[error("decimals {0} out of range (max 77)")]
    DecimalsOutOfRange(u8),

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// Errors in canonical encoding or decoding of events.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("unknown event kind: {0}")]
    UnknownKind(u64),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Errors found while verifying or replaying an audit log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("invalid sequence number: expected {expected}, got {got}")]
    InvalidSequence { expected: u64, got: u64 },

    #[error("broken chain at seq {seq}: prev does not match preceding event id")]
    BrokenChain { seq: u64 },

    #[error("event id mismatch at seq {seq}")]
    IdMismatch { seq: u64 },

    #[error("replay underflow at seq {seq}: debit exceeds replayed balance")]
    ReplayUnderflow { seq: u64 },

    #[error("replay overflow at seq {seq}")]
    ReplayOverflow { seq: u64 },
}
