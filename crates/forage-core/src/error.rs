//! Framework error type.
//!
//! The simulation hot path is infallible by design: degenerate arithmetic is
//! epsilon-guarded, sensing queries return `Option`, and collision budgets
//! surface through metrics counters.  Errors exist only for construction and
//! validation, so the variants here are few.  Sub-crates may define their own
//! error enums and convert them into `ForageError` via `From` impls.

use thiserror::Error;

/// The top-level error type for `forage-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum ForageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{what} count {got} exceeds the {max} addressable ids")]
    CapacityExceeded {
        what: &'static str,
        got:  usize,
        max:  usize,
    },
}

/// Shorthand result type for all `forage-*` crates.
pub type ForageResult<T> = Result<T, ForageError>;
