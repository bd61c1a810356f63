//! Errors raised by the opt-in checks of the crate.
//!
//! The balance and settlement computations themselves never fail; only
//! [`validate_group`], [`validate_expense`] and [`compute_settlements_checked`]
//! return these.
//!
//!  [`validate_group`]: crate::validation::validate_group
//!  [`validate_expense`]: crate::validation::validate_expense
//!  [`compute_settlements_checked`]: crate::exchange::compute_settlements_checked
use thiserror::Error;

use crate::schemas::{Currency, MemberId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Balances do not sum to zero (sum is {sum})")]
    Unbalanced { sum: f64 },
    #[error("Balance of \"{0}\" is not a finite number")]
    NonFinite(MemberId),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    #[error("\"{0}\" is not a member of the group")]
    UnknownMember(MemberId),
    #[error("Invalid weight for \"{0}\"")]
    InvalidWeight(MemberId),
    #[error("\"{0}\" has a weight but is not a participant")]
    WeightOutsideParticipants(MemberId),
    #[error("\"{0}\" id used more than once")]
    DuplicateId(String),
}

pub type ResultTricount<T> = Result<T, ValidationError>;
