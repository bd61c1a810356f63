//! Shared-expense accounting: net balances of a group and the payments that
//! settle them.
pub mod balance;
pub mod error;
pub mod exchange;
pub mod schemas;
pub mod tolerance;
pub mod validation;

pub use balance::{compute_balances, Balance};
pub use error::{ResultTricount, ValidationError};
pub use exchange::{
    compute_settlements, compute_settlements_checked, compute_settlements_with,
    get_naive_settlements, Settlement,
};
pub use schemas::{Currency, Expense, Group, Member, MemberId, NewExpense};
pub use tolerance::Tolerance;
pub use validation::{validate_expense, validate_group};
