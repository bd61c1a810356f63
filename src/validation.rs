//! Strict checks a caller can run before recording an expense.
//!
//! [`compute_balances`](crate::balance::compute_balances) stays lenient no
//! matter what these return.
use std::collections::HashSet;

use crate::error::{ResultTricount, ValidationError};
use crate::schemas::{Expense, Group};

pub fn validate_expense(group: &Group, expense: &Expense) -> ResultTricount<()> {
    if !expense.amount.is_finite() || expense.amount < 0.0 {
        return Err(ValidationError::InvalidAmount(expense.amount.to_string()));
    }
    if expense.currency != group.currency {
        return Err(ValidationError::CurrencyMismatch {
            expected: group.currency,
            found: expense.currency,
        });
    }
    if group.member(&expense.payer_id).is_none() {
        return Err(ValidationError::UnknownMember(expense.payer_id.clone()));
    }
    if let Some(id) = expense
        .participants_ids
        .iter()
        .find(|id| group.member(id).is_none())
    {
        return Err(ValidationError::UnknownMember(id.clone()));
    }

    let mut weights: Vec<_> = expense.weights.iter().collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (id, weight) in weights {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(ValidationError::InvalidWeight(id.clone()));
        }
        if !expense.participants_ids.contains(id) {
            return Err(ValidationError::WeightOutsideParticipants(id.clone()));
        }
    }
    Ok(())
}

pub fn validate_group(group: &Group) -> ResultTricount<()> {
    let mut seen = HashSet::new();
    for user in &group.users {
        if !seen.insert(user.id.as_str()) {
            return Err(ValidationError::DuplicateId(user.id.clone()));
        }
    }
    let mut seen = HashSet::new();
    for expense in &group.expenses {
        if !seen.insert(expense.id.as_str()) {
            return Err(ValidationError::DuplicateId(expense.id.clone()));
        }
        validate_expense(group, expense)?;
    }
    Ok(())
}
