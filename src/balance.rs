use std::collections::HashMap;

use crate::schemas::{Expense, Group, MemberId};

pub type Balance = HashMap<MemberId, f64>;

// How much each id is debited for an expense. Usable weights fully decide the
// split; otherwise the amount is divided evenly among the participants.
pub(crate) fn expense_shares(expense: &Expense) -> Vec<(&MemberId, f64)> {
    if expense.participants_ids.is_empty() {
        return vec![];
    }
    let mut weights: Vec<(&MemberId, f64)> =
        expense.weights.iter().map(|(id, w)| (id, *w)).collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    let total_weight: f64 = weights.iter().map(|(_, w)| w).sum();

    if !weights.is_empty() && total_weight > 0.0 {
        weights
            .into_iter()
            .map(|(id, weight)| (id, weight / total_weight * expense.amount))
            .collect()
    } else {
        let amount_per_participant = expense.split_amount();
        expense
            .participants_ids
            .iter()
            .map(|id| (id, amount_per_participant))
            .collect()
    }
}

pub fn compute_balances(group: &Group) -> Balance {
    let mut balance: Balance = group.users.iter().map(|u| (u.id.clone(), 0.0)).collect();

    for expense in &group.expenses {
        if expense.participants_ids.is_empty() {
            continue;
        }
        match balance.get_mut(&expense.payer_id) {
            Some(value) => *value += expense.amount,
            None => tracing::trace!(
                expense = %expense.id,
                payer = %expense.payer_id,
                "skipping credit for unknown payer"
            ),
        }
        for (id, share) in expense_shares(expense) {
            match balance.get_mut(id) {
                Some(value) => *value -= share,
                None => tracing::trace!(
                    expense = %expense.id,
                    participant = %id,
                    "skipping debit for unknown participant"
                ),
            }
        }
    }

    tracing::debug!(
        group = %group.id,
        members = group.users.len(),
        expenses = group.expenses.len(),
        "computed balances"
    );
    balance
}
