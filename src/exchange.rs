use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashSet};

use serde::{Deserialize, Serialize};

use crate::balance::{expense_shares, Balance};
use crate::error::{ResultTricount, ValidationError};
use crate::schemas::{Group, MemberId};
use crate::tolerance::Tolerance;

/// `debtor` owes `creditor` the (positive) `amount`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Settlement {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub amount: f64,
}

// What a single member still has to pay or receive. Ordered so that a max-heap
// pops the largest amount first and, among equal amounts, the smallest id.
#[derive(Clone, Debug)]
struct Outstanding {
    id: MemberId,
    amount: f64,
}

impl Ord for Outstanding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount
            .total_cmp(&other.amount)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Outstanding {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outstanding {}

/// Greedy debt simplification: the largest debtor always pays the largest
/// creditor until one of them is settled.
///
/// Produces at most `n - 1` settlements for `n` non-zero balances, and the
/// same ordered output for the same input. If the balances do not sum to zero
/// the remainder is left unsettled; use [`compute_settlements_checked`] to
/// reject such input instead.
pub fn compute_settlements(balances: &Balance) -> Vec<Settlement> {
    compute_settlements_with(balances, &Tolerance::default())
}

pub fn compute_settlements_with(balances: &Balance, tolerance: &Tolerance) -> Vec<Settlement> {
    let epsilon = tolerance.epsilon();
    let mut debtors = BinaryHeap::new();
    let mut creditors = BinaryHeap::new();

    for (id, &balance) in balances {
        if !balance.is_finite() {
            tracing::warn!(member = %id, balance, "skipping non-finite balance");
            continue;
        }
        if balance > epsilon {
            creditors.push(Outstanding {
                id: id.clone(),
                amount: balance,
            });
        } else if balance < -epsilon {
            debtors.push(Outstanding {
                id: id.clone(),
                amount: -balance,
            });
        }
    }

    let mut settlements = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));

    while !debtors.is_empty() && !creditors.is_empty() {
        let (Some(mut debtor), Some(mut creditor)) = (debtors.pop(), creditors.pop()) else {
            break;
        };
        let amount = debtor.amount.min(creditor.amount);
        debtor.amount -= amount;
        creditor.amount -= amount;

        settlements.push(Settlement {
            debtor: debtor.id.clone(),
            creditor: creditor.id.clone(),
            amount,
        });

        if !tolerance.is_zero(debtor.amount) {
            debtors.push(debtor);
        }
        if !tolerance.is_zero(creditor.amount) {
            creditors.push(creditor);
        }
    }

    let unsettled: f64 = debtors
        .iter()
        .chain(creditors.iter())
        .map(|outstanding| outstanding.amount)
        .sum();
    if unsettled > 0.0 {
        tracing::warn!(unsettled, "balances do not sum to zero, leaving remainder unsettled");
    }
    tracing::debug!(
        balances = balances.len(),
        settlements = settlements.len(),
        "computed settlements"
    );
    settlements
}

/// Like [`compute_settlements_with`], but refuses balances that are not
/// finite or whose sum is further than `tolerance.balance` from zero.
pub fn compute_settlements_checked(
    balances: &Balance,
    tolerance: &Tolerance,
) -> ResultTricount<Vec<Settlement>> {
    let mut ids: Vec<&MemberId> = balances.keys().collect();
    ids.sort();
    if let Some(id) = ids.into_iter().find(|id| !balances[*id].is_finite()) {
        return Err(ValidationError::NonFinite(id.clone()));
    }
    let sum: f64 = balances.values().sum();
    if sum.abs() > tolerance.balance {
        return Err(ValidationError::Unbalanced { sum });
    }
    Ok(compute_settlements_with(balances, tolerance))
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
struct UserPair {
    user1: MemberId,
    user2: MemberId,
}

/// The settlements that would be made if no simplification happened: every
/// participant pays the payer back directly, netted per pair of members.
pub fn get_naive_settlements(group: &Group) -> Vec<Settlement> {
    let members: HashSet<&MemberId> = group.users.iter().map(|u| &u.id).collect();
    let mut balances_between_people: BTreeMap<UserPair, f64> = BTreeMap::new();

    for expense in &group.expenses {
        if !members.contains(&expense.payer_id) {
            continue;
        }
        for (receiver, share) in expense_shares(expense) {
            if *receiver == expense.payer_id || !members.contains(receiver) {
                continue;
            }
            // Alphabetical order keeps every debt between the same two
            // members in one entry; a positive amount means user2 owes user1
            let (pair, amount) = if expense.payer_id < *receiver {
                (
                    UserPair {
                        user1: expense.payer_id.clone(),
                        user2: receiver.clone(),
                    },
                    share,
                )
            } else {
                (
                    UserPair {
                        user1: receiver.clone(),
                        user2: expense.payer_id.clone(),
                    },
                    -share,
                )
            };
            *balances_between_people.entry(pair).or_insert(0.0) += amount;
        }
    }

    let tolerance = Tolerance::default();
    balances_between_people
        .into_iter()
        .filter(|(_, balance)| !tolerance.is_zero(*balance))
        .map(|(pair, balance)| {
            if balance > 0.0 {
                Settlement {
                    debtor: pair.user2,
                    creditor: pair.user1,
                    amount: balance,
                }
            } else {
                Settlement {
                    debtor: pair.user1,
                    creditor: pair.user2,
                    amount: -balance,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Currency, NewExpense};

    fn balances(entries: &[(&str, f64)]) -> Balance {
        entries
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect()
    }

    fn settlement(debtor: &str, creditor: &str, amount: f64) -> Settlement {
        Settlement {
            debtor: debtor.to_string(),
            creditor: creditor.to_string(),
            amount,
        }
    }

    #[test]
    fn largest_debtor_pays_largest_creditor_first() {
        let result = compute_settlements(&balances(&[
            ("dric", 100.0),
            ("kouka", 50.0),
            ("zak", -80.0),
            ("vincent", -70.0),
        ]));
        assert_eq!(
            result,
            vec![
                settlement("zak", "dric", 80.0),
                settlement("vincent", "kouka", 50.0),
                settlement("vincent", "dric", 20.0),
            ]
        );
    }

    #[test]
    fn ties_are_broken_by_id() {
        let result = compute_settlements(&balances(&[
            ("hamza", 60.0),
            ("zak", -30.0),
            ("vincent", -30.0),
        ]));
        assert_eq!(
            result,
            vec![
                settlement("vincent", "hamza", 30.0),
                settlement("zak", "hamza", 30.0),
            ]
        );
    }

    #[test]
    fn near_zero_balances_are_dropped() {
        let result = compute_settlements(&balances(&[("a", 1e-12), ("b", -1e-12), ("c", 0.0)]));
        assert!(result.is_empty());
    }

    #[test]
    fn infinite_balances_are_skipped() {
        let result = compute_settlements(&balances(&[
            ("a", f64::INFINITY),
            ("b", f64::NEG_INFINITY),
            ("c", f64::NAN),
        ]));
        assert!(result.is_empty());

        let result = compute_settlements(&balances(&[
            ("a", f64::INFINITY),
            ("b", 10.0),
            ("c", -10.0),
        ]));
        assert_eq!(result, vec![settlement("c", "b", 10.0)]);
    }

    #[test]
    fn negative_epsilon_terminates() {
        let tolerance = Tolerance {
            epsilon: -1.0,
            ..Tolerance::default()
        };
        let result = compute_settlements_with(&balances(&[("a", 10.0), ("b", -10.0)]), &tolerance);
        assert_eq!(result, vec![settlement("b", "a", 10.0)]);

        let tolerance = Tolerance {
            epsilon: f64::NAN,
            ..Tolerance::default()
        };
        let result = compute_settlements_with(&balances(&[("a", 10.0), ("b", -10.0)]), &tolerance);
        assert_eq!(result, vec![settlement("b", "a", 10.0)]);
    }

    #[test]
    fn unbalanced_input_leaves_remainder() {
        let result = compute_settlements(&balances(&[("a", 50.0), ("b", -20.0)]));
        assert_eq!(result, vec![settlement("b", "a", 20.0)]);
    }

    #[test]
    fn checked_rejects_unbalanced_input() {
        let err = compute_settlements_checked(
            &balances(&[("a", 50.0), ("b", -20.0)]),
            &Tolerance::default(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Unbalanced { sum: 30.0 });
    }

    #[test]
    fn checked_rejects_non_finite_balance() {
        let err = compute_settlements_checked(
            &balances(&[("a", f64::NAN), ("b", 0.0)]),
            &Tolerance::default(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NonFinite("a".to_string()));
    }

    #[test]
    fn checked_accepts_small_drift() {
        let result = compute_settlements_checked(
            &balances(&[("a", 10.004), ("b", -10.0)]),
            &Tolerance::default(),
        )
        .unwrap();
        assert_eq!(result, vec![settlement("b", "a", 10.0)]);
    }

    #[test]
    fn naive_settlements_net_per_pair() {
        let mut group = Group::new("Test", Currency::EUR);
        let a = group.add_user("A", "a").id.clone();
        let b = group.add_user("B", "b").id.clone();
        group.add_expense(NewExpense {
            amount: 90.0,
            payer_id: a.clone(),
            participants_ids: vec![a.clone(), b.clone()],
            ..Default::default()
        });
        group.add_expense(NewExpense {
            amount: 60.0,
            payer_id: b.clone(),
            participants_ids: vec![a.clone(), b.clone()],
            ..Default::default()
        });
        let result = get_naive_settlements(&group);
        assert_eq!(
            result,
            vec![Settlement {
                debtor: b,
                creditor: a,
                amount: 15.0,
            }]
        );
    }

    #[test]
    fn naive_settlements_skip_unknown_members() {
        let mut group = Group::new("Test", Currency::EUR);
        let a = group.add_user("A", "a").id.clone();
        group.add_expense(NewExpense {
            amount: 40.0,
            payer_id: a.clone(),
            participants_ids: vec![a, "ghost".to_string()],
            ..Default::default()
        });
        assert!(get_naive_settlements(&group).is_empty());
    }

    #[test]
    fn settlement_serializes_with_named_fields() {
        let json = serde_json::to_value(settlement("b", "a", 12.5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"debtor": "b", "creditor": "a", "amount": 12.5})
        );
    }
}
