use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub type MemberId = String;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
    JPY,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::JPY => "JPY",
        };
        f.write_str(code)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub auth_id: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    pub payer_id: MemberId,
    #[serde(default)]
    pub participants_ids: Vec<MemberId>,
    // Empty means the expense is split evenly
    #[serde(default)]
    pub weights: HashMap<MemberId, f64>,
}

impl Expense {
    /// Even share of the amount per participant, ignoring weights.
    pub fn split_amount(&self) -> f64 {
        if self.participants_ids.is_empty() {
            return 0.0;
        }
        self.amount / self.participants_ids.len() as f64
    }
}

/// What the caller provides when recording an expense; the group assigns
/// the id and the currency.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NewExpense {
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub payer_id: MemberId,
    #[serde(default)]
    pub participants_ids: Vec<MemberId>,
    #[serde(default)]
    pub weights: HashMap<MemberId, f64>,
}

/// Snapshot of a group: its members and every expense recorded so far.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Group {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            currency,
            users: vec![],
            expenses: vec![],
        }
    }

    pub fn add_user(&mut self, name: impl Into<String>, auth_id: impl Into<String>) -> &Member {
        let index = self.users.len();
        self.users.push(Member {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            auth_id: auth_id.into(),
        });
        &self.users[index]
    }

    pub fn add_expense(&mut self, expense: NewExpense) -> &Expense {
        let index = self.expenses.len();
        self.expenses.push(Expense {
            id: Uuid::new_v4().to_string(),
            description: expense.description,
            amount: expense.amount,
            currency: self.currency,
            payer_id: expense.payer_id,
            participants_ids: expense.participants_ids,
            weights: expense.weights,
        });
        &self.expenses[index]
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.users.iter().find(|user| user.id == id)
    }
}
