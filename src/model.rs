//! Members, expenses and the derived balance and settlement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group member. Identity is `id`; `name` is for display and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A shared expense paid by one member and split between several.
///
/// # Invariants
///
/// - `amount` is positive and finite
/// - `split_between` is non-empty
///
/// `paid_by` does not have to appear in `split_between`. An id listed more
/// than once in `split_between` is charged once per occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,

    /// Member id of the payer.
    pub paid_by: String,

    /// Member ids sharing the cost, in input order.
    pub split_between: Vec<String>,

    pub date: DateTime<Utc>,
}

impl Expense {
    /// Amount charged to each entry of `split_between`.
    ///
    /// Returns `None` when the split is empty.
    pub fn share(&self) -> Option<f64> {
        if self.split_between.is_empty() {
            None
        } else {
            Some(self.amount / self.split_between.len() as f64)
        }
    }
}

/// Net position of a member. Positive means the member is owed money,
/// negative means the member owes money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub member_id: String,
    pub member_name: String,
    pub balance: f64,
}

impl Balance {
    pub fn new(member_id: impl Into<String>, member_name: impl Into<String>, balance: f64) -> Self {
        Balance {
            member_id: member_id.into(),
            member_name: member_name.into(),
            balance,
        }
    }
}

/// A directed payment instruction between two members, by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}
