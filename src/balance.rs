//! Net balance calculation.
//!
//! Each expense credits its payer with the full amount and debits every entry
//! of its split with an equal share. Totals stay unrounded until the very end
//! so that they cancel exactly; only the emitted balances are rounded.

use crate::error::{Result, SplitError};
use crate::model::{Balance, Expense, Member};
use crate::money::round2;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Checks the expense invariants the calculation relies on.
pub fn validate_expense(expense: &Expense) -> Result<()> {
    if expense.split_between.is_empty() {
        return Err(SplitError::EmptySplit {
            expense_id: expense.id.clone(),
        });
    }

    if !expense.amount.is_finite() || expense.amount <= 0.0 {
        return Err(SplitError::InvalidAmount {
            expense_id: expense.id.clone(),
            amount: expense.amount,
        });
    }

    Ok(())
}

/// Computes one balance per member, in the order of `members`.
///
/// Ids that do not belong to any member are still accounted for internally
/// but never appear in the output. Each such id is logged once at warn level.
///
/// # Errors
///
/// Fails before computing anything if an expense has an empty split or an
/// amount that is not a positive finite number. Fails with
/// [`SplitError::Overflow`] if a member's total leaves the `f64` range.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use expense_splitter::{calculate_balances, Expense, Member};
///
/// let members = vec![Member::new("1", "Alice"), Member::new("2", "Bob")];
/// let expenses = vec![Expense {
///     id: "e1".into(),
///     description: "Taxi".into(),
///     amount: 30.0,
///     paid_by: "1".into(),
///     split_between: vec!["1".into(), "2".into()],
///     date: Utc::now(),
/// }];
///
/// let balances = calculate_balances(&members, &expenses).unwrap();
/// assert_eq!(balances[0].balance, 15.0);
/// assert_eq!(balances[1].balance, -15.0);
/// ```
pub fn calculate_balances(members: &[Member], expenses: &[Expense]) -> Result<Vec<Balance>> {
    for expense in expenses {
        validate_expense(expense)?;
    }

    let mut totals: HashMap<&str, f64> = members.iter().map(|m| (m.id.as_str(), 0.0)).collect();
    let known: HashSet<&str> = totals.keys().copied().collect();
    let mut reported_unknown: HashSet<&str> = HashSet::new();

    for expense in expenses {
        let share = expense.amount / expense.split_between.len() as f64;

        *totals.entry(expense.paid_by.as_str()).or_insert(0.0) += expense.amount;

        for member_id in &expense.split_between {
            *totals.entry(member_id.as_str()).or_insert(0.0) -= share;
        }

        let referenced = std::iter::once(&expense.paid_by).chain(expense.split_between.iter());
        for member_id in referenced {
            let id = member_id.as_str();
            if !known.contains(id) && reported_unknown.insert(id) {
                warn!(
                    "Expense {} references unknown member {}, excluded from balances",
                    expense.id, id
                );
            }
        }

        if has_duplicates(&expense.split_between) {
            debug!(
                "Expense {} lists a member more than once; charging one share per occurrence",
                expense.id
            );
        }
    }

    members
        .iter()
        .map(|member| {
            let total = totals.get(member.id.as_str()).copied().unwrap_or(0.0);
            if !total.is_finite() {
                return Err(SplitError::Overflow {
                    member_id: member.id.clone(),
                });
            }
            Ok(Balance::new(member.id.clone(), member.name.clone(), round2(total)))
        })
        .collect()
}

fn has_duplicates(ids: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().any(|id| !seen.insert(id))
}
