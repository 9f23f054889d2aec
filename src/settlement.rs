//! Greedy settlement of net balances.
//!
//! The largest debtor repeatedly pays the largest creditor until one side runs
//! out. This keeps the number of payments low but is not guaranteed to find
//! the true minimum, which is a subset-sum style problem.

use crate::model::{Balance, Settlement};
use crate::money::{round2, TOLERANCE};
use log::debug;
use std::collections::VecDeque;

/// A debtor or creditor being worked down during settlement.
#[derive(Debug, Clone)]
struct Party<'a> {
    name: &'a str,
    balance: f64,
}

/// Computes the payments that settle `balances`.
///
/// Balances within ±0.01 of zero take no part, and neither do non-finite
/// balances. Any residue left when one side
/// runs out comes from input rounding and is dropped. The input is never
/// modified.
///
/// # Examples
///
/// ```
/// use expense_splitter::{calculate_settlements, Balance};
///
/// let balances = vec![Balance::new("1", "Alice", 50.0), Balance::new("2", "Bob", -50.0)];
/// let settlements = calculate_settlements(&balances);
///
/// assert_eq!(settlements.len(), 1);
/// assert_eq!(settlements[0].from, "Bob");
/// assert_eq!(settlements[0].to, "Alice");
/// assert_eq!(settlements[0].amount, 50.0);
/// ```
pub fn calculate_settlements(balances: &[Balance]) -> Vec<Settlement> {
    let mut debtors: Vec<Party<'_>> = balances
        .iter()
        .filter(|b| b.balance.is_finite() && b.balance < -TOLERANCE)
        .map(|b| Party {
            name: &b.member_name,
            balance: b.balance,
        })
        .collect();
    let mut creditors: Vec<Party<'_>> = balances
        .iter()
        .filter(|b| b.balance.is_finite() && b.balance > TOLERANCE)
        .map(|b| Party {
            name: &b.member_name,
            balance: b.balance,
        })
        .collect();

    // Stable sorts keep input order among equal balances
    debtors.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let mut debtors = VecDeque::from(debtors);
    let mut creditors = VecDeque::from(creditors);
    let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());

    while let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut()) {
        let transfer = debtor.balance.abs().min(creditor.balance);

        settlements.push(Settlement {
            from: debtor.name.to_string(),
            to: creditor.name.to_string(),
            amount: round2(transfer),
        });

        debtor.balance += transfer;
        creditor.balance -= transfer;

        if debtor.balance.abs() < TOLERANCE {
            debtors.pop_front();
        }
        if creditor.balance.abs() < TOLERANCE {
            creditors.pop_front();
        }
    }

    for party in debtors.iter().chain(creditors.iter()) {
        debug!(
            "Dropping unmatched residue {:.4} for {}",
            party.balance, party.name
        );
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, f64)]) -> Vec<Balance> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (name, balance))| Balance::new((i + 1).to_string(), *name, *balance))
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_balanced_group_needs_no_settlements() {
        let input = balances(&[("Alice", 0.0), ("Bob", 0.0)]);
        assert!(calculate_settlements(&input).is_empty());
    }

    #[test]
    fn test_dead_zone_is_ignored() {
        let input = balances(&[("Alice", 0.01), ("Bob", -0.01), ("Carol", 0.005)]);
        assert!(calculate_settlements(&input).is_empty());
    }

    #[test]
    fn test_two_party_exact_match() {
        let input = balances(&[("Alice", 50.0), ("Bob", -50.0)]);

        let settlements = calculate_settlements(&input);
        assert_eq!(
            settlements,
            vec![Settlement {
                from: "Bob".to_string(),
                to: "Alice".to_string(),
                amount: 50.0,
            }]
        );
    }

    #[test]
    fn test_sample_group() {
        let input = balances(&[
            ("Alice", 45.0),
            ("Bob", -8.33),
            ("Carol", 1.67),
            ("Dave", -38.33),
        ]);

        let settlements = calculate_settlements(&input);
        assert_eq!(settlements.len(), 3);

        assert_eq!(settlements[0].from, "Dave");
        assert_eq!(settlements[0].to, "Alice");
        assert_close(settlements[0].amount, 38.33);

        assert_eq!(settlements[1].from, "Bob");
        assert_eq!(settlements[1].to, "Alice");
        assert_close(settlements[1].amount, 6.67);

        assert_eq!(settlements[2].from, "Bob");
        assert_eq!(settlements[2].to, "Carol");
        assert!((settlements[2].amount - 1.67).abs() <= 0.011);

        let to_alice: f64 = settlements
            .iter()
            .filter(|s| s.to == "Alice")
            .map(|s| s.amount)
            .sum();
        assert_close(to_alice, 45.0);
    }

    #[test]
    fn test_one_creditor_many_debtors() {
        let input = balances(&[
            ("Alice", 100.0),
            ("Bob", -30.0),
            ("Carol", -40.0),
            ("Dave", -30.0),
        ]);

        let settlements = calculate_settlements(&input);
        let summary: Vec<(&str, &str, f64)> = settlements
            .iter()
            .map(|s| (s.from.as_str(), s.to.as_str(), s.amount))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Carol", "Alice", 40.0),
                ("Bob", "Alice", 30.0),
                ("Dave", "Alice", 30.0),
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = balances(&[
            ("Alice", 10.0),
            ("Bob", 10.0),
            ("Carol", -10.0),
            ("Dave", -10.0),
        ]);

        let settlements = calculate_settlements(&input);
        assert_eq!(settlements.len(), 2);
        assert_eq!((settlements[0].from.as_str(), settlements[0].to.as_str()), ("Carol", "Alice"));
        assert_eq!((settlements[1].from.as_str(), settlements[1].to.as_str()), ("Dave", "Bob"));
    }

    #[test]
    fn test_residue_is_dropped() {
        let input = balances(&[("Alice", 20.0), ("Bob", -19.5)]);

        let settlements = calculate_settlements(&input);
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].amount, 19.5);
    }

    #[test]
    fn test_non_finite_balances_are_skipped() {
        let input = balances(&[
            ("Alice", f64::INFINITY),
            ("Bob", f64::NEG_INFINITY),
            ("Carol", f64::NAN),
            ("Dave", 5.0),
            ("Erin", -5.0),
        ]);

        let settlements = calculate_settlements(&input);
        assert_eq!(
            settlements,
            vec![Settlement {
                from: "Erin".to_string(),
                to: "Dave".to_string(),
                amount: 5.0,
            }]
        );
    }

    #[test]
    fn test_input_is_not_modified() {
        let input = balances(&[("Alice", 25.0), ("Bob", -25.0)]);
        let before = input.clone();

        let _ = calculate_settlements(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_amounts_are_rounded_and_positive() {
        let input = balances(&[("Alice", 10.0 / 3.0), ("Bob", -10.0 / 3.0)]);

        let settlements = calculate_settlements(&input);
        assert_eq!(settlements.len(), 1);
        assert_close(settlements[0].amount, 3.33);
        assert!(settlements.iter().all(|s| s.amount > 0.0));
    }
}
