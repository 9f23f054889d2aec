//! # Expense Splitter
//!
//! Computes each member's net balance from a set of shared expenses, then
//! the pairwise payments that settle those balances.
//!
//! ## Design Principles
//!
//! - **Two pure stages**: [`calculate_balances`] feeds [`calculate_settlements`]
//! - **Late rounding**: totals stay unrounded `f64` and are rounded to 2
//!   decimals (half away from zero, via `rust_decimal`) only on output
//! - **Dead zone**: balances within ±0.01 are treated as settled
//! - **Deterministic output**: balances follow member order, settlements
//!   follow a stable greedy matching
//!
//! ## Example
//!
//! ```no_run
//! use expense_splitter::{Currency, ExpenseGroup};
//! use std::fs::File;
//!
//! let mut group = ExpenseGroup::new("Roommates", Currency::Usd);
//! group.load_members_csv(File::open("members.csv").unwrap()).unwrap();
//! group.load_expenses_csv(File::open("expenses.csv").unwrap()).unwrap();
//! group.write_report(std::io::stdout()).unwrap();
//! ```

pub mod balance;
pub mod currency;
pub mod error;
pub mod group;
pub mod model;
pub mod money;
pub mod record;
pub mod settlement;

pub use balance::calculate_balances;
pub use currency::Currency;
pub use error::{Result, SplitError};
pub use group::ExpenseGroup;
pub use model::{Balance, Expense, Member, Settlement};
pub use record::NewExpense;
pub use settlement::calculate_settlements;
