//! Error types for the expense splitter.

use thiserror::Error;

/// Result type alias for splitter operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while building a group or computing balances.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An expense has nobody to split between
    #[error("Expense {expense_id} has an empty split")]
    EmptySplit { expense_id: String },

    /// An expense amount is zero, negative or not a finite number
    #[error("Expense {expense_id} has invalid amount {amount}")]
    InvalidAmount { expense_id: String, amount: f64 },

    /// A running total left the representable `f64` range
    #[error("Balance of member {member_id} overflowed; expense amounts are too large")]
    Overflow { member_id: String },

    /// Group rejected at creation
    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    /// Expense rejected before it reaches the group
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Member rejected before it reaches the group
    #[error("Invalid member: {0}")]
    InvalidMember(String),

    /// Invalid input record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Member ID already present in the group
    #[error("Duplicate member ID {0}")]
    DuplicateMember(String),

    /// Expense ID already present in the group
    #[error("Duplicate expense ID {0}")]
    DuplicateExpense(String),

    /// Currency code outside the supported set
    #[error("Unknown currency code '{0}'. Supported: USD, INR, EUR, GBP")]
    UnknownCurrency(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: expense-splitter <members.csv> <expenses.csv> [--currency CODE] [--report]")]
    MissingArgument,
}
