//! Raw CSV records for members and expenses.

use crate::error::{Result, SplitError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Separator between member ids in the `split_between` column.
pub const SPLIT_SEPARATOR: char = ';';

/// Raw member record as read from CSV (`id,name`).
#[derive(Debug, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
}

/// Raw expense record as read from CSV.
///
/// `id` and `date` may be left blank; the group fills them in.
#[derive(Debug, Deserialize)]
pub struct ExpenseRecord {
    pub id: Option<String>,
    pub description: String,
    pub amount: Option<String>,
    pub paid_by: String,

    /// Member ids separated by `;`
    pub split_between: String,

    /// RFC 3339 timestamp
    pub date: Option<String>,
}

/// An expense as submitted to a group, before an id and date are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub id: Option<String>,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
    pub date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: &[&str],
    ) -> Self {
        NewExpense {
            id: None,
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.iter().map(|s| s.to_string()).collect(),
            date: None,
        }
    }
}

impl ExpenseRecord {
    /// Parses the raw CSV record into an expense submission.
    ///
    /// `row` is only used for error reporting.
    pub fn parse(&self, row: usize) -> Result<NewExpense> {
        let amount = self.parse_amount(row)?;

        let split_between = self
            .split_between
            .split(SPLIT_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        let date = match non_blank(&self.date) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| SplitError::InvalidRecord {
                        row,
                        message: format!("invalid date '{}': {}", raw, e),
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(NewExpense {
            id: non_blank(&self.id).map(str::to_string),
            description: self.description.trim().to_string(),
            amount,
            paid_by: self.paid_by.trim().to_string(),
            split_between,
            date,
        })
    }

    fn parse_amount(&self, row: usize) -> Result<f64> {
        let raw = non_blank(&self.amount).ok_or_else(|| SplitError::InvalidRecord {
            row,
            message: "missing amount".to_string(),
        })?;

        raw.parse::<f64>().map_err(|e| SplitError::InvalidRecord {
            row,
            message: format!("invalid amount '{}': {}", raw, e),
        })
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
