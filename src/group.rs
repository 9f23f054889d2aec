//! Expense group: members, expenses and the reports derived from them.
//!
//! The group plays the collaborator role around the pure calculation
//! functions. It assigns ids and timestamps, validates submissions, ingests
//! CSV input and renders balances and settlements.

use crate::balance::{calculate_balances, validate_expense};
use crate::currency::Currency;
use crate::error::{Result, SplitError};
use crate::model::{Balance, Expense, Member, Settlement};
use crate::money::{format_amount, is_settled, round2};
use crate::record::{ExpenseRecord, MemberRecord, NewExpense};
use crate::settlement::calculate_settlements;
use chrono::Utc;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// A named group of members sharing expenses in one display currency.
///
/// Balances and settlements are never stored; they are recomputed from the
/// current expenses every time they are asked for.
#[derive(Debug, Clone)]
pub struct ExpenseGroup {
    name: String,
    currency: Currency,
    members: Vec<Member>,
    expenses: Vec<Expense>,
}

impl ExpenseGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        ExpenseGroup {
            name: name.into(),
            currency,
            members: Vec::new(),
            expenses: Vec::new(),
        }
    }

    /// Creates a group from a list of member names.
    ///
    /// Names are trimmed and blank names are skipped. The remaining members
    /// get the ids `member-0`, `member-1`, ... in order.
    ///
    /// # Errors
    ///
    /// Fails with [`SplitError::InvalidGroup`] if the group name is blank or
    /// fewer than 2 members remain.
    pub fn from_member_names<S: AsRef<str>>(
        name: &str,
        member_names: &[S],
        currency: Currency,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::InvalidGroup(
                "group name must not be blank".to_string(),
            ));
        }

        let names: Vec<&str> = member_names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.len() < 2 {
            return Err(SplitError::InvalidGroup(
                "at least 2 members are required".to_string(),
            ));
        }

        let mut group = ExpenseGroup::new(name, currency);
        group.members = names
            .into_iter()
            .enumerate()
            .map(|(index, member_name)| Member::new(format!("member-{}", index), member_name))
            .collect();
        Ok(group)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Looks up a member by id.
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Adds a member.
    ///
    /// Fails if the id is already taken or either field is blank.
    pub fn add_member(&mut self, id: impl Into<String>, name: impl Into<String>) -> Result<()> {
        let id = id.into().trim().to_string();
        let name = name.into().trim().to_string();

        if id.is_empty() {
            return Err(SplitError::InvalidMember("blank member id".to_string()));
        }
        if name.is_empty() {
            return Err(SplitError::InvalidMember(format!(
                "member {} has a blank name",
                id
            )));
        }
        if self.member(&id).is_some() {
            return Err(SplitError::DuplicateMember(id));
        }

        debug!("Added member {} ({})", name, id);
        self.members.push(Member::new(id, name));
        Ok(())
    }

    /// Validates and records an expense.
    ///
    /// An id of the form `expense-N` is assigned when none is given, and the
    /// current time when no date is given.
    pub fn add_expense(&mut self, new: NewExpense) -> Result<&Expense> {
        if new.description.trim().is_empty() {
            return Err(SplitError::InvalidExpense(
                "description must not be empty".to_string(),
            ));
        }
        if new.paid_by.trim().is_empty() {
            return Err(SplitError::InvalidExpense(
                "a payer must be selected".to_string(),
            ));
        }

        let id = match new.id {
            Some(id) => {
                if self.expenses.iter().any(|e| e.id == id) {
                    return Err(SplitError::DuplicateExpense(id));
                }
                id
            }
            None => self.next_expense_id(),
        };

        let expense = Expense {
            id,
            description: new.description.trim().to_string(),
            amount: new.amount,
            paid_by: new.paid_by.trim().to_string(),
            split_between: new.split_between,
            date: new.date.unwrap_or_else(Utc::now),
        };
        validate_expense(&expense)?;

        debug!(
            "Added expense {} '{}' of {} paid by {}",
            expense.id,
            expense.description,
            format_amount(expense.amount),
            expense.paid_by
        );
        self.expenses.push(expense);
        // Safety: the expense was pushed on the line above
        Ok(self.expenses.last().expect("expense exists"))
    }

    fn next_expense_id(&self) -> String {
        let mut n = self.expenses.len();
        loop {
            let candidate = format!("expense-{}", n);
            if !self.expenses.iter().any(|e| e.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Reads members from CSV (`id,name`).
    ///
    /// Invalid rows are logged at warn level and skipped.
    pub fn load_members_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<MemberRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Err(e) = self.add_member(record.id, record.name) {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Reads expenses from CSV
    /// (`id,description,amount,paid_by,split_between,date`).
    ///
    /// Invalid rows are logged at warn level and skipped.
    pub fn load_expenses_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<ExpenseRecord>().enumerate() {
            let row_num = row_idx + 2;

            match result {
                Ok(record) => {
                    let added = record
                        .parse(row_num)
                        .and_then(|new| self.add_expense(new).map(|_| ()));
                    if let Err(e) = added {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Net balance of every member, in member order.
    pub fn balances(&self) -> Result<Vec<Balance>> {
        calculate_balances(&self.members, &self.expenses)
    }

    /// Payments that settle the current balances.
    pub fn settlements(&self) -> Result<Vec<Settlement>> {
        Ok(calculate_settlements(&self.balances()?))
    }

    /// Sum of all expense amounts, rounded to 2 decimals.
    pub fn total_expenses(&self) -> f64 {
        round2(self.expenses.iter().map(|e| e.amount).sum())
    }

    /// Writes balances as CSV (`member_id,name,balance`).
    pub fn write_balances<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["member_id", "name", "balance"])?;
        for balance in self.balances()? {
            csv_writer.write_record([
                balance.member_id.as_str(),
                balance.member_name.as_str(),
                format_amount(balance.balance).as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes settlements as CSV (`from,to,amount`).
    pub fn write_settlements<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["from", "to", "amount"])?;
        for settlement in self.settlements()? {
            csv_writer.write_record([
                settlement.from.as_str(),
                settlement.to.as_str(),
                format_amount(settlement.amount).as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes a human-readable summary in the group currency.
    pub fn write_report<W: Write>(&self, mut writer: W) -> Result<()> {
        let balances = self.balances()?;
        let settlements = calculate_settlements(&balances);
        let currency = self.currency;

        writeln!(writer, "=== {} ===", self.name)?;
        writeln!(writer, "Currency: {} ({})", currency.name(), currency.code())?;
        let member_names: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
        writeln!(writer, "Members: {}", member_names.join(", "))?;

        writeln!(writer)?;
        writeln!(writer, "EXPENSES:")?;
        if self.expenses.is_empty() {
            writeln!(writer, "  No expenses yet.")?;
        }
        for (i, expense) in self.expenses.iter().enumerate() {
            writeln!(writer, "{}. {}", i + 1, expense.description)?;
            writeln!(writer, "   Amount: {}", currency.format(expense.amount))?;
            writeln!(writer, "   Paid by: {}", self.display_name(&expense.paid_by))?;
            writeln!(
                writer,
                "   Split between: {}",
                self.member_names(expense.split_between.iter().map(String::as_str))
            )?;
            if let Some(share) = expense.share() {
                writeln!(writer, "   Share each: {}", currency.format(share))?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "BALANCES:")?;
        for balance in &balances {
            let status = if is_settled(balance.balance) {
                "settled up"
            } else if balance.balance > 0.0 {
                "gets back"
            } else {
                "owes"
            };
            writeln!(
                writer,
                "  {}: {} ({})",
                balance.member_name,
                currency.format(balance.balance.abs()),
                status
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "SETTLEMENT SUGGESTIONS:")?;
        if settlements.is_empty() {
            writeln!(writer, "  All settled up!")?;
        }
        for (i, settlement) in settlements.iter().enumerate() {
            writeln!(
                writer,
                "  {}. {} pays {}: {}",
                i + 1,
                settlement.from,
                settlement.to,
                currency.format(settlement.amount)
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total Expenses: {}", currency.format(self.total_expenses()))?;
        writeln!(writer, "Number of Settlements: {}", settlements.len())?;

        writer.flush()?;
        Ok(())
    }

    fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.member(id).map(|m| m.name.as_str()).unwrap_or(id)
    }

    fn member_names<'a>(&'a self, ids: impl Iterator<Item = &'a str>) -> String {
        ids.map(|id| self.display_name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
