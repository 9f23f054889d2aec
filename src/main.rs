//! Expense Splitter CLI
//!
//! Reads group members and expenses from CSV files and prints each member's
//! balance followed by the payments that settle the group.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- members.csv expenses.csv > balances.csv
//! cargo run -- members.csv expenses.csv --currency EUR --report
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use expense_splitter::{Currency, ExpenseGroup, Result, SplitError};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process;
use std::str::FromStr;

/// Command line options.
struct Options {
    members_path: String,
    expenses_path: String,
    currency: Currency,
    report: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut paths = Vec::new();
        let mut currency = Currency::default();
        let mut report = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--report" => report = true,
                "--currency" => {
                    let code = args.next().ok_or(SplitError::MissingArgument)?;
                    currency = Currency::from_str(&code)?;
                }
                _ => paths.push(arg),
            }
        }

        let mut paths = paths.into_iter();
        match (paths.next(), paths.next()) {
            (Some(members_path), Some(expenses_path)) => Ok(Options {
                members_path,
                expenses_path,
                currency,
                report,
            }),
            _ => Err(SplitError::MissingArgument),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = Options::parse(env::args().skip(1))?;

    let group_name = Path::new(&options.expenses_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Group")
        .to_string();
    let mut group = ExpenseGroup::new(group_name, options.currency);

    let members = File::open(&options.members_path)?;
    group.load_members_csv(BufReader::new(members))?;

    let expenses = File::open(&options.expenses_path)?;
    group.load_expenses_csv(BufReader::new(expenses))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if options.report {
        group.write_report(&mut handle)?;
    } else {
        group.write_balances(&mut handle)?;
        writeln!(handle)?;
        group.write_settlements(&mut handle)?;
    }

    Ok(())
}
