//! Entry point for the Payroll Engine binary.
//!
//! The binary runs the engine against JSON files and prints the
//! results as JSON.  The deduction policy comes from the file given by
//! `--config` or the `PAYROLL_CONFIG` environment variable; without
//! either the default policy applies.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use payroll_engine::attendance::{AttendanceSource, FixedAttendance, RandomAttendance};
use payroll_engine::config::{EngineConfig, CONFIG_ENV};
use payroll_engine::deduction::calculate_deductions;
use payroll_engine::models::{AttendanceTally, BulkPaymentOptions, SelectionType};
use payroll_engine::store::{InMemoryEmployeeDirectory, InMemoryPaySlipStore, InMemoryPayrollLedger};

/// Payroll deductions and bulk payments.
#[derive(Parser)]
#[command(name = "payroll_engine")]
struct Cli {
    /// JSON file with the deduction policy and pay slip tax
    #[arg(long, env = CONFIG_ENV, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate attendance deductions for one salary
    Deductions {
        /// Base salary, e.g. "Rp 11.000.000"
        #[arg(long)]
        salary: String,
        #[arg(long)]
        present: u32,
        #[arg(long, default_value_t = payroll_engine::models::DEFAULT_WORKING_DAYS)]
        total: u32,
        #[arg(long, default_value_t = 0)]
        late: u32,
    },
    /// Pay a selection of employees from a JSON employee list
    Bulk {
        /// JSON array of employees
        #[arg(long)]
        employees: PathBuf,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Processing date, YYYY-MM-DD
        #[arg(long)]
        process_date: NaiveDate,
        #[arg(long = "employee-id", group = "selection")]
        employee_ids: Vec<String>,
        #[arg(long = "department", group = "selection")]
        departments: Vec<String>,
        #[arg(long = "position", group = "selection")]
        positions: Vec<String>,
        /// JSON map of employee id to attendance tally
        #[arg(long, conflicts_with = "random_attendance")]
        attendance: Option<PathBuf>,
        /// Invent attendance tallies (demo only)
        #[arg(long)]
        random_attendance: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = EngineConfig::load(cli.config.as_deref())?;
    tracing::debug!("Using deduction policy {:?}", config.policy);

    match cli.command {
        Command::Deductions {
            salary,
            present,
            total,
            late,
        } => {
            let tally = AttendanceTally {
                present_days: present,
                total_days: total,
                late_days: late,
            };
            let result = calculate_deductions(&salary, &tally, &config.policy)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Bulk {
            employees,
            month,
            year,
            process_date,
            employee_ids,
            departments,
            positions,
            attendance,
            random_attendance,
        } => {
            let directory: InMemoryEmployeeDirectory = read_json(&employees)?;
            let attendance: Box<dyn AttendanceSource> = match attendance {
                Some(path) => Box::new(read_json::<FixedAttendance>(&path)?),
                None if random_attendance => Box::new(RandomAttendance::default()),
                None => Box::new(FixedAttendance::new()),
            };
            let selection_type = if !employee_ids.is_empty() {
                Some(SelectionType::Employees)
            } else if !departments.is_empty() {
                Some(SelectionType::Departments)
            } else if !positions.is_empty() {
                Some(SelectionType::Positions)
            } else {
                None
            };
            let options = BulkPaymentOptions {
                month,
                year,
                selection_type,
                selected_employees: employee_ids,
                selected_departments: departments,
                selected_positions: positions,
                process_date,
            };
            let result = config.engine().process_bulk_payment(
                &options,
                &directory,
                attendance.as_ref(),
                &mut InMemoryPayrollLedger::new(),
                &mut InMemoryPaySlipStore::new(),
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}
