//! Data models for the Payroll Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! passed into and out of the engine: employees, attendance tallies,
//! deduction policies, payroll ledger records, pay slips and the
//! bulk payment request/result pair.  Field names serialise in
//! camelCase so that JSON fixtures read like the HRM console records
//! they mirror.

use crate::error::{PayrollError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Working days assumed for a pay period when none are supplied.
pub const DEFAULT_WORKING_DAYS: u32 = 22;

fn default_working_days() -> u32 {
    DEFAULT_WORKING_DAYS
}

/// An employee as exposed by the employee directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Directory identifier, unique per employee.
    pub id: String,
    /// The employee's full name.
    pub name: String,
    /// Job title, used by position-based selection.
    pub position: String,
    /// Department name, used by department-based selection.
    pub department: String,
    /// Monthly base salary as a display string (`"Rp 8.000.000"`).
    /// Employees without a recorded salary are paid from `"Rp 0"`.
    #[serde(default)]
    pub salary: Option<String>,
}

/// Present, total and late day counts for one employee in one pay
/// period.
///
/// A present-but-late day counts towards `late_days` only; it is not
/// also an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceTally {
    /// Days the employee attended, late or not.
    pub present_days: u32,
    /// Working days in the period; 22 when omitted.
    #[serde(default = "default_working_days")]
    pub total_days: u32,
    /// Days the employee arrived late.
    #[serde(default)]
    pub late_days: u32,
}

impl AttendanceTally {
    /// Tally over the default 22 working days.
    pub fn new(present_days: u32, late_days: u32) -> Self {
        Self {
            present_days,
            total_days: DEFAULT_WORKING_DAYS,
            late_days,
        }
    }

    /// Full attendance with no late days.
    pub fn full(total_days: u32) -> Self {
        Self {
            present_days: total_days,
            total_days,
            late_days: 0,
        }
    }

    /// Days absent in the period.
    pub fn absent_days(&self) -> u32 {
        self.total_days.saturating_sub(self.present_days)
    }

    /// Checks `total_days > 0` and `present_days <= total_days`.
    pub fn validate(&self) -> Result<()> {
        if self.total_days == 0 || self.present_days > self.total_days {
            return Err(PayrollError::InvalidAttendance {
                present_days: self.present_days,
                total_days: self.total_days,
            });
        }
        Ok(())
    }
}

/// How absences and late arrivals reduce pay.
///
/// With `use_percentage` set, each absent day costs `absence_rate`
/// percent of the daily salary and each late day costs `late_rate`
/// percent.  Otherwise the flat amounts are charged per occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionPolicy {
    /// Percentage of the daily salary charged per absent day.
    pub absence_rate: f64,
    /// Percentage of the daily salary charged per late day.
    pub late_rate: f64,
    /// Rupiah charged per absent day in flat mode.
    pub absence_flat_amount: i64,
    /// Rupiah charged per late day in flat mode.
    pub late_flat_amount: i64,
    /// Selects percentage mode (`true`) or flat mode (`false`).
    pub use_percentage: bool,
}

impl Default for DeductionPolicy {
    fn default() -> Self {
        Self {
            absence_rate: 5.0,
            late_rate: 1.0,
            absence_flat_amount: 200_000,
            late_flat_amount: 50_000,
            use_percentage: true,
        }
    }
}

impl DeductionPolicy {
    /// Rates must lie in `[0, 100]` and flat amounts must not be
    /// negative.  Both modes are checked regardless of which is active.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("absenceRate", self.absence_rate), ("lateRate", self.late_rate)] {
            if !(0.0..=100.0).contains(&rate) {
                return Err(PayrollError::policy(format!(
                    "{name} must be between 0 and 100, got {rate}"
                )));
            }
        }
        for (name, amount) in [
            ("absenceFlatAmount", self.absence_flat_amount),
            ("lateFlatAmount", self.late_flat_amount),
        ] {
            if amount < 0 {
                return Err(PayrollError::policy(format!(
                    "{name} must not be negative, got {amount}"
                )));
            }
        }
        Ok(())
    }
}

/// Itemised deductions, all formatted as rupiah strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionDetails {
    /// Deduction for absent days.
    pub absence: String,
    /// Deduction for late days.
    pub late: String,
    /// Only set on pay slips, never by the deduction calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Only set on pay slips, never by the deduction calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// Output of the deduction calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionResult {
    /// Sum of the rounded absence and late deductions.
    pub total_deduction: String,
    pub details: DeductionDetails,
}

/// Processing state of a payroll ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    Pending,
    Processing,
    Paid,
}

/// One summary row per processed employee per payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    /// Assigned by the ledger on create; empty before that.
    pub id: String,
    /// Directory id of the paid employee.
    pub employee_id: String,
    /// Employee name at the time of the run.
    pub employee_name: String,
    /// Employee position at the time of the run.
    pub position: String,
    /// Base salary for the period.
    pub salary: String,
    /// Bonus paid on top of the salary.
    pub bonus: String,
    /// Total attendance deductions.
    pub deductions: String,
    /// `salary + bonus - deductions`.
    pub total: String,
    pub status: PayrollStatus,
    /// Date the run was processed.
    pub date: NaiveDate,
}

/// Lifecycle of a pay slip: drafted, issued to the employee, paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaySlipStatus {
    Draft,
    Issued,
    Paid,
}

impl fmt::Display for PaySlipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaySlipStatus::Draft => "draft",
            PaySlipStatus::Issued => "issued",
            PaySlipStatus::Paid => "paid",
        };
        f.write_str(s)
    }
}

/// The itemised per-employee, per-period pay document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySlip {
    /// Assigned by the pay slip store on create; empty before that.
    pub id: String,
    /// Directory id of the employee the slip belongs to.
    pub employee_id: String,
    /// Employee name at the time the slip was made.
    pub employee_name: String,
    /// Employee position at the time the slip was made.
    pub position: String,
    /// Pay period month, as supplied by the caller.
    pub month: u32,
    /// Pay period year.
    pub year: i32,
    /// Monthly base salary.
    pub base_salary: String,
    /// Bonus or other additions to the base salary.
    pub allowances: String,
    /// Total deducted from the slip's earnings.
    pub deductions: String,
    /// Amount payable to the employee.
    pub total_salary: String,
    pub status: PaySlipStatus,
    pub issued_date: NaiveDate,
    /// Set once the slip is paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    /// Itemised breakdown of `deductions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduction_details: Option<DeductionDetails>,
    /// Attendance the deductions were computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_record: Option<AttendanceTally>,
    /// Free-form remarks from whoever prepared the slip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Which selection list a bulk payment draws its employees from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    Employees,
    Departments,
    Positions,
}

/// Input to a bulk payment run.
///
/// Only the list matching `selection_type` is consulted; the others
/// are ignored even when non-empty.  A missing `selection_type`
/// selects nobody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPaymentOptions {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub selection_type: Option<SelectionType>,
    #[serde(default)]
    pub selected_employees: Vec<String>,
    #[serde(default)]
    pub selected_departments: Vec<String>,
    #[serde(default)]
    pub selected_positions: Vec<String>,
    pub process_date: NaiveDate,
}


/// Aggregate outcome of a bulk payment run.
///
/// `success_count + failed_count == total_processed`, and exactly one
/// payroll record and one pay slip exist per success, in selection
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPaymentResult {
    pub total_processed: usize,
    pub success_count: usize,
    pub failed_count: usize,
    /// Sum of the created records' totals.
    pub total_amount: String,
    pub payroll_items: Vec<PayrollRecord>,
    pub pay_slips: Vec<PaySlip>,
}

impl BulkPaymentResult {
    /// A run that selected nobody.
    pub fn empty() -> Self {
        Self {
            total_processed: 0,
            success_count: 0,
            failed_count: 0,
            total_amount: crate::currency::format_to_rupiah(0),
            payroll_items: Vec::new(),
            pay_slips: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attendance_defaults_when_deserialising() {
        let tally: AttendanceTally = serde_json::from_value(json!({"presentDays": 20})).unwrap();
        assert_eq!(tally.total_days, 22);
        assert_eq!(tally.late_days, 0);
        assert_eq!(tally.absent_days(), 2);
    }

    #[test]
    fn test_attendance_validation() {
        assert!(AttendanceTally::new(22, 3).validate().is_ok());
        assert!(AttendanceTally::new(23, 0).validate().is_err());
        let zero = AttendanceTally {
            present_days: 0,
            total_days: 0,
            late_days: 0,
        };
        assert_eq!(
            zero.validate(),
            Err(PayrollError::InvalidAttendance {
                present_days: 0,
                total_days: 0
            })
        );
    }

    #[test]
    fn test_policy_defaults_and_validation() {
        let policy = DeductionPolicy::default();
        assert!(policy.validate().is_ok());
        assert!(policy.use_percentage);

        let mut bad = policy.clone();
        bad.absence_rate = 100.5;
        assert!(matches!(bad.validate(), Err(PayrollError::InvalidPolicy(_))));

        let mut bad = policy.clone();
        bad.late_rate = f64::NAN;
        assert!(bad.validate().is_err());

        let mut bad = policy;
        bad.late_flat_amount = -1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_policy_uses_defaults() {
        let policy: DeductionPolicy =
            serde_json::from_value(json!({"usePercentage": false})).unwrap();
        assert!(!policy.use_percentage);
        assert_eq!(policy.absence_flat_amount, 200_000);
    }

    #[test]
    fn test_options_from_json() {
        let options: BulkPaymentOptions = serde_json::from_value(json!({
            "month": 5,
            "year": 2025,
            "selectionType": "departments",
            "selectedDepartments": ["IT"],
            "processDate": "2025-05-31"
        }))
        .unwrap();
        assert_eq!(options.selection_type, Some(SelectionType::Departments));
        assert!(options.selected_employees.is_empty());
    }
}
