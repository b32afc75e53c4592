//! Bulk payment engine.
//!
//! The `engine` module turns a [`BulkPaymentOptions`] selection into a
//! [`BulkPaymentResult`].  Per‑employee calculations are pure and run
//! on the [`rayon`] thread pool; the resulting payroll records and pay
//! slips are then written to the stores one employee at a time, in
//! selection order.  A failure for one employee is logged and counted
//! but never aborts the run.

use crate::attendance::AttendanceSource;
use crate::currency::{extract_numeric_value, format_to_rupiah};
use crate::deduction::calculate_deductions;
use crate::error::Result;
use crate::models::{
    BulkPaymentOptions, BulkPaymentResult, DeductionPolicy, Employee, PaySlip, PaySlipStatus,
    PayrollRecord, PayrollStatus, SelectionType,
};
use crate::store::{EmployeeDirectory, PaySlipStore, PayrollLedger};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Bonus paid on top of the base salary in a bulk run.
pub const BONUS_RATE: f64 = 0.10;

/// Tax shown on bulk pay slips, in rupiah.
pub const DEFAULT_TAX_AMOUNT: i64 = 500_000;

/// Runs payroll with a fixed deduction policy and pay slip tax.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollEngine {
    /// Policy applied to every employee's attendance.
    pub policy: DeductionPolicy,
    /// Tax listed in each bulk pay slip's deduction details, in rupiah.
    pub tax_amount: i64,
}

impl Default for PayrollEngine {
    fn default() -> Self {
        Self {
            policy: DeductionPolicy::default(),
            tax_amount: DEFAULT_TAX_AMOUNT,
        }
    }
}

/// Records computed for one employee, not yet stored.
#[derive(Debug, Clone)]
struct PreparedPayment {
    record: PayrollRecord,
    slip: PaySlip,
    total: i64,
}

impl PayrollEngine {
    /// Engine charging `policy` and showing `tax_amount` rupiah of tax
    /// on every bulk pay slip.
    pub fn new(policy: DeductionPolicy, tax_amount: i64) -> Self {
        Self { policy, tax_amount }
    }

    /// Pays every employee selected by `options`.
    ///
    /// Each success creates one ledger record and one pay slip, both
    /// marked paid on `options.process_date`.  Failures only bump
    /// `failed_count`.  `month` and `year` are copied onto the pay slips
    /// as given.  A directory error yields an empty result.
    pub fn process_bulk_payment(
        &self,
        options: &BulkPaymentOptions,
        directory: &dyn EmployeeDirectory,
        attendance: &dyn AttendanceSource,
        ledger: &mut dyn PayrollLedger,
        slips: &mut dyn PaySlipStore,
    ) -> BulkPaymentResult {
        let employees = match directory.employees() {
            Ok(employees) => employees,
            Err(err) => {
                warn!("Could not load employees for bulk payment: {}", err);
                return BulkPaymentResult::empty();
            }
        };
        let selected = select_employees(employees, options);
        info!(
            "Processing bulk payment for {} employee(s), period {}/{}",
            selected.len(),
            options.month,
            options.year
        );

        let prepared: Vec<Result<PreparedPayment>> = selected
            .par_iter()
            .map(|employee| self.prepare_payment(employee, options, attendance))
            .collect();

        let mut result = BulkPaymentResult::empty();
        result.total_processed = selected.len();
        let mut total_amount: i64 = 0;
        for (employee, payment) in selected.iter().zip(prepared) {
            let outcome = match payment {
                Ok(payment) => commit(payment, ledger, slips),
                Err(err) => Err(err),
            };
            match outcome {
                Ok((record, slip, total)) => {
                    debug!("Paid {} ({}): {}", employee.name, employee.id, record.total);
                    total_amount = total_amount.saturating_add(total);
                    result.payroll_items.push(record);
                    result.pay_slips.push(slip);
                    result.success_count += 1;
                }
                Err(err) => {
                    warn!("Payment failed for {} ({}): {}", employee.name, employee.id, err);
                    result.failed_count += 1;
                }
            }
        }
        result.total_amount = format_to_rupiah(total_amount);
        info!(
            "Bulk payment done: {} paid, {} failed, total {}",
            result.success_count, result.failed_count, result.total_amount
        );
        result
    }

    fn prepare_payment(
        &self,
        employee: &Employee,
        options: &BulkPaymentOptions,
        attendance: &dyn AttendanceSource,
    ) -> Result<PreparedPayment> {
        let tally = attendance.tally(employee, options.month, options.year)?;
        let salary_text = employee.salary.as_deref().unwrap_or("Rp 0");
        let mut deductions = calculate_deductions(salary_text, &tally, &self.policy)?;

        let salary = extract_numeric_value(salary_text);
        let bonus = (salary as f64 * BONUS_RATE).round() as i64;
        // Unlike calculate_total_salary this total is not clamped at zero.
        let total = salary
            .saturating_add(bonus)
            .saturating_sub(extract_numeric_value(&deductions.total_deduction));

        let salary = format_to_rupiah(salary);
        let bonus = format_to_rupiah(bonus);
        let total_text = format_to_rupiah(total);
        deductions.details.tax = Some(format_to_rupiah(self.tax_amount));

        let record = PayrollRecord {
            id: String::new(),
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            position: employee.position.clone(),
            salary: salary.clone(),
            bonus: bonus.clone(),
            deductions: deductions.total_deduction.clone(),
            total: total_text.clone(),
            status: PayrollStatus::Paid,
            date: options.process_date,
        };
        let slip = PaySlip {
            id: String::new(),
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            position: employee.position.clone(),
            month: options.month,
            year: options.year,
            base_salary: salary,
            allowances: bonus,
            deductions: deductions.total_deduction,
            total_salary: total_text,
            status: PaySlipStatus::Paid,
            issued_date: options.process_date,
            paid_date: Some(options.process_date),
            deduction_details: Some(deductions.details),
            attendance_record: Some(tally),
            notes: None,
        };
        Ok(PreparedPayment { record, slip, total })
    }
}

/// Writes both records, removing the ledger entry again if the pay
/// slip cannot be stored.
fn commit(
    payment: PreparedPayment,
    ledger: &mut dyn PayrollLedger,
    slips: &mut dyn PaySlipStore,
) -> Result<(PayrollRecord, PaySlip, i64)> {
    let record = ledger.create(payment.record)?;
    match slips.create(payment.slip) {
        Ok(slip) => Ok((record, slip, payment.total)),
        Err(err) => {
            if let Err(rollback) = ledger.delete(&record.id) {
                warn!("Could not remove ledger record {}: {}", record.id, rollback);
            }
            Err(err)
        }
    }
}

/// Resolves the employees a bulk payment applies to.
///
/// Explicit selections keep the order of `selected_employees` and skip
/// unknown ids.  Department and position selections keep directory
/// order.  Lists for the other selection types are ignored.
pub fn select_employees(employees: Vec<Employee>, options: &BulkPaymentOptions) -> Vec<Employee> {
    match options.selection_type {
        Some(SelectionType::Employees) => options
            .selected_employees
            .iter()
            .filter_map(|id| employees.iter().find(|e| &e.id == id).cloned())
            .collect(),
        Some(SelectionType::Departments) => employees
            .into_iter()
            .filter(|e| options.selected_departments.contains(&e.department))
            .collect(),
        Some(SelectionType::Positions) => employees
            .into_iter()
            .filter(|e| options.selected_positions.contains(&e.position))
            .collect(),
        None => Vec::new(),
    }
}
