//! Deduction and total salary calculations.
//!
//! The `deduction` module turns a base salary, an attendance tally and
//! a [`DeductionPolicy`] into an itemised [`DeductionResult`], and
//! combines salary components into a payable total.  All inputs and
//! outputs are rupiah display strings; parsing follows the best-effort
//! rules of [`extract_numeric_value`].

use crate::currency::{extract_numeric_value, format_to_rupiah};
use crate::error::Result;
use crate::models::{AttendanceTally, DeductionDetails, DeductionPolicy, DeductionResult};

/// Rounded absence and late deductions in rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeductionAmounts {
    pub absence: i64,
    pub late: i64,
}

impl DeductionAmounts {
    pub fn total(&self) -> i64 {
        self.absence.saturating_add(self.late)
    }
}

/// Computes the numeric absence and late deductions.
///
/// The daily salary stays fractional; each deduction is rounded to the
/// nearest rupiah on its own before they are summed.
pub fn deduction_amounts(
    base_salary: i64,
    attendance: &AttendanceTally,
    policy: &DeductionPolicy,
) -> Result<DeductionAmounts> {
    attendance.validate()?;
    policy.validate()?;

    let working_days = attendance.total_days;
    let absent_days = i64::from(attendance.absent_days());
    let late_days = i64::from(attendance.late_days);

    let (absence, late) = if policy.use_percentage {
        let daily_salary = base_salary as f64 / f64::from(working_days);
        (
            (absent_days as f64 * daily_salary * (policy.absence_rate / 100.0)).round() as i64,
            (late_days as f64 * daily_salary * (policy.late_rate / 100.0)).round() as i64,
        )
    } else {
        (
            absent_days.saturating_mul(policy.absence_flat_amount),
            late_days.saturating_mul(policy.late_flat_amount),
        )
    };
    Ok(DeductionAmounts { absence, late })
}

/// Calculates the attendance deductions for `base_salary`.
///
/// Returns [`PayrollError::InvalidAttendance`] when the tally has no
/// working days or more present days than working days, and
/// [`PayrollError::InvalidPolicy`] for an out-of-range policy.
///
/// [`PayrollError::InvalidAttendance`]: crate::error::PayrollError::InvalidAttendance
/// [`PayrollError::InvalidPolicy`]: crate::error::PayrollError::InvalidPolicy
pub fn calculate_deductions(
    base_salary: &str,
    attendance: &AttendanceTally,
    policy: &DeductionPolicy,
) -> Result<DeductionResult> {
    let amounts = deduction_amounts(extract_numeric_value(base_salary), attendance, policy)?;
    Ok(DeductionResult {
        total_deduction: format_to_rupiah(amounts.total()),
        details: DeductionDetails {
            absence: format_to_rupiah(amounts.absence),
            late: format_to_rupiah(amounts.late),
            tax: None,
            other: None,
        },
    })
}

/// `base + allowances - deductions`, never below zero.
pub fn calculate_total_salary(base_salary: &str, allowances: &str, deductions: &str) -> String {
    let total = extract_numeric_value(base_salary)
        .saturating_add(extract_numeric_value(allowances))
        .saturating_sub(extract_numeric_value(deductions));
    format_to_rupiah(total.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;

    fn tally(present_days: u32, total_days: u32, late_days: u32) -> AttendanceTally {
        AttendanceTally {
            present_days,
            total_days,
            late_days,
        }
    }

    #[test]
    fn test_full_attendance_has_no_deductions() {
        let result =
            calculate_deductions("Rp 10.000.000", &tally(22, 22, 0), &DeductionPolicy::default())
                .unwrap();
        assert_eq!(result.total_deduction, "Rp 0");
        assert_eq!(result.details.absence, "Rp 0");
        assert_eq!(result.details.late, "Rp 0");
        assert!(result.details.tax.is_none());
        assert!(result.details.other.is_none());
    }

    #[test]
    fn test_percentage_mode() {
        let result =
            calculate_deductions("Rp 11.000.000", &tally(20, 22, 1), &DeductionPolicy::default())
                .unwrap();
        assert_eq!(result.details.absence, "Rp 50.000");
        assert_eq!(result.details.late, "Rp 5.000");
        assert_eq!(result.total_deduction, "Rp 55.000");
    }

    #[test]
    fn test_flat_mode() {
        let policy = DeductionPolicy {
            use_percentage: false,
            ..DeductionPolicy::default()
        };
        let result = calculate_deductions("Rp 11.000.000", &tally(20, 22, 1), &policy).unwrap();
        assert_eq!(result.details.absence, "Rp 400.000");
        assert_eq!(result.details.late, "Rp 50.000");
        assert_eq!(result.total_deduction, "Rp 450.000");
    }

    #[test]
    fn test_each_part_rounded_before_summing() {
        // daily = 10 / 22; absence = 3 * daily * 0.5 = 0.68 -> 1, late = 3 * daily * 0.5 -> 1
        let policy = DeductionPolicy {
            absence_rate: 50.0,
            late_rate: 50.0,
            ..DeductionPolicy::default()
        };
        let amounts = deduction_amounts(10, &tally(19, 22, 3), &policy).unwrap();
        assert_eq!(amounts, DeductionAmounts { absence: 1, late: 1 });
        assert_eq!(amounts.total(), 2);
    }

    #[test]
    fn test_daily_salary_is_not_truncated() {
        // 1_000_000 / 22 = 45454.54..; 22 absent days at 100% recovers the full salary
        let policy = DeductionPolicy {
            absence_rate: 100.0,
            ..DeductionPolicy::default()
        };
        let amounts = deduction_amounts(1_000_000, &tally(0, 22, 0), &policy).unwrap();
        assert_eq!(amounts.absence, 1_000_000);
    }

    #[test]
    fn test_unparseable_salary_counts_as_zero() {
        let result =
            calculate_deductions("", &tally(10, 22, 5), &DeductionPolicy::default()).unwrap();
        assert_eq!(result.total_deduction, "Rp 0");
    }

    #[test]
    fn test_precondition_violations_are_errors() {
        let policy = DeductionPolicy::default();
        assert!(matches!(
            calculate_deductions("Rp 1.000", &tally(0, 0, 0), &policy),
            Err(PayrollError::InvalidAttendance { .. })
        ));
        assert!(matches!(
            calculate_deductions("Rp 1.000", &tally(23, 22, 0), &policy),
            Err(PayrollError::InvalidAttendance { .. })
        ));
        let bad_policy = DeductionPolicy {
            absence_rate: -1.0,
            ..policy
        };
        assert!(matches!(
            calculate_deductions("Rp 1.000", &tally(22, 22, 0), &bad_policy),
            Err(PayrollError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_total_salary() {
        assert_eq!(
            calculate_total_salary("Rp 8.000.000", "Rp 800.000", "Rp 55.000"),
            "Rp 8.745.000"
        );
    }

    #[test]
    fn test_total_salary_floors_at_zero() {
        assert_eq!(calculate_total_salary("Rp 1.000.000", "Rp 0", "Rp 2.000.000"), "Rp 0");
    }
}
