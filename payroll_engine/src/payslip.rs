//! Single pay slip preparation and status changes.
//!
//! Outside of bulk runs a pay slip starts as a draft, is issued to
//! the employee, and is finally marked paid.  Draft totals go through
//! [`calculate_total_salary`], so they never drop below zero.

use crate::currency::{extract_numeric_value, format_to_rupiah};
use crate::deduction::{calculate_deductions, calculate_total_salary};
use crate::error::{PayrollError, Result};
use crate::models::{AttendanceTally, DeductionPolicy, Employee, PaySlip, PaySlipStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Manually entered parts of a pay slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySlipRequest {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub allowances: Option<String>,
    #[serde(default)]
    pub tax: Option<String>,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub issued_date: NaiveDate,
}

/// Builds a draft pay slip for `employee`.
///
/// The slip's `deductions` is the sum of every itemised line: absence,
/// late, and the optional tax and other amounts.
pub fn prepare_pay_slip(
    employee: &Employee,
    attendance: &AttendanceTally,
    policy: &DeductionPolicy,
    request: &PaySlipRequest,
) -> Result<PaySlip> {
    if !(1..=12).contains(&request.month) {
        return Err(PayrollError::InvalidPeriod {
            month: request.month,
            year: request.year,
        });
    }
    let base_salary = format_to_rupiah(extract_numeric_value(
        employee.salary.as_deref().unwrap_or_default(),
    ));
    let allowances =
        format_to_rupiah(extract_numeric_value(request.allowances.as_deref().unwrap_or_default()));

    let mut deductions = calculate_deductions(&base_salary, attendance, policy)?;
    let extra = [&request.tax, &request.other]
        .into_iter()
        .flatten()
        .map(|amount| extract_numeric_value(amount))
        .fold(0i64, i64::saturating_add);
    let total_deduction =
        extract_numeric_value(&deductions.total_deduction).saturating_add(extra);
    deductions.details.tax = request.tax.as_deref().map(extract_numeric_value).map(format_to_rupiah);
    deductions.details.other =
        request.other.as_deref().map(extract_numeric_value).map(format_to_rupiah);
    let total_deduction = format_to_rupiah(total_deduction);

    Ok(PaySlip {
        id: String::new(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        position: employee.position.clone(),
        month: request.month,
        year: request.year,
        total_salary: calculate_total_salary(&base_salary, &allowances, &total_deduction),
        base_salary,
        allowances,
        deductions: total_deduction,
        status: PaySlipStatus::Draft,
        issued_date: request.issued_date,
        paid_date: None,
        deduction_details: Some(deductions.details),
        attendance_record: Some(*attendance),
        notes: request.notes.clone(),
    })
}

/// Moves a draft slip to `issued`, stamping `issued_date`.
pub fn issue_pay_slip(slip: &mut PaySlip, issued_date: NaiveDate) -> Result<()> {
    if slip.status != PaySlipStatus::Draft {
        return Err(transition(slip.status, PaySlipStatus::Issued));
    }
    slip.status = PaySlipStatus::Issued;
    slip.issued_date = issued_date;
    Ok(())
}

/// Marks a draft or issued slip as paid on `paid_date`.
pub fn mark_pay_slip_paid(slip: &mut PaySlip, paid_date: NaiveDate) -> Result<()> {
    if slip.status == PaySlipStatus::Paid {
        return Err(transition(slip.status, PaySlipStatus::Paid));
    }
    slip.status = PaySlipStatus::Paid;
    slip.paid_date = Some(paid_date);
    Ok(())
}

fn transition(from: PaySlipStatus, to: PaySlipStatus) -> PayrollError {
    PayrollError::InvalidStatusTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn employee() -> Employee {
        Employee {
            id: "E1".into(),
            name: "Ani".into(),
            position: "Engineer".into(),
            department: "IT".into(),
            salary: Some("Rp 11.000.000".into()),
        }
    }

    fn request() -> PaySlipRequest {
        PaySlipRequest {
            month: 6,
            year: 2025,
            allowances: Some("Rp 1.000.000".into()),
            tax: Some("Rp 500.000".into()),
            other: None,
            notes: Some("June payroll".into()),
            issued_date: date(28),
        }
    }

    #[test]
    fn test_prepare_draft() {
        let slip = prepare_pay_slip(
            &employee(),
            &AttendanceTally::new(20, 1),
            &DeductionPolicy::default(),
            &request(),
        )
        .unwrap();
        assert_eq!(slip.status, PaySlipStatus::Draft);
        assert_eq!(slip.base_salary, "Rp 11.000.000");
        assert_eq!(slip.deductions, "Rp 555.000");
        assert_eq!(slip.total_salary, "Rp 11.445.000");
        let details = slip.deduction_details.unwrap();
        assert_eq!(details.absence, "Rp 50.000");
        assert_eq!(details.late, "Rp 5.000");
        assert_eq!(details.tax.as_deref(), Some("Rp 500.000"));
        assert_eq!(details.other, None);
        assert_eq!(slip.paid_date, None);
    }

    #[test]
    fn test_draft_total_is_clamped() {
        let mut req = request();
        req.other = Some("Rp 20.000.000".into());
        let slip = prepare_pay_slip(
            &employee(),
            &AttendanceTally::full(22),
            &DeductionPolicy::default(),
            &req,
        )
        .unwrap();
        assert_eq!(slip.total_salary, "Rp 0");
    }

    #[test]
    fn test_prepare_rejects_bad_month() {
        let mut req = request();
        req.month = 13;
        let err = prepare_pay_slip(
            &employee(),
            &AttendanceTally::full(22),
            &DeductionPolicy::default(),
            &req,
        )
        .unwrap_err();
        assert_eq!(err, PayrollError::InvalidPeriod { month: 13, year: 2025 });
    }

    #[test]
    fn test_status_transitions() {
        let mut slip = prepare_pay_slip(
            &employee(),
            &AttendanceTally::full(22),
            &DeductionPolicy::default(),
            &request(),
        )
        .unwrap();

        issue_pay_slip(&mut slip, date(30)).unwrap();
        assert_eq!(slip.status, PaySlipStatus::Issued);
        assert_eq!(slip.issued_date, date(30));
        assert!(issue_pay_slip(&mut slip, date(30)).is_err());

        mark_pay_slip_paid(&mut slip, date(30)).unwrap();
        assert_eq!(slip.paid_date, Some(date(30)));
        assert_eq!(
            mark_pay_slip_paid(&mut slip, date(30)),
            Err(PayrollError::InvalidStatusTransition {
                from: "paid".into(),
                to: "paid".into()
            })
        );
    }
}
