//! Attendance sources for payroll runs.
//!
//! The bulk processor asks an [`AttendanceSource`] for each selected
//! employee's tally.  [`FixedAttendance`] serves known tallies from a
//! map; [`RandomAttendance`] invents plausible ones for demos and must
//! not back a real payroll.

use crate::error::Result;
use crate::models::{AttendanceTally, Employee, DEFAULT_WORKING_DAYS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supplies the attendance tally for an employee in a pay period.
///
/// Sources must be thread‑safe (`Send + Sync`) because the engine
/// queries them from rayon's worker threads.
pub trait AttendanceSource: Send + Sync {
    fn tally(&self, employee: &Employee, month: u32, year: i32) -> Result<AttendanceTally>;
}

/// Tallies keyed by employee id.  Employees without an entry are
/// treated as fully present over the default working days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedAttendance {
    tallies: HashMap<String, AttendanceTally>,
}

impl FixedAttendance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, employee_id: impl Into<String>, tally: AttendanceTally) -> Self {
        self.tallies.insert(employee_id.into(), tally);
        self
    }
}

impl AttendanceSource for FixedAttendance {
    fn tally(&self, employee: &Employee, _month: u32, _year: i32) -> Result<AttendanceTally> {
        Ok(self
            .tallies
            .get(&employee.id)
            .copied()
            .unwrap_or_else(|| AttendanceTally::full(DEFAULT_WORKING_DAYS)))
    }
}

/// Demo generator: up to `max_absent` absences and `max_late` late
/// days over the default working days.
#[derive(Debug, Clone, Copy)]
pub struct RandomAttendance {
    pub max_absent: u32,
    pub max_late: u32,
}

impl Default for RandomAttendance {
    fn default() -> Self {
        Self {
            max_absent: 3,
            max_late: 3,
        }
    }
}

impl AttendanceSource for RandomAttendance {
    fn tally(&self, _employee: &Employee, _month: u32, _year: i32) -> Result<AttendanceTally> {
        let mut rng = rand::thread_rng();
        let absent = rng.gen_range(0..=self.max_absent.min(DEFAULT_WORKING_DAYS));
        let present_days = DEFAULT_WORKING_DAYS - absent;
        let late_days = rng.gen_range(0..=self.max_late.min(present_days));
        Ok(AttendanceTally {
            present_days,
            total_days: DEFAULT_WORKING_DAYS,
            late_days,
        })
    }
}
