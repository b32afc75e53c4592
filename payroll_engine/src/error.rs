//! Error types for the payroll engine.

use thiserror::Error;

/// Errors raised by the payroll calculations and record stores.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayrollError {
    /// The attendance tally breaks `0 < total_days` or
    /// `present_days <= total_days`.
    #[error("invalid attendance: present {present_days} of {total_days} working days")]
    InvalidAttendance { present_days: u32, total_days: u32 },

    /// A deduction policy field is out of range.
    #[error("invalid deduction policy: {0}")]
    InvalidPolicy(String),

    /// Month outside `1..=12`.
    #[error("invalid pay period: month {month} of {year}")]
    InvalidPeriod { month: u32, year: i32 },

    /// Record or employee lookup failed.
    #[error("not found: {0}")]
    NotFound(String),

    /// Pay slip status cannot move from `from` to `to`.
    #[error("cannot move pay slip from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// A backing store refused an operation.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias for [`PayrollError`].
pub type Result<T> = std::result::Result<T, PayrollError>;

impl PayrollError {
    /// Create an invalid policy error with message
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::InvalidPolicy(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a store error with message
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
