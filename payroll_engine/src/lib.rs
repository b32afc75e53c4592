//! Payroll Engine library crate.
//!
//! This crate exposes the payroll deduction calculator and bulk
//! payment engine as reusable modules.  External applications may
//! depend on the `payroll_engine` crate and call into
//! `deduction::calculate_deductions` directly or run a whole payroll
//! through `engine::PayrollEngine::process_bulk_payment` with their own
//! record stores.

pub mod attendance;
pub mod config;
pub mod currency;
pub mod deduction;
pub mod engine;
pub mod error;
pub mod models;
pub mod payslip;
pub mod store;

pub use error::{PayrollError, Result};
