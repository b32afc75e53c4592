//! Record stores consumed by the engine.
//!
//! The engine never owns persistence.  It reads employees through an
//! [`EmployeeDirectory`] and writes results through a
//! [`PayrollLedger`] and a [`PaySlipStore`], all of which follow a
//! plain get/create/update/delete contract.  The in-memory
//! implementations keep records in insertion order and hand out
//! sequential ids; they back the command line tool and the tests.

use crate::error::{PayrollError, Result};
use crate::models::{Employee, PaySlip, PayrollRecord};
use serde::{Deserialize, Serialize};

/// Read-only access to the employee list.
pub trait EmployeeDirectory {
    fn employees(&self) -> Result<Vec<Employee>>;
}

/// Storage for payroll ledger records.
pub trait PayrollLedger {
    fn list(&self) -> Vec<PayrollRecord>;
    fn get(&self, id: &str) -> Result<PayrollRecord>;
    /// Stores `record` under a fresh id and returns it with that id set.
    fn create(&mut self, record: PayrollRecord) -> Result<PayrollRecord>;
    fn update(&mut self, record: PayrollRecord) -> Result<PayrollRecord>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Storage for pay slips.
pub trait PaySlipStore {
    fn list(&self) -> Vec<PaySlip>;
    fn get(&self, id: &str) -> Result<PaySlip>;
    /// Stores `slip` under a fresh id and returns it with that id set.
    fn create(&mut self, slip: PaySlip) -> Result<PaySlip>;
    fn update(&mut self, slip: PaySlip) -> Result<PaySlip>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Employees held in memory, in directory order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryEmployeeDirectory {
    employees: Vec<Employee>,
}

impl InMemoryEmployeeDirectory {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn employees(&self) -> Result<Vec<Employee>> {
        Ok(self.employees.clone())
    }
}

trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Identified for PayrollRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Identified for PaySlip {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone)]
struct RecordTable<T> {
    prefix: &'static str,
    next_id: u64,
    records: Vec<T>,
}

impl<T: Identified + Clone> RecordTable<T> {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next_id: 1,
            records: Vec::new(),
        }
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| PayrollError::not_found(format!("{} record {id}", self.prefix)))
    }

    fn get(&self, id: &str) -> Result<T> {
        self.position(id).map(|i| self.records[i].clone())
    }

    fn create(&mut self, mut record: T) -> Result<T> {
        record.set_id(format!("{}-{:04}", self.prefix, self.next_id));
        self.next_id += 1;
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, record: T) -> Result<T> {
        let i = self.position(record.id())?;
        self.records[i] = record.clone();
        Ok(record)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let i = self.position(id)?;
        self.records.remove(i);
        Ok(())
    }
}

/// Payroll ledger backed by a `Vec`; ids look like `PAY-0001`.
#[derive(Debug, Clone)]
pub struct InMemoryPayrollLedger {
    table: RecordTable<PayrollRecord>,
}

impl Default for InMemoryPayrollLedger {
    fn default() -> Self {
        Self {
            table: RecordTable::new("PAY"),
        }
    }
}

impl InMemoryPayrollLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollLedger for InMemoryPayrollLedger {
    fn list(&self) -> Vec<PayrollRecord> {
        self.table.records.clone()
    }

    fn get(&self, id: &str) -> Result<PayrollRecord> {
        self.table.get(id)
    }

    fn create(&mut self, record: PayrollRecord) -> Result<PayrollRecord> {
        self.table.create(record)
    }

    fn update(&mut self, record: PayrollRecord) -> Result<PayrollRecord> {
        self.table.update(record)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.table.delete(id)
    }
}

/// Pay slip store backed by a `Vec`; ids look like `SLIP-0001`.
#[derive(Debug, Clone)]
pub struct InMemoryPaySlipStore {
    table: RecordTable<PaySlip>,
}

impl Default for InMemoryPaySlipStore {
    fn default() -> Self {
        Self {
            table: RecordTable::new("SLIP"),
        }
    }
}

impl InMemoryPaySlipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaySlipStore for InMemoryPaySlipStore {
    fn list(&self) -> Vec<PaySlip> {
        self.table.records.clone()
    }

    fn get(&self, id: &str) -> Result<PaySlip> {
        self.table.get(id)
    }

    fn create(&mut self, slip: PaySlip) -> Result<PaySlip> {
        self.table.create(slip)
    }

    fn update(&mut self, slip: PaySlip) -> Result<PaySlip> {
        self.table.update(slip)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.table.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayrollStatus;
    use chrono::NaiveDate;

    fn record(name: &str) -> PayrollRecord {
        PayrollRecord {
            id: String::new(),
            employee_id: "E1".into(),
            employee_name: name.into(),
            position: "Staff".into(),
            salary: "Rp 1.000".into(),
            bonus: "Rp 100".into(),
            deductions: "Rp 0".into(),
            total: "Rp 1.100".into(),
            status: PayrollStatus::Pending,
            date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_ledger_crud() {
        let mut ledger = InMemoryPayrollLedger::new();
        let first = ledger.create(record("Ani")).unwrap();
        let second = ledger.create(record("Budi")).unwrap();
        assert_eq!(first.id, "PAY-0001");
        assert_eq!(second.id, "PAY-0002");

        let mut paid = ledger.get("PAY-0001").unwrap();
        paid.status = PayrollStatus::Paid;
        ledger.update(paid).unwrap();
        assert_eq!(ledger.get("PAY-0001").unwrap().status, PayrollStatus::Paid);

        ledger.delete("PAY-0001").unwrap();
        let names: Vec<_> = ledger.list().into_iter().map(|r| r.employee_name).collect();
        assert_eq!(names, vec!["Budi"]);

        // ids are not reused after a delete
        assert_eq!(ledger.create(record("Citra")).unwrap().id, "PAY-0003");
    }

    #[test]
    fn test_missing_records() {
        let mut ledger = InMemoryPayrollLedger::new();
        assert!(matches!(ledger.get("PAY-0009"), Err(PayrollError::NotFound(_))));
        assert!(ledger.delete("PAY-0009").is_err());
        let mut unknown = record("Ani");
        unknown.id = "PAY-0042".into();
        assert!(ledger.update(unknown).is_err());

        let mut slips = InMemoryPaySlipStore::new();
        assert!(slips.delete("SLIP-0001").is_err());
        assert!(slips.list().is_empty());
    }

    #[test]
    fn test_directory_from_json() {
        let directory: InMemoryEmployeeDirectory = serde_json::from_str(
            r#"[{"id": "E1", "name": "Ani", "position": "Engineer", "department": "IT", "salary": "Rp 9.000.000"},
                {"id": "E2", "name": "Budi", "position": "Clerk", "department": "HR"}]"#,
        )
        .unwrap();
        let employees = directory.employees().unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[1].salary, None);
    }
}
