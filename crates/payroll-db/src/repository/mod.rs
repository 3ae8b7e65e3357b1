//! # Repository Module
//!
//! Database repository implementations for the payroll ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Request layer                                                         │
//! │       │                                                                 │
//! │       │  db.employees().create(&employee)                              │
//! │       ▼                                                                 │
//! │  EmployeeRepository                                                    │
//! │  ├── list_all / find_by_attribute / find_payroll_by_identifier        │
//! │  └── create / update / delete   ← one transaction, both tables         │
//! │       │                                                                 │
//! │       │  Bound SQL only                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (employees, payroll)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Employee and payroll rows

pub mod employee;
