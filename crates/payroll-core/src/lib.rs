//! # payroll-core: Pure Domain Logic for the Payroll Ledger
//!
//! This crate holds the employee model, its validation rules and the payroll
//! calculator. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payroll Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (outside this workspace)             │   │
//! │  │      list, search, save, edit, delete, show payroll            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ payroll-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌────────────┐   ┌────────────┐               │   │
//! │  │   │   types   │   │   salary   │   │ validation │               │   │
//! │  │   │ Employee  │   │ BASE_SALARY│   │  dni, name │               │   │
//! │  │   │  Payroll  │   │  salary()  │   │  category  │               │   │
//! │  │   └───────────┘   └────────────┘   └────────────┘               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                payroll-db (Record Store)                        │   │
//! │  │        employees + payroll tables, one transaction each        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Employee, Gender, Payroll, EmployeeColumn)
//! - [`salary`] - The payroll calculator
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use payroll_core::salary::salary;
//!
//! // Category 3 starts at 90000, plus 5000 per year of tenure
//! assert_eq!(salary(3, 2).unwrap(), 100_000);
//! assert!(salary(11, 0).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod salary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use salary::{salary, PayrollCalculator, BASE_SALARY, SENIORITY_BONUS};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted employee name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;
