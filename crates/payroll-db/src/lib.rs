//! # payroll-db: Record Store for the Payroll Ledger
//!
//! This crate keeps employee rows and their payroll rows consistent in
//! SQLite, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payroll Ledger Data Flow                           │
//! │                                                                         │
//! │  Request layer (create / update / delete / list / search)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    payroll-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐    ┌─────────────┐ │   │
//! │  │   │   Database    │    │   Repository     │    │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │  (employee.rs)   │    │ (embedded)  │ │   │
//! │  │   │               │    │                  │    │             │ │   │
//! │  │   │ SqlitePool    │◄───│ EmployeeRepo     │    │ 001_...sql  │ │   │
//! │  │   │ shared()      │    │ tx per write     │    │             │ │   │
//! │  │   └───────────────┘    └────────┬─────────┘    └─────────────┘ │   │
//! │  │                                 │ salary()                     │   │
//! │  │                                 ▼                              │   │
//! │  │                         payroll-core                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (employees, payroll)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The employee record store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use payroll_core::{Employee, Gender};
//! use payroll_db::{CreateOutcome, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("payroll.db")).await?;
//!
//! let ana = Employee::new("Ana", "12345678A", Gender::Male, 3, 2);
//! if let CreateOutcome::Created { salary, .. } = db.employees().create(&ana).await? {
//!     assert_eq!(salary, 100_000);
//! }
//!
//! let salary = db.employees().find_payroll_by_identifier("12345678A").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{shared, Database, DbConfig};

pub use repository::employee::{CreateOutcome, DeleteOutcome, EmployeeRepository, UpdateOutcome};
