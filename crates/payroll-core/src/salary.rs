//! # Salary Module
//!
//! The payroll calculator: a pure mapping from (category, tenure) to salary.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  salary = BASE_SALARY[category - 1] + SENIORITY_BONUS × tenure_years   │
//! │                                                                         │
//! │  category:  1      2      3      4       5    ...    10                │
//! │  base:   50000  70000  90000  110000  130000  ...  230000              │
//! │                                                                         │
//! │  Example: category 3, 2 years → 90000 + 5000 × 2 = 100000              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use payroll_core::salary::salary;
//!
//! assert_eq!(salary(1, 0).unwrap(), 50_000);
//! assert_eq!(salary(10, 3).unwrap(), 245_000);
//! ```
//!
//! There is no state to share: the table is a `const` and the function is
//! deterministic, so callers may invoke it from any thread.

use crate::error::{CoreError, CoreResult};
use crate::types::Employee;

/// Base salary per category, indexed by `category - 1`.
pub const BASE_SALARY: [i64; 10] = [
    50_000, 70_000, 90_000, 110_000, 130_000, 150_000, 170_000, 190_000, 210_000, 230_000,
];

/// Added to the base salary for each year of tenure.
pub const SENIORITY_BONUS: i64 = 5_000;

/// Computes the salary for a category and years of tenure.
///
/// ## Errors
/// - [`CoreError::InvalidCategory`] when `category` is outside `1..=10`
/// - [`CoreError::InvalidTenure`] when `tenure_years` is negative or the
///   result would overflow
pub fn salary(category: i64, tenure_years: i64) -> CoreResult<i64> {
    let base = usize::try_from(category)
        .ok()
        .and_then(|c| c.checked_sub(1))
        .and_then(|index| BASE_SALARY.get(index))
        .copied()
        .ok_or(CoreError::InvalidCategory(category))?;

    if tenure_years < 0 {
        return Err(CoreError::InvalidTenure(tenure_years));
    }

    SENIORITY_BONUS
        .checked_mul(tenure_years)
        .and_then(|bonus| bonus.checked_add(base))
        .ok_or(CoreError::InvalidTenure(tenure_years))
}

/// Stateless handle to the calculator, for code that takes it as a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollCalculator;

impl PayrollCalculator {
    /// See [`salary`].
    #[inline]
    pub fn salary(&self, category: i64, tenure_years: i64) -> CoreResult<i64> {
        salary(category, tenure_years)
    }

    /// Computes the salary for an employee's current category and tenure.
    #[inline]
    pub fn salary_for(&self, employee: &Employee) -> CoreResult<i64> {
        salary(employee.category, employee.tenure_years)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
