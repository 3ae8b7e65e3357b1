//! # Error Types
//!
//! Domain-specific error types for payroll-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  payroll-core errors (this file)                                       │
//! │  ├── CoreError        - Calculator failures                            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  payroll-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures, NotFound, Invalid(CoreError) │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → request layer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category is outside the base-salary table.
    ///
    /// ## When This Occurs
    /// - Category 0 or negative
    /// - Category above the number of salary bands (10)
    #[error("Invalid category: {0} (expected 1 to {})", crate::BASE_SALARY.len())]
    InvalidCategory(i64),

    /// Tenure is negative, or large enough to overflow the salary.
    #[error("Invalid tenure: {0} years")]
    InvalidTenure(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any persistence attempt, so they never leave partial state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below its floor.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed dni, non-numeric filter value).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
