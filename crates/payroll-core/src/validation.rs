//! # Validation Module
//!
//! Input validation for employee records and search filters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (outside this workspace)                       │
//! │  └── Form parsing, immediate user feedback                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record store (payroll-db), before BEGIN                      │
//! │  └── THIS MODULE: dni format, name, category, tenure, filters          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (employees.dni)                                            │
//! │  └── Foreign key (payroll.dni → employees.dni)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use payroll_core::validation::{validate_dni, validate_category};
//!
//! assert!(validate_dni("12345678A").is_ok());
//! assert!(validate_dni("1234567A").is_err());
//! assert!(validate_category(11).is_err());
//! ```

use crate::error::ValidationError;
use crate::salary::BASE_SALARY;
use crate::types::{Employee, EmployeeColumn, FilterValue, Gender};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a dni: exactly 8 ASCII digits followed by one uppercase ASCII
/// letter.
///
/// ## Example
/// ```rust
/// use payroll_core::validation::validate_dni;
///
/// assert!(validate_dni("00000001Z").is_ok());
/// assert!(validate_dni("12345678a").is_err());
/// assert!(validate_dni("").is_err());
/// ```
pub fn validate_dni(dni: &str) -> ValidationResult<()> {
    if dni.is_empty() {
        return Err(ValidationError::Required {
            field: "dni".to_string(),
        });
    }

    let bytes = dni.as_bytes();
    let well_formed = bytes.len() == 9
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8].is_ascii_uppercase();

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "dni".to_string(),
            reason: "must be 8 digits followed by an uppercase letter".to_string(),
        });
    }

    Ok(())
}

/// Validates an employee name.
///
/// ## Rules
/// - Must not be empty or blank
/// - At most `MAX_NAME_LENGTH` characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a category against the base-salary table.
pub fn validate_category(category: i64) -> ValidationResult<()> {
    let max = BASE_SALARY.len() as i64;

    if !(1..=max).contains(&category) {
        return Err(ValidationError::OutOfRange {
            field: "category".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Validates years of tenure.
///
/// Any non-negative count is accepted; a tenure too large for the salary
/// arithmetic is rejected by the calculator instead.
pub fn validate_tenure_years(years: i64) -> ValidationResult<()> {
    if years < 0 {
        return Err(ValidationError::BelowMinimum {
            field: "tenure_years".to_string(),
            min: 0,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of an employee; the first failure wins.
///
/// Gender needs no check here: [`Gender`] can only hold `M` or `F`.
pub fn validate_employee(employee: &Employee) -> ValidationResult<()> {
    validate_name(&employee.name)?;
    validate_dni(&employee.dni)?;
    validate_category(employee.category)?;
    validate_tenure_years(employee.tenure_years)?;
    Ok(())
}

/// Converts a raw filter value into the type of its column.
///
/// ## Rules
/// - `category`, `tenure_years`: must parse as an integer
/// - `gender`: must be `M` or `F`
/// - `name`, `dni`: taken as-is (exact match)
pub fn parse_filter_value(column: EmployeeColumn, value: &str) -> ValidationResult<FilterValue> {
    if column.is_integer() {
        return value
            .trim()
            .parse::<i64>()
            .map(FilterValue::Integer)
            .map_err(|_| ValidationError::InvalidFormat {
                field: column.column_name().to_string(),
                reason: "must be a whole number".to_string(),
            });
    }

    match column {
        EmployeeColumn::Gender => {
            let gender: Gender = value.parse()?;
            Ok(FilterValue::Text(gender.code().to_string()))
        }
        _ => Ok(FilterValue::Text(value.to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
