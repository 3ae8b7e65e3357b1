//! # Domain Types
//!
//! Core domain types used throughout the payroll ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐          1:1          ┌─────────────────┐          │
//! │  │    Employee     │ ────────────────────► │     Payroll     │          │
//! │  │  ─────────────  │                       │  ─────────────  │          │
//! │  │  dni (unique)   │                       │  dni (FK)       │          │
//! │  │  name           │   salary(category,    │  salary         │          │
//! │  │  gender (M/F)   │          tenure)      │  updated_at     │          │
//! │  │  category 1-10  │                       └─────────────────┘          │
//! │  │  tenure_years   │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │     Gender      │   │ EmployeeColumn  │  allow-list for attribute    │
//! │  │  M / F          │   │ name, dni, ...  │  filters                     │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `dni` is the natural key: 8 digits and an uppercase letter. It is the
//! lookup key for every operation, but it can itself be edited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};

// =============================================================================
// Gender
// =============================================================================

/// Gender code stored with an employee.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "M"))]
    Male,
    #[serde(rename = "F")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "F"))]
    Female,
}

impl Gender {
    /// The single-letter code used in storage.
    pub const fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl TryFrom<char> for Gender {
    type Error = ValidationError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'M' => Ok(Gender::Male),
            'F' => Ok(Gender::Female),
            _ => Err(gender_not_allowed()),
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Gender::try_from(c),
            _ => Err(gender_not_allowed()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn gender_not_allowed() -> ValidationError {
    ValidationError::NotAllowed {
        field: "gender".to_string(),
        allowed: vec!["M".to_string(), "F".to_string()],
    }
}

// =============================================================================
// Employee
// =============================================================================

/// An employee record.
///
/// The computed salary is never stored here: [`Employee::salary`] derives it
/// from `category` and `tenure_years` on every call.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Display name, non-empty.
    pub name: String,

    /// National identifier: 8 ASCII digits followed by an uppercase letter.
    pub dni: String,

    pub gender: Gender,

    /// Salary band, 1 to 10.
    pub category: i64,

    /// Whole years worked.
    pub tenure_years: i64,
}

impl Employee {
    /// Builds an employee without validating it.
    ///
    /// Validation runs in the record store before any write; use
    /// [`crate::validation::validate_employee`] to check earlier.
    pub fn new(
        name: impl Into<String>,
        dni: impl Into<String>,
        gender: Gender,
        category: i64,
        tenure_years: i64,
    ) -> Self {
        Employee {
            name: name.into(),
            dni: dni.into(),
            gender,
            category,
            tenure_years,
        }
    }

    /// Computes this employee's salary with the payroll calculator.
    #[inline]
    pub fn salary(&self) -> CoreResult<i64> {
        crate::salary::salary(self.category, self.tenure_years)
    }
}

// =============================================================================
// Payroll
// =============================================================================

/// One payroll row: the stored salary for one employee.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// The owning employee's dni.
    pub dni: String,

    /// Salary at the last write of the employee.
    pub salary: i64,

    /// When the salary was last recomputed.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Employee Column (filter allow-list)
// =============================================================================

/// Employee attributes that may be used as a search filter.
///
/// Attribute names coming from callers are parsed into this enum before a
/// query is built; only [`EmployeeColumn::column_name`] reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeColumn {
    Name,
    Dni,
    Gender,
    Category,
    TenureYears,
}

impl EmployeeColumn {
    /// Every filterable column, in table order.
    pub const ALL: [EmployeeColumn; 5] = [
        EmployeeColumn::Name,
        EmployeeColumn::Dni,
        EmployeeColumn::Gender,
        EmployeeColumn::Category,
        EmployeeColumn::TenureYears,
    ];

    /// The SQL column name.
    pub const fn column_name(&self) -> &'static str {
        match self {
            EmployeeColumn::Name => "name",
            EmployeeColumn::Dni => "dni",
            EmployeeColumn::Gender => "gender",
            EmployeeColumn::Category => "category",
            EmployeeColumn::TenureYears => "tenure_years",
        }
    }

    /// Whether values for this column are integers.
    pub const fn is_integer(&self) -> bool {
        matches!(self, EmployeeColumn::Category | EmployeeColumn::TenureYears)
    }
}

impl FromStr for EmployeeColumn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeColumn::ALL
            .into_iter()
            .find(|column| column.column_name() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "attribute".to_string(),
                allowed: EmployeeColumn::ALL
                    .iter()
                    .map(|column| column.column_name().to_string())
                    .collect(),
            })
    }
}

impl fmt::Display for EmployeeColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A filter value converted to its column's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

// =============================================================================
// Unit Tests
// =============================================================================
