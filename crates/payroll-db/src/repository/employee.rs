//! # Employee Repository
//!
//! The record store: employee rows and their derived payroll rows, kept
//! consistent under create, update and delete.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_employee()            ← rejected here: DbError::Invalid      │
//! │       │                            (no transaction was opened)         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             SINGLE TRANSACTION (BEGIN IMMEDIATE)                │   │
//! │  │                                                                 │   │
//! │  │  1. SELECT COUNT(*) FROM employees WHERE dni = ?                │   │
//! │  │     └── taken? → AlreadyExists / Conflict, ROLLBACK             │   │
//! │  │                                                                 │   │
//! │  │  2. INSERT / UPDATE employees                                   │   │
//! │  │                                                                 │   │
//! │  │  3. salary(category, tenure_years)                              │   │
//! │  │                                                                 │   │
//! │  │  4. INSERT / re-key + UPSERT payroll                            │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← both rows or neither; any failure → ROLLBACK + Err(DbError)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write transactions take SQLite's write lock up front, so concurrent
//! writers queue (up to the pool's `busy_timeout`) instead of failing on a
//! stale snapshot, and the uniqueness check always sees committed rows.
//!
//! Expected outcomes (already exists, conflict, nothing to update or delete)
//! come back as `Ok` outcome enums. `Err(DbError)` always means the
//! operation failed and nothing it did is visible.

use std::fmt;

use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use payroll_core::validation::{parse_filter_value, validate_dni, validate_employee};
use payroll_core::{Employee, EmployeeColumn, FilterValue, Payroll};

/// Opens write transactions holding the write lock from the start.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Unique constraint on the identifier, as reported by SQLite.
const DNI_CONSTRAINT: &str = "employees.dni";

const SELECT_EMPLOYEES: &str = r#"
    SELECT name, dni, gender, category, tenure_years
    FROM employees
"#;

// =============================================================================
// Outcomes
// =============================================================================

/// Result of [`EmployeeRepository::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Employee and payroll rows were committed.
    Created { dni: String, salary: i64 },
    /// Another employee already has this dni; nothing was written.
    AlreadyExists { dni: String },
}

/// Result of [`EmployeeRepository::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Both rows now carry the new attributes, keyed by `dni`.
    Updated { dni: String, salary: i64 },
    /// The new dni belongs to a different employee; nothing was written.
    Conflict { dni: String },
    /// No employee has the original dni; nothing was written.
    NotFound { dni: String },
}

/// Result of [`EmployeeRepository::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Employee and payroll rows were removed.
    Deleted,
    /// No employee has this dni.
    NotFound,
}

/// Whether an outcome should be committed.
trait Applied {
    fn is_applied(&self) -> bool;
}

impl Applied for CreateOutcome {
    fn is_applied(&self) -> bool {
        matches!(self, CreateOutcome::Created { .. })
    }
}

impl Applied for UpdateOutcome {
    fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }
}

impl Applied for DeleteOutcome {
    fn is_applied(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

impl fmt::Display for CreateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateOutcome::Created { dni, salary } => {
                write!(f, "Employee {dni} created with salary {salary}")
            }
            CreateOutcome::AlreadyExists { dni } => {
                write!(f, "An employee with dni '{dni}' already exists")
            }
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::Updated { dni, salary } => {
                write!(f, "Employee {dni} updated, salary {salary}")
            }
            UpdateOutcome::Conflict { dni } => {
                write!(f, "dni '{dni}' is already used by another employee")
            }
            UpdateOutcome::NotFound { dni } => write!(f, "No employee with dni '{dni}'"),
        }
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted => f.write_str("Employee deleted"),
            DeleteOutcome::NotFound => f.write_str("No such employee"),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for employee and payroll rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.employees();
///
/// match repo.create(&employee).await? {
///     CreateOutcome::Created { salary, .. } => println!("salary {salary}"),
///     CreateOutcome::AlreadyExists { dni } => println!("{dni} is taken"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Lists every employee in insertion order. Payroll is not joined.
    pub async fn list_all(&self) -> DbResult<Vec<Employee>> {
        let sql = format!("{SELECT_EMPLOYEES} ORDER BY rowid");

        let employees: Vec<Employee> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = employees.len(), "Listed employees");
        Ok(employees)
    }

    /// Lists employees whose `attribute` equals `value` exactly.
    ///
    /// ## Rules
    /// - Empty `attribute` behaves as [`list_all`](Self::list_all)
    /// - `attribute` must be one of `name`, `dni`, `gender`, `category`,
    ///   `tenure_years`; anything else fails with `DbError::Invalid` before
    ///   a query is built
    /// - `value` is converted to the column's type and always bound
    pub async fn find_by_attribute(&self, attribute: &str, value: &str) -> DbResult<Vec<Employee>> {
        let attribute = attribute.trim();
        if attribute.is_empty() {
            return self.list_all().await;
        }

        let column: EmployeeColumn = attribute.parse()?;
        let value = parse_filter_value(column, value)?;

        debug!(column = %column, value = ?value, "Filtering employees");

        // The column name comes from the allow-list, never from the caller.
        let sql = format!(
            "{SELECT_EMPLOYEES} WHERE {} = ?1 ORDER BY rowid",
            column.column_name()
        );

        let query = sqlx::query_as::<Sqlite, Employee>(&sql);
        let query = match value {
            FilterValue::Text(text) => query.bind(text),
            FilterValue::Integer(number) => query.bind(number),
        };

        let employees = query.fetch_all(&self.pool).await?;

        debug!(count = employees.len(), "Filter returned employees");
        Ok(employees)
    }

    /// Gets an employee by dni.
    ///
    /// ## Returns
    /// * `Ok(Some(Employee))` - Employee found
    /// * `Ok(None)` - Employee not found
    pub async fn get_by_dni(&self, dni: &str) -> DbResult<Option<Employee>> {
        let sql = format!("{SELECT_EMPLOYEES} WHERE dni = ?1");

        let employee = sqlx::query_as(&sql)
            .bind(dni)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    /// Gets the full payroll row for a dni.
    pub async fn get_payroll(&self, dni: &str) -> DbResult<Option<Payroll>> {
        let payroll = sqlx::query_as(
            r#"
            SELECT dni, salary, updated_at
            FROM payroll
            WHERE dni = ?1
            "#,
        )
        .bind(dni)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payroll)
    }

    /// Gets the stored salary for a dni.
    ///
    /// ## Returns
    /// * `Ok(salary)` - Payroll row found
    /// * `Err(DbError::NotFound)` - No payroll row for this dni
    pub async fn find_payroll_by_identifier(&self, dni: &str) -> DbResult<i64> {
        self.get_payroll(dni)
            .await?
            .map(|payroll| payroll.salary)
            .ok_or_else(|| DbError::not_found("Payroll", dni))
    }

    /// Counts employees (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Creates an employee and its payroll row.
    ///
    /// ## Returns
    /// * `Ok(Created)` - Both rows committed
    /// * `Ok(AlreadyExists)` - dni taken, nothing written
    /// * `Err(DbError::Invalid)` - Rejected before the transaction
    /// * `Err(_)` - Storage failure, rolled back
    pub async fn create(&self, employee: &Employee) -> DbResult<CreateOutcome> {
        validate_employee(employee)?;

        debug!(dni = %employee.dni, "Creating employee");

        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;
        let result = insert_rows(&mut tx, employee).await;
        let outcome = settle(tx, result, &employee.dni).await?;

        match &outcome {
            CreateOutcome::Created { dni, salary } => {
                info!(dni = %dni, salary = *salary, "Employee created");
            }
            CreateOutcome::AlreadyExists { dni } => {
                warn!(dni = %dni, "Employee already exists");
            }
        }

        Ok(outcome)
    }

    /// Updates the employee found by `original_dni`, recomputing its salary.
    ///
    /// `employee.dni` may differ from `original_dni`; both rows then move to
    /// the new dni.
    ///
    /// ## Returns
    /// * `Ok(Updated)` - Both rows committed
    /// * `Ok(Conflict)` - New dni belongs to another employee, nothing written
    /// * `Ok(NotFound)` - No employee has `original_dni`, nothing written
    /// * `Err(DbError::Invalid)` - Rejected before the transaction
    /// * `Err(_)` - Storage failure, rolled back
    pub async fn update(&self, employee: &Employee, original_dni: &str) -> DbResult<UpdateOutcome> {
        validate_employee(employee)?;
        validate_dni(original_dni)?;

        debug!(dni = %employee.dni, original_dni = %original_dni, "Updating employee");

        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;
        let result = update_rows(&mut tx, employee, original_dni).await;
        let outcome = settle(tx, result, original_dni).await?;

        match &outcome {
            UpdateOutcome::Updated { dni, salary } => {
                info!(dni = %dni, original_dni = %original_dni, salary = *salary, "Employee updated");
            }
            UpdateOutcome::Conflict { dni } => {
                warn!(dni = %dni, original_dni = %original_dni, "dni already in use");
            }
            UpdateOutcome::NotFound { dni } => {
                warn!(dni = %dni, "Employee to update not found");
            }
        }

        Ok(outcome)
    }

    /// Deletes an employee and its payroll row.
    ///
    /// ## Returns
    /// * `Ok(Deleted)` - Both rows removed
    /// * `Ok(NotFound)` - No employee has this dni
    /// * `Err(_)` - Storage failure, rolled back
    pub async fn delete(&self, dni: &str) -> DbResult<DeleteOutcome> {
        validate_dni(dni)?;

        debug!(dni = %dni, "Deleting employee");

        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;
        let result = delete_rows(&mut tx, dni).await;
        let outcome = settle(tx, result, dni).await?;

        match outcome {
            DeleteOutcome::Deleted => info!(dni = %dni, "Employee deleted"),
            DeleteOutcome::NotFound => warn!(dni = %dni, "Employee to delete not found"),
        }

        Ok(outcome)
    }
}

// =============================================================================
// Transaction steps
// =============================================================================

/// Commits applied outcomes and rolls back everything else.
///
/// On failure the original error is returned; a failed rollback is only
/// logged since SQLite discards the open transaction with the connection.
async fn settle<T: Applied>(
    tx: Transaction<'static, Sqlite>,
    result: DbResult<T>,
    dni: &str,
) -> DbResult<T> {
    match result {
        Ok(outcome) if outcome.is_applied() => {
            tx.commit().await?;
            Ok(outcome)
        }
        Ok(outcome) => {
            debug!(dni = %dni, "Nothing to apply, rolling back");
            tx.rollback().await?;
            Ok(outcome)
        }
        Err(err) => {
            warn!(dni = %dni, error = %err, "Write failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(dni = %dni, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn dni_taken(conn: &mut SqliteConnection, dni: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE dni = ?1")
        .bind(dni)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

async fn insert_rows(conn: &mut SqliteConnection, employee: &Employee) -> DbResult<CreateOutcome> {
    if dni_taken(conn, &employee.dni).await? {
        return Ok(CreateOutcome::AlreadyExists {
            dni: employee.dni.clone(),
        });
    }

    let now = Utc::now();

    let inserted = sqlx::query(
        r#"
        INSERT INTO employees (
            name, dni, gender, category, tenure_years, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7
        )
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.dni)
    .bind(employee.gender)
    .bind(employee.category)
    .bind(employee.tenure_years)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from);

    match inserted {
        // Backstop for the check above; other unique violations are failures.
        Err(DbError::UniqueViolation { ref field, .. }) if field == DNI_CONSTRAINT => {
            return Ok(CreateOutcome::AlreadyExists {
                dni: employee.dni.clone(),
            });
        }
        Err(err) => return Err(err),
        Ok(_) => {}
    }

    let salary = employee.salary()?;

    sqlx::query(
        r#"
        INSERT INTO payroll (dni, salary, updated_at)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(&employee.dni)
    .bind(salary)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(CreateOutcome::Created {
        dni: employee.dni.clone(),
        salary,
    })
}

async fn update_rows(
    conn: &mut SqliteConnection,
    employee: &Employee,
    original_dni: &str,
) -> DbResult<UpdateOutcome> {
    let conflict = || UpdateOutcome::Conflict {
        dni: employee.dni.clone(),
    };

    if employee.dni != original_dni && dni_taken(conn, &employee.dni).await? {
        return Ok(conflict());
    }

    let now = Utc::now();

    let updated = sqlx::query(
        r#"
        UPDATE employees SET
            name = ?1,
            dni = ?2,
            gender = ?3,
            category = ?4,
            tenure_years = ?5,
            updated_at = ?6
        WHERE dni = ?7
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.dni)
    .bind(employee.gender)
    .bind(employee.category)
    .bind(employee.tenure_years)
    .bind(now)
    .bind(original_dni)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from);

    let updated = match updated {
        Err(DbError::UniqueViolation { ref field, .. }) if field == DNI_CONSTRAINT => {
            return Ok(conflict());
        }
        other => other?,
    };

    if updated.rows_affected() == 0 {
        return Ok(UpdateOutcome::NotFound {
            dni: original_dni.to_string(),
        });
    }

    // ON UPDATE CASCADE normally moved it already; this keeps a rename from
    // orphaning the old row when foreign keys are not enforced.
    if employee.dni != original_dni {
        sqlx::query("UPDATE payroll SET dni = ?1 WHERE dni = ?2")
            .bind(&employee.dni)
            .bind(original_dni)
            .execute(&mut *conn)
            .await?;
    }

    let salary = employee.salary()?;

    // Upsert so a missing payroll row is restored rather than left absent.
    sqlx::query(
        r#"
        INSERT INTO payroll (dni, salary, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (dni) DO UPDATE SET
            salary = excluded.salary,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&employee.dni)
    .bind(salary)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(UpdateOutcome::Updated {
        dni: employee.dni.clone(),
        salary,
    })
}

async fn delete_rows(conn: &mut SqliteConnection, dni: &str) -> DbResult<DeleteOutcome> {
    sqlx::query("DELETE FROM payroll WHERE dni = ?1")
        .bind(dni)
        .execute(&mut *conn)
        .await?;

    let deleted = sqlx::query("DELETE FROM employees WHERE dni = ?1")
        .bind(dni)
        .execute(&mut *conn)
        .await?;

    if deleted.rows_affected() == 0 {
        return Ok(DeleteOutcome::NotFound);
    }

    Ok(DeleteOutcome::Deleted)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use payroll_core::{salary, Gender};
    use std::time::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn ana() -> Employee {
        Employee::new("Ana", "12345678A", Gender::Male, 3, 2)
    }

    fn luis() -> Employee {
        Employee::new("Luis", "87654321B", Gender::Male, 1, 0)
    }

    fn marta() -> Employee {
        Employee::new("Marta", "11111111C", Gender::Female, 10, 3)
    }

    /// Makes every payroll write abort, to provoke a failure mid-transaction.
    async fn refuse_payroll_writes(db: &Database) {
        sqlx::query(
            "CREATE TRIGGER refuse_payroll_insert BEFORE INSERT ON payroll \
             BEGIN SELECT RAISE(ABORT, 'payroll write refused'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "CREATE TRIGGER refuse_payroll_update BEFORE UPDATE ON payroll \
             BEGIN SELECT RAISE(ABORT, 'payroll write refused'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn payroll_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM payroll")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_computes_payroll() {
        let db = test_db().await;
        let repo = db.employees();

        let outcome = repo.create(&ana()).await.unwrap();
        assert_eq!(
            outcome,
            CreateOutcome::Created {
                dni: "12345678A".to_string(),
                salary: 100_000,
            }
        );

        assert_eq!(repo.find_payroll_by_identifier("12345678A").await.unwrap(), 100_000);
        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), Some(ana()));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_dni() {
        let db = test_db().await;
        let repo = db.employees();

        repo.create(&ana()).await.unwrap();

        let mut twin = luis();
        twin.dni = "12345678A".to_string();
        let outcome = repo.create(&twin).await.unwrap();
        assert_eq!(
            outcome,
            CreateOutcome::AlreadyExists {
                dni: "12345678A".to_string()
            }
        );

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get_by_dni("12345678A").await.unwrap().unwrap().name, "Ana");
        assert_eq!(repo.find_payroll_by_identifier("12345678A").await.unwrap(), 100_000);
    }

    /// File-backed database with a real multi-connection pool.
    async fn file_db(dir: &tempfile::TempDir) -> Database {
        let config = DbConfig::new(dir.path().join("payroll.db")).max_connections(8);
        Database::new(config).await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_for_distinct_dnis_all_commit() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = db.employees();
                let employee = Employee::new(format!("Worker {i}"), format!("{i:08}A"), Gender::Male, 1, i);
                tokio::spawn(async move { repo.create(&employee).await })
            })
            .collect();

        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert!(matches!(outcome, CreateOutcome::Created { .. }), "{outcome}");
        }

        assert_eq!(db.employees().count().await.unwrap(), 32);
        assert_eq!(payroll_rows(&db).await, 32);
        assert_eq!(db.employees().find_payroll_by_identifier("00000031A").await.unwrap(), 50_000 + 31 * 5_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_for_one_dni_admit_one() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = db.employees();
                let employee = Employee::new(format!("Clone {i}"), "22222222D", Gender::Female, 2, i);
                tokio::spawn(async move { repo.create(&employee).await })
            })
            .collect();

        let mut created = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                CreateOutcome::Created { .. } => created += 1,
                CreateOutcome::AlreadyExists { .. } => rejected += 1,
            }
        }

        assert_eq!(created, 1);
        assert_eq!(rejected, 15);
        assert_eq!(db.employees().count().await.unwrap(), 1);
        assert_eq!(payroll_rows(&db).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_renames_to_one_dni_admit_one() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;
        let repo = db.employees();

        for i in 0..8 {
            let employee = Employee::new(format!("Worker {i}"), format!("{i:08}B"), Gender::Male, 2, 0);
            repo.create(&employee).await.unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = db.employees();
                let original = format!("{i:08}B");
                let renamed = Employee::new(format!("Worker {i}"), "99999999Z", Gender::Male, 2, 1);
                tokio::spawn(async move { repo.update(&renamed, &original).await })
            })
            .collect();

        let mut updated = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                UpdateOutcome::Updated { .. } => updated += 1,
                UpdateOutcome::Conflict { .. } => conflicts += 1,
                UpdateOutcome::NotFound { dni } => panic!("{dni} vanished"),
            }
        }

        assert_eq!(updated, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(repo.count().await.unwrap(), 8);
        assert_eq!(payroll_rows(&db).await, 8);
        assert_eq!(repo.find_payroll_by_identifier("99999999Z").await.unwrap(), 75_000);
    }

    #[tokio::test]
    async fn test_create_accepts_long_tenure() {
        let db = test_db().await;
        let repo = db.employees();

        let veteran = Employee::new("Old", "12345678A", Gender::Male, 1, 71);
        let outcome = repo.create(&veteran).await.unwrap();
        assert_eq!(
            outcome,
            CreateOutcome::Created {
                dni: "12345678A".to_string(),
                salary: 405_000,
            }
        );
    }

    #[tokio::test]
    async fn test_overflowing_tenure_writes_nothing() {
        let db = test_db().await;
        let repo = db.employees();

        let absurd = Employee::new("Old", "12345678A", Gender::Male, 1, i64::MAX);
        let err = repo.create(&absurd).await.unwrap_err();
        assert!(err.is_invalid(), "{err}");

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(payroll_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_other_unique_violations_are_failures() {
        let db = test_db().await;
        let repo = db.employees();
        sqlx::query("CREATE UNIQUE INDEX employees_name_unique ON employees (name)")
            .execute(db.pool())
            .await
            .unwrap();
        repo.create(&ana()).await.unwrap();

        let mut namesake = luis();
        namesake.name = "Ana".to_string();
        let err = repo.create(&namesake).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "employees.name"));

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get_by_dni("87654321B").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_employee_is_rejected_before_writing() {
        let db = test_db().await;
        let repo = db.employees();

        let cases = [
            Employee::new("", "12345678A", Gender::Male, 3, 2),
            Employee::new("Ana", "1234567A", Gender::Male, 3, 2),
            Employee::new("Ana", "12345678a", Gender::Male, 3, 2),
            Employee::new("Ana", "12345678A", Gender::Male, 0, 2),
            Employee::new("Ana", "12345678A", Gender::Male, 11, 2),
            Employee::new("Ana", "12345678A", Gender::Male, 3, -1),
        ];

        for employee in &cases {
            let err = repo.create(employee).await.unwrap_err();
            assert!(err.is_invalid(), "{employee:?} gave {err}");
        }

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(payroll_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_failed_payroll_insert_rolls_back_employee() {
        let db = test_db().await;
        let repo = db.employees();
        refuse_payroll_writes(&db).await;

        let err = repo.create(&ana()).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(ref msg) if msg.contains("payroll write refused")));

        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_payroll_update_rolls_back_employee() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();
        refuse_payroll_writes(&db).await;

        let mut promoted = ana();
        promoted.category = 5;
        assert!(repo.update(&promoted, "12345678A").await.is_err());

        let stored = repo.get_by_dni("12345678A").await.unwrap().unwrap();
        assert_eq!(stored.category, 3);
        assert_eq!(repo.find_payroll_by_identifier("12345678A").await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_update_recomputes_salary() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();
        let before = repo.get_payroll("12345678A").await.unwrap().unwrap();

        let mut promoted = ana();
        promoted.category = 10;
        promoted.tenure_years = 3;
        let outcome = repo.update(&promoted, "12345678A").await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                dni: "12345678A".to_string(),
                salary: 245_000,
            }
        );

        let after = repo.get_payroll("12345678A").await.unwrap().unwrap();
        assert_eq!(after.salary, salary(10, 3).unwrap());
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), Some(promoted));
    }

    #[tokio::test]
    async fn test_update_renames_both_rows() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();

        let mut renamed = ana();
        renamed.dni = "99999999Z".to_string();
        renamed.tenure_years = 5;
        let outcome = repo.update(&renamed, "12345678A").await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                dni: "99999999Z".to_string(),
                salary: 115_000,
            }
        );

        let err = repo.find_payroll_by_identifier("12345678A").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.find_payroll_by_identifier("99999999Z").await.unwrap(), 115_000);
        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), None);
        assert_eq!(payroll_rows(&db).await, 1);
    }

    #[tokio::test]
    async fn test_rename_moves_payroll_without_cascade() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();

        // Single connection, so the pragma holds for the update below.
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(db.pool())
            .await
            .unwrap();

        let mut renamed = ana();
        renamed.dni = "99999999Z".to_string();
        repo.update(&renamed, "12345678A").await.unwrap();

        assert_eq!(payroll_rows(&db).await, 1);
        assert!(repo
            .find_payroll_by_identifier("12345678A")
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(repo.find_payroll_by_identifier("99999999Z").await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_update_conflict_writes_nothing() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();
        repo.create(&luis()).await.unwrap();

        let mut clash = ana();
        clash.dni = luis().dni;
        clash.category = 9;
        let outcome = repo.update(&clash, "12345678A").await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Conflict {
                dni: "87654321B".to_string()
            }
        );
        assert_eq!(outcome.to_string(), "dni '87654321B' is already used by another employee");

        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), Some(ana()));
        assert_eq!(repo.get_by_dni("87654321B").await.unwrap(), Some(luis()));
        assert_eq!(repo.find_payroll_by_identifier("12345678A").await.unwrap(), 100_000);
        assert_eq!(repo.find_payroll_by_identifier("87654321B").await.unwrap(), 50_000);
    }

    #[tokio::test]
    async fn test_update_missing_employee() {
        let db = test_db().await;
        let repo = db.employees();

        let outcome = repo.update(&ana(), "12345678A").await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::NotFound {
                dni: "12345678A".to_string()
            }
        );
        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(payroll_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_update_restores_missing_payroll_row() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();

        sqlx::query("DELETE FROM payroll")
            .execute(db.pool())
            .await
            .unwrap();

        repo.update(&ana(), "12345678A").await.unwrap();
        assert_eq!(repo.find_payroll_by_identifier("12345678A").await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_delete_removes_both_rows() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();
        repo.create(&luis()).await.unwrap();

        assert_eq!(repo.delete("12345678A").await.unwrap(), DeleteOutcome::Deleted);

        assert_eq!(repo.get_by_dni("12345678A").await.unwrap(), None);
        assert!(repo
            .find_payroll_by_identifier("12345678A")
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(repo.find_payroll_by_identifier("87654321B").await.unwrap(), 50_000);
        assert_eq!(payroll_rows(&db).await, 1);

        assert_eq!(repo.delete("12345678A").await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = test_db().await;
        let repo = db.employees();
        assert!(repo.list_all().await.unwrap().is_empty());

        for employee in [marta(), ana(), luis()] {
            repo.create(&employee).await.unwrap();
        }

        let dnis: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.dni)
            .collect();
        assert_eq!(dnis, ["11111111C", "12345678A", "87654321B"]);
    }

    #[tokio::test]
    async fn test_find_by_attribute() {
        let db = test_db().await;
        let repo = db.employees();
        for employee in [ana(), luis(), marta()] {
            repo.create(&employee).await.unwrap();
        }

        let men = repo.find_by_attribute("gender", "M").await.unwrap();
        assert_eq!(men, vec![ana(), luis()]);

        let top = repo.find_by_attribute("category", "10").await.unwrap();
        assert_eq!(top, vec![marta()]);

        let by_name = repo.find_by_attribute("name", "Luis").await.unwrap();
        assert_eq!(by_name, vec![luis()]);

        let none = repo.find_by_attribute("dni", "00000000X").await.unwrap();
        assert!(none.is_empty());

        let all = repo.find_by_attribute("", "ignored").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_attribute_rejects_unknown_columns() {
        let db = test_db().await;
        let repo = db.employees();
        repo.create(&ana()).await.unwrap();

        for attribute in ["salary", "1 = 1 OR dni", "dni; DROP TABLE employees; --", "DNI"] {
            let err = repo.find_by_attribute(attribute, "x").await.unwrap_err();
            assert!(err.is_invalid(), "{attribute} gave {err}");
        }

        let err = repo.find_by_attribute("category", "3 OR 1=1").await.unwrap_err();
        assert!(err.is_invalid());

        // The value is bound, so a quoted payload is just an unmatched name.
        let none = repo.find_by_attribute("name", "' OR '1'='1").await.unwrap();
        assert!(none.is_empty());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_acquire_timeout_is_a_failure() {
        let config = DbConfig::in_memory().acquire_timeout(Duration::from_millis(100));
        let db = Database::new(config).await.unwrap();
        let repo = db.employees();

        let held = db.pool().acquire().await.unwrap();
        let err = repo.create(&ana()).await.unwrap_err();
        assert!(matches!(err, DbError::PoolExhausted));
        drop(held);

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn test_outcome_messages() {
        let created = CreateOutcome::Created {
            dni: "12345678A".to_string(),
            salary: 100_000,
        };
        assert_eq!(created.to_string(), "Employee 12345678A created with salary 100000");

        let missing = UpdateOutcome::NotFound {
            dni: "12345678A".to_string(),
        };
        assert_eq!(missing.to_string(), "No employee with dni '12345678A'");

        assert_eq!(DeleteOutcome::Deleted.to_string(), "Employee deleted");
    }
}
