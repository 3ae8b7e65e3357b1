//! # Seed Data Generator
//!
//! Populates the database with sample employees for development.
//!
//! ## Usage
//! ```bash
//! # Create 50 employees (default) in $PAYROLL_DB_PATH or ./payroll.db
//! cargo run -p payroll-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p payroll-db --bin seed -- --count 200 --db ./data/payroll.db
//! ```
//!
//! Every employee goes through `EmployeeRepository::create`, so each one
//! gets its payroll row. Running the seed twice reports the second batch as
//! already existing instead of duplicating it.

use std::env;

use payroll_core::{Employee, Gender, BASE_SALARY};
use payroll_db::{CreateOutcome, Database, DbConfig};
use tracing_subscriber::EnvFilter;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Luis", "Marta", "Javier", "Lucia", "Pablo", "Elena", "Sergio", "Carmen", "Diego",
    "Irene", "Raul", "Nuria", "Hugo", "Sara",
];

const SURNAMES: &[&str] = &[
    "Garcia", "Lopez", "Martin", "Sanchez", "Perez", "Gomez", "Ruiz", "Diaz", "Moreno", "Alonso",
];

/// Letters of the dni check table.
const DNI_LETTERS: &[u8] = b"TRWAGMYFPDXBNJZSQVHLCKE";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                count = parse_count(args.get(i + 1).map(String::as_str))?;
                i += 1;
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Payroll Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of employees to create (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: $PAYROLL_DB_PATH or ./payroll.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Payroll Ledger Seed Data Generator");
    println!("==================================");
    println!("Database:  {}", config.database_path.display());
    println!("Employees: {}", count);
    println!();

    let db = Database::new(config).await?;
    let repo = db.employees();

    let mut created = 0;
    let mut skipped = 0;
    let start = std::time::Instant::now();

    for seed in 0..count {
        let employee = generate_employee(seed);

        match repo.create(&employee).await? {
            CreateOutcome::Created { .. } => created += 1,
            CreateOutcome::AlreadyExists { .. } => skipped += 1,
        }
    }

    println!("✓ Created {} employees in {:?}", created, start.elapsed());
    if skipped > 0 {
        println!("  Skipped {} that already existed", skipped);
    }
    println!("  Total employees: {}", repo.count().await?);

    Ok(())
}

/// Parses the `--count` argument; a missing or malformed value is a usage error.
fn parse_count(raw: Option<&str>) -> Result<usize, String> {
    let raw = raw.ok_or("--count needs a value (see --help)")?;
    raw.parse()
        .map_err(|_| format!("invalid --count value '{raw}': expected a whole number"))
}

/// Builds a deterministic, valid employee for a seed number.
fn generate_employee(seed: usize) -> Employee {
    let name = format!(
        "{} {}",
        FIRST_NAMES[seed % FIRST_NAMES.len()],
        SURNAMES[(seed / FIRST_NAMES.len()) % SURNAMES.len()]
    );

    let number = (10_000_000 + seed * 7_919) % 100_000_000;
    let letter = DNI_LETTERS[number % DNI_LETTERS.len()] as char;
    let dni = format!("{:08}{}", number, letter);

    let gender = if seed % 2 == 0 { Gender::Female } else { Gender::Male };
    let category = (seed % BASE_SALARY.len()) as i64 + 1;
    let tenure_years = (seed * 3 % 31) as i64;

    Employee::new(name, dni, gender, category, tenure_years)
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,payroll=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
