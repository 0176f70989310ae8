//! Database setup: create or replace the database, load schema and data,
//! and check the seeded data.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::{QueryFileKind, SampleError, SampleResult};
use crate::driver::{
    delete_database_if_exists, DriverError, DriverResult, GraphDriver, GraphSession, QueryOptions,
    SessionType, TransactionType,
};
use crate::typeql;

/// Schema and data files loaded into a new database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFiles {
    pub schema: PathBuf,
    pub data: PathBuf,
}

impl SampleFiles {
    pub fn new(schema: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        Self {
            schema: schema.into(),
            data: data.into(),
        }
    }
}

/// What to do when the database already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnExisting {
    /// Delete and recreate it.
    Replace,
    /// Keep it as is.
    Reuse,
    /// Ask on the console.
    Prompt,
}

/// Result of the seeded-data check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of users found.
    pub found: i64,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.found == typeql::EXPECTED_USER_COUNT
    }
}

/// Read a schema or data file. The whole file is sent as one query.
pub fn load_query_file(path: &Path, kind: QueryFileKind) -> SampleResult<String> {
    let query = std::fs::read_to_string(path).map_err(|source| SampleError::QueryFile {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    if query.trim().is_empty() {
        return Err(SampleError::EmptyQueryFile {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(query)
}

/// Define the schema from a file in a schema session.
pub fn db_schema_setup(session: &dyn GraphSession, schema_file: &Path) -> SampleResult<()> {
    let query = load_query_file(schema_file, QueryFileKind::Schema)?;
    let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;
    debug!(file = %schema_file.display(), bytes = query.len(), "defining schema");
    tx.define(&query)?;
    tx.commit()?;
    println!("Schema setup complete.");
    Ok(())
}

/// Insert the dataset from a file in a data session.
pub fn db_dataset_setup(session: &dyn GraphSession, data_file: &Path) -> SampleResult<()> {
    let query = load_query_file(data_file, QueryFileKind::Data)?;
    let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;
    debug!(file = %data_file.display(), bytes = query.len(), "inserting dataset");
    let inserted = tx.insert(&query)?.collect::<DriverResult<Vec<_>>>()?.len();
    tx.commit()?;
    debug!(answers = inserted, "dataset committed");
    println!("Dataset setup complete.");
    Ok(())
}

/// Create a database and load the schema and data into it.
pub fn create_database<D>(driver: &D, name: &str, files: &SampleFiles) -> SampleResult<()>
where
    D: GraphDriver + ?Sized,
{
    println!("Creating new database: {}", name);
    driver.create_database(name)?;
    info!(database = name, "created database");

    {
        let session = driver.open_session(name, SessionType::Schema)?;
        db_schema_setup(&*session, &files.schema)?;
    }
    {
        let session = driver.open_session(name, SessionType::Data)?;
        db_dataset_setup(&*session, &files.data)?;
    }
    Ok(())
}

/// Delete the database if it exists, then create it again.
pub fn replace_database<D>(driver: &D, name: &str, files: &SampleFiles) -> SampleResult<()>
where
    D: GraphDriver + ?Sized,
{
    print!("Deleting an existing database...");
    io::stdout().flush()?;
    delete_database_if_exists(driver, name)?;
    println!("OK");
    create_database(driver, name, files)
}

/// Count the users and compare against the seeded dataset.
pub fn db_check(session: &dyn GraphSession) -> SampleResult<CheckReport> {
    print!("Testing the database...");
    io::stdout().flush()?;

    let tx = session.transaction(TransactionType::Read, &QueryOptions::default())?;
    let answer = tx
        .get_aggregate(typeql::COUNT_USERS)?
        .ok_or_else(|| DriverError::NoAnswer(typeql::COUNT_USERS.to_string()))?;
    let found = answer.as_long().ok_or_else(|| {
        DriverError::UnexpectedAnswer(format!("expected an integer count, got {}", answer))
    })?;

    let report = CheckReport { found };
    if report.passed() {
        println!("Passed");
    } else {
        println!(
            "Failed with the result: {}\nExpected result: {}.",
            found,
            typeql::EXPECTED_USER_COUNT
        );
        warn!(found, expected = typeql::EXPECTED_USER_COUNT, "database check failed");
    }
    Ok(report)
}

/// Ask whether to replace an existing database. Only `Y` or `y` accepts.
pub fn ask_replace<R, W>(input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        output,
        "Found a pre-existing database. Do you want to replace it? (Y/N) "
    )?;
    output.flush()?;

    let mut line = String::new();
    while input.read_line(&mut line)? > 0 {
        if let Some(answer) = line.split_whitespace().next() {
            return Ok(answer == "Y" || answer == "y");
        }
        line.clear();
    }
    Ok(false)
}

/// Make sure the database exists and holds the sample data, then check it.
///
/// `OnExisting::Prompt` asks on the console.
pub fn db_setup<D>(
    driver: &D,
    name: &str,
    files: &SampleFiles,
    on_existing: OnExisting,
) -> SampleResult<CheckReport>
where
    D: GraphDriver + ?Sized,
{
    db_setup_with(driver, name, files, on_existing, || {
        ask_replace(&mut io::stdin().lock(), &mut io::stdout())
    })
}

/// Like [`db_setup`], but `ask` answers the replace prompt. It is only
/// called when the database exists and `on_existing` is `Prompt`.
pub fn db_setup_with<D, F>(
    driver: &D,
    name: &str,
    files: &SampleFiles,
    on_existing: OnExisting,
    ask: F,
) -> SampleResult<CheckReport>
where
    D: GraphDriver + ?Sized,
    F: FnOnce() -> io::Result<bool>,
{
    println!("Setting up the database: {}", name);

    if driver.contains_database(name)? {
        let replace = match on_existing {
            OnExisting::Replace => true,
            OnExisting::Reuse => false,
            OnExisting::Prompt => ask()?,
        };
        if replace {
            replace_database(driver, name, files)?;
        } else {
            println!("Reusing an existing database.");
        }
    } else {
        create_database(driver, name, files)?;
    }

    if !driver.contains_database(name)? {
        return Err(SampleError::DatabaseMissing(name.to_string()));
    }
    let session = driver.open_session(name, SessionType::Data)?;
    db_check(&*session)
}
