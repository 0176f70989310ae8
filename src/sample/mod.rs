//! The IAM sample walkthrough.
//!
//! Sets up the sample database, checks the seeded data, then runs six
//! requests against it. Each step narrates on standard output.
//!
//! ```text
//! db_setup ─┬─ exists? ── Replace ── replace_database ─┐
//!           │          ├─ Reuse ─────────────────────────┤
//!           │          └─ Prompt (Y/N) ──────────────────┤
//!           └─ missing ── create_database ──────────────┤
//!                                                       ▼
//!                                                   db_check ──▶ run_queries
//! ```

mod error;
mod queries;
mod setup;

use tracing::info;

pub use error::{QueryFileKind, SampleError, SampleResult};
pub use queries::{
    delete_file, fetch_all_users, get_files_by_user, insert_new_user, run_queries,
    update_file_path, Requests, RequestsReport, UserFiles,
};
pub use setup::{
    ask_replace, create_database, db_check, db_dataset_setup, db_schema_setup, db_setup,
    db_setup_with, load_query_file, replace_database, CheckReport, OnExisting, SampleFiles,
};

use crate::config::AppConfig;
use crate::driver::GraphDriver;
use crate::typeql;

/// Run the whole walkthrough with the given settings.
///
/// Fails if the seeded data does not pass the check. Returns the request
/// results, or `None` when requests are turned off.
pub fn run<D>(
    driver: &D,
    config: &AppConfig,
    on_existing: OnExisting,
) -> SampleResult<Option<RequestsReport>>
where
    D: GraphDriver + ?Sized,
{
    let files = SampleFiles::new(&config.schema_file, &config.data_file);
    let check = db_setup(driver, &config.database, &files, on_existing)?;
    if !check.passed() {
        return Err(SampleError::CheckFailed {
            expected: typeql::EXPECTED_USER_COUNT,
            found: check.found,
        });
    }
    info!(database = %config.database, "database ready");

    if !config.run_queries {
        return Ok(None);
    }
    let report = run_queries(driver, &config.database, &Requests::default())?;
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::driver::scripted::{Call, ScriptedDriver};
    use crate::driver::{AttributeValue, Concept, ConceptRow};

    fn config(dir: &TempDir) -> AppConfig {
        let schema = dir.path().join("schema.tql");
        let data = dir.path().join("data.tql");
        std::fs::write(&schema, "define user sub entity;").unwrap();
        std::fs::write(&data, "insert $u isa user;").unwrap();
        AppConfig::builder()
            .database("iam")
            .schema_file(schema)
            .data_file(data)
            .build()
    }

    fn path(p: &str) -> ConceptRow {
        ConceptRow::new().with(
            "fp",
            Concept::Attribute {
                label: "path".into(),
                value: AttributeValue::String(p.into()),
            },
        )
    }

    #[test]
    fn test_run_full_walkthrough() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let driver = ScriptedDriver::new()
            .aggregate(typeql::COUNT_USERS, Some(AttributeValue::Long(3)))
            .json(typeql::FETCH_USERS, vec![serde_json::json!({"u": {}}); 3])
            .rows(
                "has full-name 'Kevin Morrison'; get;",
                vec![ConceptRow::new().with("u", Concept::Entity { label: "person".into() })],
            )
            .rows("view_file", vec![path("lzfkn.java")])
            .rows("$old_path = 'lzfkn.java'", vec![path("lzfkn2.java")])
            .rows("has path 'lzfkn2.java'; get;", vec![ConceptRow::new()]);

        let report = run(&driver, &config, OnExisting::Prompt).unwrap().unwrap();
        assert_eq!(report.users.len(), 3);
        assert!(report.added.is_empty());
        assert_eq!(report.files_with_inference, UserFiles::Files(vec!["lzfkn.java".into()]));
        assert_eq!(report.paths_updated, 1);
        assert!(report.file_deleted);

        let commits = driver.calls().iter().filter(|c| **c == Call::Commit).count();
        // schema, data, new user, path update, file delete
        assert_eq!(commits, 5);
    }

    #[test]
    fn test_run_fails_on_bad_check() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let driver =
            ScriptedDriver::new().aggregate(typeql::COUNT_USERS, Some(AttributeValue::Long(0)));

        let err = run(&driver, &config, OnExisting::Replace).unwrap_err();
        assert!(matches!(
            err,
            SampleError::CheckFailed {
                expected: 3,
                found: 0
            }
        ));
        assert!(!driver.calls().iter().any(|c| matches!(c, Call::Fetch(_))));
    }

    #[test]
    fn test_run_without_queries() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.run_queries = false;
        let driver = ScriptedDriver::new()
            .with_database("iam")
            .aggregate(typeql::COUNT_USERS, Some(AttributeValue::Long(3)));

        assert!(run(&driver, &config, OnExisting::Reuse).unwrap().is_none());
    }
}
