//! The six sample requests run against a seeded database.

use tracing::debug;

use super::error::SampleResult;
use crate::driver::{DriverResult, GraphDriver, QueryOptions, SessionType, TransactionType};
use crate::typeql;

/// Parameters of the sample requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requests {
    /// Full name of the user added by request 2.
    pub new_user_name: String,
    /// Email of the user added by request 2.
    pub new_user_email: String,
    /// User whose files are listed by requests 3 and 4.
    pub user_name: String,
    /// Path renamed by request 5.
    pub old_path: String,
    /// New path set by request 5.
    pub new_path: String,
    /// Path deleted by request 6.
    pub delete_path: String,
}

impl Default for Requests {
    fn default() -> Self {
        Self {
            new_user_name: "Jack Keeper".into(),
            new_user_email: "jk@typedb.com".into(),
            user_name: "Kevin Morrison".into(),
            old_path: "lzfkn.java".into(),
            new_path: "lzfkn2.java".into(),
            delete_path: "lzfkn2.java".into(),
        }
    }
}

/// Files a user may view, or why none could be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFiles {
    /// Exactly one user matched; these are the paths, sorted.
    Files(Vec<String>),
    /// No user has that name.
    UnknownUser,
    /// More than one user has that name.
    AmbiguousUser(usize),
}

/// What the requests returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestsReport {
    pub users: Vec<serde_json::Value>,
    pub added: Vec<(String, String)>,
    pub files_without_inference: UserFiles,
    pub files_with_inference: UserFiles,
    pub paths_updated: usize,
    pub file_deleted: bool,
}

/// Request 1: fetch every user as a JSON document.
pub fn fetch_all_users<D>(driver: &D, database: &str) -> SampleResult<Vec<serde_json::Value>>
where
    D: GraphDriver + ?Sized,
{
    let session = driver.open_session(database, SessionType::Data)?;
    let tx = session.transaction(TransactionType::Read, &QueryOptions::default())?;
    debug!(query = typeql::FETCH_USERS, "fetch");

    let mut users = Vec::new();
    for doc in tx.fetch(typeql::FETCH_USERS)? {
        let doc = doc?;
        println!("User #{}: {}", users.len() + 1, serde_json::to_string_pretty(&doc)?);
        users.push(doc);
    }
    Ok(users)
}

/// Request 2: insert a user. Returns the (name, email) of each inserted answer.
pub fn insert_new_user<D>(
    driver: &D,
    database: &str,
    full_name: &str,
    email: &str,
) -> SampleResult<Vec<(String, String)>>
where
    D: GraphDriver + ?Sized,
{
    let session = driver.open_session(database, SessionType::Data)?;
    let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;
    let query = typeql::insert_user(full_name, email);
    debug!(%query, "insert");

    let mut added = Vec::new();
    for answer in tx.insert(&query)? {
        let row = answer?;
        let name = row.string("fn")?.to_string();
        let mail = row.string("e")?.to_string();
        println!("Added new user. Name: {}, E-mail: {}", name, mail);
        added.push((name, mail));
    }
    tx.commit()?;
    Ok(added)
}

/// Requests 3 and 4: list the files a user may view.
///
/// Looks the user up first; the listing only runs when exactly one user
/// has the name. With `inference` off only explicit permissions count, so
/// the list can come back shorter (or empty).
pub fn get_files_by_user<D>(
    driver: &D,
    database: &str,
    full_name: &str,
    inference: bool,
) -> SampleResult<UserFiles>
where
    D: GraphDriver + ?Sized,
{
    let session = driver.open_session(database, SessionType::Data)?;
    let options = QueryOptions::new().infer(inference);
    let tx = session.transaction(TransactionType::Read, &options)?;

    let users = tx
        .get(&typeql::find_user(full_name))?
        .collect::<DriverResult<Vec<_>>>()?;
    match users.len() {
        0 => {
            eprintln!("Error: No users found with that name.");
            return Ok(UserFiles::UnknownUser);
        }
        1 => {}
        n => {
            eprintln!("Error: Found more than one user with that name.");
            return Ok(UserFiles::AmbiguousUser(n));
        }
    }

    let query = typeql::files_viewable_by(full_name);
    debug!(%query, inference, "get");
    let mut files = Vec::new();
    for answer in tx.get(&query)? {
        let row = answer?;
        let path = row.string("fp")?.to_string();
        println!("File #{}: {}", files.len() + 1, path);
        files.push(path);
    }
    if files.is_empty() {
        println!("No files found. Try enabling inference.");
    }
    Ok(UserFiles::Files(files))
}

/// Request 5: rename a file's path. Commits only when something matched.
pub fn update_file_path<D>(
    driver: &D,
    database: &str,
    old_path: &str,
    new_path: &str,
) -> SampleResult<usize>
where
    D: GraphDriver + ?Sized,
{
    let session = driver.open_session(database, SessionType::Data)?;
    let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;
    let query = typeql::update_file_path(old_path, new_path);
    debug!(%query, "update");

    let updated = tx.update(&query)?.collect::<DriverResult<Vec<_>>>()?.len();
    if updated > 0 {
        tx.commit()?;
        println!("Total number of paths updated: {}.", updated);
    } else {
        println!("No matched paths: nothing to update.");
    }
    Ok(updated)
}

/// Request 6: delete a file, but only if exactly one file has the path.
pub fn delete_file<D>(driver: &D, database: &str, path: &str) -> SampleResult<bool>
where
    D: GraphDriver + ?Sized,
{
    let session = driver.open_session(database, SessionType::Data)?;
    let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;

    let matched = tx
        .get(&typeql::find_file(path))?
        .collect::<DriverResult<Vec<_>>>()?
        .len();
    match matched {
        1 => {
            let query = typeql::delete_file(path);
            debug!(%query, "delete");
            tx.delete(&query)?;
            tx.commit()?;
            println!("The file has been deleted.");
            Ok(true)
        }
        0 => {
            eprintln!("No files matched in the database.\nNo files were deleted.");
            Ok(false)
        }
        _ => {
            eprintln!("Matched more than one file with the same path.\nNo files were deleted.");
            Ok(false)
        }
    }
}

/// Run the six requests in order.
pub fn run_queries<D>(driver: &D, database: &str, requests: &Requests) -> SampleResult<RequestsReport>
where
    D: GraphDriver + ?Sized,
{
    println!("\nRequest 1 of 6: Fetch all users as JSON objects with full names and emails");
    let users = fetch_all_users(driver, database)?;

    println!(
        "\nRequest 2 of 6: Add a new user with the full-name {} and email {}",
        requests.new_user_name, requests.new_user_email
    );
    let added = insert_new_user(
        driver,
        database,
        &requests.new_user_name,
        &requests.new_user_email,
    )?;

    println!(
        "\nRequest 3 of 6: Find all files that the user {} has access to view (no inference)",
        requests.user_name
    );
    let files_without_inference = get_files_by_user(driver, database, &requests.user_name, false)?;

    println!(
        "\nRequest 4 of 6: Find all files that the user {} has access to view (with inference)",
        requests.user_name
    );
    let files_with_inference = get_files_by_user(driver, database, &requests.user_name, true)?;

    println!(
        "\nRequest 5 of 6: Update the path of a file from {} to {}",
        requests.old_path, requests.new_path
    );
    let paths_updated = update_file_path(driver, database, &requests.old_path, &requests.new_path)?;

    println!(
        "\nRequest 6 of 6: Delete the file with path {}",
        requests.delete_path
    );
    let file_deleted = delete_file(driver, database, &requests.delete_path)?;

    Ok(RequestsReport {
        users,
        added,
        files_without_inference,
        files_with_inference,
        paths_updated,
        file_deleted,
    })
}
