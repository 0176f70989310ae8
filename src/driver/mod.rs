//! The seam between the walkthrough and the graph database driver.
//!
//! The walkthrough only talks to these traits. The real implementation
//! lives in [`typedb`] (behind the `typedb` feature); tests use an
//! in-crate scripted driver.
//!
//! # Lifecycle
//!
//! ```text
//! GraphDriver ──open_session──▶ GraphSession ──transaction──▶ GraphTransaction
//!      │                              │                             │
//!  create/contains/delete        closed on drop            queries, then commit
//!                                                          (closed on drop)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let session = driver.open_session("sample_app_db", SessionType::Data)?;
//! let tx = session.transaction(TransactionType::Write, &QueryOptions::default())?;
//! tx.insert("insert $p isa person;")?.count();
//! tx.commit()?;
//! ```

mod concept;
mod error;
#[cfg(test)]
pub(crate) mod scripted;
#[cfg(feature = "typedb")]
pub mod typedb;

use std::fmt;

use tracing::info;

pub use concept::{AttributeValue, Concept, ConceptRow};
pub use error::{DriverError, DriverResult};

/// Iterator over the answers of a match query.
pub type RowIter<'a> = Box<dyn Iterator<Item = DriverResult<ConceptRow>> + 'a>;

/// Iterator over the documents of a fetch query.
pub type JsonIter<'a> = Box<dyn Iterator<Item = DriverResult<serde_json::Value>> + 'a>;

/// Session mode: schema definition or data manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Schema,
    Data,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Schema => write!(f, "schema"),
            SessionType::Data => write!(f, "data"),
        }
    }
}

/// Transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Read,
    Write,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Read => write!(f, "read"),
            TransactionType::Write => write!(f, "write"),
        }
    }
}

/// Per-transaction options. Unset fields use the server defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Enable rule inference.
    pub infer: Option<bool>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inference flag.
    pub fn infer(mut self, value: bool) -> Self {
        self.infer = Some(value);
        self
    }
}

/// Connection-level operations: the database manager.
pub trait GraphDriver {
    /// Check whether a database exists.
    fn contains_database(&self, name: &str) -> DriverResult<bool>;

    /// Create a database.
    fn create_database(&self, name: &str) -> DriverResult;

    /// Delete a database.
    fn delete_database(&self, name: &str) -> DriverResult;

    /// Open a session against a database.
    fn open_session(
        &self,
        database: &str,
        session_type: SessionType,
    ) -> DriverResult<Box<dyn GraphSession + '_>>;
}

/// An open session. Closed when dropped.
pub trait GraphSession {
    /// Open a transaction in this session.
    fn transaction(
        &self,
        transaction_type: TransactionType,
        options: &QueryOptions,
    ) -> DriverResult<Box<dyn GraphTransaction + '_>>;
}

/// An open transaction. Closed (and rolled back if uncommitted) when dropped.
pub trait GraphTransaction {
    /// Run a define query.
    fn define(&self, query: &str) -> DriverResult;

    /// Run an insert query.
    fn insert(&self, query: &str) -> DriverResult<RowIter<'_>>;

    /// Run a get query.
    fn get(&self, query: &str) -> DriverResult<RowIter<'_>>;

    /// Run a get query ending in an aggregate.
    fn get_aggregate(&self, query: &str) -> DriverResult<Option<AttributeValue>>;

    /// Run an update (match/delete/insert) query.
    fn update(&self, query: &str) -> DriverResult<RowIter<'_>>;

    /// Run a delete query.
    fn delete(&self, query: &str) -> DriverResult;

    /// Run a fetch query.
    fn fetch(&self, query: &str) -> DriverResult<JsonIter<'_>>;

    /// Commit the transaction.
    fn commit(self: Box<Self>) -> DriverResult;
}

/// Delete a database if it exists. Returns whether it was deleted.
pub fn delete_database_if_exists<D>(driver: &D, name: &str) -> DriverResult<bool>
where
    D: GraphDriver + ?Sized,
{
    if driver.contains_database(name)? {
        driver.delete_database(name)?;
        info!(database = name, "deleted database");
        Ok(true)
    } else {
        Ok(false)
    }
}
