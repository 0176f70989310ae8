//! Scripted driver for tests: canned answers, recorded calls.

use std::collections::BTreeSet;

use parking_lot::Mutex;

use super::{
    AttributeValue, ConceptRow, DriverError, DriverResult, GraphDriver, GraphSession,
    GraphTransaction, JsonIter, QueryOptions, RowIter, SessionType, TransactionType,
};

/// A call made against the driver, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Contains(String),
    CreateDatabase(String),
    DeleteDatabase(String),
    OpenSession(String, SessionType),
    Transaction(TransactionType, QueryOptions),
    Define(String),
    Insert(String),
    Get(String),
    GetAggregate(String),
    Update(String),
    Delete(String),
    Fetch(String),
    Commit,
}

#[derive(Debug, Clone)]
enum Reply {
    Rows(Vec<ConceptRow>),
    Aggregate(Option<AttributeValue>),
    Json(Vec<serde_json::Value>),
    Fail(String, String),
}

#[derive(Default)]
struct State {
    databases: BTreeSet<String>,
    unlisted: BTreeSet<String>,
    replies: Vec<(String, Reply)>,
    calls: Vec<Call>,
}

/// Test driver. Replies are matched by substring of the query text;
/// the most recently registered match wins.
#[derive(Default)]
pub(crate) struct ScriptedDriver {
    state: Mutex<State>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing database.
    pub fn with_database(self, name: &str) -> Self {
        self.state.lock().databases.insert(name.to_string());
        self
    }

    /// Hide a database from `contains_database`. Sessions can still open it,
    /// as on a server that drops it right after loading.
    pub fn unlisted(self, name: &str) -> Self {
        self.state.lock().unlisted.insert(name.to_string());
        self
    }

    /// Answer queries containing `pattern` with these rows.
    pub fn rows(self, pattern: &str, rows: Vec<ConceptRow>) -> Self {
        self.reply(pattern, Reply::Rows(rows))
    }

    /// Answer aggregate queries containing `pattern` with this value.
    pub fn aggregate(self, pattern: &str, value: Option<AttributeValue>) -> Self {
        self.reply(pattern, Reply::Aggregate(value))
    }

    /// Answer fetch queries containing `pattern` with these documents.
    pub fn json(self, pattern: &str, docs: Vec<serde_json::Value>) -> Self {
        self.reply(pattern, Reply::Json(docs))
    }

    /// Fail queries containing `pattern` with a driver error.
    pub fn fail(self, pattern: &str, code: &str, message: &str) -> Self {
        self.reply(pattern, Reply::Fail(code.into(), message.into()))
    }

    fn reply(self, pattern: &str, reply: Reply) -> Self {
        self.state.lock().replies.push((pattern.to_string(), reply));
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Whether the database currently exists.
    pub fn has_database(&self, name: &str) -> bool {
        self.state.lock().databases.contains(name)
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn lookup(&self, query: &str) -> Option<Reply> {
        self.state
            .lock()
            .replies
            .iter()
            .rev()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
    }
}

impl GraphDriver for ScriptedDriver {
    fn contains_database(&self, name: &str) -> DriverResult<bool> {
        self.record(Call::Contains(name.into()));
        let state = self.state.lock();
        Ok(state.databases.contains(name) && !state.unlisted.contains(name))
    }

    fn create_database(&self, name: &str) -> DriverResult {
        self.record(Call::CreateDatabase(name.into()));
        if !self.state.lock().databases.insert(name.to_string()) {
            return Err(DriverError::driver(
                "DBS1",
                format!("database '{}' already exists", name),
            ));
        }
        Ok(())
    }

    fn delete_database(&self, name: &str) -> DriverResult {
        self.record(Call::DeleteDatabase(name.into()));
        if !self.state.lock().databases.remove(name) {
            return Err(DriverError::driver(
                "DBS2",
                format!("database '{}' does not exist", name),
            ));
        }
        Ok(())
    }

    fn open_session(
        &self,
        database: &str,
        session_type: SessionType,
    ) -> DriverResult<Box<dyn GraphSession + '_>> {
        self.record(Call::OpenSession(database.into(), session_type));
        if !self.has_database(database) {
            return Err(DriverError::driver(
                "DBS2",
                format!("database '{}' does not exist", database),
            ));
        }
        Ok(Box::new(ScriptedSession { driver: self }))
    }
}

struct ScriptedSession<'a> {
    driver: &'a ScriptedDriver,
}

impl GraphSession for ScriptedSession<'_> {
    fn transaction(
        &self,
        transaction_type: TransactionType,
        options: &QueryOptions,
    ) -> DriverResult<Box<dyn GraphTransaction + '_>> {
        self.driver
            .record(Call::Transaction(transaction_type, *options));
        Ok(Box::new(ScriptedTransaction {
            driver: self.driver,
        }))
    }
}

struct ScriptedTransaction<'a> {
    driver: &'a ScriptedDriver,
}

impl ScriptedTransaction<'_> {
    fn rows(&self, query: &str) -> DriverResult<RowIter<'_>> {
        match self.driver.lookup(query) {
            Some(Reply::Rows(rows)) => Ok(Box::new(rows.into_iter().map(Ok))),
            Some(Reply::Fail(code, message)) => Err(DriverError::driver(code, message)),
            _ => Ok(Box::new(std::iter::empty())),
        }
    }

    fn unit(&self, query: &str) -> DriverResult {
        match self.driver.lookup(query) {
            Some(Reply::Fail(code, message)) => Err(DriverError::driver(code, message)),
            _ => Ok(()),
        }
    }
}

impl GraphTransaction for ScriptedTransaction<'_> {
    fn define(&self, query: &str) -> DriverResult {
        self.driver.record(Call::Define(query.into()));
        self.unit(query)
    }

    fn insert(&self, query: &str) -> DriverResult<RowIter<'_>> {
        self.driver.record(Call::Insert(query.into()));
        self.rows(query)
    }

    fn get(&self, query: &str) -> DriverResult<RowIter<'_>> {
        self.driver.record(Call::Get(query.into()));
        self.rows(query)
    }

    fn get_aggregate(&self, query: &str) -> DriverResult<Option<AttributeValue>> {
        self.driver.record(Call::GetAggregate(query.into()));
        match self.driver.lookup(query) {
            Some(Reply::Aggregate(value)) => Ok(value),
            Some(Reply::Fail(code, message)) => Err(DriverError::driver(code, message)),
            _ => Ok(None),
        }
    }

    fn update(&self, query: &str) -> DriverResult<RowIter<'_>> {
        self.driver.record(Call::Update(query.into()));
        self.rows(query)
    }

    fn delete(&self, query: &str) -> DriverResult {
        self.driver.record(Call::Delete(query.into()));
        self.unit(query)
    }

    fn fetch(&self, query: &str) -> DriverResult<JsonIter<'_>> {
        self.driver.record(Call::Fetch(query.into()));
        match self.driver.lookup(query) {
            Some(Reply::Json(docs)) => Ok(Box::new(docs.into_iter().map(Ok))),
            Some(Reply::Fail(code, message)) => Err(DriverError::driver(code, message)),
            _ => Ok(Box::new(std::iter::empty())),
        }
    }

    fn commit(self: Box<Self>) -> DriverResult {
        self.driver.record(Call::Commit);
        Ok(())
    }
}
