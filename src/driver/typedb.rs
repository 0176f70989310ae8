//! TypeDB implementation of the driver traits.
//!
//! Wraps the `typedb-driver` crate in its blocking (`sync`) mode: promises
//! are resolved in place and answer streams are plain iterators.

use tracing::{debug, info};
use typedb_driver::{
    answer::{ConceptMap, JSON},
    concept::{self as tdb, Attribute, Entity, Relation, Value},
    Connection, Credential, DatabaseManager, Options, Promise, Session, Transaction,
};

use super::{
    AttributeValue, Concept, ConceptRow, DriverError, DriverResult, GraphDriver, GraphSession,
    GraphTransaction, JsonIter, QueryOptions, RowIter, SessionType, TransactionType,
};
use crate::config::{AppConfig, Edition};

impl From<typedb_driver::Error> for DriverError {
    fn from(err: typedb_driver::Error) -> Self {
        DriverError::driver(err.code(), err.message())
    }
}

/// A connection to a TypeDB server and its database manager.
pub struct TypeDbDriver {
    connection: Connection,
    databases: DatabaseManager,
}

impl TypeDbDriver {
    /// Connect using the address, edition and credentials in the config.
    pub fn connect(config: &AppConfig) -> DriverResult<Self> {
        let connection = match config.edition {
            Edition::Core => Connection::new_core(&config.address),
            Edition::Cloud => {
                let credential = if config.tls {
                    Credential::with_tls(
                        &config.username,
                        config.password.as_deref().unwrap_or_default(),
                        config.tls_root_ca.as_deref(),
                    )
                    .map_err(|e| connection_error(&config.address, e))?
                } else {
                    Credential::without_tls(
                        &config.username,
                        config.password.as_deref().unwrap_or_default(),
                    )
                };
                Connection::new_cloud(&[config.address.as_str()], credential)
            }
        }
        .map_err(|e| connection_error(&config.address, e))?;

        info!(address = %config.address, edition = %config.edition, "connected");
        let databases = DatabaseManager::new(connection.clone());
        Ok(Self {
            connection,
            databases,
        })
    }

    /// Close the connection. Open sessions become unusable.
    pub fn close(self) -> DriverResult {
        self.connection.force_close()?;
        Ok(())
    }
}

fn connection_error(address: &str, err: typedb_driver::Error) -> DriverError {
    DriverError::Connection {
        address: address.to_string(),
        reason: err.to_string(),
    }
}

impl GraphDriver for TypeDbDriver {
    fn contains_database(&self, name: &str) -> DriverResult<bool> {
        Ok(self.databases.contains(name)?)
    }

    fn create_database(&self, name: &str) -> DriverResult {
        self.databases.create(name)?;
        Ok(())
    }

    fn delete_database(&self, name: &str) -> DriverResult {
        self.databases.get(name)?.delete()?;
        Ok(())
    }

    fn open_session(
        &self,
        database: &str,
        session_type: SessionType,
    ) -> DriverResult<Box<dyn GraphSession + '_>> {
        let kind = match session_type {
            SessionType::Schema => typedb_driver::SessionType::Schema,
            SessionType::Data => typedb_driver::SessionType::Data,
        };
        let session = Session::new(self.databases.get(database)?, kind)?;
        debug!(database, %session_type, "opened session");
        Ok(Box::new(TypeDbSession { session }))
    }
}

struct TypeDbSession {
    session: Session,
}

impl GraphSession for TypeDbSession {
    fn transaction(
        &self,
        transaction_type: TransactionType,
        options: &QueryOptions,
    ) -> DriverResult<Box<dyn GraphTransaction + '_>> {
        let kind = match transaction_type {
            TransactionType::Read => typedb_driver::TransactionType::Read,
            TransactionType::Write => typedb_driver::TransactionType::Write,
        };
        let mut opts = Options::new();
        if let Some(infer) = options.infer {
            opts = opts.infer(infer);
        }
        let tx = self.session.transaction_with_options(kind, opts)?;
        Ok(Box::new(TypeDbTransaction { tx }))
    }
}

struct TypeDbTransaction<'a> {
    tx: Transaction<'a>,
}

impl GraphTransaction for TypeDbTransaction<'_> {
    fn define(&self, query: &str) -> DriverResult {
        self.tx.query().define(query).resolve()?;
        Ok(())
    }

    fn insert(&self, query: &str) -> DriverResult<RowIter<'_>> {
        let answers = self.tx.query().insert(query)?;
        Ok(Box::new(answers.map(convert_answer)))
    }

    fn get(&self, query: &str) -> DriverResult<RowIter<'_>> {
        let answers = self.tx.query().get(query)?;
        Ok(Box::new(answers.map(convert_answer)))
    }

    fn get_aggregate(&self, query: &str) -> DriverResult<Option<AttributeValue>> {
        let value = self.tx.query().get_aggregate(query).resolve()?;
        Ok(value.map(convert_value))
    }

    fn update(&self, query: &str) -> DriverResult<RowIter<'_>> {
        let answers = self.tx.query().update(query)?;
        Ok(Box::new(answers.map(convert_answer)))
    }

    fn delete(&self, query: &str) -> DriverResult {
        self.tx.query().delete(query).resolve()?;
        Ok(())
    }

    fn fetch(&self, query: &str) -> DriverResult<JsonIter<'_>> {
        let answers = self.tx.query().fetch(query)?;
        Ok(Box::new(answers.map(|answer| convert_json(answer?))))
    }

    fn commit(self: Box<Self>) -> DriverResult {
        self.tx.commit().resolve()?;
        Ok(())
    }
}

fn convert_answer(answer: typedb_driver::Result<ConceptMap>) -> DriverResult<ConceptRow> {
    let map = answer?;
    Ok(map
        .map
        .into_iter()
        .map(|(variable, concept)| (variable, convert_concept(concept)))
        .collect())
}

fn convert_concept(concept: tdb::Concept) -> Concept {
    match concept {
        tdb::Concept::Entity(Entity { type_, .. }) => Concept::Entity { label: type_.label },
        tdb::Concept::Relation(Relation { type_, .. }) => Concept::Relation { label: type_.label },
        tdb::Concept::Attribute(Attribute { type_, value, .. }) => Concept::Attribute {
            label: type_.label,
            value: convert_value(value),
        },
        tdb::Concept::Value(value) => Concept::Value(convert_value(value)),
        tdb::Concept::EntityType(t) => Concept::Type { label: t.label },
        tdb::Concept::RelationType(t) => Concept::Type { label: t.label },
        tdb::Concept::AttributeType(t) => Concept::Type { label: t.label },
        tdb::Concept::RoleType(t) => Concept::Type {
            label: t.label.to_string(),
        },
        tdb::Concept::RootThingType(t) => Concept::Type {
            label: tdb::ThingType::RootThingType(t).label().to_string(),
        },
    }
}

fn convert_value(value: Value) -> AttributeValue {
    match value {
        Value::Boolean(b) => AttributeValue::Boolean(b),
        Value::Long(v) => AttributeValue::Long(v),
        Value::Double(v) => AttributeValue::Double(v),
        Value::String(s) => AttributeValue::String(s),
        Value::DateTime(dt) => AttributeValue::DateTime(dt),
    }
}

fn convert_json(answer: JSON) -> DriverResult<serde_json::Value> {
    serde_json::from_str(&answer.to_string())
        .map_err(|e| DriverError::UnexpectedAnswer(format!("fetch answer is not JSON: {}", e)))
}
