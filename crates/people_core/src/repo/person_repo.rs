//! Person repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the person document collection.
//! - Stamp ids and timestamps on write paths.
//!
//! # Invariants
//! - Write paths must call `validate()` on their input before touching the store.
//! - `created` and `updated` come from a single clock read on create.
//! - Read paths reject documents that no longer match `PersonRead`.

use crate::model::person::{
    PersonCreate, PersonId, PersonRead, PersonUpdate, PersonValidationError,
};
use crate::store::{Document, DocumentStore, CREATED_FIELD, ID_FIELD, UPDATED_FIELD};
use crate::utils::{Clock, IdGenerator, SystemClock, UuidGenerator};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    NotFound(PersonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid person data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for person CRUD operations.
pub trait PersonRepository {
    fn get(&self, id: &str) -> RepoResult<PersonRead>;
    fn list(&self) -> RepoResult<Vec<PersonRead>>;
    fn create(&self, input: &PersonCreate) -> RepoResult<PersonRead>;
    fn update(&self, id: &str, input: &PersonUpdate) -> RepoResult<()>;
    fn delete(&self, id: &str) -> RepoResult<()>;
    fn delete_all(&self);
}

/// Person repository backed by any `DocumentStore`.
pub struct StorePersonRepository<'store, S: DocumentStore + ?Sized> {
    store: &'store S,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl<'store, S: DocumentStore + ?Sized> StorePersonRepository<'store, S> {
    /// Creates a repository using wall-clock time and UUID v4 ids.
    pub fn new(store: &'store S) -> Self {
        Self::with_providers(store, Box::new(SystemClock), Box::new(UuidGenerator))
    }

    /// Creates a repository with caller-provided time and id sources.
    pub fn with_providers(
        store: &'store S,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }
}

impl<S: DocumentStore + ?Sized> PersonRepository for StorePersonRepository<'_, S> {
    fn get(&self, id: &str) -> RepoResult<PersonRead> {
        let Some(document) = self.store.find_one(id) else {
            warn!("event=person_get module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id.to_string()));
        };
        parse_person_document(document)
    }

    fn list(&self) -> RepoResult<Vec<PersonRead>> {
        self.store
            .find_all()
            .into_iter()
            .map(parse_person_document)
            .collect()
    }

    /// # Panics
    /// Panics when the store refuses the insert, which means the id
    /// generator produced a colliding id or the store is corrupted.
    fn create(&self, input: &PersonCreate) -> RepoResult<PersonRead> {
        input.validate()?;

        let mut document = to_document(input)?;
        let now = self.clock.now();
        document.insert(CREATED_FIELD.to_string(), Value::from(now));
        document.insert(UPDATED_FIELD.to_string(), Value::from(now));
        let id = self.ids.next_id();
        document.insert(ID_FIELD.to_string(), Value::from(id.as_str()));

        let result = self.store.insert_one(document);
        assert!(
            result.acknowledged,
            "insert of freshly generated person id {id} was not acknowledged"
        );
        let inserted_id = result.inserted_id.unwrap_or(id);

        info!("event=person_create module=repo status=ok id={inserted_id}");
        self.get(&inserted_id)
    }

    /// An update with no fields set still stamps `updated`.
    fn update(&self, id: &str, input: &PersonUpdate) -> RepoResult<()> {
        input.validate()?;
        if input.is_empty() {
            debug!("event=person_update module=repo status=timestamp_only id={id}");
        }

        let mut fields = to_document(input)?;
        fields.insert(UPDATED_FIELD.to_string(), Value::from(self.clock.now()));

        let result = self.store.update_one(id, fields);
        if result.modified_count == 0 {
            warn!("event=person_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id.to_string()));
        }

        info!("event=person_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let result = self.store.delete_one(id);
        if result.deleted_count == 0 {
            warn!("event=person_delete module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id.to_string()));
        }

        info!("event=person_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_all(&self) {
        self.store.delete_all();
        info!("event=person_delete_all module=repo status=ok");
    }
}

fn to_document<T: Serialize>(input: &T) -> RepoResult<Document> {
    match serde_json::to_value(input) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(RepoError::InvalidData(format!(
            "expected an object, got `{other}`"
        ))),
        Err(err) => Err(RepoError::InvalidData(err.to_string())),
    }
}

fn parse_person_document(document: Document) -> RepoResult<PersonRead> {
    let id = document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string();
    serde_json::from_value(Value::Object(document))
        .map_err(|err| RepoError::InvalidData(format!("stored person `{id}`: {err}")))
}
