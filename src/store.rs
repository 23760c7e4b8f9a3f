// src/store.rs
use crate::backend::KeyValueBackend;
use crate::error::{StoreError, StoreResult};
use crate::models::{uuid_v4_generator, CredentialCollection, CredentialRecord, IdGenerator};
use log;

/// The single key under which the whole collection is persisted.
pub const LOGINS_KEY: &str = "@savepass:logins";

/// Serializes a collection into the persisted JSON array form.
pub fn serialize_collection(collection: &CredentialCollection) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(collection).map_err(|e| {
        let msg = format!("JSON serialization failed: {}", e);
        log::error!("serialize_collection: {}", msg);
        StoreError::Serialization(msg)
    })
}

/// Parses the persisted form. Any malformed record fails the whole blob.
pub fn deserialize_collection(bytes: &[u8]) -> StoreResult<CredentialCollection> {
    let collection: CredentialCollection = serde_json::from_slice(bytes).map_err(|e| {
        let msg = format!("JSON deserialization failed: {}", e);
        log::error!("deserialize_collection: {}", msg);
        StoreError::Deserialization(msg)
    })?;

    if let Some(id) = collection.find_duplicate_id() {
        let msg = format!("Stored collection contains duplicate id '{}'", id);
        log::error!("deserialize_collection: {}", msg);
        return Err(StoreError::Deserialization(msg));
    }
    Ok(collection)
}

/// Owns the persisted credential collection.
///
/// Nothing is cached: every call reads the backend again. `append` is a
/// read-modify-write of the full blob with no locking, so two writers working
/// from the same snapshot race and the last write wins.
pub struct RecordStore<B: KeyValueBackend> {
    backend: B,
    new_id: IdGenerator,
}

impl<B: KeyValueBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_id_generator(backend, uuid_v4_generator())
    }

    pub fn with_id_generator(backend: B, new_id: IdGenerator) -> Self {
        RecordStore { backend, new_id }
    }

    /// Loads every stored record, oldest first. An unset key is an empty vault.
    pub fn load_all(&self) -> StoreResult<CredentialCollection> {
        let raw = self.backend.get(LOGINS_KEY).map_err(|e| {
            log::error!("Failed to read key {:?}: {:?}", LOGINS_KEY, e);
            StoreError::StorageRead(e)
        })?;

        let collection = match raw {
            None => {
                log::info!("No credentials stored under {:?} yet", LOGINS_KEY);
                CredentialCollection::new()
            }
            Some(bytes) if bytes.is_empty() => {
                log::warn!("Empty value stored under {:?}; treating it as an empty vault", LOGINS_KEY);
                CredentialCollection::new()
            }
            Some(bytes) => deserialize_collection(&bytes)?,
        };

        log::debug!("Loaded {} credential(s)", collection.len());
        Ok(collection)
    }

    /// Whether a record with `id` is currently persisted.
    pub fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.load_all()?.contains_id(id))
    }

    /// Appends `record` at the tail of the stored collection.
    ///
    /// The new blob is built in memory and written with a single `set`, so
    /// a failed write leaves the stored collection as it was.
    pub fn append(&self, record: CredentialRecord) -> StoreResult<()> {
        if let Some(field) = record.first_empty_field() {
            log::warn!("Rejected credential with empty field '{}'", field);
            return Err(StoreError::Validation { field });
        }

        let current = self.load_all()?;
        if current.contains_id(&record.id) {
            log::error!("Rejected credential with duplicate id {}", record.id);
            return Err(StoreError::DuplicateId(record.id));
        }

        let id = record.id.clone();
        let mut next = current;
        next.push(record);
        self.persist(&next)?;

        log::info!("Stored credential {} ({} total)", id, next.len());
        Ok(())
    }

    /// Builds a record with a freshly generated id and appends it.
    pub fn create(&self, service_name: String, email: String, password: String) -> StoreResult<CredentialRecord> {
        let record = CredentialRecord::new((self.new_id)(), service_name, email, password);
        self.append(record.clone())?;
        Ok(record)
    }

    fn persist(&self, collection: &CredentialCollection) -> StoreResult<()> {
        let bytes = serialize_collection(collection)?;
        self.backend.set(LOGINS_KEY, &bytes).map_err(|e| {
            log::error!("Failed to write key {:?}: {:?}", LOGINS_KEY, e);
            StoreError::StorageWrite(e)
        })
    }
}
