use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServiceError;

/// JSON field the server owns on every record.
pub const ID_FIELD: &str = "_id";

/// In-memory collections of JSON records.
///
/// Each collection keeps insertion order, which is the order `list`
/// returns. Collections spring into existence on first write.
#[derive(Default)]
pub struct EntityStore {
    collections: RwLock<BTreeMap<String, Vec<Map<String, Value>>>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in a collection. Unknown collections are empty.
    pub fn list(&self, collection: &str) -> Vec<Value> {
        let collections = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        collections
            .get(collection)
            .map(|records| records.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, collection: &str, id: &str) -> Result<Value, ServiceError> {
        let collections = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .map(Value::Object)
            .ok_or_else(|| not_found(collection, id))
    }

    /// Insert a record under a freshly generated identifier.
    ///
    /// Any `_id` in the payload is ignored.
    pub fn create(&self, collection: &str, body: Value) -> Result<Value, ServiceError> {
        let mut record = into_object(body)?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        debug!(collection, id = %id, "created");
        Ok(Value::Object(record))
    }

    /// Replace the record at `id` wholesale. The identifier is preserved.
    pub fn replace(&self, collection: &str, id: &str, body: Value) -> Result<Value, ServiceError> {
        let mut record = into_object(body)?;
        record.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let slot = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(collection, id))?;
        *slot = record.clone();
        debug!(collection, id, "replaced");
        Ok(Value::Object(record))
    }

    /// Load records as-is, assigning identifiers where missing.
    ///
    /// Identifiers must be unique within the collection, counting records
    /// already stored. A batch with a duplicate is rejected whole.
    pub fn seed(&self, collection: &str, records: Vec<Value>) -> Result<usize, ServiceError> {
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let mut seen: BTreeSet<String> = collections
            .get(collection)
            .map(|existing| existing.iter().filter_map(record_id).map(str::to_string).collect())
            .unwrap_or_default();

        let mut loaded = Vec::with_capacity(records.len());
        for body in records {
            let mut record = into_object(body)?;
            let id = match record_id(&record) {
                Some(id) => id.to_string(),
                None => {
                    let id = uuid::Uuid::new_v4().simple().to_string();
                    record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                    id
                }
            };
            if !seen.insert(id.clone()) {
                return Err(ServiceError::Validation(format!(
                    "duplicate {} '{}' in {}",
                    ID_FIELD, id, collection
                )));
            }
            loaded.push(record);
        }

        let count = loaded.len();
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(loaded);
        Ok(count)
    }
}

fn record_id(record: &Map<String, Value>) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

fn into_object(body: Value) -> Result<Map<String, Value>, ServiceError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ServiceError::Validation(format!(
            "record must be a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn not_found(collection: &str, id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{} '{}' not found", collection, id))
}
