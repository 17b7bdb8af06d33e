use super::backend::StorageBackend;
use crate::attributes::AttrValue;
use crate::error::{Result, SetterFilterError};
use crate::model::{ModelId, RecordKey};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// In-memory storage backend.
///
/// Uses `RefCell` for interior mutability since assignments are
/// single-threaded. This lets the `StorageBackend` trait use `&self` for
/// all methods.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<HashMap<RecordKey, BTreeMap<String, AttrValue>>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Number of successful raw writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    fn missing(record: &RecordKey) -> SetterFilterError {
        SetterFilterError::Store(format!("Record not found: {}", record))
    }
}

impl StorageBackend for MemBackend {
    fn create_record(&self, model: &ModelId) -> Result<RecordKey> {
        let key = RecordKey::new(model.clone());
        self.records
            .borrow_mut()
            .insert(key.clone(), BTreeMap::new());
        Ok(key)
    }

    fn raw_write(&self, record: &RecordKey, field: &str, value: AttrValue) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(SetterFilterError::Store("Simulated write error".to_string()));
        }
        let mut records = self.records.borrow_mut();
        let values = records.get_mut(record).ok_or_else(|| Self::missing(record))?;
        values.insert(field.to_string(), value);
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn raw_read(&self, record: &RecordKey, field: &str) -> Result<Option<AttrValue>> {
        let records = self.records.borrow();
        let values = records.get(record).ok_or_else(|| Self::missing(record))?;
        Ok(values.get(field).cloned())
    }

    fn read_record(&self, record: &RecordKey) -> Result<BTreeMap<String, AttrValue>> {
        let records = self.records.borrow();
        records
            .get(record)
            .cloned()
            .ok_or_else(|| Self::missing(record))
    }
}
