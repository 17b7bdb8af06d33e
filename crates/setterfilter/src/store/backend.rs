use crate::attributes::AttrValue;
use crate::error::Result;
use crate::model::{ModelId, RecordKey};
use std::collections::BTreeMap;

/// Abstract interface for raw attribute storage.
/// This trait handles the "how" of persistence, while the interceptors
/// decide "what" value reaches it.
pub trait StorageBackend {
    /// Create an empty record of `model`.
    fn create_record(&self, model: &ModelId) -> Result<RecordKey>;

    /// Store `value` as the raw value of `field`, with no filtering.
    fn raw_write(&self, record: &RecordKey, field: &str, value: AttrValue) -> Result<()>;

    /// Read the raw stored value of `field`.
    /// Returns Ok(None) if the field was never written.
    fn raw_read(&self, record: &RecordKey, field: &str) -> Result<Option<AttrValue>>;

    /// All stored fields of a record.
    /// Returns Err if the record does not exist.
    fn read_record(&self, record: &RecordKey) -> Result<BTreeMap<String, AttrValue>>;
}
