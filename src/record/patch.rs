//! Partial record update
//!
//! The empty string means "leave unchanged". As a consequence an update can
//! never set an attribute to the empty string; clearing a field requires a
//! delete followed by a create. The identifier is fixed at create time.

use super::Record;

/// A partial record where empty attributes are left untouched on merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub name: String,
    pub phone: String,
    pub id: String,
}

impl RecordPatch {
    /// Creates a patch over the identifying attributes.
    pub fn new(name: impl Into<String>, phone: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            id: id.into(),
        }
    }

    /// Merges the non-empty attributes of this patch into `record`.
    pub fn apply(&self, record: &mut Record) {
        merge(&mut record.name, &self.name);
        merge(&mut record.phone, &self.phone);
        merge(&mut record.id, &self.id);
    }
}

fn merge(target: &mut String, value: &str) {
    if !value.is_empty() {
        *target = value.to_string();
    }
}
