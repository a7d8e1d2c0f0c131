//! Record domain types
//!
//! - `Record` - the stored entity, a fixed set of string attributes
//! - `RecordPatch` - partial update where the empty string means "no change"
//! - `Attribute` - the closed set of attributes usable in exact-match queries

mod attribute;
mod patch;
#[allow(clippy::module_inception)]
mod record;

pub use attribute::Attribute;
pub use patch::RecordPatch;
pub use record::Record;
