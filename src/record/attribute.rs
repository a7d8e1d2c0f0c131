//! Queryable attributes
//!
//! Exact-match queries are restricted to this closed set so that a selector
//! field name can never come from the caller.

use std::fmt;
use std::str::FromStr;

use super::Record;

/// A record attribute usable in an exact-match query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Name,
    Phone,
    Id,
    Identifier,
}

impl Attribute {
    /// All attributes, in encoding order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Name,
        Attribute::Phone,
        Attribute::Id,
        Attribute::Identifier,
    ];

    /// Returns the encoded field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Phone => "phone",
            Attribute::Id => "id",
            Attribute::Identifier => "identifier",
        }
    }

    /// Reads this attribute from a record.
    pub fn value_of<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            Attribute::Name => &record.name,
            Attribute::Phone => &record.phone,
            Attribute::Id => &record.id,
            Attribute::Identifier => &record.identifier,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Attribute {
    type Err = String;

    /// Attribute names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.field_name() == lowered)
            .ok_or_else(|| format!("unknown attribute '{}'", s))
    }
}
