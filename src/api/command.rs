//! Command parsing
//!
//! Callers name an operation and pass a flat list of string arguments.
//! Parsing resolves the name to a closed `Operation`, checks the argument
//! count and builds a typed `Command`. Nothing here touches the backend.

use std::fmt;
use std::str::FromStr;

use crate::keys::RecordKey;
use crate::ledger::{RecordError, RecordResult};
use crate::record::{Attribute, Record, RecordPatch};

/// Caller-facing operation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateRecord,
    GetAllRecords,
    GetRecordByKey,
    QueryRecordsByName,
    QueryRecordsByPhone,
    QueryRecordsById,
    QueryRecordsByAttribute,
    QueryRecordsBySelector,
    GetRecordHistory,
    UpdateRecord,
    DeleteRecord,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::CreateRecord,
        Operation::GetAllRecords,
        Operation::GetRecordByKey,
        Operation::QueryRecordsByName,
        Operation::QueryRecordsByPhone,
        Operation::QueryRecordsById,
        Operation::QueryRecordsByAttribute,
        Operation::QueryRecordsBySelector,
        Operation::GetRecordHistory,
        Operation::UpdateRecord,
        Operation::DeleteRecord,
    ];

    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateRecord => "createRecord",
            Operation::GetAllRecords => "getAllRecords",
            Operation::GetRecordByKey => "getRecordByKey",
            Operation::QueryRecordsByName => "queryRecordsByName",
            Operation::QueryRecordsByPhone => "queryRecordsByPhone",
            Operation::QueryRecordsById => "queryRecordsById",
            Operation::QueryRecordsByAttribute => "queryRecordsByAttribute",
            Operation::QueryRecordsBySelector => "queryRecordsBySelector",
            Operation::GetRecordHistory => "getRecordHistory",
            Operation::UpdateRecord => "updateRecord",
            Operation::DeleteRecord => "deleteRecord",
        }
    }

    /// Accepted argument counts.
    pub fn arities(&self) -> &'static [usize] {
        match self {
            Operation::CreateRecord => &[3, 4, 5],
            Operation::GetAllRecords => &[0],
            Operation::QueryRecordsByAttribute => &[2],
            Operation::UpdateRecord => &[4],
            Operation::GetRecordByKey
            | Operation::QueryRecordsByName
            | Operation::QueryRecordsByPhone
            | Operation::QueryRecordsById
            | Operation::QueryRecordsBySelector
            | Operation::GetRecordHistory
            | Operation::DeleteRecord => &[1],
        }
    }

    fn check_arity(&self, args: &[String]) -> RecordResult<()> {
        if self.arities().contains(&args.len()) {
            Ok(())
        } else {
            Err(self.arity_error(args.len()))
        }
    }

    fn arity_error(&self, actual: usize) -> RecordError {
        let expected = self
            .arities()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        RecordError::InvalidArgumentCount {
            operation: self.name().to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| RecordError::UnknownOperation(s.to_string()))
    }
}

/// A fully parsed request against the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `key` is None when it should be derived from the record content.
    CreateRecord {
        key: Option<RecordKey>,
        record: Record,
    },
    GetAllRecords,
    GetRecordByKey {
        key: RecordKey,
    },
    QueryByAttribute {
        attribute: Attribute,
        value: String,
    },
    QueryBySelector {
        selector: String,
    },
    GetRecordHistory {
        key: RecordKey,
    },
    UpdateRecord {
        key: RecordKey,
        patch: RecordPatch,
    },
    DeleteRecord {
        key: RecordKey,
    },
}

impl Command {
    /// Parses an operation name and its positional arguments.
    pub fn parse(op: &str, args: &[String]) -> RecordResult<Self> {
        let operation: Operation = op.parse()?;
        operation.check_arity(args)?;

        let command = match operation {
            Operation::CreateRecord => match args {
                [name, phone, id] => Command::CreateRecord {
                    key: None,
                    record: Record::new(name, phone, id),
                },
                [key, name, phone, id] => Command::CreateRecord {
                    key: Some(RecordKey::from(key.as_str())),
                    record: Record::new(name, phone, id),
                },
                [key, identifier, name, phone, id] => Command::CreateRecord {
                    key: Some(RecordKey::from(key.as_str())),
                    record: Record::new(name, phone, id).with_identifier(identifier),
                },
                _ => return Err(operation.arity_error(args.len())),
            },
            Operation::GetAllRecords => Command::GetAllRecords,
            Operation::GetRecordByKey => Command::GetRecordByKey { key: key_arg(args) },
            Operation::QueryRecordsByName => attribute_query(Attribute::Name, args),
            Operation::QueryRecordsByPhone => attribute_query(Attribute::Phone, args),
            Operation::QueryRecordsById => attribute_query(Attribute::Id, args),
            Operation::QueryRecordsByAttribute => {
                let attribute: Attribute = args[0].parse().map_err(RecordError::InvalidArgument)?;
                Command::QueryByAttribute {
                    attribute,
                    value: args[1].clone(),
                }
            }
            Operation::QueryRecordsBySelector => Command::QueryBySelector {
                selector: args[0].clone(),
            },
            Operation::GetRecordHistory => Command::GetRecordHistory { key: key_arg(args) },
            Operation::UpdateRecord => Command::UpdateRecord {
                key: key_arg(args),
                patch: RecordPatch::new(&args[1], &args[2], &args[3]),
            },
            Operation::DeleteRecord => Command::DeleteRecord { key: key_arg(args) },
        };
        Ok(command)
    }

    /// Wire name of the operation this command came from.
    ///
    /// The three fixed-attribute queries report as `queryRecordsByAttribute`.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateRecord { .. } => Operation::CreateRecord.name(),
            Command::GetAllRecords => Operation::GetAllRecords.name(),
            Command::GetRecordByKey { .. } => Operation::GetRecordByKey.name(),
            Command::QueryByAttribute { .. } => Operation::QueryRecordsByAttribute.name(),
            Command::QueryBySelector { .. } => Operation::QueryRecordsBySelector.name(),
            Command::GetRecordHistory { .. } => Operation::GetRecordHistory.name(),
            Command::UpdateRecord { .. } => Operation::UpdateRecord.name(),
            Command::DeleteRecord { .. } => Operation::DeleteRecord.name(),
        }
    }
}

fn key_arg(args: &[String]) -> RecordKey {
    RecordKey::from(args[0].as_str())
}

fn attribute_query(attribute: Attribute, args: &[String]) -> Command {
    Command::QueryByAttribute {
        attribute,
        value: args[0].clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_operation_names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = Command::parse("dropTable", &[]).unwrap_err();
        assert_eq!(err, RecordError::UnknownOperation("dropTable".into()));
    }

    #[test]
    fn test_operation_names_are_case_sensitive() {
        assert!(matches!(
            Command::parse("CREATERECORD", &args(&["a", "b", "c"])),
            Err(RecordError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_create_three_args_derives_key() {
        let cmd = Command::parse("createRecord", &args(&["Alice", "555", "X1"])).unwrap();
        assert_eq!(
            cmd,
            Command::CreateRecord {
                key: None,
                record: Record::new("Alice", "555", "X1"),
            }
        );
    }

    #[test]
    fn test_create_four_args_explicit_key() {
        let cmd = Command::parse("createRecord", &args(&["id1", "A", "555", "X"])).unwrap();
        assert_eq!(
            cmd,
            Command::CreateRecord {
                key: Some(RecordKey::from("id1")),
                record: Record::new("A", "555", "X"),
            }
        );
    }

    #[test]
    fn test_create_five_args_with_identifier() {
        let cmd =
            Command::parse("createRecord", &args(&["id1", "ext-7", "A", "555", "X"])).unwrap();
        match cmd {
            Command::CreateRecord { key, record } => {
                assert_eq!(key, Some(RecordKey::from("id1")));
                assert_eq!(record.identifier, "ext-7");
                assert_eq!(record.name, "A");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_wrong_count() {
        let err = Command::parse("createRecord", &args(&["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidArgumentCount {
                operation: "createRecord".into(),
                expected: "3 or 4 or 5".into(),
                actual: 2,
            }
        );
    }

    #[test]
    fn test_fixed_arity_rejections() {
        let cases: &[(&str, usize)] = &[
            ("getAllRecords", 1),
            ("getRecordByKey", 0),
            ("getRecordByKey", 2),
            ("queryRecordsByName", 2),
            ("queryRecordsByAttribute", 1),
            ("queryRecordsBySelector", 0),
            ("getRecordHistory", 2),
            ("updateRecord", 3),
            ("updateRecord", 5),
            ("deleteRecord", 0),
        ];
        for (op, count) in cases {
            let supplied = vec!["x".to_string(); *count];
            let err = Command::parse(op, &supplied).unwrap_err();
            assert_eq!(err.code(), "REC_INVALID_ARGUMENT_COUNT", "{} with {}", op, count);
        }
    }

    #[test]
    fn test_named_queries_map_to_attribute() {
        let cmd = Command::parse("queryRecordsByPhone", &args(&["555"])).unwrap();
        assert_eq!(
            cmd,
            Command::QueryByAttribute {
                attribute: Attribute::Phone,
                value: "555".into(),
            }
        );
        assert_eq!(cmd.name(), "queryRecordsByAttribute");
    }

    #[test]
    fn test_query_by_attribute_name() {
        let cmd = Command::parse("queryRecordsByAttribute", &args(&["ID", "X1"])).unwrap();
        assert_eq!(
            cmd,
            Command::QueryByAttribute {
                attribute: Attribute::Id,
                value: "X1".into(),
            }
        );
    }

    #[test]
    fn test_query_by_unknown_attribute() {
        let err = Command::parse("queryRecordsByAttribute", &args(&["email", "x"])).unwrap_err();
        assert_eq!(err.code(), "REC_INVALID_ARGUMENT");
    }

    #[test]
    fn test_update_builds_patch() {
        let cmd = Command::parse("updateRecord", &args(&["id1", "", "556", ""])).unwrap();
        assert_eq!(
            cmd,
            Command::UpdateRecord {
                key: RecordKey::from("id1"),
                patch: RecordPatch::new("", "556", ""),
            }
        );
    }
}
