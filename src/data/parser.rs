//! Splits a catalog file into `KEY: value` records.
//!
//! Records are separated by one or more blank lines. Keys are matched
//! case-insensitively and stored uppercased; values are trimmed.

use std::collections::HashMap;

use crate::core::error::{DataError, DataResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line the record starts on, for error messages.
    pub line: usize,
    fields: HashMap<String, String>,
}

impl Record {
    fn new(line: usize) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> DataResult<&str> {
        self.get(key).ok_or_else(|| {
            DataError::InvalidFormat(format!(
                "record at line {} is missing {}",
                self.line, key
            ))
        })
    }

    pub fn require_u32(&self, key: &str) -> DataResult<u32> {
        let value = self.require(key)?;
        value.parse().map_err(|_| {
            DataError::InvalidFormat(format!(
                "{} must be a non-negative integer in record at line {} (got '{}')",
                key, self.line, value
            ))
        })
    }

    /// Like `require`, but an empty value is also rejected.
    pub fn require_non_empty(&self, key: &str) -> DataResult<&str> {
        let value = self.require(key)?;
        if value.is_empty() {
            return Err(DataError::InvalidFormat(format!(
                "{} is empty in record at line {}",
                key, self.line
            )));
        }
        Ok(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

pub fn parse_records(content: &str) -> DataResult<Vec<Record>> {
    if content.trim().is_empty() {
        return Err(DataError::InvalidFormat("file is empty".to_string()));
    }

    let mut records = Vec::new();
    let mut current: Option<Record> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            if let Some(record) = current.take() {
                records.push(record);
            }
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            DataError::InvalidFormat(format!("line {} has no ':' separator: '{}'", line_no, line))
        })?;

        let key = key.trim().to_uppercase();
        let record = current.get_or_insert_with(|| Record::new(line_no));
        if record.fields.contains_key(&key) {
            return Err(DataError::InvalidFormat(format!(
                "line {}: key {} repeated in the record starting at line {}",
                line_no, key, record.line
            )));
        }
        record.fields.insert(key, value.trim().to_string());
    }

    if let Some(record) = current {
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_records() {
        let records = parse_records("A: 1\nB: two\n\n\nA: 3\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("A"), Some("1"));
        assert_eq!(records[0].get("B"), Some("two"));
        assert_eq!(records[1].line, 5);
        assert_eq!(records[1].require_u32("A").unwrap(), 3);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let records = parse_records("item_id: sword\n Name :  Iron Sword \n").unwrap();
        assert_eq!(records[0].get("ITEM_ID"), Some("sword"));
        assert_eq!(records[0].get("NAME"), Some("Iron Sword"));
    }

    #[test]
    fn test_value_may_contain_colon() {
        let records = parse_records("EFFECT: health:20").unwrap();
        assert_eq!(records[0].get("EFFECT"), Some("health:20"));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            parse_records("  \n\n"),
            Err(DataError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_line_without_separator() {
        let err = parse_records("A: 1\njust words\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidFormat(msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_require_errors() {
        let records = parse_records("COST: ten\nNAME:\n").unwrap();
        let record = &records[0];
        assert!(matches!(record.require("MISSING"), Err(DataError::InvalidFormat(_))));
        assert!(matches!(record.require_u32("COST"), Err(DataError::InvalidFormat(_))));
        assert_eq!(record.require("NAME").unwrap(), "");
        assert!(matches!(
            record.require_non_empty("NAME"),
            Err(DataError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_repeated_key_in_record_is_rejected() {
        let err = parse_records("A: 1\nB: 2\na: 3\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidFormat(ref msg) if msg.contains("line 3")));

        // The same key in separate records is fine.
        assert_eq!(parse_records("A: 1\n\nA: 2\n").unwrap().len(), 2);
    }
}
