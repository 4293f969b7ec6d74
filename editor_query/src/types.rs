//! Data exchanged with the interpreter and its hosts.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A table known to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub attributes: Vec<String>,
}

/// Result of loading a database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedDatabase {
    /// What the interpreter printed for `.load`.
    pub output: String,
    /// Tables declared in the file.
    pub tables: Vec<TableInfo>,
}

/// JSON body of a query request, `{"expression": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub expression: String,
}

impl QueryBody {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parses the output of `.tables`.
///
/// Every line containing `:` is read as `Name : { a, b, c }`. Lines without a
/// colon are ignored, as are empty attribute entries.
pub fn parse_tables(output: &str) -> Vec<TableInfo> {
    output
        .lines()
        .filter(|line| line.contains(':'))
        .map(|line| {
            let mut parts = line.split(':');
            let name = parts.next().unwrap_or_default().trim().to_string();
            let attributes = parts
                .next()
                .unwrap_or_default()
                .replace(['{', '}'], "")
                .split(',')
                .map(str::trim)
                .filter(|attr| !attr.is_empty())
                .map(str::to_string)
                .collect();
            TableInfo { name, attributes }
        })
        .collect()
}

/// Reads the table layout from a database file in the interpreter's JSON
/// format: `{"tables": {"Name": {"attributes": {"a": .., "b": ..}}}}`.
///
/// Tables and attributes come back in key order.
pub fn tables_from_database_json(json: &str) -> Result<Vec<TableInfo>> {
    let root: serde_json::Value = serde_json::from_str(json)?;
    let Some(tables) = root.get("tables").and_then(|t| t.as_object()) else {
        return Ok(Vec::new());
    };

    Ok(tables
        .iter()
        .map(|(name, table)| TableInfo {
            name: name.clone(),
            attributes: table
                .get("attributes")
                .and_then(|a| a.as_object())
                .map(|attrs| attrs.keys().cloned().collect())
                .unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_tables() {
        let output = "Students : { StudentID, Name, Major }\n\
                      Courses  : { CourseCode, Title, CreditHours }\n\
                      2 tables";
        assert_eq!(
            parse_tables(output),
            vec![
                TableInfo {
                    name: "Students".to_string(),
                    attributes: vec!["StudentID".into(), "Name".into(), "Major".into()],
                },
                TableInfo {
                    name: "Courses".to_string(),
                    attributes: vec!["CourseCode".into(), "Title".into(), "CreditHours".into()],
                },
            ]
        );
    }

    #[test]
    fn test_parse_tables_drops_empty_attributes() {
        assert_eq!(
            parse_tables("Empty : { }\nR : {a,, b}"),
            vec![
                TableInfo {
                    name: "Empty".to_string(),
                    attributes: vec![],
                },
                TableInfo {
                    name: "R".to_string(),
                    attributes: vec!["a".into(), "b".into()],
                },
            ]
        );
        assert!(parse_tables("(no output)").is_empty());
    }

    #[test]
    fn test_query_body_json() {
        let body = QueryBody::new(".tables");
        assert_eq!(body.to_json().unwrap(), r#"{"expression":".tables"}"#);
        assert_eq!(QueryBody::from_json("{}").unwrap(), QueryBody::new(""));
    }

    #[test]
    fn test_tables_from_database_json() {
        let json = r#"{
            "tables": {
                "R": { "attributes": { "a": "int", "b": "string" }, "tuples": [] },
                "S": { "attributes": {} }
            }
        }"#;
        assert_eq!(
            tables_from_database_json(json).unwrap(),
            vec![
                TableInfo {
                    name: "R".to_string(),
                    attributes: vec!["a".into(), "b".into()],
                },
                TableInfo {
                    name: "S".to_string(),
                    attributes: vec![],
                },
            ]
        );
        assert!(tables_from_database_json("{}").unwrap().is_empty());
        assert!(tables_from_database_json("not json").is_err());
    }
}
