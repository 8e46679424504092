//! Builds Chroma `where` / `where_document` filter objects from form input.
//!
//! Metadata clauses are `(field, operator, value)` triples joined with AND.
//! Incomplete clauses (blank field or blank value) are dropped without error;
//! when nothing survives the filter is omitted entirely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};
use tracing::debug;

use crate::errors::{ExplorerError, ExplorerResult};

/// Comparison offered by the metadata search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Equals,
    Contains,
    Greater,
    Less,
}

impl FilterOperator {
    /// Chroma operator keyword.
    pub fn as_chroma(self) -> &'static str {
        match self {
            FilterOperator::Equals => "$eq",
            FilterOperator::Contains => "$contains",
            FilterOperator::Greater => "$gt",
            FilterOperator::Less => "$lt",
        }
    }
}

/// One row of the metadata search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Builds the conjunctive metadata filter for `clauses`.
///
/// Returns `Ok(None)` when every clause is incomplete.
///
/// # Errors
/// [`ExplorerError::MalformedFilter`] when `greater`/`less` get a non-numeric value.
pub fn build_where(clauses: &[FilterClause]) -> ExplorerResult<Option<Value>> {
    let mut parts = Vec::with_capacity(clauses.len());

    for clause in clauses {
        let field = clause.field.trim();
        let raw = clause.value.trim();
        if field.is_empty() || raw.is_empty() {
            continue;
        }

        let value = match clause.operator {
            FilterOperator::Equals => typed_value(raw),
            FilterOperator::Contains => Value::String(raw.to_string()),
            FilterOperator::Greater | FilterOperator::Less => {
                numeric_value(raw).ok_or_else(|| {
                    ExplorerError::MalformedFilter(format!(
                        "'{field}' {} expects a number, got '{raw}'",
                        clause.operator.as_chroma()
                    ))
                })?
            }
        };

        let mut cond = Map::new();
        cond.insert(clause.operator.as_chroma().to_string(), value);
        let mut entry = Map::new();
        entry.insert(field.to_string(), Value::Object(cond));
        parts.push(Value::Object(entry));
    }

    debug!(clauses = clauses.len(), kept = parts.len(), "metadata filter built");
    Ok(conjoin(parts))
}

/// Parses a raw JSON `where` object typed by the user.
///
/// Blank input and `{}` both mean "no filter".
///
/// # Errors
/// [`ExplorerError::MalformedFilter`] if the text is not JSON or not an object.
pub fn parse_raw_where(raw: &str) -> ExplorerResult<Option<Value>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) if map.is_empty() => Ok(None),
        Ok(v @ Value::Object(_)) => Ok(Some(v)),
        Ok(_) => Err(ExplorerError::MalformedFilter(
            "filter must be a JSON object".into(),
        )),
        Err(e) => Err(ExplorerError::MalformedFilter(format!("invalid JSON: {e}"))),
    }
}

/// Joins filter objects with AND: none → `None`, one → itself, many → `$and`.
pub fn conjoin(mut parts: Vec<Value>) -> Option<Value> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(json!({ "$and": parts })),
    }
}

/// `where_document` filter for substring search over document text.
pub fn document_contains(term: &str) -> Value {
    json!({ "$contains": term })
}

/// Form values arrive as text: booleans and numbers are typed, the rest stays a string.
fn typed_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => numeric_value(raw).unwrap_or_else(|| Value::String(raw.to_string())),
    }
}

fn numeric_value(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clause_is_not_wrapped() {
        let w = build_where(&[FilterClause::new("category", FilterOperator::Equals, "greeting")])
            .unwrap();
        assert_eq!(w, Some(json!({ "category": { "$eq": "greeting" } })));
    }

    #[test]
    fn operators_map_to_chroma_keywords() {
        let w = build_where(&[
            FilterClause::new("lang", FilterOperator::Contains, "en"),
            FilterClause::new("year", FilterOperator::Greater, "2020"),
            FilterClause::new("score", FilterOperator::Less, "0.5"),
            FilterClause::new("draft", FilterOperator::Equals, "false"),
        ])
        .unwrap();
        assert_eq!(
            w,
            Some(json!({ "$and": [
                { "lang": { "$contains": "en" } },
                { "year": { "$gt": 2020 } },
                { "score": { "$lt": 0.5 } },
                { "draft": { "$eq": false } }
            ]}))
        );
    }

    #[test]
    fn incomplete_clauses_never_contribute() {
        for op in [
            FilterOperator::Equals,
            FilterOperator::Contains,
            FilterOperator::Greater,
            FilterOperator::Less,
        ] {
            let w = build_where(&[
                FilterClause::new("", op, "x"),
                FilterClause::new("   ", op, "1"),
                FilterClause::new("field", op, ""),
                FilterClause::new("field", op, "  "),
            ])
            .unwrap();
            assert_eq!(w, None, "operator {op:?}");
        }
    }

    #[test]
    fn incomplete_clause_is_skipped_among_valid_ones() {
        let w = build_where(&[
            FilterClause::new("", FilterOperator::Equals, "ignored"),
            FilterClause::new("author", FilterOperator::Equals, "ann"),
        ])
        .unwrap();
        assert_eq!(w, Some(json!({ "author": { "$eq": "ann" } })));
    }

    #[test]
    fn comparison_needs_a_number() {
        let err = build_where(&[FilterClause::new("year", FilterOperator::Greater, "soon")])
            .unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedFilter(_)));
    }

    #[test]
    fn raw_where_parsing() {
        assert_eq!(parse_raw_where("  ").unwrap(), None);
        assert_eq!(parse_raw_where("{}").unwrap(), None);
        assert_eq!(
            parse_raw_where(r#"{"k": {"$ne": 1}}"#).unwrap(),
            Some(json!({ "k": { "$ne": 1 } }))
        );
        assert!(matches!(
            parse_raw_where("{not json").unwrap_err(),
            ExplorerError::MalformedFilter(_)
        ));
        assert!(matches!(
            parse_raw_where("[1, 2]").unwrap_err(),
            ExplorerError::MalformedFilter(_)
        ));
    }

    #[test]
    fn typed_values() {
        assert_eq!(typed_value("42"), json!(42));
        assert_eq!(typed_value("-1.5"), json!(-1.5));
        assert_eq!(typed_value("true"), json!(true));
        assert_eq!(typed_value("NaN"), json!("NaN"));
        assert_eq!(typed_value("hello"), json!("hello"));
    }
}
