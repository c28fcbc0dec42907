//! Declarative field maps: pick, rename and coerce upstream fields into the
//! public response shape.

use crate::client::{ApiError, ApiResult};
use crate::ProjectedEntry;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Copy,
    /// Integer or numeric string, output as an integer.
    Rank,
    /// Fraction in `0..=1` scaled to a percentage with one decimal.
    Percent,
    /// `source + " " + other`, e.g. city and nickname.
    Join(&'static str),
    /// `1` is true, anything else is false.
    Flag,
    /// Scoreboard period list reduced to `[{period, score}]`.
    Periods,
}

/// What happens when the source field is absent (or `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Required,
    Empty,
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub output: &'static str,
    /// Column name or dotted path into nested objects (`homeTeam.score`).
    pub source: &'static str,
    pub transform: Transform,
    pub fallback: Fallback,
}

impl Field {
    const fn new(output: &'static str, source: &'static str, transform: Transform) -> Self {
        Self { output, source, transform, fallback: Fallback::Required }
    }

    pub const fn copy(output: &'static str, source: &'static str) -> Self {
        Self::new(output, source, Transform::Copy)
    }

    pub const fn rank(output: &'static str, source: &'static str) -> Self {
        Self::new(output, source, Transform::Rank)
    }

    pub const fn percent(output: &'static str, source: &'static str) -> Self {
        Self::new(output, source, Transform::Percent)
    }

    pub const fn join(output: &'static str, first: &'static str, second: &'static str) -> Self {
        Self::new(output, first, Transform::Join(second))
    }

    pub const fn flag(output: &'static str, source: &'static str) -> Self {
        Self::new(output, source, Transform::Flag)
    }

    pub const fn periods(output: &'static str, source: &'static str) -> Self {
        Self::new(output, source, Transform::Periods)
    }

    pub const fn or_empty(mut self) -> Self {
        self.fallback = Fallback::Empty;
        self
    }

    pub const fn or_omit(mut self) -> Self {
        self.fallback = Fallback::Omit;
        self
    }
}

/// Columns a table must carry for `fields` to project without `MissingField`.
pub fn required_columns(fields: &[Field]) -> Vec<&'static str> {
    let mut columns = Vec::new();
    for field in fields.iter().filter(|f| f.fallback == Fallback::Required) {
        columns.push(field.source);
        if let Transform::Join(second) = field.transform {
            columns.push(second);
        }
    }
    columns
}

/// Follows a dotted path through nested objects.
pub fn lookup<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

pub fn project(record: &Map<String, Value>, fields: &[Field]) -> ApiResult<ProjectedEntry> {
    let mut entry = ProjectedEntry::new();
    for field in fields {
        if let Some(value) = project_field(record, field)? {
            entry.insert(field.output.to_owned(), value);
        }
    }
    Ok(entry)
}

pub fn project_all<'a, I>(records: I, fields: &[Field]) -> ApiResult<Vec<ProjectedEntry>>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    records.into_iter().map(|r| project(r, fields)).collect()
}

fn project_field(record: &Map<String, Value>, field: &Field) -> ApiResult<Option<Value>> {
    let source = match (lookup(record, field.source), field.fallback) {
        (Some(v), Fallback::Required) => v,
        (Some(v), _) if !v.is_null() => v,
        (_, Fallback::Required) => return Err(ApiError::MissingField(field.source.to_owned())),
        (_, Fallback::Empty) => return Ok(Some(Value::String(String::new()))),
        (_, Fallback::Omit) => return Ok(None),
    };

    let value = match field.transform {
        Transform::Copy => source.clone(),
        Transform::Rank => json!(parse_rank(field.source, source)?),
        Transform::Percent => {
            let fraction = as_number(source).ok_or_else(|| invalid(field.source, source))?;
            json!(percent(fraction))
        }
        Transform::Join(second) => {
            let other = match lookup(record, second) {
                Some(v) if !v.is_null() => display(v),
                _ if field.fallback == Fallback::Required => {
                    return Err(ApiError::MissingField(second.to_owned()));
                }
                _ => String::new(),
            };
            let joined = format!("{} {}", display(source), other);
            Value::String(joined.trim().to_owned())
        }
        Transform::Flag => Value::Bool(is_set(source)),
        Transform::Periods => periods(field.source, source)?,
    };
    Ok(Some(value))
}

/// Sort key for rank columns; upstream sends these as numbers or strings.
pub fn parse_rank(field: &str, value: &Value) -> ApiResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::InvalidRank {
        field: field.to_owned(),
        value: value.to_string(),
    })
}

/// `0.632 -> 63.2`
pub fn percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lines without a period number are dropped; a missing score counts as 0.
fn periods(field: &str, value: &Value) -> ApiResult<Value> {
    let list = value.as_array().ok_or_else(|| invalid(field, value))?;
    let lines = list
        .iter()
        .filter_map(|p| {
            let period = p.get("period").filter(|n| n.is_number())?;
            Some(json!({
                "period": period,
                "score": p.get("score").filter(|s| !s.is_null()).cloned().unwrap_or(json!(0)),
            }))
        })
        .collect();
    Ok(Value::Array(lines))
}

fn invalid(field: &str, value: &Value) -> ApiError {
    ApiError::InvalidValue {
        field: field.to_owned(),
        value: value.to_string(),
    }
}
