//! Header/row decoding for stats.nba.com style tables.

use crate::client::{ApiError, ApiResult};
use crate::{DecodedRow, TabularResult};

/// Zips every row of `table` with its headers.
///
/// `expected` lists the columns the caller is going to read; if the upstream
/// dropped or renamed any of them the whole table is rejected up front rather
/// than failing halfway through projection. A table without rows decodes to
/// nothing whatever its headers are, since the upstream often trims the
/// header list of sections it has no data for.
pub fn decode(table: &TabularResult, expected: &[&str]) -> ApiResult<Vec<DecodedRow>> {
    if table.row_set.is_empty() {
        return Ok(Vec::new());
    }
    check_headers(table, expected)?;
    table
        .row_set
        .iter()
        .enumerate()
        .map(|(i, row)| decode_row(table, i, row))
        .collect()
}

/// Decodes only the first row, `None` when the table is empty. Every row is
/// still length-checked.
pub fn decode_first(table: &TabularResult, expected: &[&str]) -> ApiResult<Option<DecodedRow>> {
    let Some(first) = table.row_set.first() else {
        return Ok(None);
    };
    check_headers(table, expected)?;
    for (i, row) in table.row_set.iter().enumerate().skip(1) {
        check_width(table, i, row)?;
    }
    decode_row(table, 0, first).map(Some)
}

fn check_headers(table: &TabularResult, expected: &[&str]) -> ApiResult<()> {
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|e| !table.headers.iter().any(|h| h == e))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::SchemaMismatch {
            table: table.name.clone(),
            detail: format!("missing columns {}", missing.join(", ")),
        })
    }
}

fn check_width(table: &TabularResult, index: usize, row: &[serde_json::Value]) -> ApiResult<()> {
    if row.len() != table.headers.len() {
        return Err(ApiError::SchemaMismatch {
            table: table.name.clone(),
            detail: format!(
                "row {index} has {} cells but there are {} headers",
                row.len(),
                table.headers.len()
            ),
        });
    }
    Ok(())
}

fn decode_row(
    table: &TabularResult,
    index: usize,
    row: &[serde_json::Value],
) -> ApiResult<DecodedRow> {
    check_width(table, index, row)?;
    Ok(table
        .headers
        .iter()
        .cloned()
        .zip(row.iter().cloned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sample() -> TabularResult {
        TabularResult::new(
            "Sample",
            &["A", "B"],
            vec![vec![json!("x"), json!(1)], vec![json!("y"), json!(2)]],
        )
    }

    #[test]
    fn zips_rows_with_headers() {
        let rows = decode(&sample(), &["A", "B"]).unwrap();
        let rows: Vec<Value> = rows.into_iter().map(Value::Object).collect();
        assert_eq!(rows, vec![json!({"A": "x", "B": 1}), json!({"A": "y", "B": 2})]);
    }

    #[test]
    fn decoded_keys_are_exactly_the_headers() {
        let rows = decode(&sample(), &[]).unwrap();
        for row in rows {
            let keys: Vec<&str> = row.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["A", "B"]);
        }
    }

    #[test]
    fn empty_row_set_is_not_an_error() {
        let table = TabularResult::new("Empty", &["A"], vec![]);
        assert!(decode(&table, &["A"]).unwrap().is_empty());
        assert!(decode_first(&table, &["A"]).unwrap().is_none());
    }

    #[test]
    fn empty_table_with_trimmed_headers_is_not_an_error() {
        let table = TabularResult::new("LastMeeting", &["LAST_GAME_ID"], vec![]);
        assert!(decode(&table, &["LAST_GAME_ID", "LAST_GAME_DATE_EST"]).unwrap().is_empty());
        assert!(decode_first(&table, &["LAST_GAME_ID", "LAST_GAME_DATE_EST"]).unwrap().is_none());
    }

    #[test]
    fn short_row_is_a_schema_mismatch() {
        let table = TabularResult::new("Broken", &["A", "B"], vec![vec![json!("x")]]);
        let err = decode(&table, &[]).unwrap_err();
        assert!(matches!(err, ApiError::SchemaMismatch { ref table, .. } if table == "Broken"));
        assert!(err.to_string().contains("row 0 has 1 cells"));
    }

    #[test]
    fn missing_expected_header_is_a_schema_mismatch() {
        let err = decode(&sample(), &["A", "C"]).unwrap_err();
        assert!(matches!(err, ApiError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("missing columns C"));
    }

    #[test]
    fn first_row_only_still_checks_later_rows() {
        let table = TabularResult::new(
            "Broken",
            &["A", "B"],
            vec![vec![json!("x"), json!(1)], vec![json!("y")]],
        );
        let err = decode_first(&table, &["A"]).unwrap_err();
        assert!(matches!(err, ApiError::SchemaMismatch { ref table, .. } if table == "Broken"));
        assert!(err.to_string().contains("row 1 has 1 cells"));
    }

    #[test]
    fn first_row_only() {
        let row = decode_first(&sample(), &["A"]).unwrap().unwrap();
        assert_eq!(Value::Object(row), json!({"A": "x", "B": 1}));
    }
}
