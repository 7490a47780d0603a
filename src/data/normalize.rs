use polars::{frame::DataFrame, prelude::DataType};

use crate::{
    data::raw::RawCol,
    error::{DataError, LpError, LpResult},
};

/// How a display-formatted cell is reduced to a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// `"87.3%"` -> `87.3`. Every `%` is removed.
    Percent,
    /// `"142.5ms"` -> `142.5`. Every `ms` substring is removed.
    Millis,
    /// `"$12,345.67"` -> `12345.67`. Every `$` and `,` is removed.
    Currency,
}

/// A cell that did not reduce to a finite number. Carries the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCell(pub String);

impl FieldRule {
    pub fn strip(&self, raw: &str) -> String {
        match self {
            FieldRule::Percent => raw.replace('%', ""),
            FieldRule::Millis => raw.replace("ms", ""),
            FieldRule::Currency => raw.replace(['$', ','], ""),
        }
    }

    /// Strips the decoration and parses what is left.
    ///
    /// Surrounding whitespace is tolerated. Empty, non-numeric and non-finite
    /// results (`nan`, `inf`) are malformed; nothing is coerced to zero.
    pub fn parse(&self, raw: &str) -> Result<f64, MalformedCell> {
        self.strip(raw)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MalformedCell(raw.to_string()))
    }
}

/// Normalizes one numeric column of the raw table.
///
/// Fails on the first malformed or empty cell, naming the column, the
/// original text and the row.
pub fn normalize_column(df: &DataFrame, raw_col: RawCol) -> LpResult<Vec<f64>> {
    let rule = raw_col.rule().ok_or_else(|| {
        DataError::DataFrame(format!("Column '{raw_col}' is not a numeric column"))
    })?;

    text_column(df, raw_col)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let cell = cell.unwrap_or_default();
            rule.parse(&cell).map_err(|MalformedCell(value)| {
                LpError::from(DataError::Normalization {
                    column: raw_col.to_string(),
                    value,
                    row,
                })
            })
        })
        .collect()
}

/// Reads a label column (`Core Symbol`, `Maker Stream Name`). Null cells are rejected.
pub fn label_column(df: &DataFrame, raw_col: RawCol) -> LpResult<Vec<String>> {
    text_column(df, raw_col)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.ok_or_else(|| {
                LpError::from(DataError::MissingValue {
                    column: raw_col.to_string(),
                    row,
                })
            })
        })
        .collect()
}

/// The column as text, whatever dtype the reader produced.
fn text_column(df: &DataFrame, raw_col: RawCol) -> LpResult<Vec<Option<String>>> {
    let column = df
        .column(raw_col.as_str())
        .and_then(|c| c.cast(&DataType::String))
        .map_err(|e| DataError::DataFrame(format!("Failed to read column '{raw_col}': {e}")))?;

    let ca = column
        .str()
        .map_err(|e| DataError::DataFrame(e.to_string()))?;

    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;

    #[test]
    fn test_percent_rule() {
        assert_eq!(FieldRule::Percent.parse("87.3%"), Ok(87.3));
        assert_eq!(FieldRule::Percent.parse("100"), Ok(100.0));
        assert_eq!(FieldRule::Percent.parse("104.2%"), Ok(104.2));
        assert_eq!(FieldRule::Percent.parse("%%5%"), Ok(5.0));
    }

    #[test]
    fn test_millis_rule() {
        assert_eq!(FieldRule::Millis.parse("142.5ms"), Ok(142.5));
        assert_eq!(FieldRule::Millis.parse("95 ms"), Ok(95.0));
        assert_eq!(FieldRule::Millis.parse("-3ms"), Ok(-3.0));
    }

    #[test]
    fn test_currency_rule() {
        assert_eq!(FieldRule::Currency.parse("$12,345.67"), Ok(12345.67));
        assert_eq!(FieldRule::Currency.parse("$1,000,000"), Ok(1_000_000.0));
        assert_eq!(FieldRule::Currency.parse("8500.5"), Ok(8500.5));
    }

    #[test]
    fn test_rules_only_strip_their_own_decoration() {
        assert_eq!(
            FieldRule::Percent.parse("120ms"),
            Err(MalformedCell("120ms".to_string()))
        );
        assert_eq!(
            FieldRule::Millis.parse("$5"),
            Err(MalformedCell("$5".to_string()))
        );
        assert_eq!(
            FieldRule::Currency.parse("5%"),
            Err(MalformedCell("5%".to_string()))
        );
    }

    #[test]
    fn test_malformed_cells_keep_original_text() {
        assert_eq!(
            FieldRule::Percent.parse("abc%"),
            Err(MalformedCell("abc%".to_string()))
        );
        assert_eq!(FieldRule::Percent.parse(""), Err(MalformedCell(String::new())));
        assert_eq!(
            FieldRule::Millis.parse("nan"),
            Err(MalformedCell("nan".to_string()))
        );
        assert_eq!(
            FieldRule::Currency.parse("$inf"),
            Err(MalformedCell("$inf".to_string()))
        );
    }

    #[test]
    fn test_normalize_column_names_failing_cell() {
        let df = df![
            "% Filled Volume" => &["87.3%", "abc%", "x"],
        ]
        .expect("Failed to create DF");

        match normalize_column(&df, RawCol::FilledVolumePct) {
            Err(LpError::Data(DataError::Normalization { column, value, row })) => {
                assert_eq!(column, "% Filled Volume");
                assert_eq!(value, "abc%");
                assert_eq!(row, 1);
            }
            other => panic!("expected Normalization error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_column_rejects_nulls() {
        let df = df![
            "Avg. Fill Latency" => &[Some("120ms"), None],
        ]
        .expect("Failed to create DF");

        let have = normalize_column(&df, RawCol::AvgFillLatency);
        assert!(matches!(
            have,
            Err(LpError::Data(DataError::Normalization { row: 1, .. }))
        ));
    }

    #[test]
    fn test_normalize_column_accepts_numeric_dtypes() {
        let df = df![
            "Total Filled Volume" => &[10_000.0, 8_500.5],
        ]
        .expect("Failed to create DF");

        let have = normalize_column(&df, RawCol::TotalFilledVolume).expect("numeric column");
        assert_eq!(have, vec![10_000.0, 8_500.5]);
    }

    #[test]
    fn test_label_column_rejects_nulls() {
        let df = df![
            "Maker Stream Name" => &[Some("LP_A"), None],
        ]
        .expect("Failed to create DF");

        match label_column(&df, RawCol::MakerStreamName) {
            Err(LpError::Data(DataError::MissingValue { column, row })) => {
                assert_eq!(column, "Maker Stream Name");
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingValue, got {other:?}"),
        }
    }
}
