use std::{collections::HashSet, io::Cursor, path::Path};

use calamine::{Data, Reader, Xlsx};
use polars::{
    frame::DataFrame,
    prelude::{Column, CsvReadOptions, SerReader},
};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::{
    data::normalize::FieldRule,
    error::{IoError, LpResult, SchemaError},
    io::{InputFormat, read_file},
};

/// Required header labels of an execution statistics report, exactly as they
/// appear in the ARMS export.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
pub enum RawCol {
    #[strum(serialize = "Core Symbol")]
    CoreSymbol,
    #[strum(serialize = "Maker Stream Name")]
    MakerStreamName,
    #[strum(serialize = "% Filled Volume")]
    FilledVolumePct,
    #[strum(serialize = "Avg. Fill Latency")]
    AvgFillLatency,
    #[strum(serialize = "Total Filled Volume")]
    TotalFilledVolume,
}

impl RawCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Stripping rule for columns that carry a display-formatted number.
    pub fn rule(&self) -> Option<FieldRule> {
        match self {
            RawCol::FilledVolumePct => Some(FieldRule::Percent),
            RawCol::AvgFillLatency => Some(FieldRule::Millis),
            RawCol::TotalFilledVolume => Some(FieldRule::Currency),
            RawCol::CoreSymbol | RawCol::MakerStreamName => None,
        }
    }
}

/// Returns the required columns absent from `df`, in the order they were requested.
///
/// Names are compared verbatim: `"core symbol"` or `"Core Symbol "` do not match.
pub fn missing_columns<I>(df: &DataFrame, required: I) -> Vec<RawCol>
where
    I: IntoIterator<Item = RawCol>,
{
    let present = df.get_column_names();
    required
        .into_iter()
        .filter(|c| !present.iter().any(|name| name.as_str() == c.as_str()))
        .collect()
}

/// The uploaded report as read from disk: every cell is still display text.
#[derive(Debug, Clone)]
pub struct RawReport {
    df: DataFrame,
}

impl RawReport {
    /// Wraps an already decoded table. Non-text columns are stringified during normalization.
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn as_df(&self) -> &DataFrame {
        &self.df
    }

    pub fn from_path(path: impl AsRef<Path>) -> LpResult<Self> {
        let path = path.as_ref();
        let format = InputFormat::from_path(path)?;
        let bytes = read_file(path)?;
        debug!(path = %path.display(), %format, bytes = bytes.len(), "Read report file");
        Self::from_bytes(&bytes, format)
    }

    pub fn from_bytes(bytes: &[u8], format: InputFormat) -> LpResult<Self> {
        match format {
            InputFormat::Csv => Self::from_csv_bytes(bytes),
            InputFormat::Xlsx => Self::from_xlsx_bytes(bytes),
        }
    }

    /// Decodes CSV with a header row. Schema inference is disabled so that
    /// `"87.3%"` and `"$1,000"` reach the normalizer untouched.
    pub fn from_csv_bytes(bytes: &[u8]) -> LpResult<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| IoError::FileRead(e.to_string()))?;

        Ok(Self { df })
    }

    /// Decodes the first worksheet of a workbook; its first row is the header.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> LpResult<Self> {
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e: calamine::XlsxError| IoError::FileRead(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IoError::FileRead("Workbook contains no worksheets".to_string()))?
            .map_err(|e| IoError::FileRead(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| IoError::FileRead("Worksheet is empty".to_string()))?;

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(header.len()) {
                cells[i].push(cell_text(cell));
            }
        }

        let columns = header_names(header)
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name.into(), values))
            .collect::<Vec<_>>();

        let df = DataFrame::new(columns).map_err(|e| IoError::FileRead(e.to_string()))?;
        Ok(Self { df })
    }

    /// Checks that every required header is present.
    pub fn validate(&self) -> LpResult<()> {
        let missing = missing_columns(&self.df, RawCol::iter());
        if missing.is_empty() {
            return Ok(());
        }

        Err(SchemaError::MissingColumns(
            missing.iter().map(|c| c.as_str().to_string()).collect(),
        )
        .into())
    }
}

/// Column names for a worksheet header row.
///
/// Blank cells become `Unnamed: {index}` and repeated labels get a `.{n}`
/// suffix, so unlabelled trailing columns never collide.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(header.len());
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = cell_text(cell)
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {i}"));

            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}
