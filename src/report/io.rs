use std::{fs, path::Path};

use polars::{
    frame::DataFrame,
    prelude::{CsvWriter, SchemaRef, SerWriter},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{IoError, LpResult},
    report::polars_ext::DataFrameExt,
};

// ================================================================================================
// Traits
// ================================================================================================

/// Common interface of every table this crate produces.
pub trait Report {
    /// Access the underlying DataFrame.
    fn as_df(&self) -> &DataFrame;
}

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        format!("{}.{}", self.base_name(), ext)
    }
}

pub trait ToSchema {
    /// Returns the canonical schema for this report type.
    fn to_schema() -> SchemaRef;
}

pub trait ToJson {
    /// Serializes the report to a generic JSON Value.
    /// Returns a `Value::Array` containing row objects.
    fn to_json(&self) -> LpResult<Value>;
}

pub trait ToCsvString {
    /// Renders the report as CSV text: header row, no index column, rows in report order.
    fn to_csv_string(&self) -> LpResult<String>;
}

pub trait ToCsv {
    /// Writes the report to `<dir>/<base_name>.csv`.
    ///
    /// # Side Effects
    /// - Creates the directory if missing.
    /// - Overwrites the file if it exists.
    ///
    /// Returns the path of the written file.
    fn to_csv(&self, dir: impl AsRef<Path>) -> LpResult<std::path::PathBuf>;
}

// ================================================================================================
// Blanket Implementations
// ================================================================================================

impl<T> ToJson for T
where
    T: Report,
{
    fn to_json(&self) -> LpResult<Value> {
        let rows = self.as_df().to_json_rows()?;
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}

impl<T> ToCsvString for T
where
    T: Report,
{
    fn to_csv_string(&self) -> LpResult<String> {
        let mut buf = Vec::with_capacity(self.as_df().height() * (1 << 6));
        write_csv(&mut buf, self.as_df())?;

        String::from_utf8(buf)
            .map_err(|e| IoError::WriteFailed(format!("CSV output is not valid UTF-8: {e}")).into())
    }
}

impl<T> ToCsv for T
where
    T: Report + ReportName,
{
    fn to_csv(&self, dir: impl AsRef<Path>) -> LpResult<std::path::PathBuf> {
        let dir = dir.as_ref();
        let file_path = dir.join(self.filename(FileExtension::Csv));

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                IoError::FileSystem(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let mut file = fs::File::create(&file_path).map_err(|e| {
            IoError::FileSystem(format!(
                "Failed to create file {}: {}",
                file_path.display(),
                e
            ))
        })?;
        write_csv(&mut file, self.as_df())?;

        Ok(file_path)
    }
}

fn write_csv<W: std::io::Write>(writer: &mut W, df: &DataFrame) -> LpResult<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut df.clone())
        .map_err(|e| IoError::WriteFailed(format!("Failed to write CSV: {e}")).into())
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
    Json,
}
