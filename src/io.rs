use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{IoError, LpError, LpResult};

// ================================================================================================
// Input Formats
// ================================================================================================

/// Encodings accepted for an uploaded execution statistics report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Eq,
    Hash,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
    Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Office Open XML workbook. Only the first worksheet is read.
    Xlsx,
}

impl InputFormat {
    pub fn from_path(path: impl AsRef<Path>) -> LpResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| err(&path.display().to_string(), true))?;

        ext.parse::<Self>().map_err(|_| err(ext, false))
    }
}

/// Reads the whole file into memory.
///
/// Reports are bounded by the upload size, so there is no streaming here.
pub(crate) fn read_file(path: impl AsRef<Path>) -> LpResult<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| {
        IoError::FileRead(format!("Failed to open '{}': {e}", path.display())).into()
    })
}

fn err(s: &str, missing_extension: bool) -> LpError {
    let msg = if missing_extension {
        format!("missing or invalid extension in path '{s}'")
    } else {
        format!("'{s}' (expected csv or xlsx)")
    };
    IoError::UnsupportedFormat(msg).into()
}
