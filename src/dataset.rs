//! JSONL reading and writing for task records.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::record::{BODY_FIELD, SIGNATURE_FIELD};
use crate::data::TaskRecord;
use crate::errors::ExtractError;

/// Parse one record per non-blank line.
///
/// `origin` names the input in error messages (a path or URL).
pub fn load_jsonl<R: BufRead>(
    reader: R,
    origin: &Path,
) -> Result<Vec<TaskRecord>, ExtractError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| {
            ExtractError::MalformedRecord {
                path: origin.to_path_buf(),
                line: idx + 1,
                source,
            }
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Load every record from a JSONL file.
pub fn load_jsonl_file(path: &Path) -> Result<Vec<TaskRecord>, ExtractError> {
    let file = File::open(path)?;
    let records = load_jsonl(BufReader::new(file), path)?;
    debug!(path = %path.display(), records = records.len(), "[kotlin_tasks:dataset] loaded");
    Ok(records)
}

/// Create or truncate `path` and write one record per line.
pub fn write_jsonl<'a, I>(path: &Path, records: I) -> Result<usize, ExtractError>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let file = File::create(path)?;
    write_records(file, records)
}

/// Append one record per line to `path`, creating it if absent.
pub fn append_jsonl<'a, I>(path: &Path, records: I) -> Result<usize, ExtractError>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_records(file, records)
}

fn write_records<'a, I>(file: File, records: I) -> Result<usize, ExtractError>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut writer = BufWriter::new(file);
    let mut written = 0usize;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Keep the leading `floor(len * ratio)` records.
pub fn take_subset(
    mut records: Vec<TaskRecord>,
    ratio: f64,
) -> Result<Vec<TaskRecord>, ExtractError> {
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(ExtractError::Configuration(format!(
            "subset ratio must be within [0, 1], got {ratio}"
        )));
    }
    let keep = (records.len() as f64 * ratio).floor() as usize;
    records.truncate(keep);
    Ok(records)
}

/// Shape of a loaded dataset, printed for operator inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSummary {
    /// Number of records.
    pub num_rows: usize,
    /// Field names present on every record.
    pub column_names: [&'static str; 2],
    /// Mean signature length in characters.
    pub mean_signature_chars: f64,
    /// Mean body length in characters.
    pub mean_body_chars: f64,
    /// Records whose body is empty.
    pub empty_bodies: usize,
}

impl DatasetSummary {
    /// Summarize `records`.
    pub fn from_records(records: &[TaskRecord]) -> Self {
        let num_rows = records.len();
        let mean = |total: usize| {
            if num_rows == 0 {
                0.0
            } else {
                total as f64 / num_rows as f64
            }
        };
        let signature_chars: usize = records.iter().map(|r| r.signature.chars().count()).sum();
        let body_chars: usize = records.iter().map(|r| r.body.chars().count()).sum();
        Self {
            num_rows,
            column_names: [SIGNATURE_FIELD, BODY_FIELD],
            mean_signature_chars: mean(signature_chars),
            mean_body_chars: mean(body_chars),
            empty_bodies: records.iter().filter(|r| r.body.is_empty()).count(),
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Info")?;
        writeln!(f, "============")?;
        writeln!(f, "Number of samples: {}", self.num_rows)?;
        writeln!(f, "Column names: {}", self.column_names.join(", "))?;
        writeln!(f, "Mean signature chars: {:.2}", self.mean_signature_chars)?;
        writeln!(f, "Mean body chars: {:.2}", self.mean_body_chars)?;
        write!(f, "Empty bodies: {}", self.empty_bodies)
    }
}

/// Location a dataset was loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetOrigin {
    /// Local JSONL file.
    File(PathBuf),
    /// Remote JSONL endpoint.
    Url(String),
}

impl fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetOrigin::File(path) => write!(f, "{}", path.display()),
            DatasetOrigin::Url(url) => f.write_str(url),
        }
    }
}

/// Load a dataset from `origin`, optionally keeping a leading subset.
pub fn load_dataset(
    origin: &DatasetOrigin,
    subset_ratio: Option<f64>,
) -> Result<Vec<TaskRecord>, ExtractError> {
    let records = match origin {
        DatasetOrigin::File(path) => load_jsonl_file(path)?,
        #[cfg(feature = "remote")]
        DatasetOrigin::Url(url) => crate::transport::http::fetch_jsonl(url)?,
        #[cfg(not(feature = "remote"))]
        DatasetOrigin::Url(url) => {
            return Err(ExtractError::SourceUnavailable {
                url: url.clone(),
                reason: "built without the `remote` feature".to_string(),
            });
        }
    };
    match subset_ratio {
        Some(ratio) => take_subset(records, ratio),
        None => Ok(records),
    }
}
