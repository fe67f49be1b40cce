use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::errors::ExtractError;
use crate::transport::fs::list_jsonl_files;
use crate::types::FileName;

/// Record count of one corpus file and its share of the total.
#[derive(Clone, Debug, PartialEq)]
pub struct FileCount {
    /// Bare file name, e.g. `loop_tasks.jsonl`.
    pub file: FileName,
    /// Number of lines (records) in the file.
    pub records: usize,
    /// `records / total`, or `0.0` for an empty corpus.
    pub share: f64,
}

/// Per-file and total record counts for a corpus directory.
#[derive(Clone, Debug, PartialEq)]
pub struct CorpusSummary {
    /// Per-file counts in input order; `summarize_dir` lists them by name.
    pub files: Vec<FileCount>,
    /// Sum of every file's record count.
    pub total: usize,
}

/// Build a summary from `(file name, record count)` pairs, kept in input order.
pub fn summarize_counts<I>(counts: I) -> CorpusSummary
where
    I: IntoIterator<Item = (FileName, usize)>,
{
    let counts: Vec<(FileName, usize)> = counts.into_iter().collect();
    let total: usize = counts.iter().map(|(_, count)| *count).sum();
    let files = counts
        .into_iter()
        .map(|(file, records)| FileCount {
            file,
            records,
            share: if total == 0 {
                0.0
            } else {
                records as f64 / total as f64
            },
        })
        .collect();
    CorpusSummary { files, total }
}

/// Count lines of every `.jsonl` file directly inside `dir`.
///
/// Files are listed in name order; subdirectories are skipped.
pub fn summarize_dir(dir: &Path) -> Result<CorpusSummary, ExtractError> {
    let mut counts = Vec::new();
    for path in list_jsonl_files(dir)? {
        let lines = count_lines(&path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %name, lines, "[kotlin_tasks:summary] counted");
        counts.push((name, lines));
    }
    Ok(summarize_counts(counts))
}

fn count_lines(path: &Path) -> Result<usize, ExtractError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = 0usize;
    for line in reader.lines() {
        line?;
        lines += 1;
    }
    Ok(lines)
}

impl fmt::Display for CorpusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.files {
            writeln!(f, "{}: {}", entry.file, entry.records)?;
        }
        writeln!(f, "--------------------")?;
        write!(f, "Total number: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn summary_reports_shares() {
        let summary = summarize_counts([("a.jsonl".to_string(), 3), ("b.jsonl".to_string(), 1)]);
        assert_eq!(summary.total, 4);
        assert!((summary.files[0].share - 0.75).abs() < 1e-9);
        assert!((summary.files[1].share - 0.25).abs() < 1e-9);
    }

    #[test]
    fn empty_corpus_has_zero_shares() {
        let summary = summarize_counts([("a.jsonl".to_string(), 0)]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.files[0].share, 0.0);
    }

    #[test]
    fn directory_summary_is_sorted_and_prints_total() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("variable_tasks.jsonl"), "{}\n{}\n").unwrap();
        fs::write(root.join("condition_tasks.jsonl"), "{}\n").unwrap();
        fs::create_dir(root.join("archive")).unwrap();

        let summary = summarize_dir(root).unwrap();
        assert_eq!(
            summary.to_string(),
            "condition_tasks.jsonl: 1\nvariable_tasks.jsonl: 2\n--------------------\nTotal number: 3"
        );
    }
}
