//! Per-category deduplication and JSONL emission.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use crate::data::{Body, Signature, TaskCategory, TaskRecord};
use crate::dataset::append_jsonl;
use crate::errors::ExtractError;

/// Counters describing what happened to raw matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Raw matches produced by the catalog patterns.
    pub matched: usize,
    /// Matches dropped by the validator.
    pub rejected: usize,
    /// Accepted matches with no delimiter after normalization; each is
    /// emitted with the delimiter appended to its signature and an empty body.
    pub undelimited: usize,
    /// Signature/body pairs handed to the aggregator (before dedup).
    pub emitted: usize,
}

impl ExtractionStats {
    /// Add another set of counters into this one.
    pub fn absorb(&mut self, other: ExtractionStats) {
        self.matched += other.matched;
        self.rejected += other.rejected;
        self.undelimited += other.undelimited;
        self.emitted += other.emitted;
    }
}

/// Deduplicated tasks for every category of one run.
///
/// Each category keeps an insertion-ordered map keyed by signature. A later
/// pair with a known signature replaces the body but keeps the original
/// position.
#[derive(Clone, Debug, Default)]
pub struct TaskSet {
    by_category: IndexMap<TaskCategory, IndexMap<Signature, Body>>,
    stats: ExtractionStats,
}

impl TaskSet {
    /// Create an empty set with `categories` pre-registered in order.
    pub fn with_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = TaskCategory>,
    {
        Self {
            by_category: categories
                .into_iter()
                .map(|category| (category, IndexMap::new()))
                .collect(),
            stats: ExtractionStats::default(),
        }
    }

    /// Insert one pair; last write wins.
    pub fn insert(&mut self, category: TaskCategory, record: TaskRecord) {
        self.by_category
            .entry(category)
            .or_default()
            .insert(record.signature, record.body);
    }

    /// Merge `other` into this set, applying last-wins per signature.
    pub fn merge(&mut self, other: TaskSet) {
        for (category, tasks) in other.by_category {
            let target = self.by_category.entry(category).or_default();
            for (signature, body) in tasks {
                target.insert(signature, body);
            }
        }
        self.stats.absorb(other.stats);
    }

    /// Categories in registration order.
    pub fn categories(&self) -> impl Iterator<Item = TaskCategory> + '_ {
        self.by_category.keys().copied()
    }

    /// Records of one category in insertion order.
    pub fn records(&self, category: TaskCategory) -> Vec<TaskRecord> {
        self.by_category
            .get(&category)
            .map(|tasks| {
                tasks
                    .iter()
                    .map(|(signature, body)| TaskRecord::new(signature.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body currently stored for `signature`.
    pub fn body(&self, category: TaskCategory, signature: &str) -> Option<&str> {
        self.by_category
            .get(&category)
            .and_then(|tasks| tasks.get(signature))
            .map(String::as_str)
    }

    /// Distinct signatures in one category.
    pub fn len(&self, category: TaskCategory) -> usize {
        self.by_category.get(&category).map_or(0, IndexMap::len)
    }

    /// Distinct signatures across all categories.
    pub fn total(&self) -> usize {
        self.by_category.values().map(IndexMap::len).sum()
    }

    /// True when no category holds a task.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Match counters accumulated while building this set.
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    /// Mutable access to the counters.
    pub fn stats_mut(&mut self) -> &mut ExtractionStats {
        &mut self.stats
    }
}

/// Result of appending one category file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFile {
    /// Category written.
    pub category: TaskCategory,
    /// Destination file.
    pub path: PathBuf,
    /// Records appended by this call.
    pub records: usize,
}

/// Append every category of `tasks` to `<output_dir>/<category>_tasks.jsonl`.
///
/// The directory is created when missing. Files are opened in append mode;
/// nothing guards against concurrent writers.
pub fn write_task_files(tasks: &TaskSet, output_dir: &Path) -> Result<Vec<WrittenFile>, ExtractError> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();
    for category in tasks.categories() {
        let path = output_dir.join(category.file_name());
        let records = tasks.records(category);
        let count = append_jsonl(&path, &records)?;
        info!(
            category = %category,
            path = %path.display(),
            records = count,
            "[kotlin_tasks:aggregate] appended task file"
        );
        written.push(WrittenFile {
            category,
            path,
            records: count,
        });
    }
    Ok(written)
}
