//! End-to-end extraction: match, validate, normalize, split, aggregate.

use std::fs;
use std::path::Path;

use tracing::{debug, info, trace};

use crate::aggregate::{ExtractionStats, TaskSet, WrittenFile, write_task_files};
use crate::catalog::{CompiledCategory, PatternCatalog};
use crate::config::ExtractionConfig;
use crate::data::TaskRecord;
use crate::errors::ExtractError;
use crate::normalize::Normalizer;
use crate::splitter::split_signature_body;
use crate::transport::fs::SourceWalker;
use crate::validator::{Rejection, Validator};

enum MatchOutcome {
    Accepted(TaskRecord),
    Rejected(Rejection),
    Undelimited(TaskRecord),
}

/// Compiled extraction pipeline for one catalog and configuration.
#[derive(Clone, Debug)]
pub struct ExtractionPipeline {
    catalog: PatternCatalog,
    validator: Validator,
    normalizer: Normalizer,
    config: ExtractionConfig,
}

impl ExtractionPipeline {
    /// Build a pipeline over the built-in Kotlin catalog.
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractError> {
        Self::with_catalog(PatternCatalog::kotlin()?, config)
    }

    /// Build a pipeline over a custom catalog.
    pub fn with_catalog(
        catalog: PatternCatalog,
        config: ExtractionConfig,
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            catalog,
            validator: Validator::new(config.validity.clone()),
            normalizer: Normalizer::new(config.normalization.clone())?,
            config,
        })
    }

    /// Compiled catalog in use.
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Empty task set with this catalog's categories registered.
    pub fn empty_task_set(&self) -> TaskSet {
        TaskSet::with_categories(self.catalog.categories().iter().map(CompiledCategory::category))
    }

    /// Turn one raw match into a task, or `None` if the validator drops it.
    pub fn process_match(&self, raw: &str, delimiter: char) -> Option<TaskRecord> {
        match self.evaluate(raw, delimiter) {
            MatchOutcome::Accepted(record) | MatchOutcome::Undelimited(record) => Some(record),
            MatchOutcome::Rejected(_) => None,
        }
    }

    fn evaluate(&self, raw: &str, delimiter: char) -> MatchOutcome {
        if let Err(rejection) = self.validator.check(raw) {
            return MatchOutcome::Rejected(rejection);
        }
        let normalized = self.normalizer.normalize(raw);
        let record = split_signature_body(&normalized, delimiter);
        if normalized.contains(delimiter) {
            MatchOutcome::Accepted(record)
        } else {
            MatchOutcome::Undelimited(record)
        }
    }

    /// Extract every category from one text.
    pub fn extract_text(&self, text: &str) -> TaskSet {
        let mut tasks = self.empty_task_set();
        self.extract_into(text, &mut tasks);
        tasks
    }

    /// Extract every category from one text into an existing set.
    pub fn extract_into(&self, text: &str, tasks: &mut TaskSet) {
        let mut stats = ExtractionStats::default();
        for entry in self.catalog.categories() {
            for raw in entry.find_matches(text) {
                stats.matched += 1;
                match self.evaluate(raw, entry.delimiter()) {
                    MatchOutcome::Accepted(record) => {
                        stats.emitted += 1;
                        tasks.insert(entry.category(), record);
                    }
                    MatchOutcome::Rejected(rejection) => {
                        trace!(
                            category = %entry.category(),
                            %rejection,
                            "[kotlin_tasks:pipeline] match rejected"
                        );
                        stats.rejected += 1;
                    }
                    MatchOutcome::Undelimited(record) => {
                        trace!(
                            category = %entry.category(),
                            signature = %record.signature,
                            "[kotlin_tasks:pipeline] no delimiter after normalization; body left empty"
                        );
                        stats.undelimited += 1;
                        stats.emitted += 1;
                        tasks.insert(entry.category(), record);
                    }
                }
            }
        }
        tasks.stats_mut().absorb(stats);
    }

    /// Extract from several texts in order; later pairs win.
    pub fn extract_texts<I, S>(&self, texts: I) -> TaskSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tasks = self.empty_task_set();
        for text in texts {
            self.extract_into(text.as_ref(), &mut tasks);
        }
        tasks
    }

    /// Extract from every source file under `dir`, in sorted path order.
    ///
    /// Any file that cannot be read as UTF-8 text aborts the run.
    pub fn extract_dir(&self, dir: &Path) -> Result<TaskSet, ExtractError> {
        let paths = SourceWalker::new(dir)
            .with_follow_symlinks(self.config.follow_links)
            .with_extensions(self.config.source_extensions.iter().cloned())
            .collect()?;
        let mut tasks = self.empty_task_set();
        for path in &paths {
            let text = fs::read_to_string(path)?;
            debug!(path = %path.display(), "[kotlin_tasks:pipeline] scanning source");
            self.extract_into(&text, &mut tasks);
        }
        let stats = tasks.stats();
        info!(
            "[kotlin_tasks:pipeline] scanned {} files under {}: matched={} rejected={} undelimited={} distinct={}",
            paths.len(),
            dir.display(),
            stats.matched,
            stats.rejected,
            stats.undelimited,
            tasks.total()
        );
        Ok(tasks)
    }

    /// Append `tasks` to the per-category files under `output_dir`.
    pub fn write_tasks(
        &self,
        tasks: &TaskSet,
        output_dir: &Path,
    ) -> Result<Vec<WrittenFile>, ExtractError> {
        write_task_files(tasks, output_dir)
    }
}
