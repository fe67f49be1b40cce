#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Per-category deduplication and task-file writing.
pub mod aggregate;
/// Command-line runner shared by the `kotlin-tasks` binary.
pub mod apps;
/// Pattern catalog types and the built-in Kotlin table.
pub mod catalog;
/// Validity, normalization, extraction, and split configuration.
pub mod config;
/// Centralized constants used across validation, normalization, and corpus files.
pub mod constants;
/// Task categories and records.
pub mod data;
/// JSONL loading, writing, subsetting, and dataset summaries.
pub mod dataset;
/// Regex application over source text.
pub mod matcher;
/// Comment stripping, literal masking, and layout placeholders.
pub mod normalize;
/// Extraction pipeline over texts and source directories.
pub mod pipeline;
/// Train/test partitioning of a task corpus.
pub mod splits;
/// Signature/body splitting of normalized matches.
pub mod splitter;
/// Per-file and total record counts of a corpus directory.
pub mod summary;
/// Input transports (filesystem, and HTTP behind the `remote` feature).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Structural filter for raw matches.
pub mod validator;

mod errors;

pub use aggregate::{ExtractionStats, TaskSet, WrittenFile, write_task_files};
pub use catalog::{CategorySpec, CompiledCategory, PatternCatalog};
pub use config::{ExtractionConfig, NormalizationConfig, SplitConfig, ValidityConfig};
pub use data::{TaskCategory, TaskRecord};
pub use dataset::{DatasetOrigin, DatasetSummary, load_jsonl, load_jsonl_file, take_subset};
pub use errors::ExtractError;
pub use normalize::Normalizer;
pub use pipeline::ExtractionPipeline;
pub use splits::{SplitLabel, SplitOutcome, train_test_split};
pub use splitter::split_signature_body;
pub use summary::{CorpusSummary, summarize_dir};
#[cfg(feature = "remote")]
pub use transport::http::{fetch_sources, load_jsonl_from_url};
pub use types::{Body, FileName, PatternSource, Signature, SourceText, Url};
pub use validator::{Rejection, Validator};
