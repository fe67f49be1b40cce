use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::SplitConfig;
use crate::constants::files::{TEST_FILE, TRAIN_FILE};
use crate::data::TaskRecord;
use crate::dataset::{load_jsonl_file, write_jsonl};
use crate::errors::ExtractError;
use crate::transport::fs::list_jsonl_files;

/// Partitions produced by the train/test split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Output file name for this partition.
    pub fn file_name(self) -> &'static str {
        match self {
            SplitLabel::Train => TRAIN_FILE,
            SplitLabel::Test => TEST_FILE,
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitLabel::Train => f.write_str("train"),
            SplitLabel::Test => f.write_str("test"),
        }
    }
}

/// Record counts per partition; train gets `floor(total * ratio)`.
pub fn split_counts_for_total(total: usize, train_ratio: f64) -> [(SplitLabel, usize); 2] {
    let train = ((total as f64) * train_ratio).floor() as usize;
    let train = train.min(total);
    [
        (SplitLabel::Train, train),
        (SplitLabel::Test, total - train),
    ]
}

/// Shuffle `records` uniformly and cut them into (train, test).
pub fn partition<R: Rng + ?Sized>(
    mut records: Vec<TaskRecord>,
    train_ratio: f64,
    rng: &mut R,
) -> (Vec<TaskRecord>, Vec<TaskRecord>) {
    records.shuffle(rng);
    let [(_, train), _] = split_counts_for_total(records.len(), train_ratio);
    let test = records.split_off(train);
    (records, test)
}

/// Load every record from the `.jsonl` files in `dir`, in file-name order.
///
/// Existing `train.jsonl` and `test.jsonl` are skipped so that a split
/// written into its own input directory is not folded back in.
pub fn load_corpus(dir: &Path) -> Result<Vec<TaskRecord>, ExtractError> {
    let mut records = Vec::new();
    for path in list_jsonl_files(dir)? {
        let is_split_output = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == TRAIN_FILE || name == TEST_FILE);
        if is_split_output {
            continue;
        }
        records.extend(load_jsonl_file(&path)?);
    }
    Ok(records)
}

/// Where a split landed and how large each side is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Records written to `train.jsonl`.
    pub train: usize,
    /// Records written to `test.jsonl`.
    pub test: usize,
    /// Path of the train file.
    pub train_path: PathBuf,
    /// Path of the test file.
    pub test_path: PathBuf,
}

/// Shuffle the corpus under `config.input_dir` and write train/test files.
///
/// Output files are truncated. The whole corpus is held in memory.
pub fn train_test_split(config: &SplitConfig) -> Result<SplitOutcome, ExtractError> {
    let config = config.clone().validated()?;
    let records = load_corpus(&config.input_dir)?;
    let total = records.len();
    let (train, test) = match config.seed {
        Some(seed) => partition(records, config.train_ratio, &mut StdRng::seed_from_u64(seed)),
        None => partition(records, config.train_ratio, &mut rand::rng()),
    };

    fs::create_dir_all(&config.output_dir)?;
    let train_path = config.output_dir.join(SplitLabel::Train.file_name());
    let test_path = config.output_dir.join(SplitLabel::Test.file_name());
    write_jsonl(&train_path, &train)?;
    write_jsonl(&test_path, &test)?;
    info!(
        total,
        train = train.len(),
        test = test.len(),
        ratio = config.train_ratio,
        "[kotlin_tasks:splits] wrote train/test split"
    );

    Ok(SplitOutcome {
        train: train.len(),
        test: test.len(),
        train_path,
        test_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn records(count: usize) -> Vec<TaskRecord> {
        (0..count)
            .map(|idx| TaskRecord::new(format!("val v{idx} ="), format!("{idx}<EOL>")))
            .collect()
    }

    #[test]
    fn split_counts_sum_to_total() {
        for total in [0usize, 1, 7, 101] {
            let [(_, train), (_, test)] = split_counts_for_total(total, 0.8);
            assert_eq!(train, (total as f64 * 0.8).floor() as usize);
            assert_eq!(train + test, total);
        }
        assert_eq!(split_counts_for_total(5, 1.0)[1].1, 0);
        assert_eq!(split_counts_for_total(5, 0.0)[0].1, 0);
    }

    #[test]
    fn partition_keeps_every_record_once() {
        let input = records(23);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = partition(input.clone(), 0.8, &mut rng);
        assert_eq!(train.len(), 18);
        assert_eq!(test.len(), 5);
        let seen: HashSet<String> = train
            .iter()
            .chain(test.iter())
            .map(|record| record.signature.clone())
            .collect();
        assert_eq!(seen.len(), 23);
    }

    #[test]
    fn seeded_split_is_reproducible() {
        let first = partition(records(40), 0.5, &mut StdRng::seed_from_u64(11));
        let second = partition(records(40), 0.5, &mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
    }

    #[test]
    fn split_writes_and_truncates_outputs() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("tasks");
        let output = temp.path().join("split");
        fs::create_dir_all(&input).unwrap();
        write_jsonl(&input.join("variable_tasks.jsonl"), &records(6)).unwrap();
        write_jsonl(&input.join("loop_tasks.jsonl"), &records(4)).unwrap();

        let config = SplitConfig::new(&input, &output).with_seed(3);
        let outcome = train_test_split(&config).unwrap();
        assert_eq!((outcome.train, outcome.test), (8, 2));

        let again = train_test_split(&config).unwrap();
        assert_eq!(load_jsonl_file(&again.train_path).unwrap().len(), 8);
        assert_eq!(load_jsonl_file(&again.test_path).unwrap().len(), 2);
    }

    #[test]
    fn split_in_place_ignores_previous_outputs() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        write_jsonl(&dir.join("condition_tasks.jsonl"), &records(10)).unwrap();

        let config = SplitConfig::new(dir, dir).with_seed(1);
        train_test_split(&config).unwrap();
        let outcome = train_test_split(&config).unwrap();
        assert_eq!(outcome.train + outcome.test, 10);
    }

    #[test]
    fn malformed_corpus_line_is_fatal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("loop_tasks.jsonl"), "{\"signature\":\"a\"}\n").unwrap();
        let err = train_test_split(&SplitConfig::new(temp.path(), temp.path().join("out")))
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn invalid_ratio_is_rejected_before_io() {
        let temp = tempdir().unwrap();
        let config =
            SplitConfig::new(temp.path().join("missing"), temp.path()).with_train_ratio(-0.1);
        assert!(matches!(
            train_test_split(&config),
            Err(ExtractError::Configuration(_))
        ));
    }
}
