/// Constants used by the validity filter.
pub mod validator {
    /// Maximum newlines a match may contain in every profile.
    pub const MAX_NEWLINES: usize = 10;
    /// Maximum match length (characters) for profile version 1.
    pub const V1_MAX_LEN: usize = 500;
    /// Maximum match length (characters) for profile version 2.
    pub const V2_MAX_LEN: usize = 1000;
    /// Marker tokens that disqualify a match.
    pub const BANNED_TOKENS: [&str; 3] = ["TODO", "DEBUG", "FIXME"];
    /// Profile version used when none is requested.
    pub const DEFAULT_VERSION: u8 = 2;
}

/// Placeholder tokens substituted during normalization.
pub mod placeholders {
    /// Replaces quoted string literals.
    pub const STRING_LITERAL: &str = "<STR_LIT>";
    /// Replaces numeric literals.
    pub const NUMBER_LITERAL: &str = "<NUM_LIT>";
    /// Replaces newline characters.
    pub const END_OF_LINE: &str = "<EOL>";
    /// Replaces one indentation unit.
    pub const INDENT: &str = "<INDENT>";
    /// Width of one indentation unit in spaces.
    pub const INDENT_UNIT: &str = "    ";
}

/// Constants used by the normalizer's regular expressions.
pub mod normalize {
    /// `//` comment through the end of its line.
    pub const LINE_COMMENT_PATTERN: &str = r"(?s)//.*?(?:\n|$)";
    /// `/* ... */` comment; an unterminated comment runs to end of text.
    pub const BLOCK_COMMENT_PATTERN: &str = r"(?s)/\*.*?(?:\*/|\z)";
    /// Double-quoted string literal on a single line.
    pub const STRING_LITERAL_PATTERN: &str = r#""(.*?)""#;
    /// Optionally signed, optionally fractional number.
    pub const NUMBER_LITERAL_PATTERN: &str = r"-?\d+\.?\d*";
}

/// Constants used by task-file naming and the corpus layout on disk.
pub mod files {
    /// Suffix appended to a category name to form its output file name.
    pub const TASK_FILE_SUFFIX: &str = "_tasks.jsonl";
    /// Extension of every corpus file.
    pub const JSONL_EXTENSION: &str = "jsonl";
    /// Output file holding the training partition.
    pub const TRAIN_FILE: &str = "train.jsonl";
    /// Output file holding the test partition.
    pub const TEST_FILE: &str = "test.jsonl";
    /// Default append-only fetch error log.
    pub const ERROR_LOG_FILE: &str = "error_log.txt";
    /// Source-file extension scanned by default.
    pub const DEFAULT_SOURCE_EXTENSION: &str = "kt";
}

/// Constants used by the train/test splitter and dataset loader.
pub mod splits {
    /// Fraction of the shuffled corpus assigned to train.
    pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
    /// Fraction of a downloaded dataset kept when a subset is requested.
    pub const DEFAULT_SUBSET_RATIO: f64 = 0.1;
}

/// Field names of a serialized task record.
pub mod record {
    /// JSON key of the signature field.
    pub const SIGNATURE_FIELD: &str = "signature";
    /// JSON key of the body field.
    pub const BODY_FIELD: &str = "body";
}

/// Constants used by the HTTP transport.
pub mod remote {
    /// Largest response body read into memory (1 GiB).
    pub const MAX_BODY_BYTES: u64 = 1 << 30;
}

/// Log message used when a remote source cannot be fetched.
pub const FETCH_FAILED_MSG: &str = "fetch failed; recorded in error log";
