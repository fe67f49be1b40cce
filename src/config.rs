use std::borrow::Cow;
use std::path::PathBuf;

use crate::constants::files::DEFAULT_SOURCE_EXTENSION;
use crate::constants::placeholders::{
    END_OF_LINE, INDENT, INDENT_UNIT, NUMBER_LITERAL, STRING_LITERAL,
};
use crate::constants::splits::DEFAULT_TRAIN_RATIO;
use crate::constants::validator::{BANNED_TOKENS, MAX_NEWLINES, V1_MAX_LEN, V2_MAX_LEN};
use crate::errors::ExtractError;

/// Thresholds used to reject raw matches before normalization.
///
/// Two historical profiles exist. Version 1 capped matches at 500 characters and
/// only checked braces; version 2 raised the cap to 1000 characters and also
/// requires balanced parentheses. Version 2 is the default.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidityConfig {
    /// Profile version these thresholds were derived from.
    pub version: u8,
    /// Maximum match length in characters.
    pub max_len: usize,
    /// Maximum number of `\n` characters in a match.
    pub max_newlines: usize,
    /// Reject matches whose `(` and `)` counts differ.
    pub require_balanced_parens: bool,
    /// Substrings that disqualify a match outright.
    pub banned_tokens: Vec<Cow<'static, str>>,
}

impl ValidityConfig {
    /// Legacy thresholds: 500-character cap, braces only.
    pub fn v1() -> Self {
        Self {
            version: 1,
            max_len: V1_MAX_LEN,
            max_newlines: MAX_NEWLINES,
            require_balanced_parens: false,
            banned_tokens: default_banned_tokens(),
        }
    }

    /// Current thresholds: 1000-character cap, braces and parentheses.
    pub fn v2() -> Self {
        Self {
            version: 2,
            max_len: V2_MAX_LEN,
            max_newlines: MAX_NEWLINES,
            require_balanced_parens: true,
            banned_tokens: default_banned_tokens(),
        }
    }

    /// Look up a profile by version number.
    pub fn for_version(version: u8) -> Result<Self, ExtractError> {
        match version {
            1 => Ok(Self::v1()),
            2 => Ok(Self::v2()),
            other => Err(ExtractError::Configuration(format!(
                "unknown validity profile version {other} (expected 1 or 2)"
            ))),
        }
    }

    /// Override the maximum match length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Add a banned token on top of the profile defaults.
    pub fn with_banned_token(mut self, token: impl Into<Cow<'static, str>>) -> Self {
        self.banned_tokens.push(token.into());
        self
    }
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self::v2()
    }
}

fn default_banned_tokens() -> Vec<Cow<'static, str>> {
    BANNED_TOKENS.iter().map(|token| Cow::Borrowed(*token)).collect()
}

/// Placeholder scheme applied after comments are stripped.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizationConfig {
    /// Replace string and numeric literals with placeholders.
    pub mask_literals: bool,
    /// Replacement for `"..."` literals.
    pub string_placeholder: Cow<'static, str>,
    /// Replacement for numeric literals.
    pub number_placeholder: Cow<'static, str>,
    /// Replacement for `\n`.
    pub eol_placeholder: Cow<'static, str>,
    /// Replacement for one indentation unit.
    pub indent_placeholder: Cow<'static, str>,
    /// Whitespace run treated as one indentation unit.
    pub indent_unit: Cow<'static, str>,
}

impl NormalizationConfig {
    /// Toggle literal masking.
    pub fn with_literal_masking(mut self, mask_literals: bool) -> Self {
        self.mask_literals = mask_literals;
        self
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            mask_literals: true,
            string_placeholder: Cow::Borrowed(STRING_LITERAL),
            number_placeholder: Cow::Borrowed(NUMBER_LITERAL),
            eol_placeholder: Cow::Borrowed(END_OF_LINE),
            indent_placeholder: Cow::Borrowed(INDENT),
            indent_unit: Cow::Borrowed(INDENT_UNIT),
        }
    }
}

/// Top-level extraction configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionConfig {
    /// Validity thresholds applied to raw matches.
    pub validity: ValidityConfig,
    /// Normalization scheme applied to accepted matches.
    pub normalization: NormalizationConfig,
    /// File extensions (without dot) scanned in a source directory.
    ///
    /// Empty means every regular file is read.
    pub source_extensions: Vec<String>,
    /// Whether symlinks are followed while walking a source directory.
    pub follow_links: bool,
}

impl ExtractionConfig {
    /// Replace the validity thresholds.
    pub fn with_validity(mut self, validity: ValidityConfig) -> Self {
        self.validity = validity;
        self
    }

    /// Replace the normalization scheme.
    pub fn with_normalization(mut self, normalization: NormalizationConfig) -> Self {
        self.normalization = normalization;
        self
    }

    /// Replace the scanned source extensions.
    pub fn with_source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Control symlink traversal.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validity: ValidityConfig::default(),
            normalization: NormalizationConfig::default(),
            source_extensions: vec![DEFAULT_SOURCE_EXTENSION.to_string()],
            follow_links: false,
        }
    }
}

/// Train/test partition settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitConfig {
    /// Directory holding the per-category JSONL files.
    pub input_dir: PathBuf,
    /// Directory receiving `train.jsonl` and `test.jsonl`.
    pub output_dir: PathBuf,
    /// Fraction of records assigned to train.
    pub train_ratio: f64,
    /// Optional RNG seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl SplitConfig {
    /// Create a config with the default ratio and no seed.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: None,
        }
    }

    /// Override the train ratio.
    pub fn with_train_ratio(mut self, train_ratio: f64) -> Self {
        self.train_ratio = train_ratio;
        self
    }

    /// Fix the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate that the ratio is finite and within `[0, 1]`.
    pub fn validated(self) -> Result<Self, ExtractError> {
        if !self.train_ratio.is_finite() || !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(ExtractError::Configuration(format!(
                "train ratio must be within [0, 1], got {}",
                self.train_ratio
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validity_is_version_two() {
        let config = ValidityConfig::default();
        assert_eq!(config.version, 2);
        assert_eq!(config.max_len, 1000);
        assert!(config.require_balanced_parens);
    }

    #[test]
    fn version_one_drops_paren_check_and_lowers_cap() {
        let config = ValidityConfig::for_version(1).unwrap();
        assert_eq!(config.max_len, 500);
        assert_eq!(config.max_newlines, 10);
        assert!(!config.require_balanced_parens);
        assert!(ValidityConfig::for_version(3).is_err());
    }

    #[test]
    fn source_extensions_strip_leading_dots() {
        let config = ExtractionConfig::default().with_source_extensions([".kt", "kts"]);
        assert_eq!(config.source_extensions, vec!["kt", "kts"]);
    }

    #[test]
    fn split_ratio_outside_unit_interval_is_rejected() {
        assert!(SplitConfig::new("in", "out").validated().is_ok());
        assert!(SplitConfig::new("in", "out").with_train_ratio(1.5).validated().is_err());
        assert!(
            SplitConfig::new("in", "out")
                .with_train_ratio(f64::NAN)
                .validated()
                .is_err()
        );
    }
}
