use std::fmt;

use crate::config::ValidityConfig;

/// Why a raw match was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Longer than `max_len` characters.
    TooLong(usize),
    /// More than `max_newlines` newlines.
    TooManyLines(usize),
    /// `{` and `}` counts differ.
    UnbalancedBraces,
    /// `(` and `)` counts differ.
    UnbalancedParens,
    /// Contains a banned marker token.
    BannedToken(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooLong(len) => write!(f, "too long ({len} characters)"),
            Rejection::TooManyLines(lines) => write!(f, "too many lines ({lines} newlines)"),
            Rejection::UnbalancedBraces => f.write_str("unbalanced braces"),
            Rejection::UnbalancedParens => f.write_str("unbalanced parentheses"),
            Rejection::BannedToken(token) => write!(f, "contains banned token '{token}'"),
        }
    }
}

/// Structural filter applied to raw matches.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    config: ValidityConfig,
}

impl Validator {
    /// Create a validator from thresholds.
    pub fn new(config: ValidityConfig) -> Self {
        Self { config }
    }

    /// Active thresholds.
    pub fn config(&self) -> &ValidityConfig {
        &self.config
    }

    /// Check a candidate, reporting the first failed rule.
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        let len = candidate.chars().count();
        if len > self.config.max_len {
            return Err(Rejection::TooLong(len));
        }
        let newlines = count_char(candidate, '\n');
        if newlines > self.config.max_newlines {
            return Err(Rejection::TooManyLines(newlines));
        }
        if count_char(candidate, '{') != count_char(candidate, '}') {
            return Err(Rejection::UnbalancedBraces);
        }
        if self.config.require_balanced_parens
            && count_char(candidate, '(') != count_char(candidate, ')')
        {
            return Err(Rejection::UnbalancedParens);
        }
        if let Some(token) = self
            .config
            .banned_tokens
            .iter()
            .find(|token| {
                let token: &str = token;
                candidate.contains(token)
            })
        {
            return Err(Rejection::BannedToken(token.to_string()));
        }
        Ok(())
    }

    /// True when the candidate passes every rule.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }
}

fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|ch| *ch == needle).count()
}
