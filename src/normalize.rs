//! Text normalization applied to accepted matches.
//!
//! Stages run in a fixed order: comments are stripped first, then literals
//! are masked, then layout (newlines and indentation) is flattened into
//! placeholder tokens. Stripping comments before masking keeps quote
//! characters inside comments from being treated as string literals.

use regex::{NoExpand, Regex};

use crate::config::NormalizationConfig;
use crate::constants::normalize::{
    BLOCK_COMMENT_PATTERN, LINE_COMMENT_PATTERN, NUMBER_LITERAL_PATTERN, STRING_LITERAL_PATTERN,
};
use crate::errors::ExtractError;

/// Compiled normalizer for one placeholder scheme.
#[derive(Clone, Debug)]
pub struct Normalizer {
    config: NormalizationConfig,
    line_comment: Regex,
    block_comment: Regex,
    string_literal: Regex,
    number_literal: Regex,
}

impl Normalizer {
    /// Compile the normalizer's patterns for `config`.
    pub fn new(config: NormalizationConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            config,
            line_comment: compile(LINE_COMMENT_PATTERN)?,
            block_comment: compile(BLOCK_COMMENT_PATTERN)?,
            string_literal: compile(STRING_LITERAL_PATTERN)?,
            number_literal: compile(NUMBER_LITERAL_PATTERN)?,
        })
    }

    /// Active placeholder scheme.
    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    /// Run every stage over `text`.
    pub fn normalize(&self, text: &str) -> String {
        let stripped = self.strip_comments(text);
        let masked = if self.config.mask_literals {
            self.mask_literals(&stripped)
        } else {
            stripped
        };
        self.flatten_layout(&masked)
    }

    /// Remove `//` and `/* */` comments.
    ///
    /// Repeats until nothing changes so that removing one comment can never
    /// leave a new comment opener behind.
    pub fn strip_comments(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = {
                let without_lines = self.line_comment.replace_all(&current, "");
                self.block_comment
                    .replace_all(&without_lines, "")
                    .into_owned()
            };
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Replace string literals, then numeric literals, with placeholders.
    pub fn mask_literals(&self, text: &str) -> String {
        let strings = self
            .string_literal
            .replace_all(text, NoExpand(&*self.config.string_placeholder));
        self.number_literal
            .replace_all(&strings, NoExpand(&*self.config.number_placeholder))
            .into_owned()
    }

    /// Replace newlines and indentation units with placeholders.
    pub fn flatten_layout(&self, text: &str) -> String {
        text.replace('\n', &self.config.eol_placeholder)
            .replace(&*self.config.indent_unit, &self.config.indent_placeholder)
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|err| {
        ExtractError::Configuration(format!("invalid normalizer pattern {pattern:?}: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizationConfig::default()).unwrap()
    }

    #[test]
    fn strips_line_and_block_comments() {
        let text = "val a = b // trailing note\n/* block\n note */val c = d\n";
        assert_eq!(normalizer().strip_comments(text), "val a = b val c = d\n");
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        assert_eq!(normalizer().strip_comments("call() /* never closed"), "call() ");
    }

    #[test]
    fn comment_removal_reaches_fixpoint() {
        let stripped = normalizer().strip_comments("a /* x // y */ b /*/ c */ d // e");
        assert!(!stripped.contains("//"));
        assert!(!stripped.contains("/*"));
    }

    #[test]
    fn masks_strings_before_numbers() {
        let masked = normalizer().mask_literals(r#"log("retry 3", -2.5, 10)"#);
        assert_eq!(masked, "log(<STR_LIT>, <NUM_LIT>, <NUM_LIT>)");
    }

    #[test]
    fn placeholders_are_not_treated_as_replacement_templates() {
        let config = NormalizationConfig {
            number_placeholder: "$NUM".into(),
            ..NormalizationConfig::default()
        };
        let normalizer = Normalizer::new(config).unwrap();
        assert_eq!(normalizer.mask_literals("x + 1"), "x + $NUM");
    }

    #[test]
    fn flattens_newlines_and_indentation() {
        let flattened = normalizer().flatten_layout("if (a) {\n        b()\n}");
        assert_eq!(flattened, "if (a) {<EOL><INDENT><INDENT>b()<EOL>}");
    }

    #[test]
    fn full_pipeline_without_literal_masking_keeps_literals() {
        let normalizer =
            Normalizer::new(NormalizationConfig::default().with_literal_masking(false)).unwrap();
        assert_eq!(
            normalizer.normalize("if (x > 0) { // positive\n    y = \"one\"\n}"),
            "if (x > 0) {<INDENT> y = \"one\"<EOL>}"
        );
    }

    #[test]
    fn full_pipeline_with_default_scheme() {
        assert_eq!(
            normalizer().normalize("for (i in 0..9) {\n    print(\"v\" + i)\n}"),
            "for (i in <NUM_LIT>.<NUM_LIT>) {<EOL><INDENT>print(<STR_LIT> + i)<EOL>}"
        );
    }
}
