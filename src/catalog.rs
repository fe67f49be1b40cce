//! Declarative category → patterns → delimiter table.
//!
//! A catalog is written as plain [`CategorySpec`] values and compiled once
//! into a [`PatternCatalog`]. Compilation is where well-formedness is
//! enforced: every category needs at least one pattern, every pattern must
//! compile, delimiters must be a single visible character, and a category
//! may appear only once.

use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;

use crate::data::TaskCategory;
use crate::errors::ExtractError;
use crate::matcher::find_matches;
use crate::types::PatternSource;

/// Uncompiled catalog entry.
#[derive(Clone, Debug)]
pub struct CategorySpec {
    /// Category the patterns extract.
    pub category: TaskCategory,
    /// Regular expressions applied in order.
    pub patterns: Vec<PatternSource>,
    /// Character separating signature from body.
    pub delimiter: char,
}

impl CategorySpec {
    /// Create an entry from static pattern sources.
    pub fn new(category: TaskCategory, patterns: &[&'static str], delimiter: char) -> Self {
        Self {
            category,
            patterns: patterns.iter().map(|p| Cow::Borrowed(*p)).collect(),
            delimiter,
        }
    }
}

/// A catalog entry with its patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledCategory {
    category: TaskCategory,
    patterns: Vec<Regex>,
    delimiter: char,
}

impl CompiledCategory {
    /// Category this entry extracts.
    pub fn category(&self) -> TaskCategory {
        self.category
    }

    /// Compiled patterns in catalog order.
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Signature/body delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Raw matches for this category, grouped by pattern order.
    pub fn find_matches<'t>(&self, text: &'t str) -> Vec<&'t str> {
        find_matches(text, &self.patterns)
    }
}

/// Validated, compiled pattern catalog.
#[derive(Clone, Debug)]
pub struct PatternCatalog {
    categories: Vec<CompiledCategory>,
}

impl PatternCatalog {
    /// Compile the built-in Kotlin catalog.
    pub fn kotlin() -> Result<Self, ExtractError> {
        Self::compile(kotlin_specs())
    }

    /// Validate and compile an arbitrary catalog.
    pub fn compile<I>(specs: I) -> Result<Self, ExtractError>
    where
        I: IntoIterator<Item = CategorySpec>,
    {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for spec in specs {
            if !seen.insert(spec.category) {
                return Err(ExtractError::Configuration(format!(
                    "category '{}' is declared more than once",
                    spec.category
                )));
            }
            if spec.patterns.is_empty() {
                return Err(ExtractError::Configuration(format!(
                    "category '{}' has no patterns",
                    spec.category
                )));
            }
            if spec.delimiter.is_whitespace() || spec.delimiter.is_control() {
                return Err(ExtractError::Configuration(format!(
                    "category '{}' has invalid delimiter {:?}",
                    spec.category, spec.delimiter
                )));
            }
            let patterns = spec
                .patterns
                .iter()
                .map(|source| {
                    Regex::new(source).map_err(|err| ExtractError::InvalidPattern {
                        category: spec.category,
                        source: Box::new(err),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(CompiledCategory {
                category: spec.category,
                patterns,
                delimiter: spec.delimiter,
            });
        }
        if categories.is_empty() {
            return Err(ExtractError::Configuration(
                "pattern catalog is empty".to_string(),
            ));
        }
        Ok(Self { categories })
    }

    /// Compiled entries in declaration order.
    pub fn categories(&self) -> &[CompiledCategory] {
        &self.categories
    }

    /// Look up one category.
    pub fn get(&self, category: TaskCategory) -> Option<&CompiledCategory> {
        self.categories
            .iter()
            .find(|entry| entry.category == category)
    }
}

/// Built-in Kotlin extraction table.
pub fn kotlin_specs() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new(
            TaskCategory::Condition,
            &[
                r"(?s)if\s*\([^{}\n]*?\)\s*\{.*?\}",
                r"(?s)else\s+if\s*\([^{}\n]*?\)\s*\{.*?\}",
                r"(?s)else\s*\{.*?\}",
                r"(?s)when\s*\([^{}\n]*?\)\s*\{.*?\}",
            ],
            '{',
        ),
        CategorySpec::new(
            TaskCategory::Function,
            &[r"(?s)fun\s+\w+\s*\([^{}=]*?\)\s*\{.+?\}"],
            '{',
        ),
        CategorySpec::new(
            TaskCategory::Import,
            &[r"import\s+.*?\n", r"package\s+.*?\n"],
            '.',
        ),
        CategorySpec::new(
            TaskCategory::Loop,
            &[
                r"(?s)for\s*\([^{}\n]*?\)\s*\{[^{}]*\}",
                r"(?s)while\s*\([^{}\n]*?\)\s*\{[^{}]*\}",
            ],
            '{',
        ),
        CategorySpec::new(
            TaskCategory::Variable,
            &[r"var\s+\w+\s*=\s*.*\n", r"val\s+\w+\s*=\s*.*\n"],
            '=',
        ),
    ]
}
