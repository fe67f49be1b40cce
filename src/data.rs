use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::files::TASK_FILE_SUFFIX;
use crate::errors::ExtractError;

pub use crate::types::{Body, Signature};

/// Kind of code fragment a pattern set extracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// `if` / `else if` / `else` / `when` blocks.
    Condition,
    /// `fun` declarations with a block body.
    Function,
    /// `import` and `package` lines.
    Import,
    /// `for` and `while` loops.
    Loop,
    /// `var` and `val` declarations with an initializer.
    Variable,
}

impl TaskCategory {
    /// Canonical category order used for catalogs and output files.
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Condition,
        TaskCategory::Function,
        TaskCategory::Import,
        TaskCategory::Loop,
        TaskCategory::Variable,
    ];

    /// Lowercase name used in file names and logs.
    pub fn name(self) -> &'static str {
        match self {
            TaskCategory::Condition => "condition",
            TaskCategory::Function => "function",
            TaskCategory::Import => "import",
            TaskCategory::Loop => "loop",
            TaskCategory::Variable => "variable",
        }
    }

    /// Output file name for this category, e.g. `loop_tasks.jsonl`.
    pub fn file_name(self) -> String {
        format!("{}{}", self.name(), TASK_FILE_SUFFIX)
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskCategory {
    type Err = ExtractError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ExtractError::Configuration(format!("unknown task category '{raw}'")))
    }
}

/// One completion example: the model sees `signature` and predicts `body`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Fragment prefix up to and including the category delimiter.
    pub signature: Signature,
    /// Fragment remainder after the delimiter.
    pub body: Body,
}

impl TaskRecord {
    /// Build a record from a signature/body pair.
    pub fn new(signature: impl Into<Signature>, body: impl Into<Body>) -> Self {
        Self {
            signature: signature.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_map_to_task_files() {
        let files: Vec<String> = TaskCategory::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(
            files,
            vec![
                "condition_tasks.jsonl",
                "function_tasks.jsonl",
                "import_tasks.jsonl",
                "loop_tasks.jsonl",
                "variable_tasks.jsonl",
            ]
        );
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Loop".parse::<TaskCategory>().unwrap(), TaskCategory::Loop);
        assert_eq!(" variable ".parse::<TaskCategory>().unwrap(), TaskCategory::Variable);
        assert!("lambda".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn record_serializes_with_signature_then_body() {
        let record = TaskRecord::new("val x =", "<NUM_LIT><EOL>");
        let line = serde_json::to_string(&record).unwrap();
        assert_eq!(line, r#"{"signature":"val x =","body":"<NUM_LIT><EOL>"}"#);
    }
}
