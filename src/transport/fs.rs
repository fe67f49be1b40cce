use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::files::JSONL_EXTENSION;
use crate::errors::ExtractError;

/// Filesystem transport that discovers source files under a root.
pub struct SourceWalker {
    root: PathBuf,
    follow_links: bool,
    extensions: Vec<String>,
}

impl SourceWalker {
    /// Create a walker rooted at `root` that accepts every regular file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            extensions: Vec::new(),
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Restrict discovery to these extensions (case-insensitive, no dot).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Every matching regular file under the root, in sorted path order.
    ///
    /// Walk errors (unreadable directories, broken links when following)
    /// are returned rather than skipped.
    pub fn collect(&self) -> Result<Vec<PathBuf>, ExtractError> {
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.extensions.is_empty() || has_extension(entry.path(), &self.extensions) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// True if the path's extension is one of `extensions` (case-insensitive).
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate.as_ref()))
        })
        .unwrap_or(false)
}

/// `.jsonl` files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped.
pub fn list_jsonl_files(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if has_extension(&path, &[JSONL_EXTENSION]) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Append-only text log of failed fetches.
#[derive(Clone, Debug)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Log writing to `path`; the file is created on first record.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `<error>: <url>` line.
    pub fn record(&self, error: &dyn std::fmt::Display, url: &str) -> Result<(), ExtractError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{error}: {url}")?;
        Ok(())
    }
}
