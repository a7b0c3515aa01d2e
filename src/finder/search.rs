//! Receipt file search
//!
//! A `ReceiptSearch` describes a query over a directory tree. Each call to
//! `iter` starts a fresh depth-first walk, so the same search can be run again
//! after the files change. Directories are read one at a time as the walk
//! reaches them, and entries within a directory come out in name order.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Query over a directory tree for receipt files
#[derive(Debug, Clone)]
pub struct ReceiptSearch {
    root: PathBuf,
    query: Option<String>,
    extensions: Vec<String>,
    max_results: usize,
}

impl ReceiptSearch {
    /// Search for jpg, pdf and png files under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            query: None,
            extensions: vec!["jpg".into(), "pdf".into(), "png".into()],
            max_results: 1000,
        }
    }

    /// Filter on file name: a wildcard pattern when it contains `*` or `?`,
    /// otherwise a case-insensitive substring. Blank means no filter.
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        self
    }

    /// Accepted extensions; an empty list accepts every file
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new walk over the tree
    pub fn iter(&self) -> Candidates<'_> {
        Candidates {
            search: self,
            pending_dirs: vec![self.root.clone()],
            ready: VecDeque::new(),
            yielded: 0,
        }
    }

    /// Whether a file path passes the extension and query filters
    pub fn accepts(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_lowercase(),
            None => return false,
        };

        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            if !self.extensions.iter().any(|allowed| *allowed == ext) {
                return false;
            }
        }

        match &self.query {
            None => true,
            Some(q) if q.contains(['*', '?']) => wildcard_match(q, &name),
            Some(q) => name.contains(q.as_str()),
        }
    }
}

impl<'a> IntoIterator for &'a ReceiptSearch {
    type Item = PathBuf;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One walk over a `ReceiptSearch`
pub struct Candidates<'a> {
    search: &'a ReceiptSearch,
    pending_dirs: Vec<PathBuf>,
    ready: VecDeque<PathBuf>,
    yielded: usize,
}

impl Candidates<'_> {
    /// Read one directory: queue its matching files, stack its subdirectories
    fn scan(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            // Symlinked directories are not followed
            if file_type.is_dir() {
                subdirs.push(path);
            } else if path.is_file() && self.search.accepts(&path) {
                files.push(path);
            }
        }

        files.sort();
        subdirs.sort();
        self.ready.extend(files);
        self.pending_dirs.extend(subdirs.into_iter().rev());
    }
}

impl Iterator for Candidates<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if self.yielded >= self.search.max_results {
                return None;
            }
            if let Some(path) = self.ready.pop_front() {
                self.yielded += 1;
                return Some(path);
            }
            let dir = self.pending_dirs.pop()?;
            self.scan(&dir);
        }
    }
}

/// Match `text` against a pattern where `*` is any run and `?` any one char
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn scans() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("receipt1.pdf"));
        touch(&root.join("notes.txt"));
        touch(&root.join("2024").join("groceries.JPG"));
        touch(&root.join("2024").join("jan").join("coffee.png"));
        touch(&root.join("archive").join("old-receipt.pdf"));
        temp_dir
    }

    fn names(search: &ReceiptSearch) -> Vec<String> {
        search
            .iter()
            .map(|p| p.strip_prefix(search.root()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walks_depth_first_in_name_order() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path());

        assert_eq!(
            names(&search),
            vec![
                "receipt1.pdf",
                "2024/groceries.JPG",
                "2024/jan/coffee.png",
                "archive/old-receipt.pdf",
            ]
        );
    }

    #[test]
    fn test_substring_query_is_case_insensitive() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path()).with_query(Some("RECEIPT"));
        assert_eq!(names(&search), vec!["receipt1.pdf", "archive/old-receipt.pdf"]);
    }

    #[test]
    fn test_wildcard_query() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path()).with_query(Some("*.pdf"));
        assert_eq!(names(&search), vec!["receipt1.pdf", "archive/old-receipt.pdf"]);

        let search = ReceiptSearch::new(temp_dir.path()).with_query(Some("c?ffee*"));
        assert_eq!(names(&search), vec!["2024/jan/coffee.png"]);
    }

    #[test]
    fn test_extension_filter_and_blank_query() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path())
            .with_extensions(&[".txt".to_string()])
            .with_query(Some("   "));
        assert_eq!(names(&search), vec!["notes.txt"]);

        let all = ReceiptSearch::new(temp_dir.path()).with_extensions(&[]);
        assert_eq!(all.iter().count(), 5);
    }

    #[test]
    fn test_max_results_caps_the_walk() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path()).with_max_results(2);
        assert_eq!(search.iter().count(), 2);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let temp_dir = scans();
        let search = ReceiptSearch::new(temp_dir.path()).with_query(Some("coffee"));
        assert_eq!(search.iter().count(), 1);

        touch(&temp_dir.path().join("coffee-2.pdf"));
        assert_eq!(search.iter().count(), 2);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let search = ReceiptSearch::new(temp_dir.path().join("missing"));
        assert_eq!(search.iter().next(), None);
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*.pdf", "receipt.pdf"));
        assert!(wildcard_match("r*t*.pdf", "receipt.pdf"));
        assert!(wildcard_match("??.png", "ab.png"));
        assert!(!wildcard_match("??.png", "abc.png"));
        assert!(!wildcard_match("*.pdf", "receipt.png"));
        assert!(!wildcard_match("a", ""));
    }
}
