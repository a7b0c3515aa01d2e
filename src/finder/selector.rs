//! Choosing one entry out of a list
//!
//! `Selector` is the seam between the flows that need a choice and the way the
//! choice is made. `FuzzySelector` hands the list to an external fuzzy finder
//! such as fzf; `ListSelector` is the built-in numbered list.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::pager::page;
use crate::config::Settings;
use crate::console::Console;
use crate::error::{LedgerError, LedgerResult};

/// Picks one of a list of candidate labels
pub trait Selector {
    /// Short name for messages
    fn name(&self) -> &str;

    /// Index of the chosen candidate, or `None` when the user cancels
    fn choose(
        &mut self,
        prompt: &str,
        candidates: &[String],
        console: &mut Console<'_>,
    ) -> LedgerResult<Option<usize>>;
}

/// External fuzzy finder reading candidates on stdin
pub struct FuzzySelector {
    program: PathBuf,
}

impl FuzzySelector {
    /// Use `program` if it can be found on `PATH`
    pub fn detect(program: &str) -> Option<Self> {
        find_on_path(program).map(|program| Self { program })
    }
}

impl Selector for FuzzySelector {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("fuzzy finder")
    }

    fn choose(
        &mut self,
        prompt: &str,
        candidates: &[String],
        _console: &mut Console<'_>,
    ) -> LedgerResult<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut child = Command::new(&self.program)
            .arg("--prompt")
            .arg(format!("{} ", prompt))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                LedgerError::Io(format!("Failed to start {}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            for candidate in candidates {
                writeln!(stdin, "{}", candidate)?;
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            // Escape, Ctrl-C and "no match" all end with a non-zero status
            debug!(status = ?output.status.code(), "Fuzzy selection cancelled");
            return Ok(None);
        }

        let selected = String::from_utf8_lossy(&output.stdout);
        let selected = selected.trim_end_matches(['\n', '\r']);
        Ok(candidates.iter().position(|c| c == selected))
    }
}

/// Lists longer than this go through the pager when one is set
const PAGE_THRESHOLD: usize = 20;

/// Numbered list with a numeric answer
pub struct ListSelector {
    pager: Option<String>,
    page_threshold: usize,
}

impl ListSelector {
    pub fn new(pager: Option<String>) -> Self {
        Self {
            pager,
            page_threshold: PAGE_THRESHOLD,
        }
    }
}

impl Selector for ListSelector {
    fn name(&self) -> &str {
        "list"
    }

    fn choose(
        &mut self,
        prompt: &str,
        candidates: &[String],
        console: &mut Console<'_>,
    ) -> LedgerResult<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let listing: String = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:>4}: {}\n", i + 1, c))
            .collect();

        let pager = self
            .pager
            .as_deref()
            .filter(|_| candidates.len() > self.page_threshold);
        page(&listing, pager, console.output())?;

        let count = candidates.len();
        console.ask_until(
            &format!("{} Enter a number (blank to cancel): ", prompt),
            |answer| {
                if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                    return Ok(None);
                }
                match answer.parse::<usize>() {
                    Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
                    _ => Err(LedgerError::Validation(format!(
                        "Enter a number between 1 and {}.",
                        count
                    ))),
                }
            },
        )
    }
}

/// The configured fuzzy selector when installed, else the numbered list
pub fn detect_selector(settings: &Settings, pager: Option<String>) -> Box<dyn Selector> {
    match FuzzySelector::detect(&settings.selector_program) {
        Some(fuzzy) => {
            debug!(program = %fuzzy.program.display(), "Using fuzzy selector");
            Box::new(fuzzy)
        }
        None => {
            warn!(
                program = %settings.selector_program,
                "Fuzzy selector not found, using numbered lists"
            );
            Box::new(ListSelector::new(pager))
        }
    }
}

/// Locate an executable by name on `PATH`, or check an explicit path
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let program = program.trim();
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    vec![program.to_string(), format!("{}.exe", program)].into_iter()
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    std::iter::once(program.to_string())
}
