//! Run artifact tracking: which result directories a run produced.

use std::collections::BTreeSet;
use std::error::Error as StdError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File in the results folder listing the directories of the last run.
pub const LAST_RUN_FILE: &str = "lastRun.txt";

/// Prefix of the line recording why the last run failed.
pub const LAST_RUN_FILE_ERROR_LINE: &str = "Error: ";

/// Errors that can occur while tracking run directories.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Could not create results folder '{path}': {source}")]
    CreateResultsFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not list results folder '{path}': {source}")]
    ListResultsFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not record simulation results in '{path}': {source}")]
    WriteLastRun {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Create the results folder if it does not exist yet.
pub fn ensure_results_folder(path: &Path) -> Result<(), RunError> {
    fs::create_dir_all(path).map_err(|e| RunError::CreateResultsFolder {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Names of the directories directly inside `results`.
///
/// A missing folder has no run directories.
pub fn list_run_directories(results: &Path) -> Result<BTreeSet<String>, RunError> {
    let list_err = |e: io::Error| RunError::ListResultsFolder {
        path: results.to_path_buf(),
        source: e,
    };

    let entries = match fs::read_dir(results) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(list_err(e)),
    };

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(list_err)?;
        if entry.file_type().map_err(list_err)?.is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Describe an error and its sources as `outer | cause | root cause`.
pub fn describe_error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(|e| e.to_string())
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Run directories present before a run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectories {
    results: PathBuf,
    existing: BTreeSet<String>,
}

impl RunDirectories {
    /// Remember the directories currently in `results`.
    pub fn snapshot(results: &Path) -> Result<Self, RunError> {
        let existing = list_run_directories(results)?;
        tracing::debug!(
            results = %results.display(),
            existing = existing.len(),
            "snapshot of run directories"
        );
        Ok(Self {
            results: results.to_path_buf(),
            existing,
        })
    }

    /// Rebuild a snapshot taken earlier (e.g. by another process).
    pub fn with_existing<I, S>(results: &Path, existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            results: results.to_path_buf(),
            existing: existing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn existing(&self) -> &BTreeSet<String> {
        &self.existing
    }

    /// Directories that appeared since the snapshot.
    pub fn new_directories(&self) -> Result<Vec<String>, RunError> {
        Ok(list_run_directories(&self.results)?
            .into_iter()
            .filter(|name| !self.existing.contains(name))
            .collect())
    }

    /// Write [`LAST_RUN_FILE`]: one new run directory per line, then the
    /// error line with the failure's cause chain if the run failed.
    pub fn record_last_run(
        &self,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Result<PathBuf, RunError> {
        let path = self.results.join(LAST_RUN_FILE);
        let write_err = |e: io::Error| RunError::WriteLastRun {
            path: path.clone(),
            source: e,
        };

        let new_dirs = self.new_directories()?;
        let mut file = io::BufWriter::new(fs::File::create(&path).map_err(write_err)?);
        for dir in &new_dirs {
            writeln!(file, "{dir}").map_err(write_err)?;
        }
        if let Some(error) = error {
            let causes = describe_error_chain(error);
            writeln!(file, "{LAST_RUN_FILE_ERROR_LINE}{causes}").map_err(write_err)?;
        }
        file.flush().map_err(write_err)?;

        tracing::info!(
            path = %path.display(),
            runs = new_dirs.len(),
            failed = error.is_some(),
            "recorded simulation results"
        );
        Ok(path)
    }
}
