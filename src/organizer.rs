//! One organize pass over a directory.
//!
//! [`Organizer::run`] lists the top-level entries of the base directory, skips
//! subdirectories, resolves a category for every file, computes its final name
//! and moves it (or records the move in a [`DirectoryTree`] during a dry run).
//!
//! Per-file failures do not stop the pass: each one is recorded as a
//! [`FileOutcome::Failed`] and the remaining files are still processed. Only a
//! failure to list the base directory aborts the run.

use crate::config::CategoryRules;
use crate::file_category::{CategoryResolver, GuessedMime, MimeLookup};
use crate::file_organizer::{Mover, OrganizeError, OrganizeResult, PlannedMove};
use crate::naming::{Clock, SystemClock, compute_name};
use crate::tree::DirectoryTree;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Prefix destination names with the current date.
    pub prepend_date: bool,
    /// Plan the moves without touching the filesystem.
    pub dry_run: bool,
    /// Log every outcome at info level instead of debug.
    pub verbose: bool,
}

/// What happened to one directory entry.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was moved.
    Moved {
        source: PathBuf,
        destination: PathBuf,
        category: String,
    },
    /// The move was planned during a dry run.
    Simulated {
        source: PathBuf,
        destination: PathBuf,
        category: String,
    },
    /// No category applies; the file stays where it is.
    Skipped { path: PathBuf },
    /// The entry could not be processed.
    Failed { path: PathBuf, error: OrganizeError },
}

impl FileOutcome {
    /// The source path the outcome refers to.
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Moved { source, .. } | FileOutcome::Simulated { source, .. } => {
                source.as_path()
            }
            FileOutcome::Skipped { path } | FileOutcome::Failed { path, .. } => path.as_path(),
        }
    }

    /// Category for moved or simulated files.
    pub fn category(&self) -> Option<&str> {
        match self {
            FileOutcome::Moved { category, .. } | FileOutcome::Simulated { category, .. } => {
                Some(category.as_str())
            }
            _ => None,
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct OrganizeReport {
    base_path: PathBuf,
    dry_run: bool,
    outcomes: Vec<FileOutcome>,
    tree: DirectoryTree,
}

impl OrganizeReport {
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Outcomes in processing order (entries sorted by file name).
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Files that were moved or, in a dry run, would be moved.
    pub fn relocated(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| {
            matches!(
                o,
                FileOutcome::Moved { .. } | FileOutcome::Simulated { .. }
            )
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Skipped { path } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &OrganizeError)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { path, error } => Some((path.as_path(), error)),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Number of relocated files per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for category in self.relocated().filter_map(FileOutcome::category) {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// The simulated layout. Empty unless this was a dry run.
    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    /// Renders the simulated layout below the base directory for a dry run.
    pub fn render_tree(&self) -> Option<String> {
        if !self.dry_run {
            return None;
        }
        self.tree.render(&self.base_path)
    }
}

/// Drives an organize pass over one directory.
///
/// # Examples
///
/// ```no_run
/// use tidydir::{CategoryRules, OrganizeOptions, Organizer};
///
/// let rules = CategoryRules::new().with_category("audio", &[".mp3"]);
/// let options = OrganizeOptions { dry_run: true, ..Default::default() };
/// let report = Organizer::new("/home/me/Downloads", rules, options).run().unwrap();
/// print!("{}", report.render_tree().unwrap_or_default());
/// ```
pub struct Organizer {
    base_path: PathBuf,
    rules: CategoryRules,
    options: OrganizeOptions,
    clock: Box<dyn Clock>,
    mime: Box<dyn MimeLookup>,
}

impl Organizer {
    /// Creates an organizer using the system clock and the `mime_guess` table.
    pub fn new(base_path: impl Into<PathBuf>, rules: CategoryRules, options: OrganizeOptions) -> Self {
        Self {
            base_path: base_path.into(),
            rules,
            options,
            clock: Box::new(SystemClock),
            mime: Box::new(GuessedMime),
        }
    }

    /// Replaces the clock used for date prefixes.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the MIME lookup used when no rule matches.
    pub fn with_mime_lookup(mut self, lookup: impl MimeLookup + 'static) -> Self {
        self.mime = Box::new(lookup);
        self
    }

    pub fn options(&self) -> OrganizeOptions {
        self.options
    }

    /// Runs the pass.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::DirectoryRead` if the base directory cannot be
    /// listed. Every other failure is reported per file in the returned report.
    pub fn run(&self) -> OrganizeResult<OrganizeReport> {
        self.run_with(|_, _, _| {})
    }

    /// Runs the pass, calling `observe(position, total, outcome)` after each file.
    ///
    /// `position` counts from 1 and `total` is the number of non-directory
    /// entries found in the base directory.
    pub fn run_with<F>(&self, mut observe: F) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(usize, usize, &FileOutcome),
    {
        let entries = fs::read_dir(&self.base_path).map_err(|e| OrganizeError::DirectoryRead {
            path: self.base_path.clone(),
            source: e,
        })?;

        log::info!(
            "Organizing {}{}",
            self.base_path.display(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        // one date for the whole run
        let today = self.clock.today();
        let resolver = CategoryResolver::new(&self.rules, self.mime.as_ref());
        let mut tree = DirectoryTree::new(&self.base_path);
        let mut outcomes = Vec::new();

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_dir() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    log::debug!("Unreadable entry in {}: {}", self.base_path.display(), e);
                    outcomes.push(FileOutcome::Failed {
                        path: self.base_path.clone(),
                        error: OrganizeError::EntryRead {
                            path: self.base_path.clone(),
                            source: e,
                        },
                    });
                }
            }
        }
        files.sort();

        let total = files.len();
        for (idx, path) in files.into_iter().enumerate() {
            let outcome = self.process(path, &resolver, today, &mut tree);
            self.log_outcome(&outcome);
            observe(idx + 1, total, &outcome);
            outcomes.push(outcome);
        }

        let report = OrganizeReport {
            base_path: self.base_path.clone(),
            dry_run: self.options.dry_run,
            outcomes,
            tree,
        };

        log::info!(
            "Finished {}: {} relocated, {} skipped, {} failed",
            self.base_path.display(),
            report.relocated().count(),
            report.skipped().count(),
            report.failures().count()
        );

        Ok(report)
    }

    fn process(
        &self,
        path: PathBuf,
        resolver: &CategoryResolver<'_>,
        today: NaiveDate,
        tree: &mut DirectoryTree,
    ) -> FileOutcome {
        let Some(original_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping {}: file name is not valid UTF-8", path.display());
            return FileOutcome::Skipped { path };
        };

        let Some(category) = resolver.category_for(&path) else {
            return FileOutcome::Skipped { path };
        };

        let planned = PlannedMove {
            file_name: compute_name(original_name, self.options.prepend_date, today),
            source: path.clone(),
            category,
        };

        match Mover::execute(&planned, &self.base_path, self.options.dry_run, tree) {
            Ok(destination) if self.options.dry_run => FileOutcome::Simulated {
                source: planned.source,
                destination,
                category: planned.category,
            },
            Ok(destination) => FileOutcome::Moved {
                source: planned.source,
                destination,
                category: planned.category,
            },
            Err(error) => FileOutcome::Failed { path, error },
        }
    }

    /// Level for a per-file record. Failures are left to the caller to report.
    fn outcome_level(&self, outcome: &FileOutcome) -> log::Level {
        match outcome {
            FileOutcome::Failed { .. } => log::Level::Debug,
            _ if self.options.verbose => log::Level::Info,
            _ => log::Level::Debug,
        }
    }

    fn log_outcome(&self, outcome: &FileOutcome) {
        let level = self.outcome_level(outcome);
        match outcome {
            FileOutcome::Moved {
                source,
                destination,
                ..
            } => log::log!(level, "Moved {} -> {}", source.display(), destination.display()),
            FileOutcome::Simulated {
                source,
                destination,
                ..
            } => log::log!(
                level,
                "Would move {} -> {}",
                source.display(),
                destination.display()
            ),
            FileOutcome::Skipped { path } => {
                log::log!(level, "Skipped {}: no category", path.display())
            }
            FileOutcome::Failed { path, error } => {
                log::log!(level, "Could not organize {}: {}", path.display(), error)
            }
        }
    }
}
