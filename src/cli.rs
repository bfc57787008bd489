//! Command-line interface module for tidydir.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Locating, bootstrapping and loading the rules file
//! - Running the organizer and printing its outcomes

use crate::config::{self, CategoryRules};
use crate::file_category::NoMimeLookup;
use crate::organizer::{OrganizeOptions, OrganizeReport, Organizer};
use crate::output::OutputFormatter;
use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Sort the files of a directory into category subdirectories.
#[derive(Debug, Clone, Parser)]
#[command(name = "tidydir", version, about, long_about = None)]
pub struct Args {
    /// Directory to organize
    #[arg(short = 'd', long = "directory")]
    pub directory: PathBuf,

    /// Rules file mapping categories to extensions (JSON, or TOML when named *.toml)
    /// [default: ~/.config/file-organizer/config.json]
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Prepend the current date to file names
    #[arg(long)]
    pub prepend_date: bool,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print a line for every file
    #[arg(short, long)]
    pub verbose: bool,

    /// Only use the configured rules; never guess a category from the MIME type
    #[arg(long)]
    pub no_mime_fallback: bool,
}

impl Args {
    pub fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            prepend_date: self.prepend_date,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }

    /// The rules file given on the command line, or the per-user default.
    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::default_config_path()
                .context("Could not determine the home directory; pass --config"),
        }
    }
}

/// Default log filter: `info` with `--verbose`, `warn` otherwise.
pub fn log_filter(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Installs the `env_logger` backend. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbose)))
        .format_timestamp(None)
        .init();
}

/// Loads the rules file, offering to create a skeleton first when it is
/// missing and `interactive` is set.
pub fn load_rules(path: &Path, interactive: bool) -> anyhow::Result<CategoryRules> {
    if interactive && !path.exists() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        config::bootstrap(path, &mut input, &mut output)?;
    }

    let rules = CategoryRules::load(path).context("Failed to load configuration")?;
    if rules.iter().all(|(_, exts)| exts.is_empty()) {
        OutputFormatter::warning(&format!(
            "No extensions are configured in {}; only the MIME fallback will place files.",
            path.display()
        ));
    }
    Ok(rules)
}

/// Runs the CLI application with parsed arguments.
///
/// Returns the run report; fatal problems (configuration, unreadable
/// directory) come back as errors.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use tidydir::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["tidydir", "-d", "/home/me/Downloads", "--dry-run"]);
/// match run_cli(&args) {
///     Ok(report) if report.has_failures() => eprintln!("Some files were not moved"),
///     Ok(_) => println!("Done"),
///     Err(e) => eprintln!("Error: {:#}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> anyhow::Result<OrganizeReport> {
    let config_path = args.config_path()?;
    let rules = load_rules(&config_path, io::stdin().is_terminal())?;
    organize(args, rules)
}

/// Organizes `args.directory` with the given rules and prints the results.
pub fn organize(args: &Args, rules: CategoryRules) -> anyhow::Result<OrganizeReport> {
    let options = args.options();
    let mut organizer = Organizer::new(&args.directory, rules, options);
    if args.no_mime_fallback {
        organizer = organizer.with_mime_lookup(NoMimeLookup);
    }

    if options.verbose {
        OutputFormatter::info(&format!(
            "Starting organization in '{}'...",
            args.directory.display()
        ));
        if options.dry_run {
            OutputFormatter::dry_run_notice("No files will be moved.");
        }
    }

    let show_progress = !options.verbose && !options.dry_run;
    let mut progress: Option<ProgressBar> = None;

    let report = organizer
        .run_with(|_, total, outcome| {
            if options.verbose {
                OutputFormatter::plain(&OutputFormatter::outcome_line(outcome));
            } else if show_progress {
                let bar = progress
                    .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
                bar.set_message(
                    outcome
                        .path()
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                );
                bar.inc(1);
            }
        })
        .with_context(|| format!("Failed to organize {}", args.directory.display()))?;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    print_report(&report, options);
    Ok(report)
}

fn print_report(report: &OrganizeReport, options: OrganizeOptions) {
    let counts = report.category_counts();
    let relocated: usize = counts.values().sum();

    if let Some(tree) = report.render_tree() {
        OutputFormatter::dry_run_notice(&format!(
            "Displaying where files will be organized within '{}':",
            report.base_path().display()
        ));
        OutputFormatter::tree(&tree);
    } else if relocated > 0 {
        OutputFormatter::summary_table(&counts, relocated);
    } else {
        OutputFormatter::info("No files needed organizing.");
    }

    let skipped = report.skipped().count();
    if skipped > 0 && !options.verbose {
        OutputFormatter::plain(&format!(
            "{} file{} left in place (no category).",
            skipped,
            if skipped == 1 { "" } else { "s" }
        ));
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        for (path, error) in &failures {
            OutputFormatter::error(&format!("{}: {}", path.display(), error));
        }
        OutputFormatter::warning(&format!(
            "{} file{} could not be organized. Please review the errors above.",
            failures.len(),
            if failures.len() == 1 { "" } else { "s" }
        ));
    } else if options.verbose {
        OutputFormatter::success("Organization completed.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "tidydir",
            "-d",
            "/tmp/downloads",
            "-c",
            "/tmp/rules.toml",
            "--prepend-date",
            "--dry-run",
            "-v",
        ]);

        assert_eq!(args.directory, PathBuf::from("/tmp/downloads"));
        assert_eq!(args.config_path().unwrap(), PathBuf::from("/tmp/rules.toml"));
        assert_eq!(
            args.options(),
            OrganizeOptions {
                prepend_date: true,
                dry_run: true,
                verbose: true,
            }
        );
        assert!(!args.no_mime_fallback);
    }

    #[test]
    fn test_long_directory_flag() {
        let args = Args::parse_from(["tidydir", "--directory", "x", "--no-mime-fallback"]);
        assert_eq!(args.directory, PathBuf::from("x"));
        assert!(args.no_mime_fallback);
        assert_eq!(args.options(), OrganizeOptions::default());
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Args::try_parse_from(["tidydir", "--dry-run"]).is_err());
    }

    #[test]
    fn test_verbose_raises_log_filter() {
        let quiet = Args::parse_from(["tidydir", "-d", "x"]);
        let verbose = Args::parse_from(["tidydir", "-d", "x", "--verbose"]);

        assert_eq!(log_filter(quiet.verbose), "warn");
        assert_eq!(log_filter(verbose.verbose), "info");
    }

    #[test]
    fn test_args_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
