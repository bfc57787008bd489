//! Category rule configuration.
//!
//! This module loads the mapping from category names to file extensions that
//! drives organization. Rules are read from a JSON file by default, or from TOML
//! when the file name ends in `.toml`. Both formats use a flat table:
//!
//! ```json
//! {
//!   "audio": [".mp3", ".flac"],
//!   "document": [".pdf", ".docx"],
//!   "image": [".jpg", ".png"]
//! }
//! ```
//!
//! ```toml
//! audio = [".mp3", ".flac"]
//! document = [".pdf", ".docx"]
//! ```
//!
//! When the configuration file does not exist yet, [`bootstrap`] can offer to
//! write an empty skeleton with the default category names.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Category names written by [`CategoryRules::skeleton`].
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "3d-model",
    "application",
    "archive",
    "audio",
    "document",
    "image",
    "presentation",
    "programming",
    "spreadsheet",
    "video",
];

/// Errors that can occur while loading or writing the rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid JSON/TOML syntax or structure.
    #[error("Invalid configuration {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    /// The configuration file or its directory could not be written.
    #[error("Failed to write configuration {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk format of a rules file, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Json,
    Toml,
}

impl RulesFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RulesFormat::Toml,
            _ => RulesFormat::Json,
        }
    }
}

/// Mapping from category name to the extensions that belong to it.
///
/// Categories are kept sorted by name, so when an extension is listed under
/// more than one category the alphabetically first category wins. Extensions
/// are stored lower-case with a leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryRules {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryRules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a category, normalizing its extensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydir::CategoryRules;
    ///
    /// let rules = CategoryRules::new().with_category("audio", &["MP3", ".flac"]);
    /// assert_eq!(rules.extensions("audio"), Some(&[".mp3".to_string(), ".flac".to_string()][..]));
    /// ```
    pub fn with_category(mut self, name: &str, extensions: &[&str]) -> Self {
        self.insert(name, extensions.iter().map(|e| e.to_string()));
        self
    }

    /// Adds (or replaces) a category, normalizing its extensions.
    pub fn insert<I>(&mut self, name: &str, extensions: I)
    where
        I: IntoIterator<Item = String>,
    {
        let normalized = extensions
            .into_iter()
            .filter_map(|e| normalize_extension(&e))
            .collect();
        self.categories.insert(name.to_string(), normalized);
    }

    /// Returns the extensions configured for a category.
    pub fn extensions(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Iterates categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, exts)| (name.as_str(), exts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Lists extensions that appear under more than one category, together
    /// with the categories that claim them (in name order).
    pub fn overlapping_extensions(&self) -> Vec<(String, Vec<String>)> {
        let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (category, exts) in &self.categories {
            for ext in exts {
                let claimed = owners.entry(ext.as_str()).or_default();
                if !claimed.contains(category) {
                    claimed.push(category.clone());
                }
            }
        }
        owners
            .into_iter()
            .filter(|(_, cats)| cats.len() > 1)
            .map(|(ext, cats)| (ext.to_string(), cats))
            .collect()
    }

    /// The default skeleton: every [`DEFAULT_CATEGORIES`] entry with no extensions.
    pub fn skeleton() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Loads rules from a JSON or TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Io` if it cannot be read and `ConfigError::Invalid`
    /// if parsing fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let rules = Self::parse(&content, RulesFormat::from_path(path)).map_err(|reason| {
            ConfigError::Invalid {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        for (ext, categories) in rules.overlapping_extensions() {
            log::warn!(
                "Extension {} is listed under several categories ({}); using '{}'",
                ext,
                categories.join(", "),
                categories[0]
            );
        }
        log::debug!(
            "Loaded {} categories from {}",
            rules.len(),
            path.display()
        );

        Ok(rules)
    }

    /// Parses rule content in the given format, returning the parser's message on failure.
    pub fn parse(content: &str, format: RulesFormat) -> Result<Self, String> {
        let raw: BTreeMap<String, Vec<String>> = match format {
            RulesFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
            RulesFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
        };

        let mut rules = Self::new();
        for (name, exts) in raw {
            rules.insert(&name, exts);
        }
        Ok(rules)
    }

    /// Writes the rules to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = match RulesFormat::from_path(path) {
            RulesFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                .map_err(write_err)?,
            RulesFormat::Toml => toml::to_string(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                .map_err(write_err)?,
        };

        fs::write(path, content).map_err(write_err)
    }
}

/// Lower-cases an extension and gives it a leading dot. Blank entries are dropped.
fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    if ext.is_empty() || ext == "." {
        return None;
    }
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}

/// Default location of the rules file: `~/.config/file-organizer/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("file-organizer")
            .join("config.json")
    })
}

/// Offers to create an empty configuration skeleton when `path` does not exist.
///
/// The question is repeated until the answer is `y` or `n`. End of input counts
/// as `n`. Returns `true` when a skeleton was written.
pub fn bootstrap<R, W>(path: &Path, input: &mut R, output: &mut W) -> Result<bool, ConfigError>
where
    R: BufRead,
    W: Write,
{
    let io_err = |e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    if path.exists() {
        return Ok(false);
    }

    writeln!(output, "Configuration file not found at: {}", path.display()).map_err(io_err)?;

    loop {
        write!(output, "Would you like to generate an empty version? (y/n): ").map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            writeln!(output).map_err(io_err)?;
            writeln!(output, "No configuration file created.").map_err(io_err)?;
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" => {
                CategoryRules::skeleton().save(path)?;
                writeln!(output, "Empty configuration created at: {}", path.display())
                    .map_err(io_err)?;
                log::info!("Wrote configuration skeleton to {}", path.display());
                return Ok(true);
            }
            "n" => {
                writeln!(output, "No configuration file created.").map_err(io_err)?;
                return Ok(false);
            }
            _ => {
                writeln!(output, "Invalid input. Please enter 'y' for yes or 'n' for no.")
                    .map_err(io_err)?;
            }
        }
    }
}
