/// Category resolution for files being organized.
///
/// A file's category comes from the configured [`CategoryRules`] when its
/// extension is listed there. Otherwise the extension is looked up in a MIME
/// type table and the primary type is mapped to one of a few broad categories.
/// File contents are never read.
///
/// # Examples
///
/// ```
/// use tidydir::CategoryRules;
/// use tidydir::file_category::{mime_to_category, resolve};
///
/// let rules = CategoryRules::new().with_category("audio", &[".mp3"]);
/// assert_eq!(resolve("Song.MP3", &rules), Some("audio"));
/// assert_eq!(resolve("notes.txt", &rules), None);
/// assert_eq!(mime_to_category("application/pdf"), Some("document"));
/// ```
use crate::config::CategoryRules;
use std::path::Path;

/// Looks up a MIME type for a path.
///
/// Implementations must only look at the path, never at file contents.
pub trait MimeLookup {
    /// Returns the MIME type (e.g. `image/png`) for `path`, if one is known.
    fn mime_type(&self, path: &Path) -> Option<String>;
}

/// [`MimeLookup`] backed by the `mime_guess` extension table.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessedMime;

impl MimeLookup for GuessedMime {
    fn mime_type(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_string_lossy();
        let ext = extension_of(&file_name).trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            return None;
        }
        mime_guess::from_ext(&ext)
            .first()
            .map(|mime| mime.essence_str().to_string())
    }
}

/// [`MimeLookup`] that knows no types, which turns the MIME fallback off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMimeLookup;

impl MimeLookup for NoMimeLookup {
    fn mime_type(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Returns the extension of a file name, including the leading dot.
///
/// The extension starts at the last `.` of the name. Names without a dot have
/// no extension and yield an empty string.
///
/// ```
/// use tidydir::file_category::extension_of;
///
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of(".bashrc"), ".bashrc");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[idx..],
        None => "",
    }
}

/// Finds the category whose extension list contains the file's extension.
///
/// Matching is case-insensitive on the file name. Categories are scanned in
/// name order and the first match wins. Files without an extension never match.
pub fn resolve<'r>(file_name: &str, rules: &'r CategoryRules) -> Option<&'r str> {
    let ext = extension_of(file_name).to_lowercase();
    if ext.is_empty() {
        return None;
    }

    rules
        .iter()
        .find(|(_, exts)| exts.iter().any(|e| *e == ext))
        .map(|(category, _)| category)
}

/// Maps the primary part of a MIME type to a category.
///
/// `application/*` is treated as a document. Types outside image, audio,
/// video and application have no category.
pub fn mime_to_category(mime_type: &str) -> Option<&'static str> {
    let primary = mime_type.split('/').next()?.trim().to_lowercase();
    match primary.as_str() {
        "image" => Some("image"),
        "audio" => Some("audio"),
        "video" => Some("video"),
        "application" => Some("document"),
        _ => None,
    }
}

/// Resolves a category from the MIME type of `path`.
pub fn resolve_by_mime_type(path: &Path, lookup: &dyn MimeLookup) -> Option<&'static str> {
    let mime = lookup.mime_type(path)?;
    mime_to_category(&mime)
}

/// Combines rule lookup and MIME fallback for one organize run.
pub struct CategoryResolver<'a> {
    rules: &'a CategoryRules,
    mime: &'a dyn MimeLookup,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(rules: &'a CategoryRules, mime: &'a dyn MimeLookup) -> Self {
        Self { rules, mime }
    }

    /// Determines the category for the file at `path`.
    ///
    /// The configured rules always take precedence; the MIME table is only
    /// consulted when no rule matches. Returns `None` when the file should be
    /// left where it is.
    pub fn category_for(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_string_lossy();

        if let Some(category) = resolve(&file_name, self.rules) {
            log::debug!("{}: matched rule for category '{}'", file_name, category);
            return Some(category.to_string());
        }

        match resolve_by_mime_type(path, self.mime) {
            Some(category) => {
                log::debug!("{}: MIME fallback chose '{}'", file_name, category);
                Some(category.to_string())
            }
            None => {
                log::debug!("{}: no category found", file_name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rules() -> CategoryRules {
        CategoryRules::new()
            .with_category("audio", &[".mp3"])
            .with_category("video", &[".mp4"])
            .with_category("image", &[".jpg"])
            .with_category("document", &[".pdf"])
            .with_category("archive", &[".zip"])
    }

    struct FixedMime(&'static str);

    impl MimeLookup for FixedMime {
        fn mime_type(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("test.mp3"), ".mp3");
        assert_eq!(extension_of("backup.tar.zip"), ".zip");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of("trailing."), ".");
    }

    #[test]
    fn test_resolve_exact_match() {
        let rules = sample_rules();
        assert_eq!(resolve("test.mp3", &rules), Some("audio"));
        assert_eq!(resolve("test.zip", &rules), Some("archive"));
        assert_eq!(resolve("test.exe", &rules), None);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let rules = sample_rules();
        assert_eq!(resolve("PHOTO.JPG", &rules), Some("image"));
        assert_eq!(resolve("Report.Pdf", &rules), Some("document"));
    }

    #[test]
    fn test_resolve_without_extension() {
        let rules = sample_rules();
        assert_eq!(resolve("README", &rules), None);
        assert_eq!(resolve("trailing.", &rules), None);
    }

    #[test]
    fn test_resolve_overlap_prefers_first_category_by_name() {
        let rules = CategoryRules::new()
            .with_category("text", &[".txt"])
            .with_category("document", &[".txt"]);
        assert_eq!(resolve("notes.txt", &rules), Some("document"));
    }

    #[test]
    fn test_mime_to_category() {
        assert_eq!(mime_to_category("image/png"), Some("image"));
        assert_eq!(mime_to_category("audio/mpeg"), Some("audio"));
        assert_eq!(mime_to_category("video/mp4"), Some("video"));
        assert_eq!(mime_to_category("application/zip"), Some("document"));
        assert_eq!(mime_to_category("text/plain"), None);
        assert_eq!(mime_to_category("font/woff"), None);
        assert_eq!(mime_to_category(""), None);
    }

    #[test]
    fn test_guessed_mime_uses_extension_table() {
        let lookup = GuessedMime;
        assert_eq!(
            lookup.mime_type(Path::new("/tmp/photo.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            lookup.mime_type(Path::new("/tmp/PHOTO.PNG")).as_deref(),
            Some("image/png")
        );
        assert_eq!(lookup.mime_type(Path::new("/tmp/README")), None);
        assert_eq!(lookup.mime_type(Path::new("/tmp/data.qqqzzz")), None);
    }

    #[test]
    fn test_resolve_by_mime_type() {
        assert_eq!(
            resolve_by_mime_type(Path::new("photo.png"), &GuessedMime),
            Some("image")
        );
        assert_eq!(
            resolve_by_mime_type(Path::new("data.json"), &GuessedMime),
            Some("document")
        );
        assert_eq!(
            resolve_by_mime_type(Path::new("notes.txt"), &GuessedMime),
            None
        );
        assert_eq!(
            resolve_by_mime_type(Path::new("photo.png"), &NoMimeLookup),
            None
        );
    }

    #[test]
    fn test_resolver_prefers_rules_over_mime() {
        let rules = CategoryRules::new().with_category("notes", &[".txt"]);
        let mime = FixedMime("image/png");
        let resolver = CategoryResolver::new(&rules, &mime);

        assert_eq!(
            resolver.category_for(Path::new("/d/todo.txt")).as_deref(),
            Some("notes")
        );
        assert_eq!(
            resolver.category_for(Path::new("/d/other.bin")).as_deref(),
            Some("image")
        );
    }

    #[test]
    fn test_resolver_falls_back_to_mime() {
        let rules = sample_rules();
        let resolver = CategoryResolver::new(&rules, &GuessedMime);

        assert_eq!(
            resolver.category_for(Path::new("/d/photo.png")).as_deref(),
            Some("image")
        );
        assert_eq!(resolver.category_for(Path::new("/d/readme.txt")), None);
    }
}
