//! Extension-based file classification.
//!
//! This module maps file names to category labels using an ordered table of
//! extension sets. The table is an explicit value handed to the organizer,
//! so tests and configuration files can supply their own tables instead of
//! relying on a hidden global.
//!
//! # Examples
//!
//! ```
//! use filesift::classifier::CategoryTable;
//!
//! let table = CategoryTable::builtin();
//! assert_eq!(table.classify("photo.jpg"), "Images");
//! assert_eq!(table.classify("PHOTO.JPG"), "Images");
//! assert_eq!(table.classify("data.xyz"), "Others");
//! ```

/// Name of the sentinel category that collects files no table entry matches.
///
/// The sentinel is always part of a table's iteration and can never be
/// skipped; `CategoryTable::classify` falls back to it when every declared
/// category has been scanned without a match.
pub const FALLBACK_CATEGORY: &str = "Others";

/// A named bucket of file extensions.
///
/// Extensions are stored lowercase with their leading dot (`".jpg"`), in the
/// order they were declared. The set is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalizing every extension to lowercase with a
    /// leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use filesift::classifier::Category;
    ///
    /// let cat = Category::new("Images", &["JPG", ".png"]);
    /// assert!(cat.matches(".jpg"));
    /// assert!(cat.matches(".png"));
    /// ```
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
        }
    }

    /// Returns the category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this category contains the given extension.
    ///
    /// The extension is expected in normalized form (lowercase, leading dot),
    /// which is what [`split_name`] produces.
    pub fn matches(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Normalizes an extension to lowercase with exactly one leading dot.
fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

/// An ordered, immutable table of categories.
///
/// Iteration order is significant: `classify` returns the *first* category
/// whose extension set contains the file's extension, so a table that
/// declares overlapping extension sets resolves the overlap by declaration
/// order.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Creates a table from an ordered list of categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Returns the built-in reference table.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new(
                "Images",
                &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico"],
            ),
            Category::new(
                "Documents",
                &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".tex"],
            ),
            Category::new(
                "Data",
                &[".csv", ".xls", ".xlsx", ".json", ".xml", ".yaml", ".yml", ".db", ".sql"],
            ),
            Category::new(
                "Videos",
                &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"],
            ),
            Category::new(
                "Audio",
                &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a"],
            ),
            Category::new("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"]),
            Category::new(
                "Code",
                &[
                    ".py", ".js", ".html", ".css", ".java", ".cpp", ".c", ".h", ".php", ".rb",
                    ".go", ".rs", ".swift",
                ],
            ),
            Category::new(
                "Executables",
                &[".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm"],
            ),
        ])
    }

    /// Classifies a file base name into a category name.
    ///
    /// The extension is extracted with [`split_name`], the declared
    /// categories are scanned in order, and the first one containing the
    /// extension wins. Files matching no category (including files without
    /// an extension) land in [`FALLBACK_CATEGORY`]. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use filesift::classifier::CategoryTable;
    ///
    /// let table = CategoryTable::builtin();
    /// assert_eq!(table.classify("report.pdf"), "Documents");
    /// assert_eq!(table.classify("README"), "Others");
    /// assert_eq!(table.classify(".bashrc"), "Others");
    /// ```
    pub fn classify(&self, file_name: &str) -> &str {
        let (_, ext) = split_name(file_name);
        for category in &self.categories {
            if category.matches(&ext) {
                return category.name();
            }
        }
        FALLBACK_CATEGORY
    }

    /// Returns the bucket names in report order: declared categories first,
    /// then the fallback sentinel (unless a declared category already carries
    /// that name).
    pub fn bucket_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.iter().map(|c| c.name()).collect();
        if !names.contains(&FALLBACK_CATEGORY) {
            names.push(FALLBACK_CATEGORY);
        }
        names
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Splits a file base name into (stem, extension).
///
/// The extension is the text after the last `.`, lowercased, with the dot
/// kept; it is empty when the name has no dot, starts with its only dot
/// (`.bashrc`), or ends with a dot. The stem is everything before it,
/// original casing preserved.
///
/// # Examples
///
/// ```
/// use filesift::classifier::split_name;
///
/// assert_eq!(split_name("report.PDF"), ("report", ".pdf".to_string()));
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz".to_string()));
/// assert_eq!(split_name("README"), ("README", String::new()));
/// assert_eq!(split_name(".bashrc"), (".bashrc", String::new()));
/// ```
pub fn split_name(name: &str) -> (&str, String) {
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => (&name[..i], name[i..].to_lowercase()),
        _ => (name, String::new()),
    }
}
