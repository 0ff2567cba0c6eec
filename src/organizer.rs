//! The organization engine: directory snapshot, collision-safe destination
//! resolution, and the preview/execute run loop.
//!
//! A run takes one snapshot of the target directory's regular files, assigns
//! every file to a category, and either reports the plan (preview) or moves
//! the files into category subdirectories (execute), accumulating a
//! [`Report`]. Errors never escape the run boundary: scan failures come back
//! as error Reports, and an individual move failure is recorded on the
//! Report while the run continues.
//!
//! A run is not safe against a concurrent writer in the same directory; the
//! caller contract is at most one run per target directory at a time.

use crate::classifier::{CategoryTable, split_name};
use crate::config::CompiledFilters;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while scanning or moving files.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target path does not exist.
    NotFound { path: PathBuf },
    /// The target path exists but is not a directory.
    NotADirectory { path: PathBuf },
    /// The target path could not be canonicalized.
    InvalidPath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The target directory could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category subdirectory could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file could not be moved to its destination.
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Folder not found: {}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Path is not a directory: {}", path.display())
            }
            Self::InvalidPath { path, source } => {
                write!(f, "Invalid path {}: {}", path.display(), source)
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            Self::FileMoveFailure { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// One entry of the directory snapshot: a regular file found at run start.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name of the file.
    pub name: String,
}

/// Whether a run reports the plan or performs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compute and report category assignments without touching the filesystem.
    Preview,
    /// Move files into their category subdirectories.
    Execute,
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// A single file whose move failed during an execute run.
#[derive(Debug, Clone, Serialize)]
pub struct MoveFailure {
    /// Base name of the file that could not be moved.
    pub file: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Ordered mapping from category name to the files assigned to it.
///
/// Bucket order follows the category table's declaration order with the
/// fallback sentinel last; serialization preserves that order. Empty buckets
/// are dropped before the Report is finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets(Vec<(String, Vec<String>)>);

impl Buckets {
    /// Creates buckets for the given names, in order, all empty.
    fn with_names(names: &[&str]) -> Self {
        Self(names.iter().map(|n| (n.to_string(), Vec::new())).collect())
    }

    /// Appends a file name to a category's bucket, creating the bucket at
    /// the end if the category was not pre-declared.
    fn push(&mut self, category: &str, file_name: String) {
        if let Some((_, files)) = self.0.iter_mut().find(|(name, _)| name == category) {
            files.push(file_name);
        } else {
            self.0.push((category.to_string(), vec![file_name]));
        }
    }

    /// Drops categories with no assigned files.
    fn without_empty(mut self) -> Self {
        self.0.retain(|(_, files)| !files.is_empty());
        self
    }

    /// Returns the files assigned to a category, if any.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, files)| files.as_slice())
    }

    /// Iterates over (category, files) pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Returns true if no category has any files.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of files across all buckets.
    pub fn total_files(&self) -> usize {
        self.0.iter().map(|(_, files)| files.len()).sum()
    }
}

impl Serialize for Buckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, files) in &self.0 {
            map.serialize_entry(name, files)?;
        }
        map.end()
    }
}

/// The artifact a run returns to its caller.
///
/// This is the sole channel for failure visibility: a run that cannot scan
/// its target comes back as a Report with `status = Error`, and per-file
/// move failures are listed in `errors` while the run continues.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Overall run outcome.
    pub status: RunStatus,
    /// Human-readable summary of the run.
    pub message: String,
    /// Canonical path of the organized directory; absent when the scan failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Category assignments performed by an execute run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized: Option<Buckets>,
    /// Category assignments computed by a preview run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Buckets>,
    /// Files whose moves failed during an execute run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<MoveFailure>>,
}

impl Report {
    fn from_error(error: OrganizeError) -> Self {
        Self {
            status: RunStatus::Error,
            message: error.to_string(),
            folder: None,
            organized: None,
            preview: None,
            errors: None,
        }
    }

    /// Returns true if the run completed with `status = Success`.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Returns the category buckets of the run, regardless of mode.
    pub fn buckets(&self) -> Option<&Buckets> {
        self.organized.as_ref().or(self.preview.as_ref())
    }
}

/// Organizes the files of a directory into category subdirectories.
///
/// The category table and filter rules are injected at construction; the
/// organizer itself holds no per-run state, so one instance can serve any
/// number of sequential runs.
///
/// # Examples
///
/// ```no_run
/// use filesift::organizer::{Mode, Organizer};
/// use std::path::Path;
///
/// let organizer = Organizer::with_defaults();
/// let report = organizer.run(Path::new("/path/to/downloads"), Mode::Preview);
/// println!("{}", report.message);
/// ```
pub struct Organizer {
    table: CategoryTable,
    filters: CompiledFilters,
}

impl Organizer {
    /// Creates an organizer with an explicit table and filter rules.
    pub fn new(table: CategoryTable, filters: CompiledFilters) -> Self {
        Self { table, filters }
    }

    /// Creates an organizer with the built-in table and default filters.
    pub fn with_defaults() -> Self {
        Self::new(CategoryTable::builtin(), CompiledFilters::default())
    }

    /// Runs one organization pass over `folder`.
    ///
    /// Equivalent to [`Organizer::run_with_observer`] with a no-op observer.
    pub fn run(&self, folder: &Path, mode: Mode) -> Report {
        self.run_with_observer(folder, mode, |_, _| {})
    }

    /// Runs one organization pass, invoking `observer(file_name, category)`
    /// after each processed file (for progress reporting).
    ///
    /// Scan failures (missing path, path is a file, unreadable directory)
    /// come back as error Reports with no filesystem mutation performed. An
    /// empty directory is a success with an empty mapping.
    pub fn run_with_observer<F>(&self, folder: &Path, mode: Mode, observer: F) -> Report
    where
        F: FnMut(&str, &str),
    {
        let (target, entries) = match self.scan(folder) {
            Ok(scanned) => scanned,
            Err(error) => return Report::from_error(error),
        };

        let folder_string = target.to_string_lossy().to_string();

        if entries.is_empty() {
            let empty = Buckets::default();
            let (organized, preview) = match mode {
                Mode::Execute => (Some(empty), None),
                Mode::Preview => (None, Some(empty)),
            };
            return Report {
                status: RunStatus::Success,
                message: "No files to organize".to_string(),
                folder: Some(folder_string),
                organized,
                preview,
                errors: None,
            };
        }

        match mode {
            Mode::Preview => self.preview(folder_string, &entries, observer),
            Mode::Execute => self.execute(&target, folder_string, &entries, observer),
        }
    }

    /// Takes the directory snapshot: canonicalize the path, validate it, and
    /// list its regular files (non-recursive), sorted by name.
    ///
    /// The snapshot is immutable for the rest of the run; files appearing
    /// concurrently are not observed.
    fn scan(&self, folder: &Path) -> OrganizeResult<(PathBuf, Vec<FileEntry>)> {
        let expanded = expand_path(folder);

        if !expanded.exists() {
            return Err(OrganizeError::NotFound {
                path: folder.to_path_buf(),
            });
        }

        let target = fs::canonicalize(&expanded).map_err(|e| OrganizeError::InvalidPath {
            path: folder.to_path_buf(),
            source: e,
        })?;

        if !target.is_dir() {
            return Err(OrganizeError::NotADirectory {
                path: folder.to_path_buf(),
            });
        }

        let dir = fs::read_dir(&target).map_err(|e| OrganizeError::ReadDirFailed {
            path: target.clone(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in dir.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
            {
                let path = entry.path();
                if self.filters.should_include(&path) {
                    entries.push(FileEntry {
                        name: entry.file_name().to_string_lossy().to_string(),
                        path,
                    });
                }
            }
        }

        // Listing order is platform-dependent; sort so re-runs over the same
        // snapshot produce identical Reports.
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok((target, entries))
    }

    /// Previewing: classify every entry into its bucket; no mutation.
    ///
    /// Destination names are not predicted, so a preview does not show the
    /// `_1` style renames an execute run may perform on collisions.
    fn preview<F>(&self, folder: String, entries: &[FileEntry], mut observer: F) -> Report
    where
        F: FnMut(&str, &str),
    {
        let names = self.table.bucket_names();
        let mut buckets = Buckets::with_names(&names);

        for entry in entries {
            let category = self.table.classify(&entry.name);
            buckets.push(category, entry.name.clone());
            observer(&entry.name, category);
        }

        Report {
            status: RunStatus::Success,
            message: format!("Preview: {} files would be organized", entries.len()),
            folder: Some(folder),
            organized: None,
            preview: Some(buckets.without_empty()),
            errors: None,
        }
    }

    /// Executing: classify, create the category directory on first use,
    /// resolve a collision-free destination, and move. A failed move is
    /// recorded and skipped; the remaining files are still processed.
    fn execute<F>(
        &self,
        target: &Path,
        folder: String,
        entries: &[FileEntry],
        mut observer: F,
    ) -> Report
    where
        F: FnMut(&str, &str),
    {
        let names = self.table.bucket_names();
        let mut buckets = Buckets::with_names(&names);
        let mut failures: Vec<MoveFailure> = Vec::new();

        for entry in entries {
            let category = self.table.classify(&entry.name);
            match move_into_category(target, entry, category) {
                // The bucket records the original base name, not the
                // possibly-renamed destination.
                Ok(_destination) => buckets.push(category, entry.name.clone()),
                Err(error) => failures.push(MoveFailure {
                    file: entry.name.clone(),
                    reason: error.to_string(),
                }),
            }
            observer(&entry.name, category);
        }

        let message = if failures.is_empty() {
            format!("Organized {} files", entries.len())
        } else {
            format!(
                "Organized {} files, {} failed",
                entries.len() - failures.len(),
                failures.len()
            )
        };

        Report {
            status: RunStatus::Success,
            message,
            folder: Some(folder),
            organized: Some(buckets.without_empty()),
            preview: None,
            errors: if failures.is_empty() {
                None
            } else {
                Some(failures)
            },
        }
    }
}

/// Moves one file into its category subdirectory under `target`, creating
/// the subdirectory if needed and resolving destination-name collisions.
fn move_into_category(target: &Path, entry: &FileEntry, category: &str) -> OrganizeResult<PathBuf> {
    let category_dir = target.join(category);

    if !category_dir.exists() {
        fs::create_dir(&category_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: category_dir.clone(),
            source: e,
        })?;
    }

    let destination = resolve_destination(&category_dir, &entry.name);

    fs::rename(&entry.path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
        from: entry.path.clone(),
        to: destination.clone(),
        source: e,
    })?;

    Ok(destination)
}

/// Picks an unused destination path for `base_name` inside `category_dir`.
///
/// The natural name is tried first; while the candidate exists, counter
/// suffixes are probed in order (`stem_1.ext`, `stem_2.ext`, ...), checking
/// existence on every attempt. Iterative on purpose: a directory with
/// thousands of same-stem files must not grow the stack.
///
/// Not atomic against concurrent writers: a second process can claim the
/// candidate between the existence check and the caller's move.
pub fn resolve_destination(category_dir: &Path, base_name: &str) -> PathBuf {
    let candidate = category_dir.join(base_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = split_name(base_name);
    let mut counter: u64 = 1;
    loop {
        let probe = category_dir.join(format!("{stem}_{counter}{ext}"));
        if !probe.exists() {
            return probe;
        }
        counter += 1;
    }
}

/// Expands a leading `~` or `~/` to the caller's home directory.
///
/// Paths without a tilde (or when `HOME` is unset) pass through unchanged.
pub fn expand_path(input: &Path) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_path_with_home(input, home.as_deref())
}

/// Expansion against an explicit home directory, so callers (and tests) can
/// supply one without touching process environment.
fn expand_path_with_home(input: &Path, home: Option<&Path>) -> PathBuf {
    if let Some(text) = input.to_str()
        && let Some(home) = home
    {
        if text == "~" {
            return home.to_path_buf();
        }
        if let Some(rest) = text.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    input.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"content").expect("Failed to write test file");
        path
    }

    #[test]
    fn test_resolve_destination_free_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = resolve_destination(temp_dir.path(), "report.pdf");
        assert_eq!(dest, temp_dir.path().join("report.pdf"));
    }

    #[test]
    fn test_resolve_destination_single_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "report.pdf");

        let dest = resolve_destination(temp_dir.path(), "report.pdf");
        assert_eq!(dest, temp_dir.path().join("report_1.pdf"));
    }

    #[test]
    fn test_resolve_destination_probes_until_free() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "report.pdf");
        touch(temp_dir.path(), "report_1.pdf");
        touch(temp_dir.path(), "report_2.pdf");

        let dest = resolve_destination(temp_dir.path(), "report.pdf");
        assert_eq!(dest, temp_dir.path().join("report_3.pdf"));
    }

    #[test]
    fn test_resolve_destination_no_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "README");

        let dest = resolve_destination(temp_dir.path(), "README");
        assert_eq!(dest, temp_dir.path().join("README_1"));
    }

    #[test]
    fn test_run_missing_path_returns_error_report() {
        let organizer = Organizer::with_defaults();
        let report = organizer.run(Path::new("/no/such/path"), Mode::Execute);

        assert!(!report.is_success());
        assert!(report.message.contains("Folder not found"));
        assert!(report.folder.is_none());
        assert!(report.organized.is_none());
    }

    #[test]
    fn test_run_on_file_returns_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = touch(temp_dir.path(), "plain.txt");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(&file, Mode::Execute);

        assert!(!report.is_success());
        assert!(report.message.contains("not a directory"));
    }

    #[test]
    fn test_run_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Execute);

        assert!(report.is_success());
        assert_eq!(report.message, "No files to organize");
        assert!(report.organized.as_ref().unwrap().is_empty());
        assert!(report.folder.is_some());
    }

    #[test]
    fn test_execute_moves_and_reports_original_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "photo.jpg");
        touch(temp_dir.path(), "report.pdf");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Execute);

        assert!(report.is_success());
        assert_eq!(report.message, "Organized 2 files");

        let buckets = report.organized.as_ref().unwrap();
        assert_eq!(buckets.get("Images").unwrap(), ["photo.jpg"]);
        assert_eq!(buckets.get("Documents").unwrap(), ["report.pdf"]);

        assert!(temp_dir.path().join("Images").join("photo.jpg").exists());
        assert!(temp_dir.path().join("Documents").join("report.pdf").exists());
        assert!(!temp_dir.path().join("photo.jpg").exists());
    }

    #[test]
    fn test_execute_does_not_overwrite_existing_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let documents = temp_dir.path().join("Documents");
        fs::create_dir(&documents).expect("Failed to create category directory");
        fs::write(documents.join("report.pdf"), b"original").expect("Failed to seed destination");
        touch(temp_dir.path(), "report.pdf");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Execute);

        assert!(report.is_success());
        assert_eq!(
            fs::read(documents.join("report.pdf")).unwrap(),
            b"original",
            "pre-existing destination must not be overwritten"
        );
        assert!(documents.join("report_1.pdf").exists());
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "photo.jpg");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Preview);

        assert!(report.is_success());
        assert!(report.preview.is_some());
        assert!(report.organized.is_none());
        assert!(temp_dir.path().join("photo.jpg").exists());
        assert!(!temp_dir.path().join("Images").exists());
    }

    #[test]
    fn test_snapshot_excludes_subdirectories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("nested")).expect("Failed to create subdirectory");
        touch(&temp_dir.path().join("nested"), "inner.txt");
        touch(temp_dir.path(), "outer.txt");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Preview);

        let buckets = report.preview.as_ref().unwrap();
        assert_eq!(buckets.total_files(), 1);
        assert_eq!(buckets.get("Documents").unwrap(), ["outer.txt"]);
    }

    #[test]
    fn test_buckets_serialize_in_table_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "photo.png");
        touch(temp_dir.path(), "blob.xyz");

        let organizer = Organizer::with_defaults();
        let report = organizer.run(temp_dir.path(), Mode::Preview);
        let json = serde_json::to_string(&report).expect("Report serializes");

        let images = json.find("\"Images\"").unwrap();
        let documents = json.find("\"Documents\"").unwrap();
        let others = json.find("\"Others\"").unwrap();
        assert!(images < documents && documents < others);
        assert!(json.contains("\"preview\""));
        assert!(!json.contains("\"organized\""));
    }

    #[test]
    fn test_expand_path_tilde() {
        let home = Path::new("/home/someone");

        assert_eq!(
            expand_path_with_home(Path::new("~"), Some(home)),
            PathBuf::from("/home/someone")
        );
        assert_eq!(
            expand_path_with_home(Path::new("~/downloads"), Some(home)),
            PathBuf::from("/home/someone/downloads")
        );
        assert_eq!(
            expand_path_with_home(Path::new("/absolute"), Some(home)),
            PathBuf::from("/absolute")
        );
        // No home available: the path passes through unchanged.
        assert_eq!(
            expand_path_with_home(Path::new("~/downloads"), None),
            PathBuf::from("~/downloads")
        );
    }
}
