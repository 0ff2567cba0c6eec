//! Command-line orchestration for filesift.
//!
//! This module wires the pieces together for the binary: it loads and
//! compiles the configuration, builds an [`Organizer`], runs it in the
//! requested mode, and renders the resulting [`Report`] as styled text or
//! JSON. The engine itself never prints; everything user-visible goes
//! through [`OutputFormatter`].

use crate::config::OrganizerConfig;
use crate::organizer::{Mode, Organizer, Report};
use crate::output::OutputFormatter;
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, report the plan without making changes.
        dry_run: bool,
    },
}

/// Runs the CLI with default configuration and styled output.
///
/// # Examples
///
/// ```no_run
/// use filesift::cli::{OrganizeCommand, run_cli};
/// use std::path::Path;
///
/// let result = run_cli(
///     OrganizeCommand::Organize { dry_run: true },
///     Path::new("/path/to/downloads"),
/// );
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_config(command, dir_path, None, false)
}

/// Runs the CLI with an optional configuration file and output format.
///
/// Configuration errors come back as `Err`; everything that happens during
/// the run itself (missing directory, failed moves) is part of the rendered
/// Report, per the engine's error contract.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let OrganizeCommand::Organize { dry_run } = command;
    let mode = if dry_run { Mode::Preview } else { Mode::Execute };

    let report = organize_with_config(dir_path, mode, config_path)?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            dir_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", dir_path.display()));
    }

    OutputFormatter::report(&report);

    if dry_run && report.is_success() {
        OutputFormatter::plain(&format!(
            "Run 'filesift {}' (without --dry-run) to execute the organization.",
            dir_path.display()
        ));
    }

    Ok(())
}

/// Loads and compiles configuration, then runs one organization pass.
///
/// This is the library-level entry the binary and the integration tests
/// share. Execute runs drive a progress spinner through the engine's
/// per-file observer.
pub fn organize_with_config(
    dir_path: &Path,
    mode: Mode,
    config_path: Option<&Path>,
) -> Result<Report, String> {
    let config = OrganizerConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let (table, filters) = config
        .compile()
        .map_err(|e| format!("Error compiling configuration: {}", e))?;

    let organizer = Organizer::new(table, filters);

    let report = match mode {
        Mode::Preview => organizer.run(dir_path, mode),
        Mode::Execute => {
            let progress = OutputFormatter::progress_spinner();
            let report = organizer.run_with_observer(dir_path, mode, |file_name, category| {
                progress.set_message(format!("{} -> {}/", file_name, category));
                progress.inc(1);
            });
            progress.finish_and_clear();
            report
        }
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_organize_with_config_preview() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("photo.jpg"), b"x").expect("Failed to write test file");

        let report = organize_with_config(temp_dir.path(), Mode::Preview, None)
            .expect("Preview run succeeds");

        assert!(report.is_success());
        assert_eq!(
            report.preview.as_ref().unwrap().get("Images").unwrap(),
            ["photo.jpg"]
        );
        assert!(temp_dir.path().join("photo.jpg").exists());
    }

    #[test]
    fn test_organize_with_missing_config_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = organize_with_config(
            temp_dir.path(),
            Mode::Preview,
            Some(Path::new("/no/such/config.toml")),
        );

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("configuration"));
    }

    #[test]
    fn test_run_cli_missing_directory_is_reported_not_err() {
        // Scan failures travel inside the Report, not the Result.
        let result = run_cli(
            OrganizeCommand::Organize { dry_run: true },
            Path::new("/no/such/path"),
        );
        assert!(result.is_ok());
    }
}
