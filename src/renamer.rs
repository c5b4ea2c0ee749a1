use std::collections::HashMap;
use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::Table;
use log::{error, info, warn};
use walkdir::WalkDir;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct RenameRecord {
    pub old_name: String,
    pub new_name: String,
    pub size: u64,
}

#[derive(Debug, Default)]
pub struct RenameReport {
    pub candidates: usize,
    pub renames: Vec<RenameRecord>,
    pub failures: usize,
}

/// Rename every candidate file in `target_dir` whose name contains a registry
/// identifier, injecting the client name in front of it. Files already carrying
/// the composed `<name>_<id>` token are left alone, so a second pass renames
/// nothing.
pub fn rename_matching_files(
    registry: &HashMap<String, String>,
    target_dir: &Path,
    match_ext: &str,
) -> Result<RenameReport, AppError> {
    let wanted_ext = match_ext.trim_start_matches('.');

    // Snapshot the listing first so renames cannot feed back into the walk
    let mut entries = Vec::new();
    for entry in WalkDir::new(target_dir).max_depth(1) {
        let entry = entry.map_err(|source| AppError::ListDir {
            dir: target_dir.to_path_buf(),
            source,
        })?;
        entries.push(entry);
    }

    let mut report = RenameReport::default();
    for entry in entries {
        // depth 0 is the target directory itself
        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }
        if !entry.path().extension().is_some_and(|ext| ext == wanted_ext) {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            warn!(
                "Skipping {}: file name is not valid UTF-8",
                entry.path().display()
            );
            continue;
        };

        report.candidates += 1;
        info!("File: {file_name}");
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        let mut current = file_name.to_string();
        for (id, name) in registry {
            if id.is_empty() {
                continue;
            }
            let token = format!("{name}_{id}");
            if !current.contains(id.as_str()) || current.contains(&token) {
                continue;
            }
            let new_name = current.replace(id.as_str(), &token);
            match fs::rename(target_dir.join(&current), target_dir.join(&new_name)) {
                Ok(()) => {
                    info!(
                        "File '{current}' renamed to '{new_name}' in folder {}",
                        target_dir.display()
                    );
                    report.renames.push(RenameRecord {
                        old_name: current,
                        new_name: new_name.clone(),
                        size,
                    });
                    current = new_name;
                }
                Err(e) => {
                    error!("Renaming '{current}' to '{new_name}' failed: {e}");
                    report.failures += 1;
                }
            }
        }
    }

    Ok(report)
}

pub fn print_summary(report: &RenameReport) {
    if report.renames.is_empty() {
        println!(
            "No files renamed ({} candidates inspected).",
            report.candidates
        );
    } else {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
        table.set_header(vec!["Original", "Renamed To", "Size"]);
        for record in &report.renames {
            table.add_row(vec![
                record.old_name.clone(),
                record.new_name.clone(),
                human_bytes::human_bytes(record.size as f64),
            ]);
        }
        println!("\n{table}");
        println!(
            "{} candidates inspected, {} renamed.",
            report.candidates,
            report.renames.len().to_string().green()
        );
    }

    if report.failures > 0 {
        println!(
            "{} rename operations failed, see the log file.",
            report.failures.to_string().yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_registry(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"export data").unwrap();
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rename_prefixes_client_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "123.txt");

        let registry = make_registry(&[("123", "Acme")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["Acme_123.txt"]);
        assert_eq!(report.candidates, 1);
        assert_eq!(report.renames.len(), 1);
        assert_eq!(report.renames[0].old_name, "123.txt");
        assert_eq!(report.renames[0].new_name, "Acme_123.txt");
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn test_second_pass_renames_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "123.txt");

        let registry = make_registry(&[("123", "Acme")]);
        rename_matching_files(&registry, dir.path(), ".txt").unwrap();
        let second = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["Acme_123.txt"]);
        assert_eq!(second.candidates, 1);
        assert!(second.renames.is_empty());
    }

    #[test]
    fn test_extension_filter_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "123.csv");
        touch(dir.path(), "123.TXT");

        let registry = make_registry(&[("123", "Acme")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["123.TXT", "123.csv"]);
        assert_eq!(report.candidates, 0);
        assert!(report.renames.is_empty());
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("123.txt")).unwrap();

        let registry = make_registry(&[("123", "Acme")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["123.txt"]);
        assert_eq!(report.candidates, 0);
        assert!(report.renames.is_empty());
    }

    #[test]
    fn test_non_matching_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "999.txt");

        let registry = make_registry(&[("123", "Acme")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["999.txt"]);
        assert_eq!(report.candidates, 1);
        assert!(report.renames.is_empty());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = PathBuf::from(dir.path()).join("no_such_dir");

        let registry = make_registry(&[("123", "Acme")]);
        let err = rename_matching_files(&registry, &missing, ".txt").unwrap_err();
        assert!(matches!(err, AppError::ListDir { .. }), "got {err:?}");
    }

    #[test]
    fn test_multiple_matches_apply_sequentially() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "12.txt");

        // Both map orders converge on the same final name
        let registry = make_registry(&[("1", "A"), ("2", "B")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["A_1B_2.txt"]);
        assert_eq!(report.renames.len(), 2);
        assert_eq!(report.renames[1].new_name, "A_1B_2.txt");
    }

    #[test]
    fn test_replaces_every_occurrence_of_the_identifier() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "123_backup_123.txt");

        let registry = make_registry(&[("123", "Acme")]);
        let report = rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["Acme_123_backup_Acme_123.txt"]);
        assert_eq!(report.renames.len(), 1);
    }

    #[test]
    fn test_empty_identifier_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "123.txt");

        let registry = make_registry(&[("", "Ghost"), ("123", "Acme")]);
        rename_matching_files(&registry, dir.path(), ".txt").unwrap();

        assert_eq!(listing(dir.path()), vec!["Acme_123.txt"]);
    }
}
