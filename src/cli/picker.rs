//! Interactive CSV picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `sportviz --pick` and choose a CSV" UX
//!
//! `discover_csv_files` is shared with the TUI's file-open overlay.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth when searching for CSV files.
const SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a CSV file from the working directory tree.
///
/// Accepts either a number from the discovered list or an explicit path;
/// `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::config(
            "No .csv files found. Provide one with `-f <file.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    loop {
        print!(
            "Select a file by number (1-{}) or type a path (q to quit): ",
            files.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::config(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::config(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::config(
                "No input received. Provide a CSV path with `-f <file.csv>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::config("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            match files.get(choice.wrapping_sub(1)) {
                Some(path) => return validate_csv_path(path),
                None => {
                    println!(
                        "Invalid choice: {choice}. Enter a number between 1 and {}.",
                        files.len()
                    );
                    continue;
                }
            }
        }

        match validate_csv_path(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Validate that the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::config(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::config(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::config(format!(
            "Expected a .csv file (got: {}). Use -f to pass a CSV path.",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under `root` (bounded depth, deterministic order).
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if depth < SEARCH_DEPTH && !should_skip_dir(&path) {
                    pending.push((path, depth + 1));
                }
            } else if file_type.is_file() && has_csv_extension(&path) {
                out.push(path);
            }
        }
    }

    out.sort_by_key(|p| pretty_path(p));
    out
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        == Some(true)
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

pub(crate) fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("sportviz-picker-tests")
            .join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovery_finds_nested_csv_and_skips_target_dir() {
        let root = scratch_dir("discover");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("a.csv"), "x").unwrap();
        fs::write(root.join("sub/b.CSV"), "x").unwrap();
        fs::write(root.join("target/ignored.csv"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let found = discover_csv_files(&root);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.CSV"]);
    }

    #[test]
    fn validation_rejects_missing_directories_and_wrong_extensions() {
        let root = scratch_dir("validate");
        fs::write(root.join("data.csv"), "x").unwrap();
        fs::write(root.join("data.json"), "x").unwrap();

        assert!(validate_csv_path(&root.join("data.csv")).is_ok());
        assert!(validate_csv_path(&root.join("missing.csv")).is_err());
        assert!(validate_csv_path(&root).is_err());
        assert!(validate_csv_path(&root.join("data.json")).is_err());
    }
}
