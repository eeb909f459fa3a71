//! Old-to-new folder reconciliation for lyric sidecar files.
//!
//! Old layout: `Artist/Album/...`; new layout: `Artist/Album [identifier]/...`
//! where the identifier is an 8-character token in square brackets. The scan
//! phase classifies and collects candidate folders without touching the tree;
//! the apply phase matches each one against its renamed siblings, moves the
//! sidecar files over and deletes old folders once they are empty.

use crate::models::{MatchDecision, MigrationReport, MigrationStats};
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::progress::create_spinner;

/// Bracketed 8-character identifier token, e.g. `[a1b2c3d4]`. Any 8
/// characters qualify; the token content is never validated.
static IDENTIFIER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.{8}\]").unwrap());

/// Sidecar extensions handled by the migrator.
const SIDECAR_EXTENSIONS: &[&str] = &["lrc", "txt"];

/// A folder is old-style when its base name carries no bracketed
/// 8-character identifier. Brackets of any other length do not count.
pub fn is_old_style(name: &str) -> bool {
    !IDENTIFIER_TOKEN.is_match(name)
}

fn is_sidecar(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SIDECAR_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> Cow<'_, str> {
    path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
}

// ============================================================================
// Scan Phase (read-only)
// ============================================================================

struct DirSummary {
    child_count: usize,
    sidecar_count: usize,
}

fn summarize_dir(dir: &Path) -> std::io::Result<DirSummary> {
    let mut summary = DirSummary {
        child_count: 0,
        sidecar_count: 0,
    };
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        summary.child_count += 1;
        if entry.file_type()?.is_file() && is_sidecar(&entry.file_name().to_string_lossy()) {
            summary.sidecar_count += 1;
        }
    }
    Ok(summary)
}

/// Walks the tree and collects old-style folders worth processing: those
/// holding at least one sidecar file, and those with no children at all
/// (sidecars already relocated elsewhere, only the empty shell left).
///
/// Read-only with respect to the tree; unreadable directories are skipped.
pub fn scan_old_folders(root: &Path) -> Vec<PathBuf> {
    let mut selected = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        if !is_old_style(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let summary = match summarize_dir(entry.path()) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if summary.sidecar_count > 0 || summary.child_count == 0 {
            selected.push(entry.path().to_path_buf());
        }
    }
    selected
}

/// Lists the sidecar files directly inside a folder. Discovery is not
/// recursive; only direct children count.
pub fn find_sidecar_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed listing {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_sidecar(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Sibling directories named `<old-name> [<8 characters>]`, the old name
/// compared case-insensitively as a literal. Computed fresh per folder; the
/// result feeds a one-shot decision and is never cached.
pub fn find_renamed_siblings(old_folder: &Path) -> Vec<PathBuf> {
    let parent = match old_folder.parent() {
        Some(p) => p,
        None => return Vec::new(),
    };
    let name = match old_folder.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => return Vec::new(),
    };
    let pattern = match Regex::new(&format!(r"(?i)^{} \[.{{8}}\]$", regex::escape(&name))) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut matches = Vec::new();
    if let Ok(entries) = fs::read_dir(parent) {
        for entry in entries.filter_map(|e| e.ok()) {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir && pattern.is_match(&entry.file_name().to_string_lossy()) {
                matches.push(entry.path());
            }
        }
    }
    matches.sort();
    matches
}

/// A folder is empty iff it has neither files nor subdirectories. Listing
/// errors count as not-empty so deletion is never attempted blind.
pub fn is_folder_empty(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

// ============================================================================
// Apply Phase (mutating)
// ============================================================================

fn move_file(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) => {
            // Cross-device fallback: copy, then remove the original.
            fs::copy(src, dst).with_context(|| {
                format!(
                    "copy {} -> {} after rename error: {e}",
                    src.display(),
                    dst.display()
                )
            })?;
            fs::remove_file(src)
                .with_context(|| format!("remove {} after copy", src.display()))?;
            Ok(())
        }
    }
}

/// Moves every sidecar file from `source` into `destination`. A name that
/// already exists at the destination is skipped with a warning, never
/// overwritten. Returns the number of files moved; per-file errors are
/// surfaced and do not stop the remaining moves.
pub fn move_sidecar_files(source: &Path, destination: &Path) -> usize {
    let files = match find_sidecar_files(source) {
        Ok(f) => f,
        Err(e) => {
            println!("  Error listing {}: {e:#}", source.display());
            return 0;
        }
    };

    let mut moved = 0;
    for file in files {
        let file_name = match file.file_name() {
            Some(n) => n.to_owned(),
            None => continue,
        };
        let dest = destination.join(&file_name);
        if dest.exists() {
            println!(
                "  Warning: {} already exists in destination, skipping",
                file_name.to_string_lossy()
            );
            continue;
        }
        match move_file(&file, &dest) {
            Ok(()) => {
                println!("  Moved: {}", file_name.to_string_lossy());
                moved += 1;
            }
            Err(e) => println!("  Error moving {}: {e:#}", file_name.to_string_lossy()),
        }
    }
    moved
}

fn delete_if_empty(folder: &Path, dry_run: bool, stats: &mut MigrationStats) {
    if !is_folder_empty(folder) {
        return;
    }
    if dry_run {
        println!("  [DRY RUN] Would delete empty folder");
        return;
    }
    match fs::remove_dir(folder) {
        Ok(()) => {
            println!("  Deleted empty folder: {}", display_name(folder));
            stats.folders_deleted += 1;
        }
        Err(e) => println!("  Error deleting folder: {e}"),
    }
}

/// Runs the migration over the tree rooted at `root`.
///
/// `decider` resolves the ambiguous case (two or more candidate
/// destinations); it is consulted only outside dry-run mode, once per
/// ambiguous folder. An `Abort` decision ends the run immediately with the
/// statistics accumulated so far; the aborted folder itself is not counted.
///
/// Per-folder and per-file filesystem errors degrade to a skip with a
/// message; only a missing or non-directory root is fatal.
pub fn migrate(
    root: &Path,
    dry_run: bool,
    decider: &mut dyn FnMut(&Path, &[PathBuf]) -> MatchDecision,
) -> Result<MigrationReport> {
    if !root.exists() {
        bail!("directory '{}' does not exist", root.display());
    }
    if !root.is_dir() {
        bail!("'{}' is not a directory", root.display());
    }

    let spinner = create_spinner("Scanning for old folders");
    let folders = scan_old_folders(root);
    spinner.finish_with_message(format!("Found {} old folder(s) to process", folders.len()));
    println!();

    let mut stats = MigrationStats::default();
    let mut unmatched: Vec<PathBuf> = Vec::new();

    for old_folder in &folders {
        println!("Processing: {}", old_folder.display());
        let sidecars = find_sidecar_files(old_folder).unwrap_or_default();
        println!("  Found {} lyric file(s)", sidecars.len());

        // Already emptied by some earlier pass: nothing to move, but only
        // delete once a renamed destination confirms the migration happened.
        if is_folder_empty(old_folder) {
            let candidates = find_renamed_siblings(old_folder);
            if candidates.is_empty() {
                println!("  Folder is empty but no matching folder with identifier found");
                stats.no_match_found += 1;
                unmatched.push(old_folder.clone());
            } else {
                println!("  Folder is empty (files already moved)");
                delete_if_empty(old_folder, dry_run, &mut stats);
            }
            stats.folders_processed += 1;
            println!();
            continue;
        }

        let candidates = find_renamed_siblings(old_folder);
        match candidates.len() {
            0 => {
                println!("  No matching folder with identifier found");
                stats.no_match_found += 1;
                unmatched.push(old_folder.clone());
            }
            1 => {
                println!("  Found one match: {}", display_name(&candidates[0]));
                if dry_run {
                    println!(
                        "  [DRY RUN] Would move {} file(s) to {}",
                        sidecars.len(),
                        candidates[0].display()
                    );
                } else {
                    stats.files_moved += move_sidecar_files(old_folder, &candidates[0]);
                    delete_if_empty(old_folder, dry_run, &mut stats);
                }
            }
            n => {
                println!("  Multiple matches found ({n}):");
                for (i, candidate) in candidates.iter().enumerate() {
                    println!("    {}. {}", i + 1, display_name(candidate));
                }
                if dry_run {
                    stats.manual_intervention += 1;
                } else {
                    match decider(old_folder, &candidates) {
                        MatchDecision::Abort => {
                            println!("\nQuitting...");
                            return Ok(MigrationReport { stats, unmatched });
                        }
                        MatchDecision::Skip => {
                            stats.manual_intervention += 1;
                        }
                        MatchDecision::Select(index) => {
                            match candidates.get(index) {
                                Some(selected) => {
                                    println!("  Selected: {}", display_name(selected));
                                    stats.files_moved +=
                                        move_sidecar_files(old_folder, selected);
                                    delete_if_empty(old_folder, dry_run, &mut stats);
                                }
                                None => println!("  Selection out of range, skipping"),
                            }
                            stats.manual_intervention += 1;
                        }
                    }
                }
            }
        }
        stats.folders_processed += 1;
        println!();
    }

    Ok(MigrationReport { stats, unmatched })
}

// ============================================================================
// TESTS
// ============================================================================
