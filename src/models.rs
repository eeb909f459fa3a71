//! Core data models for sidecar migration and TTML conversion.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Migration Models
// ============================================================================

/// Outcome of an ambiguous-match decision.
///
/// The migrator core never reads the console; whoever drives it supplies a
/// decider returning one of these. `Select` carries a zero-based index into
/// the candidate list; an out-of-range selection leaves the folder untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchDecision {
    Select(usize),
    Skip,
    Abort,
}

/// Counters accumulated across a migration run. Every processed folder lands
/// in exactly one of the outcome buckets.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrationStats {
    pub folders_processed: usize,
    pub files_moved: usize,
    pub folders_deleted: usize,
    pub manual_intervention: usize,
    pub no_match_found: usize,
}

impl MigrationStats {
    /// Write the counters to a JSON file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Everything a caller needs for end-of-run reporting: the counters plus the
/// folders for which no identifier-suffixed destination was found.
#[derive(Clone, Debug, Default)]
pub struct MigrationReport {
    pub stats: MigrationStats,
    pub unmatched: Vec<PathBuf>,
}

// ============================================================================
// Conversion Models
// ============================================================================

/// One timed line extracted from a TTML document.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    pub seconds: f64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stats_json_export() {
        let stats = MigrationStats {
            folders_processed: 3,
            files_moved: 2,
            folders_deleted: 1,
            manual_intervention: 1,
            no_match_found: 1,
        };
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("stats.json");
        stats.write_to_file(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["folders_processed"], 3);
        assert_eq!(value["files_moved"], 2);
        assert_eq!(value["folders_deleted"], 1);
        assert_eq!(value["no_match_found"], 1);
    }
}
