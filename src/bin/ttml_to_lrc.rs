//! Converts every `.ttml` file in the current directory into a sibling
//! `.lrc` file. Inputs convert independently: one bad document does not stop
//! the rest.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use lyric_sidecars::ttml;

fn main() -> Result<()> {
    let inputs = ttml_files_in_cwd()?;
    if inputs.is_empty() {
        println!("No .ttml files found in current directory.");
        return Ok(());
    }

    let mut failures = 0usize;
    for input in &inputs {
        if let Err(e) = convert_file(input) {
            eprintln!("Failed converting {}: {e:#}", input.display());
            failures += 1;
        }
    }
    if failures > 0 {
        eprintln!("{failures} of {} file(s) failed to convert", inputs.len());
    }
    Ok(())
}

fn ttml_files_in_cwd() -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(".").context("failed listing current directory")? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("ttml"))
            .unwrap_or(false);
        if ext_ok {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn convert_file(input: &Path) -> Result<()> {
    let xml = fs::read_to_string(input)
        .with_context(|| format!("failed reading {}", input.display()))?;
    let lines = ttml::convert_document(&xml)?;
    let output = input.with_extension("lrc");
    ttml::write_lrc(&output, &lines)?;
    println!("Converted: {} -> {}", input.display(), output.display());
    Ok(())
}
