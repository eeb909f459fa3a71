use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use lyric_sidecars::migrate::migrate;
use lyric_sidecars::models::MatchDecision;

#[derive(Parser)]
#[command(name = "migrate-lyrics")]
#[command(about = "Move .lrc and .txt sidecar files from old music folders into their identifier-suffixed replacements")]
struct Args {
    /// Root directory of the music library
    music_dir: PathBuf,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Write run statistics to a JSON file
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("{:=<70}", "");
    println!("Lyric Sidecar Migration");
    println!("{:=<70}", "");
    if args.dry_run {
        println!("DRY RUN MODE - no changes will be made");
        println!("{:=<70}", "");
    }
    println!();

    let start = Instant::now();
    let report = migrate(&args.music_dir, args.dry_run, &mut prompt_for_choice)?;

    println!("{:=<70}", "");
    println!("Summary:");
    println!("  Folders processed: {}", report.stats.folders_processed);
    println!("  Files moved: {}", report.stats.files_moved);
    println!("  Folders deleted: {}", report.stats.folders_deleted);
    println!(
        "  Manual intervention needed: {}",
        report.stats.manual_intervention
    );
    println!("  No match found: {}", report.stats.no_match_found);
    println!("  Elapsed: {:.2}s", start.elapsed().as_secs_f64());
    println!("{:=<70}", "");

    if !report.unmatched.is_empty() {
        println!();
        println!("Folders with no matching identifier found:");
        println!("{:-<70}", "");
        for folder in &report.unmatched {
            println!("  {}", folder.display());
        }
        println!("{:=<70}", "");
    }

    if let Some(path) = args.stats_json {
        report.stats.write_to_file(&path)?;
        println!("Wrote statistics to {}", path.display());
    }

    Ok(())
}

/// Interactive decider for the ambiguous-match case. Reads one line from
/// stdin: a number selects a candidate, `s` skips, `q` quits, all
/// case-insensitive. Anything else counts as a skip.
fn prompt_for_choice(_folder: &Path, candidates: &[PathBuf]) -> MatchDecision {
    println!("  Please choose:");
    println!(
        "    Enter number (1-{}): Select destination folder",
        candidates.len()
    );
    println!("    's': Skip this folder");
    println!("    'q': Quit");
    print!("  Your choice: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return MatchDecision::Skip;
    }
    let choice = line.trim().to_lowercase();

    match choice.as_str() {
        "q" => MatchDecision::Abort,
        "s" => {
            println!("  Skipped");
            MatchDecision::Skip
        }
        _ => match choice.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => MatchDecision::Select(n - 1),
            _ => {
                println!("  Invalid choice, skipping");
                MatchDecision::Skip
            }
        },
    }
}
