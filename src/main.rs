//! plume - yWriter project round-trip converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use plume::{Skeleton, Target, yw7};

#[derive(Parser)]
#[command(name = "plume")]
#[command(version, about = "yWriter project round-trip converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    plume book.yw7                      Export the manuscript
    plume book.yw7 -s scenelist         Export the scene table
    plume book_manuscript.html          Import edited scenes back
    plume -i book.yw7                   Show project structure as JSON")]
struct Cli {
    /// Source file (.yw7 to export; an edited document to import)
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Export flavor suffix (e.g. manuscript, chapters, scenelist)
    #[arg(short, long, value_name = "SUFFIX")]
    suffix: Option<String>,

    /// Show project structure without converting
    #[arg(short, long)]
    info: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = if cli.info {
        show_info(&cli)
    } else {
        run_conversion(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("ERROR: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_conversion(cli: &Cli) -> Result<(), String> {
    let message = match &cli.suffix {
        Some(suffix) => {
            let target = Target::from_suffix(suffix)
                .ok_or_else(|| format!("Unknown document suffix: {suffix}"))?;
            plume::export(&cli.source, target)
        }
        None => plume::convert(&cli.source),
    }
    .map_err(|e| e.to_string())?;

    if !cli.quiet {
        println!("{message}");
    }
    Ok(())
}

fn show_info(cli: &Cli) -> Result<(), String> {
    let novel = yw7::read_yw7(&cli.source).map_err(|e| e.to_string())?;

    let summary = serde_json::json!({
        "title": novel.title,
        "author": novel.author,
        "chapters": novel.chapter_order.len(),
        "scenes": novel.scenes.len(),
        "characters": novel.character_order.len(),
        "locations": novel.location_order.len(),
        "items": novel.item_order.len(),
        "word_count": novel.total_word_count(),
        "letter_count": novel.total_letter_count(),
        "skeleton": Skeleton::narrative(&novel),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?
    );
    Ok(())
}
