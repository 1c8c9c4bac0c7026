use anyhow::{Context, Result};
use clap::Parser;
use font_table::{load_font, FontTable, GLYPH_COUNT};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Font candidates tried in order when --font is not given. Only the first is
/// checked for existence; a missing fallback surfaces as an ordinary load
/// failure when it is opened.
const FONT_CANDIDATES: [&str; 2] = [
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Parser)]
#[command(name = "font-table-gen")]
#[command(about = "Generates the 16x24 bitmap font header for the display firmware")]
#[command(version = "0.1.0")]
struct Cli {
    /// Font file to rasterize (defaults to Consolas, then Arial)
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Pixel size to rasterize at
    #[arg(short, long, default_value = "24")]
    size: u32,

    /// Output header path
    #[arg(short, long, default_value = "main/font_16x24.h")]
    output: PathBuf,
}

fn pick_font(explicit: Option<PathBuf>, candidates: &[&str]) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let primary = Path::new(candidates[0]);
    if primary.exists() {
        return primary.to_path_buf();
    }
    println!("Consolas not found, trying Arial");
    PathBuf::from(candidates[1])
}

// Candidate selection always labels the table Consolas, even when the Arial
// fallback ends up loading; an explicit font is labeled by its file stem.
fn font_label(explicit: Option<&Path>) -> String {
    match explicit {
        Some(path) => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string()),
        None => "Consolas".to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let label = font_label(cli.font.as_deref());
    let font_path = pick_font(cli.font, &FONT_CANDIDATES);
    println!("Loading font: {}", font_path.display());

    let font = load_font(&font_path)
        .with_context(|| format!("Could not load font: {}", font_path.display()))?;

    println!("Rasterizing {} glyphs at {}px...", GLYPH_COUNT, cli.size);
    let pb = ProgressBar::new(GLYPH_COUNT as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );

    let table = FontTable::render(&font, cli.size as f32, |_| pb.inc(1));
    pb.finish_with_message("Rasterization completed!");

    let header = table.to_header(&label, cli.size);
    std::fs::write(&cli.output, header)
        .with_context(|| format!("Failed to write header: {:?}", cli.output))?;

    println!("Generated {}", cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_font_wins() {
        let picked = pick_font(Some(PathBuf::from("custom.ttf")), &FONT_CANDIDATES);
        assert_eq!(picked, PathBuf::from("custom.ttf"));
    }

    #[test]
    fn existing_primary_is_selected() {
        let primary = tempfile::NamedTempFile::new().unwrap();
        let primary_path = primary.path().to_str().unwrap();
        let candidates = [primary_path, "/nonexistent/fallback.ttf"];

        let picked = pick_font(None, &candidates);
        assert_eq!(picked, primary.path());
    }

    #[test]
    fn candidate_selection_is_labeled_consolas() {
        assert_eq!(font_label(None), "Consolas");
    }

    #[test]
    fn explicit_font_is_labeled_by_file_stem() {
        let label = font_label(Some(Path::new("fonts/JetBrainsMono.ttf")));
        assert_eq!(label, "JetBrainsMono");
    }

    #[test]
    fn fallback_is_not_checked_for_existence() {
        // neither candidate exists; the fallback is still returned
        let candidates = ["/nonexistent/primary.ttf", "/nonexistent/fallback.ttf"];

        let picked = pick_font(None, &candidates);
        assert_eq!(picked, PathBuf::from("/nonexistent/fallback.ttf"));
    }
}
