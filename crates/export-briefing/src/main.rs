use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shared::export::{default_export_dir, save_export};
use shared::{BriefingConfig, BriefingStore, Config, MarkdownExporter, PdfExporter, WeekKey};
use std::io::{self, Write as _};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Pdf,
    Both,
}

#[derive(Parser)]
#[command(name = "export-briefing")]
#[command(about = "Export a saved weekly briefing to Markdown and/or PDF")]
struct Args {
    /// ISO week to export (if not provided, will list saved briefings)
    #[arg(short, long)]
    week: Option<WeekKey>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "both")]
    format: Format,

    /// Directory to write into (defaults to ~/Documents)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with an alternate briefing configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let store = BriefingStore::new(Config::data_dir()?);
    let briefing_config = BriefingConfig::load(args.config.as_deref())?;

    let week = match args.week {
        Some(week) => week,
        None => select_week(&store)?,
    };

    println!("📖 Loading briefing for {}...", week);
    let briefing = store.load_briefing(&week).with_context(|| {
        format!(
            "No saved briefing for {}. Run generate-briefing --week {} first.",
            week, week
        )
    })?;

    let output_dir = args.output.unwrap_or_else(default_export_dir);

    if matches!(args.format, Format::Markdown | Format::Both) {
        println!("\n📝 Generating Markdown...");
        let markdown = MarkdownExporter::render(&briefing, &briefing_config);
        let path = save_export(markdown.as_bytes(), &week, "md", &output_dir)
            .context("Failed to save Markdown file")?;
        println!("✓ Markdown saved to: {}", path.display());
    }

    if matches!(args.format, Format::Pdf | Format::Both) {
        println!("\n📄 Generating PDF...");
        let pdf = PdfExporter::render(&briefing, &briefing_config)?;
        let path =
            save_export(&pdf, &week, "pdf", &output_dir).context("Failed to save PDF file")?;
        println!("✓ PDF saved to: {}", path.display());
    }

    println!("\n✅ Done!");

    Ok(())
}

fn select_week(store: &BriefingStore) -> Result<WeekKey> {
    let weeks = store.list_cached_weeks()?;

    if weeks.is_empty() {
        anyhow::bail!(
            "No saved briefings found in {}. Run generate-briefing first.",
            store.briefings_dir().display()
        );
    }

    println!("Saved briefings:\n");
    for (i, week) in weeks.iter().enumerate() {
        println!("  {}) {}  ({})", i + 1, week, week.display_range());
    }

    print!("\nSelect week (1-{}): ", weeks.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let selection: usize = input
        .trim()
        .parse()
        .context("Invalid selection. Please enter a number.")?;

    if selection < 1 || selection > weeks.len() {
        anyhow::bail!("Selection out of range. Please choose 1-{}", weeks.len());
    }

    Ok(weeks[selection - 1])
}
