use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    BriefingConfig, BriefingPipeline, BriefingStore, Config, Origin, PerplexityClient, Progress,
    WeekKey,
};
use std::io::{self as stdio, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-briefing")]
#[command(about = "Generate the weekly industry briefing with Perplexity, or reuse the cached one")]
struct Args {
    /// ISO week to generate (e.g. 2026-W06). Defaults to last week.
    #[arg(short, long, conflicts_with = "current")]
    week: Option<WeekKey>,

    /// Use the current week instead of last week
    #[arg(long)]
    current: bool,

    /// Replace the saved briefing for this week
    #[arg(short, long)]
    regenerate: bool,

    /// JSON file with an alternate briefing configuration (topics, prompts, model)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(stdio::stderr)
        .init();
}

fn print_progress(progress: Progress) {
    if progress.is_done() {
        println!("\r  [{:>3}%] Briefing complete!{:30}", 100, "");
        return;
    }

    print!(
        "\r  [{:>3}%] Researching: {}...{:20}",
        (progress.fraction() * 100.0).round() as u32,
        progress.label,
        ""
    );
    let _ = stdio::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = Config::from_env()?;
    let briefing_config = BriefingConfig::load(args.config.as_deref())?;

    let week = args
        .week
        .unwrap_or_else(|| WeekKey::current(!args.current));
    println!("\n✓ Week {} ({})", week, week.display_range());

    let store = BriefingStore::new(&config.data_dir);
    let client = PerplexityClient::new(config.perplexity_api_key, &briefing_config)
        .context("Failed to set up Perplexity client")?;
    let pipeline = BriefingPipeline::new(briefing_config, client, store);

    let submissions = pipeline.store().load_submissions(&week);
    if !submissions.is_empty() {
        println!("✓ {} submitted stories will be included", submissions.len());
    }

    if !args.regenerate && pipeline.store().load_briefing(&week).is_some() {
        println!("\n📂 Found a saved briefing for this week.");
    } else {
        println!(
            "\n🤖 Researching {} sections with Perplexity...",
            pipeline.config().topics.len()
        );
        println!("  (This may take a few minutes...)");
    }

    let (briefing, origin) = pipeline
        .load_or_generate(&week, args.regenerate, print_progress)
        .await;

    match origin {
        Origin::Cache => {
            println!("✓ Loaded the previously saved briefing. Use --regenerate to create a fresh one.");
        }
        Origin::Generated => {
            let failed: Vec<&str> = briefing
                .sections
                .values()
                .filter(|s| s.content.starts_with("*Error fetching this section"))
                .map(|s| s.title.as_str())
                .collect();

            println!(
                "✓ Generated {}/{} sections",
                briefing.sections.len() - failed.len(),
                briefing.sections.len()
            );
            if !failed.is_empty() {
                println!("\n⚠ Failed sections (regenerate to retry):");
                for title in failed {
                    println!("  ✗ {}", title);
                }
            }
        }
    }

    println!(
        "\n✅ Briefing for {} saved in: {}",
        week,
        pipeline.store().briefings_dir().display()
    );
    println!("   Export it with: export-briefing --week {}", week);

    Ok(())
}
