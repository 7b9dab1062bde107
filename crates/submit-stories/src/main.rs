use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::models::short_timestamp;
use shared::{BriefingStore, Config, WeekKey};

#[derive(Parser)]
#[command(name = "submit-stories")]
#[command(about = "Suggest story URLs to include in a weekly briefing")]
struct Args {
    /// ISO week the stories belong to (e.g. 2026-W06). Defaults to last week.
    #[arg(short, long, global = true, conflicts_with = "current")]
    week: Option<WeekKey>,

    /// Use the current week instead of last week
    #[arg(long, global = true)]
    current: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a story URL
    Add {
        /// Story URL (http or https)
        url: String,

        /// Brief description
        #[arg(short, long, default_value = "")]
        note: String,

        /// Your name
        #[arg(short, long, default_value = "")]
        by: String,
    },
    /// Show submitted stories, newest first
    List,
    /// Remove a story by the number shown in `list`
    Delete {
        number: usize,
    },
    /// Show weeks that have submissions
    Weeks,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = BriefingStore::new(Config::data_dir()?);
    let week = args
        .week
        .unwrap_or_else(|| WeekKey::current(!args.current));

    match args.command {
        Command::Add { url, note, by } => {
            let submission = store.add_submission(&week, &url, &note, &by)?;
            println!("✓ Story submitted for {}: {}", week, submission.url);
        }
        Command::List => list(&store, &week),
        Command::Delete { number } => {
            // `list` numbers newest first, starting at 1
            let count = store.load_submissions(&week).len();
            let removed = number
                .checked_sub(1)
                .and_then(|n| count.checked_sub(n + 1))
                .map(|index| store.delete_submission(&week, index))
                .transpose()?
                .flatten();

            match removed {
                Some(submission) => println!("✓ Removed {}", submission.url),
                None => println!("No story #{} for {} (nothing removed)", number, week),
            }
        }
        Command::Weeks => {
            let weeks = store.list_submission_weeks()?;
            if weeks.is_empty() {
                println!("No stories submitted yet.");
            }
            for w in weeks {
                let count = store.load_submissions(&w).len();
                println!("  {}  ({})  {} stories", w, w.display_range(), count);
            }
        }
    }

    Ok(())
}

fn list(store: &BriefingStore, week: &WeekKey) {
    println!("📥 Submitted stories for {} ({})\n", week, week.display_range());

    let submissions = store.load_submissions(week);
    if submissions.is_empty() {
        println!("No stories submitted for this week yet.");
        return;
    }

    for (i, sub) in submissions.iter().rev().enumerate() {
        println!("  {}) {}", i + 1, sub.url);
        if !sub.note.is_empty() {
            println!("     {}", sub.note);
        }

        let mut meta = Vec::new();
        if !sub.submitted_by.is_empty() {
            meta.push(sub.submitted_by.clone());
        }
        if !sub.timestamp.is_empty() {
            meta.push(short_timestamp(&sub.timestamp));
        }
        if !meta.is_empty() {
            println!("     {}", meta.join(" · "));
        }
    }
}
