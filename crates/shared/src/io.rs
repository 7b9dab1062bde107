use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Briefing, Submission};
use crate::week::WeekKey;

/// JSON files on disk: one briefing and one submission list per week.
///
/// Every write rewrites the whole file. There is no locking, so two processes
/// writing the same week at once can lose an update.
#[derive(Debug, Clone)]
pub struct BriefingStore {
    briefings_dir: PathBuf,
    submissions_dir: PathBuf,
}

impl BriefingStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            briefings_dir: data_dir.join("briefings"),
            submissions_dir: data_dir.join("submissions"),
        }
    }

    pub fn briefings_dir(&self) -> &Path {
        &self.briefings_dir
    }

    pub fn submissions_dir(&self) -> &Path {
        &self.submissions_dir
    }

    fn briefing_path(&self, week: &WeekKey) -> PathBuf {
        self.briefings_dir.join(format!("{}.json", week))
    }

    fn submissions_path(&self, week: &WeekKey) -> PathBuf {
        self.submissions_dir.join(format!("{}.json", week))
    }

    // --- Briefing cache ---

    /// Save a briefing, replacing any earlier one for the same week
    pub fn save_briefing(&self, briefing: &Briefing) -> Result<PathBuf> {
        let path = self.briefing_path(&briefing.week_key);
        write_json(&path, briefing).context("Failed to save briefing")?;
        tracing::debug!(week = %briefing.week_key, path = %path.display(), "briefing saved");
        Ok(path)
    }

    /// Cached briefing for `week`, or `None` if there isn't a readable one
    pub fn load_briefing(&self, week: &WeekKey) -> Option<Briefing> {
        read_json(&self.briefing_path(week))
    }

    /// Weeks with a cached briefing, newest first
    pub fn list_cached_weeks(&self) -> Result<Vec<WeekKey>> {
        list_weeks(&self.briefings_dir)
    }

    // --- Submissions ---

    /// All submissions for `week` in the order they were added
    pub fn load_submissions(&self, week: &WeekKey) -> Vec<Submission> {
        read_json(&self.submissions_path(week)).unwrap_or_default()
    }

    /// Append a submission for `week`. The URL must be an absolute http(s) URL.
    pub fn add_submission(
        &self,
        week: &WeekKey,
        url: &str,
        note: &str,
        submitted_by: &str,
    ) -> Result<Submission> {
        let url = validate_url(url)?;

        let mut submissions = self.load_submissions(week);
        let submission = Submission::new(url, note.trim(), submitted_by.trim());
        submissions.push(submission.clone());

        write_json(&self.submissions_path(week), &submissions)
            .context("Failed to save submissions")?;

        tracing::debug!(week = %week, url = %submission.url, "submission added");
        Ok(submission)
    }

    /// Remove the submission at `index`. Out-of-range indices are ignored.
    pub fn delete_submission(&self, week: &WeekKey, index: usize) -> Result<Option<Submission>> {
        let mut submissions = self.load_submissions(week);
        if index >= submissions.len() {
            return Ok(None);
        }

        let removed = submissions.remove(index);
        write_json(&self.submissions_path(week), &submissions)
            .context("Failed to save submissions")?;

        Ok(Some(removed))
    }

    /// Weeks with a submissions file, newest first
    pub fn list_submission_weeks(&self) -> Result<Vec<WeekKey>> {
        list_weeks(&self.submissions_dir)
    }
}

/// Trimmed URL if it is an absolute http or https URL.
pub fn validate_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => anyhow::bail!("Please enter a valid URL starting with http:// or https:// (got '{}')", trimmed),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

/// Missing and unreadable files both come back as `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read file, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed JSON, treating as absent");
            None
        }
    }
}

fn list_weeks(dir: &Path) -> Result<Vec<WeekKey>> {
    let mut weeks = Vec::new();

    if dir.exists() {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match stem.parse::<WeekKey>() {
                Ok(week) => weeks.push(week),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping file"),
            }
        }
    }

    // Newest first
    weeks.sort_by(|a, b| b.cmp(a));
    Ok(weeks)
}
