use crate::io::BriefingStore;
use crate::models::{Briefing, SectionResult, Submission};
use crate::service::{Recency, SearchRequest, SummaryService};
use crate::topics::{BriefingConfig, TopicSpec};
use crate::week::WeekKey;

/// Reported before each service call and once after the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub label: String,
}

impl Progress {
    pub fn is_done(&self) -> bool {
        self.current >= self.total
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Where a briefing returned by [`BriefingPipeline::load_or_generate`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Generated,
}

pub struct BriefingPipeline<S> {
    config: BriefingConfig,
    service: S,
    store: BriefingStore,
}

impl<S: SummaryService> BriefingPipeline<S> {
    pub fn new(config: BriefingConfig, service: S, store: BriefingStore) -> Self {
        Self {
            config,
            service,
            store,
        }
    }

    pub fn config(&self) -> &BriefingConfig {
        &self.config
    }

    pub fn store(&self) -> &BriefingStore {
        &self.store
    }

    /// Cached briefing for `week` unless `regenerate` is set or nothing is cached.
    ///
    /// The cached path makes no service calls.
    pub async fn load_or_generate<F>(
        &self,
        week: &WeekKey,
        regenerate: bool,
        on_progress: F,
    ) -> (Briefing, Origin)
    where
        F: FnMut(Progress),
    {
        if !regenerate {
            if let Some(cached) = self.store.load_briefing(week) {
                tracing::info!(week = %week, "using cached briefing");
                return (cached, Origin::Cache);
            }
        }

        (self.generate(week, on_progress).await, Origin::Generated)
    }

    /// Query every topic in order, then the highlights, and save the result.
    ///
    /// Failed calls become inline error text; this never fails as a whole.
    pub async fn generate<F>(&self, week: &WeekKey, mut on_progress: F) -> Briefing
    where
        F: FnMut(Progress),
    {
        let submissions = self.store.load_submissions(week);
        let total = self.config.topics.len() + 1;
        let mut briefing = Briefing::new(*week);

        for (index, topic) in self.config.topics.iter().enumerate() {
            on_progress(Progress {
                current: index,
                total,
                label: topic.title.clone(),
            });

            let request = SearchRequest {
                system: self.config.system_prompt.clone(),
                user: self.section_prompt(topic, &briefing, &submissions),
                domains: topic.domains.clone(),
                recency: Some(Recency::Week),
            };

            let content = match self.service.complete(&request).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(week = %week, section = %topic.id, error = %e, "section failed");
                    format!("*Error fetching this section: {}*", e)
                }
            };

            briefing.sections.insert(
                topic.id.clone(),
                SectionResult {
                    title: topic.title.clone(),
                    emoji: topic.emoji.clone(),
                    content,
                },
            );
        }

        on_progress(Progress {
            current: total - 1,
            total,
            label: "Top 3 highlights".to_string(),
        });

        let request = SearchRequest {
            system: self.config.synthesis_prompt.clone(),
            user: self.synthesis_prompt(&briefing),
            domains: Vec::new(),
            recency: None,
        };

        let top3 = match self.service.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(week = %week, error = %e, "highlights failed");
                format!("*Error generating highlights: {}*", e)
            }
        };
        briefing.top3 = Some(top3);

        on_progress(Progress {
            current: total,
            total,
            label: "Done".to_string(),
        });

        if let Err(e) = self.store.save_briefing(&briefing) {
            tracing::error!(week = %week, error = %e, "could not cache briefing");
        }

        briefing
    }

    fn section_prompt(
        &self,
        topic: &TopicSpec,
        briefing: &Briefing,
        submissions: &[Submission],
    ) -> String {
        let mut prompt = format!(
            "Find the most important {} developments in the {} industry for the week of {}.\n\n{}",
            topic.title.to_lowercase(),
            self.config.industry,
            briefing.date_range.replace(" — ", " to "),
            topic.prompt_focus
        );

        if !submissions.is_empty() {
            let urls: Vec<String> = submissions
                .iter()
                .map(|s| {
                    if s.note.is_empty() {
                        format!("- {}", s.url)
                    } else {
                        format!("- {} — {}", s.url, s.note)
                    }
                })
                .collect();

            prompt.push_str("\n\nAlso consider these stories submitted by our team:\n");
            prompt.push_str(&urls.join("\n"));
        }

        prompt
    }

    fn synthesis_prompt(&self, briefing: &Briefing) -> String {
        // Declared topic order, not the map's key order
        let all_content = self
            .config
            .topics
            .iter()
            .filter_map(|t| briefing.sections.get(&t.id))
            .map(|s| format!("## {}\n{}", s.title, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Here is the full briefing for {}:\n\n{}\n\n\
             What are the 3 most significant developments this week for {} industry investors? \
             Return exactly 3 markdown bullet points.",
            briefing.date_range, all_content, self.config.industry
        )
    }
}
