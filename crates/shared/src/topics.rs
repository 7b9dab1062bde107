use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One briefing section: what to search for and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub id: String,
    pub title: String,
    pub emoji: String,
    pub domains: Vec<String>,
    pub prompt_focus: String,
}

impl TopicSpec {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        emoji: impl Into<String>,
        domains: &[&str],
        prompt_focus: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            emoji: emoji.into(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            prompt_focus: prompt_focus.into(),
        }
    }
}

/// Everything the pipeline and exporters need to know about a briefing,
/// fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingConfig {
    /// Document title, e.g. "Food Industry Weekly Briefing".
    pub title: String,
    /// Industry name used inside prompts, e.g. "food".
    pub industry: String,
    pub model: String,
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    pub system_prompt: String,
    pub synthesis_prompt: String,
    pub topics: Vec<TopicSpec>,
}

fn default_temperature() -> f32 {
    0.1
}

impl BriefingConfig {
    /// Load a configuration from a JSON file using the same field names.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read briefing config: {}", path.display()))?;

        let config: BriefingConfig = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse briefing config from {}. Expected a JSON object with title, industry, model, base_url, system_prompt, synthesis_prompt and topics.",
                path.display()
            )
        })?;

        if config.topics.is_empty() {
            anyhow::bail!("Briefing config {} defines no topics", path.display());
        }

        Ok(config)
    }

    /// Built-in configuration when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::food_industry()),
        }
    }

    pub fn topic(&self, id: &str) -> Option<&TopicSpec> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn food_industry() -> Self {
        Self {
            title: "Food Industry Weekly Briefing".to_string(),
            industry: "food".to_string(),
            model: "sonar-pro".to_string(),
            base_url: "https://api.perplexity.ai".to_string(),
            temperature: default_temperature(),
            system_prompt: FOOD_SYSTEM_PROMPT.to_string(),
            synthesis_prompt: FOOD_SYNTHESIS_PROMPT.to_string(),
            topics: vec![
                TopicSpec::new(
                    "deals_capital",
                    "Deals & Capital",
                    "💰",
                    &["agfunder.com", "fooddive.com", "ft.com", "crunchbase.com"],
                    "Find the most significant food and agriculture investment deals, \
                     funding rounds, M&A activity, IPOs, and capital raises from this week. \
                     Include deal sizes, investors, and strategic rationale where available.",
                ),
                TopicSpec::new(
                    "grocery_retail",
                    "Grocery & Retail",
                    "🛒",
                    &["thegrocer.co.uk", "grocerydive.com", "ft.com"],
                    "Find the most important grocery and retail developments this week, \
                     including store openings/closings, format changes, pricing moves, \
                     private label trends, e-commerce developments, and retailer earnings.",
                ),
                TopicSpec::new(
                    "innovation_product",
                    "Innovation & Product",
                    "🔬",
                    &["digitalfoodlab.com", "foodnavigator.com", "newfoodmagazine.com"],
                    "Find notable new food product launches, ingredient innovations, \
                     food technology breakthroughs, alternative protein developments, \
                     and novel food-tech startup activity from this week.",
                ),
                TopicSpec::new(
                    "glp1_health",
                    "GLP-1 & Health",
                    "💉",
                    &["foodnavigator.com", "ft.com", "statnews.com"],
                    "Find developments at the intersection of GLP-1 receptor agonists \
                     (Ozempic, Wegovy, Mounjaro, etc.) and the food industry this week. \
                     Include reformulation trends, 'GLP-1 friendly' product launches, \
                     impact on food company earnings, and consumer behavior shifts.",
                ),
                TopicSpec::new(
                    "research_science",
                    "Research & Science",
                    "🧪",
                    &[
                        "foodnavigator.com",
                        "newfoodmagazine.com",
                        "nutraingredients.com",
                        "sciencedaily.com",
                        "nature.com",
                        "newscientist.com",
                    ],
                    "Find important food science and nutrition research published or covered \
                     this week. Include new peer-reviewed studies on diet and health, food \
                     safety findings, sustainable agriculture breakthroughs, microbiome \
                     research, novel food processing techniques, and any major scientific \
                     publications with implications for the food industry. Trade press \
                     coverage of new research is valuable.",
                ),
                TopicSpec::new(
                    "policy_regulation",
                    "Policy & Regulation",
                    "🏛️",
                    &["fda.gov", "foodnavigator.com", "fooddive.com"],
                    "Find significant food policy and regulatory developments this week, \
                     including FDA actions, labeling changes, trade policy, food safety \
                     recalls, sustainability mandates, and international regulatory updates.",
                ),
                TopicSpec::new(
                    "macro_consumer",
                    "Macro & Consumer",
                    "📊",
                    &["ft.com", "nytimes.com", "economist.com"],
                    "Find macroeconomic and consumer trends affecting the food industry \
                     this week, including food price inflation, consumer spending data, \
                     supply chain developments, commodity markets, and shifting dietary patterns.",
                ),
            ],
        }
    }
}

const FOOD_SYSTEM_PROMPT: &str = "You are a senior food industry analyst preparing a weekly briefing for \
investors and executives. Your output should be:

- 4 to 6 concise markdown bullet points per section
- Each bullet starts with a **bold lead-in phrase** summarizing the development
- Include specific numbers, company names, and deal sizes where available
- Cite source URLs inline as markdown links where possible
- Professional, analytical tone, no hype, no filler
- Focus on developments from the current week only
- Prioritize stories by significance to food industry investors";

const FOOD_SYNTHESIS_PROMPT: &str = "You are a senior food industry analyst. Review the following \
weekly briefing sections and identify the 3 most significant developments that food industry \
investors must know. For each, write a single concise bullet point with a **bold lead-in** \
explaining why it matters. Focus on decisive shifts, not incremental news. Do NOT use numbered \
citations like [1]. Include inline markdown hyperlinks where possible.";
