use crate::models::Briefing;
use crate::topics::BriefingConfig;

pub struct MarkdownExporter;

impl MarkdownExporter {
    /// The briefing as a standalone markdown document. Generated content is
    /// copied through untouched.
    pub fn render(briefing: &Briefing, config: &BriefingConfig) -> String {
        let mut lines: Vec<String> = vec![
            format!("# {}", config.title),
            format!("### {}", briefing.date_range),
            String::new(),
        ];

        if let Some(top3) = briefing.highlights() {
            lines.push("## Key Developments This Week".to_string());
            lines.push(String::new());
            lines.push(top3.to_string());
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(String::new());
        }

        for topic in &config.topics {
            let Some(section) = briefing.sections.get(&topic.id) else {
                continue;
            };
            lines.push(format!("## {} {}", section.emoji, section.title));
            lines.push(String::new());
            lines.push(section.content.clone());
            lines.push(String::new());
        }

        lines.push("---".to_string());
        lines.push(format!("*Generated: {}*", briefing.generated_display()));

        lines.join("\n")
    }
}
