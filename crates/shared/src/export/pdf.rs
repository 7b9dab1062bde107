use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::layout::{Align, Canvas, DrawOp, Page, PageHeader, Rgb, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, PT_PER_MM};
use super::markup::{classify_line, sanitize_latin1, styled_runs, LineKind, Style};
use crate::models::Briefing;
use crate::topics::BriefingConfig;

const ACCENT: Rgb = Rgb(37, 99, 235);
const BODY: Rgb = Rgb(30, 30, 30);
const BODY_SIZE: f32 = 10.0;
const BULLET: &str = "  -  ";

pub struct PdfExporter;

impl PdfExporter {
    /// Render `briefing` as PDF bytes.
    pub fn render(briefing: &Briefing, config: &BriefingConfig) -> Result<Vec<u8>> {
        let pages = Self::layout(briefing, config);
        Self::write_pdf(&pages, &sanitize_latin1(&config.title))
    }

    /// Lay out the whole briefing into pages.
    pub fn layout(briefing: &Briefing, config: &BriefingConfig) -> Vec<Page> {
        let title = sanitize_latin1(&config.title);
        let date_range = sanitize_latin1(&briefing.date_range);

        let mut canvas = Canvas::new(PageHeader {
            left: title.clone(),
            right: date_range.clone(),
        });

        canvas.set_font(Style::Bold, 18.0);
        canvas.set_text_color(ACCENT);
        canvas.cell(12.0, &title, Align::Left);
        canvas.set_font(Style::Regular, 12.0);
        canvas.set_text_color(Rgb::grey(100));
        canvas.cell(8.0, &date_range, Align::Left);
        canvas.ln(6.0);

        if let Some(top3) = briefing.highlights() {
            Self::block_heading(&mut canvas, "Key Developments This Week");
            for line in top3.split('\n') {
                Self::content_line(&mut canvas, line);
            }
            canvas.ln(6.0);
            canvas.set_draw_color(Rgb::grey(200));
            canvas.rule(MARGIN, PAGE_WIDTH - MARGIN);
            canvas.ln(6.0);
        }

        for topic in &config.topics {
            let Some(section) = briefing.sections.get(&topic.id) else {
                continue;
            };

            // The standard fonts have no emoji, so the title stands alone
            Self::block_heading(&mut canvas, &sanitize_latin1(&section.title));
            for line in section.content.split('\n') {
                Self::content_line(&mut canvas, line);
            }
            canvas.ln(4.0);
        }

        canvas.ln(6.0);
        canvas.set_font(Style::Italic, 8.0);
        canvas.set_text_color(Rgb::grey(150));
        canvas.cell(
            5.0,
            &format!("Generated: {}", briefing.generated_display()),
            Align::Left,
        );

        canvas.finish()
    }

    fn block_heading(canvas: &mut Canvas, text: &str) {
        canvas.set_font(Style::Bold, 13.0);
        canvas.set_text_color(ACCENT);
        canvas.cell(10.0, text, Align::Left);
        canvas.set_draw_color(ACCENT);
        canvas.rule(MARGIN, 80.0);
        canvas.ln(3.0);
        canvas.set_text_color(BODY);
    }

    /// One `\n`-delimited line of generated content.
    fn content_line(canvas: &mut Canvas, line: &str) {
        match classify_line(line) {
            LineKind::Blank => canvas.ln(2.0),
            LineKind::Heading(text) => {
                canvas.ln(3.0);
                Self::styled_line(canvas, text, Style::Bold, 11.0, 7.0);
                canvas.ln(1.0);
            }
            LineKind::Bullet(text) => {
                canvas.set_font(Style::Regular, BODY_SIZE);
                canvas.write(5.0, BULLET);
                Self::styled_line(canvas, text, Style::Regular, BODY_SIZE, 5.0);
                canvas.ln(1.0);
            }
            LineKind::Text(text) => {
                Self::styled_line(canvas, text, Style::Regular, BODY_SIZE, 5.0);
                canvas.ln(1.0);
            }
        }
        canvas.set_font(Style::Regular, BODY_SIZE);
    }

    /// Write the styled runs of `text` on the current line, then move down one line.
    fn styled_line(canvas: &mut Canvas, text: &str, base: Style, size: f32, height: f32) {
        for run in styled_runs(text) {
            let style = match run.style {
                Style::Regular => base,
                other => other,
            };
            canvas.set_font(style, size);
            canvas.write(height, &run.text);
        }
        canvas.ln(height);
    }

    fn write_pdf(pages: &[Page], title: &str) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font = |doc: &mut Document, base: &str| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
                "Encoding" => "WinAnsiEncoding",
            })
        };
        let regular = font(&mut doc, "Helvetica");
        let bold = font(&mut doc, "Helvetica-Bold");
        let italic = font(&mut doc, "Helvetica-Oblique");

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
                "F3" => italic,
            },
        });

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Content {
                operations: Self::page_operations(page),
            };
            let encoded = content.encode().context("Failed to encode PDF page")?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH * PT_PER_MM),
                Object::Real(PAGE_HEIGHT * PT_PER_MM),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(latin1_bytes(title), StringFormat::Literal),
            "Producer" => Object::string_literal("industry-briefing"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).context("Failed to write PDF")?;
        Ok(bytes)
    }

    fn page_operations(page: &Page) -> Vec<Operation> {
        let mut ops = Vec::new();

        for op in &page.ops {
            match op {
                DrawOp::Text {
                    x,
                    y,
                    style,
                    size,
                    color,
                    text,
                } => {
                    let font = match style {
                        Style::Regular => "F1",
                        Style::Bold => "F2",
                        Style::Italic => "F3",
                    };
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new("Tf", vec![font.into(), Object::Real(*size)]));
                    ops.push(Operation::new("rg", rgb_operands(*color)));
                    ops.push(Operation::new(
                        "Td",
                        vec![Object::Real(x * PT_PER_MM), Object::Real((PAGE_HEIGHT - y) * PT_PER_MM)],
                    ));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::String(latin1_bytes(text), StringFormat::Literal)],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
                DrawOp::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    width,
                } => {
                    ops.push(Operation::new("RG", rgb_operands(*color)));
                    ops.push(Operation::new("w", vec![Object::Real(width * PT_PER_MM)]));
                    ops.push(Operation::new(
                        "m",
                        vec![Object::Real(x1 * PT_PER_MM), Object::Real((PAGE_HEIGHT - y1) * PT_PER_MM)],
                    ));
                    ops.push(Operation::new(
                        "l",
                        vec![Object::Real(x2 * PT_PER_MM), Object::Real((PAGE_HEIGHT - y2) * PT_PER_MM)],
                    ));
                    ops.push(Operation::new("S", vec![]));
                }
            }
        }

        ops
    }
}

fn rgb_operands(color: Rgb) -> Vec<Object> {
    let Rgb(r, g, b) = color;
    vec![
        Object::Real(r as f32 / 255.0),
        Object::Real(g as f32 / 255.0),
        Object::Real(b as f32 / 255.0),
    ]
}

/// WinAnsi bytes for text that has already been through `sanitize_latin1`.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| u8::try_from(c as u32).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionResult;
    use crate::topics::TopicSpec;

    fn config() -> BriefingConfig {
        let mut config = BriefingConfig::food_industry();
        config.topics = vec![
            TopicSpec::new("first", "First", "1", &["a.test"], "f"),
            TopicSpec::new("second", "Second", "2", &["b.test"], "s"),
            TopicSpec::new("third", "Third", "3", &["c.test"], "t"),
        ];
        config
    }

    fn section(title: &str, content: &str) -> SectionResult {
        SectionResult {
            title: title.to_string(),
            emoji: "x".to_string(),
            content: content.to_string(),
        }
    }

    fn briefing() -> Briefing {
        let mut briefing = Briefing::new("2026-W06".parse().unwrap());
        briefing.generated_at = "2026-02-09T14:30:00+00:00".to_string();
        briefing.top3 = Some("- **Top** one\n- **Next** [two](https://x.test/2)".to_string());
        briefing.sections.insert(
            "second".to_string(),
            section("Second", "### Sub heading\n\n- **Bold** lead — then text\nPlain *italic* line"),
        );
        briefing
            .sections
            .insert("first".to_string(), section("First", "- only bullet"));
        briefing
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_layout_block_order() {
        let pages = PdfExporter::layout(&briefing(), &config());
        let texts = all_text(&pages);
        let pos = |needle: &str| texts.iter().position(|t| t == needle).unwrap();

        assert!(pos("Food Industry Weekly Briefing") < pos("Key Developments This Week"));
        assert!(pos("Key Developments This Week") < pos("First"));
        assert!(pos("First") < pos("Second"));
        assert!(!texts.iter().any(|t| t == "Third"));
        assert!(pos("Second") < pos("Generated: 2026-02-09 14:30"));
    }

    #[test]
    fn test_layout_header_uses_sanitized_range() {
        let pages = PdfExporter::layout(&briefing(), &config());
        let header: Vec<&str> = pages[0].texts().take(2).collect();
        assert_eq!(
            header,
            vec!["Food Industry Weekly Briefing", "Feb 2, 2026 -- Feb 8, 2026"]
        );
    }

    #[test]
    fn test_layout_styles_runs() {
        let pages = PdfExporter::layout(&briefing(), &config());
        let styled: Vec<(Style, String)> = pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { style, text, .. } => Some((*style, text.clone())),
                _ => None,
            })
            .collect();

        assert!(styled.contains(&(Style::Bold, "Top".to_string())));
        assert!(styled.contains(&(Style::Regular, " two (https://x.test/2)".to_string())));
        assert!(styled.contains(&(Style::Bold, "Sub heading".to_string())));
        assert!(styled.contains(&(Style::Regular, " lead -- then text".to_string())));
        assert!(styled.contains(&(Style::Italic, "italic".to_string())));
        assert!(styled.contains(&(Style::Regular, BULLET.to_string())));
    }

    #[test]
    fn test_layout_without_top3() {
        let mut briefing = briefing();
        briefing.top3 = None;
        let texts = all_text(&PdfExporter::layout(&briefing, &config()));
        assert!(!texts.iter().any(|t| t == "Key Developments This Week"));
    }

    #[test]
    fn test_long_briefing_paginates() {
        let mut briefing = briefing();
        let long: String = (0..200)
            .map(|i| format!("- **Item {}** with a fairly long explanation that keeps going", i))
            .collect::<Vec<_>>()
            .join("\n");
        briefing.sections.insert("third".to_string(), section("Third", &long));

        let pages = PdfExporter::layout(&briefing, &config());
        assert!(pages.len() > 2);
        let last = pages.last().unwrap().texts().last().unwrap().to_string();
        assert_eq!(last, format!("Page {}/{}", pages.len(), pages.len()));
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let bytes = PdfExporter::render(&briefing(), &config()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_latin1_bytes() {
        assert_eq!(latin1_bytes("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(latin1_bytes("a—b"), vec![b'a', b'b']);
    }
}
