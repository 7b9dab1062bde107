//! The small slice of markdown the PDF export understands.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link pattern"));

// Spans never nest: a span body holds no `*`
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*[^*]+\*\*|\*[^*]+\*").expect("valid emphasis pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Regular,
    Bold,
    Italic,
}

/// A piece of one line drawn in a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub style: Style,
    pub text: String,
}

impl StyledRun {
    fn new(style: Style, text: &str) -> Self {
        Self {
            style,
            text: text.to_string(),
        }
    }
}

/// How a single content line should be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading(&'a str),
    Bullet(&'a str),
    Text(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with('#') {
        LineKind::Heading(line.trim_start_matches('#').trim())
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        LineKind::Bullet(rest)
    } else {
        LineKind::Text(line)
    }
}

/// `[label](url)` becomes `label (url)`.
pub fn flatten_links(text: &str) -> String {
    LINK.replace_all(text, "$1 ($2)").into_owned()
}

/// Swap typographic characters for ASCII look-alikes and drop anything
/// else outside Latin-1, which is all the standard PDF fonts can draw.
pub fn sanitize_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match substitute(c) {
            Some(replacement) => out.push_str(replacement),
            None if (c as u32) <= 0xFF && !c.is_control() => out.push(c),
            None => {}
        }
    }
    out
}

fn substitute(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2014}' => "--",
        '\u{2013}' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2022}' => "-",
        '\u{2018}' | '\u{2019}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{2033}' => "\"",
        '\u{2026}' => "...",
        '\u{00A0}' => " ",
        '\u{20AC}' => "EUR",
        '\u{2122}' => "(TM)",
        '\u{2020}' => "+",
        '\u{2021}' => "++",
        '\u{2039}' => "<",
        '\u{203A}' => ">",
        '\u{00AB}' => "<<",
        '\u{00BB}' => ">>",
        _ => return None,
    };
    Some(replacement)
}

/// Split a line into bold, italic and regular runs, left to right.
///
/// Links are flattened and the text sanitized before splitting.
pub fn styled_runs(line: &str) -> Vec<StyledRun> {
    let text = sanitize_latin1(&flatten_links(line));
    let mut runs = Vec::new();
    let mut last = 0;

    for span in EMPHASIS.find_iter(&text) {
        if span.start() > last {
            runs.push(StyledRun::new(Style::Regular, &text[last..span.start()]));
        }

        let token = span.as_str();
        if token.starts_with("**") && token.ends_with("**") && token.len() > 4 {
            runs.push(StyledRun::new(Style::Bold, &token[2..token.len() - 2]));
        } else {
            runs.push(StyledRun::new(Style::Italic, &token[1..token.len() - 1]));
        }
        last = span.end();
    }

    if last < text.len() {
        runs.push(StyledRun::new(Style::Regular, &text[last..]));
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(style: Style, text: &str) -> StyledRun {
        StyledRun::new(style, text)
    }

    #[test]
    fn test_flatten_links() {
        assert_eq!(
            flatten_links("See [Report](https://x.test/a) for detail"),
            "See Report (https://x.test/a) for detail"
        );
    }

    #[test]
    fn test_flatten_multiple_links() {
        assert_eq!(
            flatten_links("[a](http://1) and [b](http://2)"),
            "a (http://1) and b (http://2)"
        );
    }

    #[test]
    fn test_flatten_leaves_plain_brackets() {
        assert_eq!(flatten_links("citation [1] stays"), "citation [1] stays");
    }

    #[test]
    fn test_bold_italic_split() {
        assert_eq!(
            styled_runs("**Alpha** beta *gamma*"),
            vec![
                run(Style::Bold, "Alpha"),
                run(Style::Regular, " beta "),
                run(Style::Italic, "gamma"),
            ]
        );
    }

    #[test]
    fn test_plain_line_is_one_regular_run() {
        assert_eq!(styled_runs("just text"), vec![run(Style::Regular, "just text")]);
    }

    #[test]
    fn test_unmatched_asterisk_stays_regular() {
        assert_eq!(styled_runs("5 * 3"), vec![run(Style::Regular, "5 * 3")]);
    }

    #[test]
    fn test_italic_inside_bold_is_not_nested() {
        // Non-nesting grammar: the bold span cannot contain a `*`
        assert_eq!(
            styled_runs("**a *b* c**"),
            vec![
                run(Style::Regular, "*"),
                run(Style::Italic, "a "),
                run(Style::Regular, "b"),
                run(Style::Italic, " c"),
                run(Style::Regular, "*"),
            ]
        );
    }

    #[test]
    fn test_runs_flatten_links_before_splitting() {
        assert_eq!(
            styled_runs("**Deal** via [FT](https://ft.com/x)"),
            vec![
                run(Style::Bold, "Deal"),
                run(Style::Regular, " via FT (https://ft.com/x)"),
            ]
        );
    }

    #[test]
    fn test_sanitize_substitutions() {
        assert_eq!(
            sanitize_latin1("“Big” deal — €5M… it’s ‹ok› «sure» Brand™ †‡"),
            "\"Big\" deal -- EUR5M... it's <ok> <<sure>> Brand(TM) +++"
        );
    }

    #[test]
    fn test_sanitize_keeps_latin1_and_drops_the_rest() {
        assert_eq!(sanitize_latin1("café 🚀 naïve 中"), "café  naïve ");
        assert_eq!(sanitize_latin1("a\u{00A0}b"), "a b");
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("### Deals"), LineKind::Heading("Deals"));
        assert_eq!(classify_line("#NoSpace"), LineKind::Heading("NoSpace"));
        assert_eq!(classify_line("- item"), LineKind::Bullet("item"));
        assert_eq!(classify_line("* item"), LineKind::Bullet("item"));
        assert_eq!(classify_line("  - indented"), LineKind::Bullet("indented"));
        assert_eq!(classify_line("**Bold** start"), LineKind::Text("**Bold** start"));
        assert_eq!(classify_line("-no space"), LineKind::Text("-no space"));
    }
}
