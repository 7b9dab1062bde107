//! A single-column page canvas with a running cursor, measured in millimetres.
//!
//! Text flows left to right and wraps at the right margin; a new page is
//! started whenever the next line would cross the bottom margin. Every page
//! gets the running header, and footers are stamped once the page count is
//! known.

use super::markup::Style;
use super::metrics;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const BOTTOM_MARGIN: f32 = 20.0;
/// Inner padding of a cell, as fpdf-style layouts use.
const CELL_PADDING: f32 = 1.0;
/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn grey(level: u8) -> Self {
        Rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline
    Text {
        x: f32,
        y: f32,
        style: Style,
        size: f32,
        color: Rgb,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Line { .. } => None,
        })
    }
}

/// Left and right text of the header repeated on every page.
#[derive(Debug, Clone)]
pub struct PageHeader {
    pub left: String,
    pub right: String,
}

pub struct Canvas {
    pages: Vec<Page>,
    header: PageHeader,
    x: f32,
    y: f32,
    style: Style,
    size: f32,
    text_color: Rgb,
    draw_color: Rgb,
}

impl Canvas {
    /// A canvas with its first page already started.
    pub fn new(header: PageHeader) -> Self {
        let mut canvas = Self {
            pages: Vec::new(),
            header,
            x: MARGIN,
            y: MARGIN,
            style: Style::Regular,
            size: 10.0,
            text_color: Rgb::grey(0),
            draw_color: Rgb::grey(0),
        };
        canvas.add_page();
        canvas
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn set_font(&mut self, style: Style, size: f32) {
        self.style = style;
        self.size = size;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.x = MARGIN;
        self.y = MARGIN;
        self.draw_header();
    }

    fn draw_header(&mut self) {
        let saved = (self.style, self.size, self.text_color, self.draw_color);

        self.set_font(Style::Bold, 10.0);
        self.set_text_color(Rgb::grey(100));
        let left = self.header.left.clone();
        let right = self.header.right.clone();
        self.place_text(MARGIN, 8.0, &left, Align::Left, self.content_width());
        self.place_text(MARGIN, 8.0, &right, Align::Right, self.content_width());
        self.y += 8.0;

        self.set_draw_color(Rgb::grey(200));
        self.rule(MARGIN, PAGE_WIDTH - MARGIN);
        self.y += 4.0;

        (self.style, self.size, self.text_color, self.draw_color) = saved;
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn font_size_mm(&self) -> f32 {
        self.size / PT_PER_MM
    }

    /// Width of `text` in the current font, in millimetres.
    pub fn text_width(&self, text: &str) -> f32 {
        metrics::text_width_pt(text, self.style, self.size) / PT_PER_MM
    }

    fn ensure_room(&mut self, h: f32) {
        if self.y + h > PAGE_HEIGHT - BOTTOM_MARGIN {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
    }

    fn push_text(&mut self, x: f32, h: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let baseline = self.y + 0.5 * h + 0.3 * self.font_size_mm();
        let op = DrawOp::Text {
            x,
            y: baseline,
            style: self.style,
            size: self.size,
            color: self.text_color,
            text: text.to_string(),
        };
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn place_text(&mut self, x: f32, h: f32, text: &str, align: Align, width: f32) {
        let text_x = match align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (width - self.text_width(text)) / 2.0,
            Align::Right => x + width - CELL_PADDING - self.text_width(text),
        };
        self.push_text(text_x, h, text);
    }

    /// A full-width line of text, after which the cursor moves to the next line.
    pub fn cell(&mut self, h: f32, text: &str, align: Align) {
        self.ensure_room(h);
        let width = PAGE_WIDTH - MARGIN - self.x;
        self.place_text(self.x, h, text, align, width);
        self.x = MARGIN;
        self.y += h;
    }

    /// Flow `text` from the cursor, wrapping at spaces when it reaches the
    /// right margin. The cursor stays at the end of the text.
    pub fn write(&mut self, h: f32, text: &str) {
        let right = PAGE_WIDTH - MARGIN;
        let mut rest = text;

        while !rest.is_empty() {
            self.ensure_room(h);
            let fit = self.fitting_prefix(rest, right - self.x);

            if fit == rest.len() {
                self.push_text(self.x, h, rest);
                self.x += self.text_width(rest);
                return;
            }

            let space = if rest[fit..].starts_with(' ') {
                Some(fit)
            } else {
                rest[..fit].rfind(' ')
            };

            match space {
                Some(pos) => {
                    let line = &rest[..pos];
                    self.push_text(self.x, h, line);
                    rest = &rest[pos + 1..];
                }
                None if self.x > MARGIN + 0.01 => {
                    // The word fits on a fresh line; don't split it here
                }
                None => {
                    // A single word wider than the page: break it anywhere
                    let cut = if fit == 0 {
                        rest.chars().next().map(char::len_utf8).unwrap_or(rest.len())
                    } else {
                        fit
                    };
                    self.push_text(self.x, h, &rest[..cut]);
                    rest = &rest[cut..];
                }
            }

            self.x = MARGIN;
            self.y += h;
        }
    }

    /// Byte length of the longest prefix of `text` no wider than `width`.
    fn fitting_prefix(&self, text: &str, width: f32) -> usize {
        let limit_pt = width * PT_PER_MM;
        let mut used = 0.0;
        for (i, c) in text.char_indices() {
            used += metrics::char_width(c, self.style) as f32 * self.size / 1000.0;
            if used > limit_pt {
                return i;
            }
        }
        text.len()
    }

    /// Carriage return plus `h` millimetres down.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    /// Horizontal line at the cursor's height.
    pub fn rule(&mut self, x1: f32, x2: f32) {
        let op = DrawOp::Line {
            x1,
            y1: self.y,
            x2,
            y2: self.y,
            color: self.draw_color,
            width: 0.2,
        };
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Stamp "Page n/N" footers and hand back the pages.
    pub fn finish(mut self) -> Vec<Page> {
        let total = self.pages.len();
        let size = 8.0;
        let font_mm = size / PT_PER_MM;

        for (index, page) in self.pages.iter_mut().enumerate() {
            let label = format!("Page {}/{}", index + 1, total);
            let width = metrics::text_width_pt(&label, Style::Regular, size) / PT_PER_MM;
            let top = PAGE_HEIGHT - 15.0;
            page.ops.push(DrawOp::Text {
                x: MARGIN + (PAGE_WIDTH - 2.0 * MARGIN - width) / 2.0,
                y: top + 5.0 + 0.3 * font_mm,
                style: Style::Regular,
                size,
                color: Rgb::grey(150),
                text: label,
            });
        }

        self.pages
    }
}
