//! HTML to plain-text conversion
//!
//! Walks the parsed document with `scraper` and keeps what a reader would
//! see: text content, line breaks from `<br>` and block elements, list
//! bullets and link targets. Markup, scripts and styles are dropped.

use scraper::{ElementRef, Html};

/// Elements whose content is never visible
const HIDDEN: &[&str] = &["head", "script", "style", "title", "noscript", "template"];

/// Elements separated from their surroundings by a blank line
const PARAGRAPHS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "table", "blockquote", "pre", "hr",
];

/// Elements that start on a fresh line
const BLOCKS: &[&str] = &[
    "div", "section", "article", "header", "footer", "nav", "aside", "main", "li", "tr", "dl",
    "dt", "dd", "figure", "figcaption", "address", "form", "fieldset",
];

/// Convert an HTML body to plain text
///
/// ```rust
/// use mail_dispatch::email::html_to_text;
///
/// assert_eq!(html_to_text("<b>Hi</b> there"), "Hi there");
/// assert_eq!(html_to_text("<p>one</p><p>two</p>"), "one\n\ntwo");
/// ```
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut buffer = TextBuffer::default();

    // Explicit stack: nesting depth is caller-controlled.
    let mut stack = Vec::new();
    push_children(document.root_element(), &mut stack);

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => buffer.push_text(text),
            Step::Enter(element) => {
                if let Some(close) = open(element, &mut buffer) {
                    stack.push(Step::Leave(close));
                    push_children(element, &mut stack);
                }
            }
            Step::Leave(close) => close.apply(&mut buffer),
        }
    }

    buffer.finish()
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Leave(Close<'a>),
}

/// What to emit once an element's children are done
enum Close<'a> {
    Inline,
    Block { blank_line: bool },
    Cell,
    Preformatted,
    Link { start: usize, href: Option<&'a str> },
}

impl Close<'_> {
    fn apply(self, buffer: &mut TextBuffer) {
        match self {
            Self::Inline => {}
            Self::Block { blank_line } => buffer.block_break(blank_line),
            Self::Cell => buffer.push_text(" "),
            Self::Preformatted => {
                buffer.preformatted -= 1;
                buffer.block_break(true);
            }
            Self::Link { start, href } => {
                let label = buffer.out.get(start..).unwrap_or_default().trim().to_string();
                if let Some(href) = href.map(str::trim) {
                    if !href.is_empty() && !href.starts_with('#') && href != label {
                        buffer.push_text(" ");
                        buffer.push_raw(&format!("[{href}]"));
                    }
                }
            }
        }
    }
}

fn push_children<'a>(element: ElementRef<'a>, stack: &mut Vec<Step<'a>>) {
    let children: Vec<_> = element.children().collect();
    for child in children.into_iter().rev() {
        if let Some(text) = child.value().as_text() {
            let text: &'a str = text;
            stack.push(Step::Text(text));
        } else if let Some(child) = ElementRef::wrap(child) {
            stack.push(Step::Enter(child));
        }
    }
}

/// Emit what precedes an element's children; `None` skips the element
fn open<'a>(element: ElementRef<'a>, buffer: &mut TextBuffer) -> Option<Close<'a>> {
    let name = element.value().name();

    if HIDDEN.contains(&name) {
        return None;
    }

    let close = match name {
        "br" => {
            buffer.line_break();
            Close::Inline
        }
        "li" => {
            buffer.block_break(false);
            buffer.push_raw("* ");
            Close::Block { blank_line: false }
        }
        "td" | "th" => {
            buffer.push_text(" ");
            Close::Cell
        }
        "pre" => {
            buffer.block_break(true);
            buffer.preformatted += 1;
            Close::Preformatted
        }
        "a" => Close::Link {
            start: buffer.out.len(),
            href: element.value().attr("href"),
        },
        _ if PARAGRAPHS.contains(&name) => {
            buffer.block_break(true);
            Close::Block { blank_line: true }
        }
        _ if BLOCKS.contains(&name) => {
            buffer.block_break(false);
            Close::Block { blank_line: false }
        }
        _ => Close::Inline,
    };

    Some(close)
}

/// Output under construction, with whitespace collapsing state
#[derive(Default)]
struct TextBuffer {
    out: String,
    pending_space: bool,
    preformatted: usize,
}

impl TextBuffer {
    fn push_text(&mut self, text: &str) {
        if self.preformatted > 0 {
            self.flush_space();
            self.out.push_str(text);
            return;
        }

        for c in text.chars() {
            if c.is_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.out.push(c);
            }
        }
    }

    fn push_raw(&mut self, text: &str) {
        self.flush_space();
        self.out.push_str(text);
    }

    fn flush_space(&mut self) {
        if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push(' ');
        }
        self.pending_space = false;
    }

    fn line_break(&mut self) {
        self.pending_space = false;
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    fn block_break(&mut self, blank_line: bool) {
        self.pending_space = false;
        self.trim_trailing_spaces();
        if self.out.is_empty() {
            return;
        }

        let wanted = if blank_line { 2 } else { 1 };
        let present = self.out.chars().rev().take_while(|c| *c == '\n').count();
        for _ in present..wanted {
            self.out.push('\n');
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(trimmed);
    }

    fn finish(self) -> String {
        self.out
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_matches('\n')
            .to_string()
    }
}
