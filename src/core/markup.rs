// markup -> styled text lines
//
// the output region holds raw html from the endpoint. terminals can't show
// html, so it gets flattened into lines of fragments that carry just enough
// style (bold, italic, ...) for the ui to map onto spans.

use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
    pub heading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub emphasis: Emphasis,
}

pub type MarkupLine = Vec<Fragment>;

pub fn render(markup: &str) -> Vec<MarkupLine> {
    let fragment = Html::parse_fragment(markup);
    let mut builder = Builder::default();
    builder.walk(fragment.root_element(), Emphasis::default());
    builder.finish()
}

/// Lines of text with every tag dropped.
pub fn plain_text(markup: &str) -> String {
    render(markup)
        .iter()
        .map(|line| line.iter().map(|f| f.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct Builder {
    lines: Vec<MarkupLine>,
    current: MarkupLine,
    pending_space: Option<Emphasis>,
}

impl Builder {
    fn walk(&mut self, element: ElementRef<'_>, emphasis: Emphasis) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text, emphasis);
                continue;
            }

            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };

            match child.value().name() {
                "script" | "style" | "head" | "template" => {}
                "br" => self.hard_break(),
                "b" | "strong" => self.walk(child, Emphasis { bold: true, ..emphasis }),
                "i" | "em" => self.walk(child, Emphasis { italic: true, ..emphasis }),
                "u" => self.walk(child, Emphasis { underline: true, ..emphasis }),
                "code" | "kbd" | "pre" => self.walk(child, Emphasis { code: true, ..emphasis }),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    self.block_break();
                    self.walk(
                        child,
                        Emphasis {
                            bold: true,
                            heading: true,
                            ..emphasis
                        },
                    );
                    self.block_break();
                }
                "li" => {
                    self.block_break();
                    self.push_raw("- ", emphasis);
                    self.walk(child, emphasis);
                    self.block_break();
                }
                "p" | "div" | "tr" | "ul" | "ol" | "table" | "section" | "article"
                | "blockquote" | "dt" | "dd" => {
                    self.block_break();
                    self.walk(child, emphasis);
                    self.block_break();
                }
                _ => self.walk(child, emphasis),
            }
        }
    }

    // whitespace collapses to single spaces and never starts a line. a
    // space keeps the style of the text it appeared in.
    fn push_text(&mut self, text: &str, emphasis: Emphasis) {
        let mut out = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                if self.pending_space.is_none() {
                    self.pending_space = Some(emphasis);
                }
                continue;
            }
            if let Some(space) = self.pending_space.take() {
                if !out.is_empty() {
                    out.push(' ');
                } else if !self.ends_with_space() {
                    self.push_raw(" ", space);
                }
            }
            out.push(ch);
        }
        if !out.is_empty() {
            self.push_raw(&out, emphasis);
        }
    }

    fn ends_with_space(&self) -> bool {
        self.current
            .last()
            .and_then(|f| f.text.chars().last())
            .is_none_or(char::is_whitespace)
    }

    fn push_raw(&mut self, text: &str, emphasis: Emphasis) {
        match self.current.last_mut() {
            Some(last) if last.emphasis == emphasis => last.text.push_str(text),
            _ => self.current.push(Fragment {
                text: text.to_string(),
                emphasis,
            }),
        }
    }

    fn hard_break(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.pending_space = None;
    }

    fn block_break(&mut self) {
        if !self.current.is_empty() {
            self.hard_break();
        }
        self.pending_space = None;
    }

    fn finish(mut self) -> Vec<MarkupLine> {
        self.block_break();
        self.lines
    }
}
