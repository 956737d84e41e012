//! Markdown to structured preview.
//!
//! [`render`] is a pure function of the note content. The views call it on
//! every draw, so the preview always reflects the current buffer.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Shown instead of a document when there is no content.
pub const PLACEHOLDER: &str = "Start typing to see preview...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    /// Links are opened outside the editor, never in place.
    pub opens_new_context: bool,
}

/// A run of inline text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    pub link: Option<Link>,
}

pub type Cell = Vec<Span>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    /// `start` is set for ordered lists.
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    CodeBlock { lang: Option<String>, code: String },
    BlockQuote(Vec<Block>),
    Rule,
    Table { header: Vec<Cell>, rows: Vec<Vec<Cell>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Placeholder,
    Document(Vec<Block>),
}

/// Concatenated text of a run of spans.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

pub fn render(content: &str) -> Preview {
    if content.is_empty() {
        return Preview::Placeholder;
    }

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = Builder::new();
    for event in Parser::new_ext(content, options) {
        builder.event(event);
    }

    Preview::Document(builder.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Heading(u8),
    Paragraph,
    /// Text directly inside a tight list item, with no paragraph around it.
    Implicit,
    Cell,
}

enum Frame {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Item(Vec<Block>),
    Text {
        kind: TextKind,
        spans: Vec<Span>,
    },
    Code {
        lang: Option<String>,
        code: String,
    },
    Table {
        header: Vec<Cell>,
        rows: Vec<Vec<Cell>>,
    },
    Row(Vec<Cell>),
}

struct Builder {
    frames: Vec<Frame>,
    strong: u32,
    emphasis: u32,
    strikethrough: u32,
    link: Option<Link>,
}

impl Builder {
    fn new() -> Self {
        Self {
            frames: vec![Frame::Root(Vec::new())],
            strong: 0,
            emphasis: 0,
            strikethrough: 0,
            link: None,
        }
    }

    fn style(&self) -> SpanStyle {
        SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text, false),
            Event::Code(code) => self.text(&code, true),
            Event::SoftBreak => self.text(" ", false),
            Event::HardBreak => self.text("\n", false),
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }, false),
            Event::Rule => {
                self.close_implicit();
                self.attach(Block::Rule);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => self.open(Frame::Text {
                kind: TextKind::Heading(level as u8),
                spans: Vec::new(),
            }),
            Tag::Paragraph => self.open(Frame::Text {
                kind: TextKind::Paragraph,
                spans: Vec::new(),
            }),
            Tag::List(start) => self.open(Frame::List {
                start,
                items: Vec::new(),
            }),
            Tag::Item => self.open(Frame::Item(Vec::new())),
            Tag::BlockQuote { .. } => self.open(Frame::Quote(Vec::new())),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.open(Frame::Code {
                    lang,
                    code: String::new(),
                });
            }
            Tag::Table(_) => self.open(Frame::Table {
                header: Vec::new(),
                rows: Vec::new(),
            }),
            Tag::TableHead | Tag::TableRow => self.open(Frame::Row(Vec::new())),
            Tag::TableCell => self.open(Frame::Text {
                kind: TextKind::Cell,
                spans: Vec::new(),
            }),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => {
                self.link = Some(Link {
                    href: dest_url.to_string(),
                    opens_new_context: true,
                });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading { .. } | TagEnd::Paragraph => {
                if let Some(Frame::Text { kind, spans }) = self.pop() {
                    self.attach(text_block(kind, spans));
                }
            }
            TagEnd::TableCell => {
                if let Some(Frame::Text { spans, .. }) = self.pop() {
                    if let Some(Frame::Row(cells)) = self.frames.last_mut() {
                        cells.push(spans);
                    }
                }
            }
            TagEnd::TableHead => {
                if let Some(Frame::Row(cells)) = self.pop() {
                    if let Some(Frame::Table { header, .. }) = self.frames.last_mut() {
                        *header = cells;
                    }
                }
            }
            TagEnd::TableRow => {
                if let Some(Frame::Row(cells)) = self.pop() {
                    if let Some(Frame::Table { rows, .. }) = self.frames.last_mut() {
                        rows.push(cells);
                    }
                }
            }
            TagEnd::Table => {
                if let Some(Frame::Table { header, rows }) = self.pop() {
                    self.attach(Block::Table { header, rows });
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Frame::Code { lang, mut code }) = self.pop() {
                    if code.ends_with('\n') {
                        code.pop();
                    }
                    self.attach(Block::CodeBlock { lang, code });
                }
            }
            TagEnd::Item => {
                self.close_implicit();
                if let Some(Frame::Item(blocks)) = self.pop() {
                    if let Some(Frame::List { items, .. }) = self.frames.last_mut() {
                        items.push(blocks);
                    }
                }
            }
            TagEnd::List { .. } => {
                if let Some(Frame::List { start, items }) = self.pop() {
                    self.attach(Block::List { start, items });
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.close_implicit();
                if let Some(Frame::Quote(blocks)) = self.pop() {
                    self.attach(Block::BlockQuote(blocks));
                }
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }

    fn text(&mut self, text: &str, code: bool) {
        if let Some(Frame::Code { code: body, .. }) = self.frames.last_mut() {
            body.push_str(text);
            return;
        }

        let span = Span {
            text: text.to_string(),
            style: SpanStyle {
                code,
                ..self.style()
            },
            link: self.link.clone(),
        };

        match self.frames.last_mut() {
            Some(Frame::Text { spans, .. }) => push_span(spans, span),
            _ => self.frames.push(Frame::Text {
                kind: TextKind::Implicit,
                spans: vec![span],
            }),
        }
    }

    fn open(&mut self, frame: Frame) {
        self.close_implicit();
        self.frames.push(frame);
    }

    /// The root frame is never popped.
    fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    fn close_implicit(&mut self) {
        if matches!(
            self.frames.last(),
            Some(Frame::Text {
                kind: TextKind::Implicit,
                ..
            })
        ) {
            if let Some(Frame::Text { spans, .. }) = self.pop() {
                self.attach(Block::Paragraph(spans));
            }
        }
    }

    fn attach(&mut self, block: Block) {
        match self.frames.last_mut() {
            Some(Frame::Root(blocks) | Frame::Quote(blocks) | Frame::Item(blocks)) => {
                blocks.push(block);
            }
            _ => tracing::debug!("dropping markdown block outside of a container"),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_implicit();
        while self.frames.len() > 1 {
            self.frames.pop();
        }
        match self.frames.pop() {
            Some(Frame::Root(blocks)) => blocks,
            _ => Vec::new(),
        }
    }
}

fn text_block(kind: TextKind, spans: Vec<Span>) -> Block {
    match kind {
        TextKind::Heading(level) => Block::Heading { level, spans },
        TextKind::Paragraph | TextKind::Implicit | TextKind::Cell => Block::Paragraph(spans),
    }
}

/// Merge into the previous span when style and link match.
fn push_span(spans: &mut Vec<Span>, span: Span) {
    if let Some(last) = spans.last_mut() {
        if last.style == span.style && last.link == span.link {
            last.text.push_str(&span.text);
            return;
        }
    }
    spans.push(span);
}
