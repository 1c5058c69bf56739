use std::collections::{HashMap, HashSet};

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let parser = Parser::new_ext(input, options());
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "hr", "em", "strong", "b", "i", "del", "code", "pre",
        "blockquote", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "h5", "h6", "table",
        "thead", "tbody", "tr", "th", "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("code", ["class"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

/// Top-level block of lesson content, flattened to plain text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkdownBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Code { language: Option<String>, code: String },
    List { ordered: bool, items: Vec<String> },
    Quote { text: String },
    Rule,
}

enum OpenBlock {
    Heading(u8),
    Paragraph,
    Code(Option<String>),
    List(bool),
    Quote,
}

impl OpenBlock {
    fn open(tag: &Tag<'_>) -> Self {
        match tag {
            Tag::Heading { level, .. } => Self::Heading(*level as u8),
            Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.trim().is_empty() => {
                Self::Code(Some(lang.trim().to_owned()))
            }
            Tag::CodeBlock(_) => Self::Code(None),
            Tag::List(start) => Self::List(start.is_some()),
            Tag::BlockQuote(_) => Self::Quote,
            _ => Self::Paragraph,
        }
    }

    fn close(self, text: &str, items: Vec<String>) -> Option<MarkdownBlock> {
        let trimmed = text.trim();
        match self {
            Self::Code(language) => Some(MarkdownBlock::Code {
                language,
                code: text.trim_end_matches('\n').to_owned(),
            }),
            Self::List(ordered) => Some(MarkdownBlock::List { ordered, items }),
            _ if trimmed.is_empty() => None,
            Self::Heading(level) => Some(MarkdownBlock::Heading {
                level,
                text: trimmed.to_owned(),
            }),
            Self::Quote => Some(MarkdownBlock::Quote {
                text: trimmed.to_owned(),
            }),
            Self::Paragraph => Some(MarkdownBlock::Paragraph {
                text: trimmed.to_owned(),
            }),
        }
    }
}

/// Split markdown into display blocks. Inline markup is dropped; nested
/// lists fold into their parent item. Raw HTML is skipped.
#[must_use]
pub fn markdown_blocks(input: &str) -> Vec<MarkdownBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;
    let mut text = String::new();
    let mut items = Vec::new();
    let mut depth = 0usize;

    for event in Parser::new_ext(input, options()) {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    text.clear();
                    items.clear();
                    open = Some(OpenBlock::open(&tag));
                } else if depth == 1 && matches!(tag, Tag::Item) {
                    text.clear();
                }
                depth += 1;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                match end {
                    TagEnd::Item if depth == 1 => {
                        items.push(text.trim().to_owned());
                        text.clear();
                    }
                    TagEnd::Paragraph | TagEnd::Item if depth > 0 => text.push('\n'),
                    _ => {}
                }
                if depth == 0 {
                    if let Some(block) = open
                        .take()
                        .and_then(|block| block.close(&text, std::mem::take(&mut items)))
                    {
                        blocks.push(block);
                    }
                    text.clear();
                }
            }
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::Rule if depth == 0 => blocks.push(MarkdownBlock::Rule),
            Event::TaskListMarker(done) => text.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    blocks
}
