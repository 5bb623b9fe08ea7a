use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Tag};
use serde::Deserialize;

use crate::{
    entities::{image::ImageRef, option_fields::null_as_default},
    infrastructure::cms::image::ImageUrlBuilder,
    utils::html::sanitize_html,
};

const DEFAULT_IMAGE_ALT: &str = "Blog post image";

// ───── Typed tree ────────────────────────────────────────────────────

/// Rich text (post bodies, author bios, long project descriptions) decoded
/// from the store's block format into a closed set of block kinds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<RawBlock>")]
pub struct RichText(pub Vec<Block>);

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, children: Vec<Span> },
    Paragraph { children: Vec<Span> },
    Quote { children: Vec<Span> },
    List { kind: ListKind, items: Vec<ListItem> },
    Image(ImageRef),
    Code { code: String, language: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

/// One list entry. `kind` is the item's own list style, so a numbered
/// sub-list can sit inside a bullet list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub kind: ListKind,
    pub level: u8,
    pub children: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Strong,
    Em,
    Code,
    Underline,
    StrikeThrough,
    Link { href: String },
}

// ───── Wire format ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
enum RawBlock {
    Block(RawTextBlock),
    Image(ImageRef),
    Code(RawCode),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct RawTextBlock {
    #[serde(default)]
    style: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    children: Vec<RawSpan>,
    #[serde(rename = "markDefs", default, deserialize_with = "null_as_default")]
    mark_defs: Vec<RawMarkDef>,
    #[serde(rename = "listItem", default)]
    list_item: Option<String>,
    #[serde(default)]
    level: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    marks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMarkDef {
    #[serde(rename = "_key")]
    key: String,
    #[serde(rename = "_type")]
    kind: String,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCode {
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    #[serde(default)]
    language: Option<String>,
}

impl RawTextBlock {
    fn spans(&self) -> Vec<Span> {
        self.children
            .iter()
            .map(|child| Span {
                text: child.text.clone(),
                marks: child.marks.iter().filter_map(|m| self.resolve_mark(m)).collect(),
            })
            .collect()
    }

    fn resolve_mark(&self, mark: &str) -> Option<Mark> {
        match mark {
            "strong" => Some(Mark::Strong),
            "em" => Some(Mark::Em),
            "code" => Some(Mark::Code),
            "underline" => Some(Mark::Underline),
            "strike-through" => Some(Mark::StrikeThrough),
            key => self
                .mark_defs
                .iter()
                .find(|def| def.key == key && def.kind == "link")
                .and_then(|def| def.href.clone())
                .map(|href| Mark::Link { href }),
        }
    }

    fn list_kind(&self) -> Option<ListKind> {
        match self.list_item.as_deref()? {
            "number" => Some(ListKind::Number),
            _ => Some(ListKind::Bullet),
        }
    }

    fn into_block(self) -> Block {
        let children = self.spans();
        match self.style.as_deref() {
            Some("blockquote") => Block::Quote { children },
            Some(style) => match heading_level(style) {
                Some(level) => Block::Heading { level, children },
                None => Block::Paragraph { children },
            },
            None => Block::Paragraph { children },
        }
    }
}

fn heading_level(style: &str) -> Option<u8> {
    let level: u8 = style.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

impl From<Vec<RawBlock>> for RichText {
    fn from(raw: Vec<RawBlock>) -> Self {
        let mut blocks: Vec<Block> = Vec::with_capacity(raw.len());

        for block in raw {
            match block {
                RawBlock::Block(text) => match text.list_kind() {
                    Some(kind) => {
                        let item = ListItem {
                            kind,
                            level: text.level.unwrap_or(1).max(1),
                            children: text.spans(),
                        };
                        // Nested items join the open list whatever their kind.
                        if let Some(Block::List { kind: open, items }) = blocks.last_mut() {
                            if *open == kind || item.level > 1 {
                                items.push(item);
                                continue;
                            }
                        }
                        blocks.push(Block::List { kind, items: vec![item] });
                    }
                    None => blocks.push(text.into_block()),
                },
                RawBlock::Image(image) => blocks.push(Block::Image(image)),
                RawBlock::Code(code) => blocks.push(Block::Code {
                    code: code.code,
                    language: code.language.filter(|l| !l.trim().is_empty()),
                }),
                RawBlock::Unknown => {}
            }
        }

        RichText(blocks)
    }
}

// ───── Rendering ─────────────────────────────────────────────────────

impl RichText {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    /// Renders to sanitized HTML. Images whose reference does not resolve
    /// are skipped.
    pub fn to_html(&self, images: &ImageUrlBuilder) -> String {
        let mut events = Vec::new();
        for block in &self.0 {
            block_events(block, images, &mut events);
        }

        let mut raw_html = String::new();
        html::push_html(&mut raw_html, events.into_iter());
        sanitize_html(&raw_html)
    }
}

fn wrap<'a>(tag: Tag<'a>, events: &mut Vec<Event<'a>>, inner: impl FnOnce(&mut Vec<Event<'a>>)) {
    let end = tag.to_end();
    events.push(Event::Start(tag));
    inner(events);
    events.push(Event::End(end));
}

fn heading_tag(level: u8) -> HeadingLevel {
    match level {
        1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}

fn list_tag<'a>(kind: ListKind) -> Tag<'a> {
    match kind {
        ListKind::Bullet => Tag::List(None),
        ListKind::Number => Tag::List(Some(1)),
    }
}

fn block_events<'a>(block: &'a Block, images: &ImageUrlBuilder, events: &mut Vec<Event<'a>>) {
    match block {
        Block::Heading { level, children } => {
            let tag = Tag::Heading {
                level: heading_tag(*level),
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            };
            wrap(tag, events, |events| span_events(children, events));
        }
        Block::Paragraph { children } => {
            wrap(Tag::Paragraph, events, |events| span_events(children, events));
        }
        Block::Quote { children } => {
            wrap(Tag::BlockQuote(None), events, |events| {
                wrap(Tag::Paragraph, events, |events| span_events(children, events));
            });
        }
        Block::List { items, .. } => list_events(items, events),
        Block::Image(image) => {
            let Some(src) = images.url_for(image) else {
                return;
            };
            let alt = image
                .alt
                .as_deref()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(DEFAULT_IMAGE_ALT);

            events.push(Event::Html(CowStr::Borrowed("<figure>")));
            let tag = Tag::Image {
                link_type: LinkType::Inline,
                dest_url: src.into(),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            };
            wrap(tag, events, |events| events.push(Event::Text(alt.into())));
            if let Some(caption) = image.caption.as_deref().filter(|c| !c.trim().is_empty()) {
                events.push(Event::Html(CowStr::Borrowed("<figcaption>")));
                events.push(Event::Text(caption.into()));
                events.push(Event::Html(CowStr::Borrowed("</figcaption>")));
            }
            events.push(Event::Html(CowStr::Borrowed("</figure>")));
        }
        Block::Code { code, language } => {
            let lang = language
                .as_deref()
                .filter(|l| l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+'))
                .unwrap_or("");
            let tag = Tag::CodeBlock(CodeBlockKind::Fenced(lang.into()));
            wrap(tag, events, |events| events.push(Event::Text(code.as_str().into())));
        }
    }
}

/// Items carry their own nesting level. Every open list always has one open
/// item; deeper levels open inside it using the deeper item's own kind.
fn list_events<'a>(items: &'a [ListItem], events: &mut Vec<Event<'a>>) {
    let mut open: Vec<ListKind> = Vec::new();

    for item in items {
        let level = usize::from(item.level.max(1));

        if level > open.len() {
            let mut first = true;
            while open.len() < level {
                if !first {
                    events.push(Event::Start(Tag::Item));
                }
                events.push(Event::Start(list_tag(item.kind)));
                open.push(item.kind);
                first = false;
            }
        } else {
            events.push(Event::End(Tag::Item.to_end()));
            while open.len() > level {
                if let Some(kind) = open.pop() {
                    events.push(Event::End(list_tag(kind).to_end()));
                }
                events.push(Event::End(Tag::Item.to_end()));
            }
            if open.last() != Some(&item.kind) {
                if let Some(kind) = open.pop() {
                    events.push(Event::End(list_tag(kind).to_end()));
                }
                events.push(Event::Start(list_tag(item.kind)));
                open.push(item.kind);
            }
        }

        events.push(Event::Start(Tag::Item));
        span_events(&item.children, events);
    }

    if !open.is_empty() {
        events.push(Event::End(Tag::Item.to_end()));
    }
    while let Some(kind) = open.pop() {
        events.push(Event::End(list_tag(kind).to_end()));
        if !open.is_empty() {
            events.push(Event::End(Tag::Item.to_end()));
        }
    }
}

fn mark_tag(mark: &Mark) -> Option<Tag<'_>> {
    match mark {
        Mark::Strong => Some(Tag::Strong),
        Mark::Em => Some(Tag::Emphasis),
        Mark::StrikeThrough => Some(Tag::Strikethrough),
        Mark::Link { href } => Some(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: href.as_str().into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }),
        Mark::Code | Mark::Underline => None,
    }
}

fn span_events<'a>(spans: &'a [Span], events: &mut Vec<Event<'a>>) {
    for span in spans {
        let underline = span.marks.contains(&Mark::Underline);
        let tags: Vec<Tag<'a>> = span.marks.iter().filter_map(mark_tag).collect();

        for tag in &tags {
            events.push(Event::Start(tag.clone()));
        }
        if underline {
            events.push(Event::InlineHtml(CowStr::Borrowed("<u>")));
        }

        if span.marks.contains(&Mark::Code) {
            events.push(Event::Code(span.text.as_str().into()));
        } else {
            for (i, line) in span.text.split('\n').enumerate() {
                if i > 0 {
                    events.push(Event::HardBreak);
                }
                if !line.is_empty() {
                    events.push(Event::Text(line.into()));
                }
            }
        }

        if underline {
            events.push(Event::InlineHtml(CowStr::Borrowed("</u>")));
        }
        for tag in tags.iter().rev() {
            events.push(Event::End(tag.to_end()));
        }
    }
}
