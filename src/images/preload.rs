//! Image preload hints.
//!
//! A preload hint asks the browser to fetch and cache an image without
//! blocking anything. Hints are appended to a [`DocumentHead`]; nothing is
//! validated and nothing can fail.

use std::fmt;

/// A `<link rel="preload" as="image">` hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHint {
    href: String,
}

impl LinkHint {
    /// Link relation of every image preload hint.
    pub const REL: &'static str = "preload";
    /// Destination type of every image preload hint.
    pub const AS: &'static str = "image";

    /// Build an image preload hint for `href`. The URL is taken as-is.
    pub fn image(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// The target URL.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Value for one entry of an HTTP `Link` header.
    pub fn to_link_header(&self) -> String {
        format!("<{}>; rel={}; as={}", self.href, Self::REL, Self::AS)
    }
}

impl fmt::Display for LinkHint {
    /// Renders the hint as an HTML `<link>` element.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<link rel="{}" as="{}" href="{}">"#,
            Self::REL,
            Self::AS,
            escape_attr(&self.href)
        )
    }
}

/// Anything that can hold preload hints, such as a page head being rendered.
pub trait DocumentHead {
    /// Append one hint. Must not fail.
    fn append_hint(&mut self, hint: LinkHint);
}

impl DocumentHead for Vec<LinkHint> {
    fn append_hint(&mut self, hint: LinkHint) {
        self.push(hint);
    }
}

/// Append an image preload hint to `head` for each URL, in order.
///
/// Duplicates are kept; the browser cache is the only deduplication.
pub fn preload_images<H, I, S>(head: &mut H, urls: I)
where
    H: DocumentHead + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for url in urls {
        head.append_hint(LinkHint::image(url));
    }
}

/// In-memory head that renders collected hints for server-side pages.
#[derive(Debug, Clone, Default)]
pub struct HeadHints {
    hints: Vec<LinkHint>,
}

impl HeadHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(&self) -> &[LinkHint] {
        &self.hints
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// All hints as `<link>` elements, one per line.
    pub fn render_html(&self) -> String {
        self.hints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All hints as a single `Link` header value, or `None` when empty.
    pub fn link_header(&self) -> Option<String> {
        if self.hints.is_empty() {
            return None;
        }
        Some(
            self.hints
                .iter()
                .map(LinkHint::to_link_header)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl DocumentHead for HeadHints {
    fn append_hint(&mut self, hint: LinkHint) {
        self.hints.push(hint);
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
