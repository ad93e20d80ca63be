//! Slide base documents and their drawing resolution.
//!
//! A base document is the slide's unannotated SVG. It is treated as opaque
//! text: the only things read out of it are the root element's declared
//! size and the position of the final closing tag.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Closing tag annotations are spliced in front of.
pub const SVG_CLOSING_TAG: &str = "</svg>";

static ROOT_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b[^>]*>").ok());
static WIDTH_ATTR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)width\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:pt|px)?\s*["']"#).ok()
});
static HEIGHT_ATTR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)height\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:pt|px)?\s*["']"#).ok()
});

/// Drawing resolution annotations are scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const HD: Canvas = Canvas {
        width: 1920.0,
        height: 1080.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Read the declared `width`/`height` of the root `<svg>` element.
    ///
    /// Returns `None` when either dimension is missing, not a plain number
    /// (optionally suffixed `pt`/`px`), or zero.
    pub fn from_svg(svg: &str) -> Option<Self> {
        let root = ROOT_TAG.as_ref()?.find(svg)?.as_str();
        let width = dimension(WIDTH_ATTR.as_ref()?, root)?;
        let height = dimension(HEIGHT_ATTR.as_ref()?, root)?;
        Some(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::HD
    }
}

fn dimension(pattern: &Regex, tag: &str) -> Option<f64> {
    let value: f64 = pattern.captures(tag)?.get(1)?.as_str().parse().ok()?;
    (value > 0.0).then_some(value)
}

/// One slide's unannotated vector source.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseDocument {
    svg: String,
    canvas: Canvas,
    declared_size: bool,
}

impl BaseDocument {
    /// Wrap a slide SVG, using `fallback` when it declares no usable size.
    pub fn new(svg: impl Into<String>, fallback: Canvas) -> Self {
        let svg = svg.into();
        let declared = Canvas::from_svg(&svg);
        Self {
            canvas: declared.unwrap_or(fallback),
            declared_size: declared.is_some(),
            svg,
        }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether the canvas came from the document rather than the fallback.
    pub fn has_declared_size(&self) -> bool {
        self.declared_size
    }

    /// Byte offset of the final closing tag, if the document has one.
    pub fn closing_tag_offset(&self) -> Option<usize> {
        self.svg.rfind(SVG_CLOSING_TAG)
    }
}
