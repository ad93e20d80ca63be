//! Splice rendered annotations into a slide's base document.

use std::sync::Arc;

use slidecast_model::canvas::{BaseDocument, SVG_CLOSING_TAG};
use slidecast_model::shape::ShapeRecord;

use crate::geometry::{self, GeometryError};

/// A shape that was skipped while composing.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFault {
    pub shape_id: Option<String>,
    pub error: GeometryError,
}

/// An annotated slide document.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub svg: String,
    pub faults: Vec<ShapeFault>,
    /// `false` when the base had no closing tag and one was appended.
    pub closed: bool,
}

/// Render `shapes` in order and insert them before the final `</svg>`.
///
/// Shapes that fail to render are left out and returned as faults.
pub fn compose(base: &BaseDocument, shapes: &[Arc<ShapeRecord>]) -> Composition {
    let canvas = base.canvas();
    let mut faults = Vec::new();
    let mut annotations = String::new();

    for shape in shapes {
        match geometry::render(shape, canvas) {
            Ok(Some(primitive)) => annotations.push_str(&primitive.to_svg()),
            Ok(None) => {}
            Err(error) => faults.push(ShapeFault {
                shape_id: shape.field("shapeId").map(str::to_string),
                error,
            }),
        }
    }

    let source = base.svg();
    let (svg, closed) = match base.closing_tag_offset() {
        Some(offset) => {
            let mut svg = String::with_capacity(source.len() + annotations.len());
            svg.push_str(&source[..offset]);
            svg.push_str(&annotations);
            svg.push_str(&source[offset..]);
            (svg, true)
        }
        None => (format!("{source}{annotations}{SVG_CLOSING_TAG}"), false),
    };

    Composition {
        svg,
        faults,
        closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_model::canvas::Canvas;

    fn base(svg: &str) -> BaseDocument {
        BaseDocument::new(svg, Canvas::new(100.0, 100.0))
    }

    fn rect(id: &str) -> Arc<ShapeRecord> {
        Arc::new(
            ShapeRecord::default()
                .with("shapeId", id)
                .with("type", "rectangle")
                .with("color", "0")
                .with("thickness", "1")
                .with("dataPoints", "0,0,50,50"),
        )
    }

    #[test]
    fn test_annotations_go_before_final_closing_tag() {
        let doc = base(r#"<svg width="100" height="100"><svg id="inner"></svg></svg>"#);
        let composed = compose(&doc, &[rect("a")]);
        assert!(composed.closed);
        assert!(composed.faults.is_empty());
        assert!(composed
            .svg
            .starts_with(r#"<svg width="100" height="100"><svg id="inner"></svg><rect "#));
        assert!(composed.svg.ends_with("/></svg>"));
    }

    #[test]
    fn test_failed_shape_is_skipped() {
        let broken = Arc::new(
            ShapeRecord::default()
                .with("shapeId", "bad")
                .with("type", "pencil"),
        );
        let composed = compose(&base("<svg></svg>"), &[broken, rect("ok")]);
        assert_eq!(composed.faults.len(), 1);
        assert_eq!(composed.faults[0].shape_id.as_deref(), Some("bad"));
        assert_eq!(composed.svg.matches("<rect").count(), 1);
    }

    #[test]
    fn test_missing_closing_tag_is_repaired() {
        let composed = compose(&base("<svg>"), &[rect("a")]);
        assert!(!composed.closed);
        assert!(composed.svg.starts_with("<svg><rect "));
        assert!(composed.svg.ends_with("</svg>"));
    }

    #[test]
    fn test_no_shapes_keeps_base() {
        let source = r#"<svg width="100" height="100"><g/></svg>"#;
        assert_eq!(compose(&base(source), &[]).svg, source);
    }
}
