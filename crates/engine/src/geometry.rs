//! Annotation geometry.
//!
//! Turns one completed shape record into one SVG primitive, scaled to the
//! slide's canvas. Rendering is pure and per shape: a malformed record only
//! fails its own primitive.
//!
//! # Shape grammar
//!
//! | type        | points used                     | primitive          |
//! |-------------|---------------------------------|--------------------|
//! | `pencil`    | consumed by `commands`          | rounded path       |
//! | `line`      | 2 (implicit commands `1,2`)     | rounded path       |
//! | `ellipse`   | 2 opposite corners              | ellipse            |
//! | `rectangle` | 2 opposite corners              | rect               |
//! | `triangle`  | 2 (apex row, base row)          | closed path        |
//! | `text`      | none; uses `x`/`y` percentages  | text, or nothing   |
//!
//! Pencil commands: `1` move (1 point), `2` line (1), `3` quadratic (2),
//! `4` cubic (3).

use std::fmt;
use std::str::FromStr;

use slidecast_model::canvas::Canvas;
use slidecast_model::shape::{Point2D, ShapeFieldError, ShapeRecord};

/// Annotation types understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Pencil,
    Line,
    Ellipse,
    Rectangle,
    Triangle,
    Text,
}

impl ShapeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::Pencil => "pencil",
            ShapeType::Line => "line",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Rectangle => "rectangle",
            ShapeType::Triangle => "triangle",
            ShapeType::Text => "text",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pencil" => Ok(ShapeType::Pencil),
            "line" => Ok(ShapeType::Line),
            "ellipse" => Ok(ShapeType::Ellipse),
            "rectangle" => Ok(ShapeType::Rectangle),
            "triangle" => Ok(ShapeType::Triangle),
            "text" => Ok(ShapeType::Text),
            other => Err(GeometryError::UnsupportedShapeType {
                shape_type: other.to_string(),
            }),
        }
    }
}

/// Why a shape could not be drawn.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("shape has no type")]
    MissingType,

    #[error("unsupported shape type {shape_type:?}")]
    UnsupportedShapeType { shape_type: String },

    #[error(transparent)]
    Field(#[from] ShapeFieldError),

    #[error("unknown pencil command {command:?}")]
    UnknownPathCommand { command: String },

    #[error("pencil command #{position} needs {needed} point(s), {remaining} left")]
    PointUnderflow {
        position: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("{shape_type} needs {needed} points, got {found}")]
    NotEnoughPoints {
        shape_type: ShapeType,
        needed: usize,
        found: usize,
    },
}

/// One segment of a path, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2D),
    LineTo(Point2D),
    QuadTo(Point2D, Point2D),
    CubicTo(Point2D, Point2D, Point2D),
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M{}, {}", p.x, p.y),
            PathCommand::LineTo(p) => write!(f, "L{}, {}", p.x, p.y),
            PathCommand::QuadTo(c, p) => write!(f, "Q{}, {}, {}, {}", c.x, c.y, p.x, p.y),
            PathCommand::CubicTo(c1, c2, p) => write!(
                f,
                "C{}, {}, {}, {}, {}, {}",
                c1.x, c1.y, c2.x, c2.y, p.x, p.y
            ),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// Outline color and width shared by all stroked primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Packed `0xRRGGBB`.
    pub color: u32,
    /// Width in canvas pixels.
    pub width: f64,
}

/// A single drawable SVG element.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Freehand stroke: round joins and caps.
    Stroke {
        commands: Vec<PathCommand>,
        stroke: Stroke,
    },
    /// Closed outline such as a triangle.
    Outline {
        commands: Vec<PathCommand>,
        stroke: Stroke,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        stroke: Stroke,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        font_size: f64,
        color: u32,
        content: String,
    },
}

impl Primitive {
    /// Path commands, for path-based primitives.
    pub fn commands(&self) -> Option<&[PathCommand]> {
        match self {
            Primitive::Stroke { commands, .. } | Primitive::Outline { commands, .. } => {
                Some(commands)
            }
            _ => None,
        }
    }

    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Stroke { commands, stroke } => write!(
                f,
                r##"<path stroke="#{:06x}" fill="none" stroke-linejoin="round" stroke-linecap="round" stroke-width="{:.2}" d="{}"/>"##,
                stroke.color,
                stroke.width,
                PathData(commands)
            ),
            Primitive::Outline { commands, stroke } => write!(
                f,
                r##"<path d="{}" fill="none" stroke="#{:06x}" stroke-width="{}"/>"##,
                PathData(commands),
                stroke.color,
                stroke.width
            ),
            Primitive::Ellipse {
                cx,
                cy,
                rx,
                ry,
                stroke,
            } => write!(
                f,
                r##"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" fill="none" stroke="#{:06x}" stroke-width="{}"/>"##,
                stroke.color, stroke.width
            ),
            Primitive::Rect {
                x,
                y,
                width,
                height,
                stroke,
            } => write!(
                f,
                r##"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="none" stroke="#{:06x}" stroke-width="{}"/>"##,
                stroke.color, stroke.width
            ),
            Primitive::Text {
                x,
                y,
                width,
                height,
                font_size,
                color,
                content,
            } => write!(
                f,
                r##"<text x="{x}" y="{y}" width="{width}" height="{height}" font-family="Arial" font-size="{font_size}" fill="#{color:06x}">{}</text>"##,
                quick_xml::escape::escape(content.as_str())
            ),
        }
    }
}

struct PathData<'a>(&'a [PathCommand]);

impl fmt::Display for PathData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Render one shape record at the given canvas size.
///
/// `Ok(None)` means the shape is valid but draws nothing (an empty text box).
pub fn render(shape: &ShapeRecord, canvas: Canvas) -> Result<Option<Primitive>, GeometryError> {
    let shape_type: ShapeType = shape.shape_type().ok_or(GeometryError::MissingType)?.parse()?;

    let primitive = match shape_type {
        ShapeType::Pencil => {
            let commands = shape.required("commands")?;
            pencil(shape, commands, canvas)?
        }
        ShapeType::Line => pencil(shape, "1,2", canvas)?,
        ShapeType::Ellipse => ellipse(shape, canvas)?,
        ShapeType::Rectangle => rectangle(shape, canvas)?,
        ShapeType::Triangle => triangle(shape, canvas)?,
        ShapeType::Text => return text(shape, canvas),
    };
    Ok(Some(primitive))
}

fn stroke(shape: &ShapeRecord, canvas: Canvas) -> Result<Stroke, GeometryError> {
    Ok(Stroke {
        color: shape.color("color")?,
        width: shape.number("thickness")? / 100.0 * canvas.width,
    })
}

fn scale(point: Point2D, canvas: Canvas) -> Point2D {
    Point2D::new(point.x * canvas.width, point.y * canvas.height)
}

fn corners(
    shape: &ShapeRecord,
    shape_type: ShapeType,
) -> Result<(Point2D, Point2D), GeometryError> {
    let points = shape.data_points()?;
    match points.as_slice() {
        [first, second, ..] => Ok((*first, *second)),
        _ => Err(GeometryError::NotEnoughPoints {
            shape_type,
            needed: 2,
            found: points.len(),
        }),
    }
}

fn pencil(shape: &ShapeRecord, commands: &str, canvas: Canvas) -> Result<Primitive, GeometryError> {
    let stroke = stroke(shape, canvas)?;
    let points = shape.data_points()?;
    let mut remaining = points.iter().map(|p| scale(*p, canvas));
    let mut left = points.len();

    let mut path = Vec::new();
    for (position, code) in commands
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .enumerate()
    {
        let needed = match code {
            "1" | "2" => 1,
            "3" => 2,
            "4" => 3,
            other => {
                return Err(GeometryError::UnknownPathCommand {
                    command: other.to_string(),
                })
            }
        };
        if left < needed {
            return Err(GeometryError::PointUnderflow {
                position,
                needed,
                remaining: left,
            });
        }
        left -= needed;

        let mut take = || remaining.next().unwrap_or(Point2D::new(0.0, 0.0));
        let command = match code {
            "1" => PathCommand::MoveTo(take()),
            "2" => PathCommand::LineTo(take()),
            "3" => {
                let control = take();
                PathCommand::QuadTo(control, take())
            }
            _ => {
                let first = take();
                let second = take();
                PathCommand::CubicTo(first, second, take())
            }
        };
        path.push(command);
    }

    Ok(Primitive::Stroke {
        commands: path,
        stroke,
    })
}

fn ellipse(shape: &ShapeRecord, canvas: Canvas) -> Result<Primitive, GeometryError> {
    let (a, b) = corners(shape, ShapeType::Ellipse)?;
    Ok(Primitive::Ellipse {
        cx: (a.x + b.x) / 2.0 * canvas.width,
        cy: (a.y + b.y) / 2.0 * canvas.height,
        rx: (b.x - a.x).abs() / 2.0 * canvas.width,
        ry: (b.y - a.y).abs() / 2.0 * canvas.height,
        stroke: stroke(shape, canvas)?,
    })
}

fn rectangle(shape: &ShapeRecord, canvas: Canvas) -> Result<Primitive, GeometryError> {
    let (a, b) = corners(shape, ShapeType::Rectangle)?;
    let (left, right) = (a.x.min(b.x), a.x.max(b.x));
    let (top, bottom) = (a.y.min(b.y), a.y.max(b.y));
    Ok(Primitive::Rect {
        x: left * canvas.width,
        y: top * canvas.height,
        width: (right - left) * canvas.width,
        height: (bottom - top) * canvas.height,
        stroke: stroke(shape, canvas)?,
    })
}

fn triangle(shape: &ShapeRecord, canvas: Canvas) -> Result<Primitive, GeometryError> {
    let (a, b) = corners(shape, ShapeType::Triangle)?;
    let apex = Point2D::new((b.x - a.x) / 2.0 + a.x, a.y);
    let bottom_left = Point2D::new(a.x, b.y);
    let bottom_right = Point2D::new(b.x, b.y);
    Ok(Primitive::Outline {
        commands: vec![
            PathCommand::MoveTo(scale(apex, canvas)),
            PathCommand::LineTo(scale(bottom_left, canvas)),
            PathCommand::LineTo(scale(bottom_right, canvas)),
            PathCommand::Close,
        ],
        stroke: stroke(shape, canvas)?,
    })
}

fn text(shape: &ShapeRecord, canvas: Canvas) -> Result<Option<Primitive>, GeometryError> {
    let Some(content) = shape.field("text") else {
        return Ok(None);
    };
    let box_width = shape.number("textBoxWidth")?;
    if box_width == 0.0 {
        return Ok(None);
    }

    Ok(Some(Primitive::Text {
        x: shape.number("x")? / 100.0 * canvas.width,
        y: shape.number("y")? / 100.0 * canvas.height,
        width: box_width / 100.0 * canvas.width,
        height: shape.number("textBoxHeight")? / 100.0 * canvas.height,
        font_size: shape.number("calcedFontSize")? / 100.0 * canvas.height,
        color: shape.color("fontColor")?,
        content: content.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SQUARE: Canvas = Canvas {
        width: 1000.0,
        height: 1000.0,
    };

    fn shape(kind: &str, points: &str) -> ShapeRecord {
        ShapeRecord::default()
            .with("type", kind)
            .with("color", "255")
            .with("thickness", "1")
            .with("dataPoints", points)
    }

    fn text_shape(box_width: &str) -> ShapeRecord {
        ShapeRecord::default()
            .with("type", "text")
            .with("text", "Hello <world>")
            .with("x", "10")
            .with("y", "20")
            .with("textBoxWidth", box_width)
            .with("textBoxHeight", "5")
            .with("calcedFontSize", "2")
            .with("fontColor", "0")
    }

    #[test]
    fn test_pencil_replays_commands() {
        let record = shape("pencil", "0,0,50,50,100,100").with("commands", "1,2,2");
        let primitive = render(&record, SQUARE).unwrap().unwrap();
        assert_eq!(
            primitive.commands().unwrap(),
            &[
                PathCommand::MoveTo(Point2D::new(0.0, 0.0)),
                PathCommand::LineTo(Point2D::new(500.0, 500.0)),
                PathCommand::LineTo(Point2D::new(1000.0, 1000.0)),
            ]
        );
        let svg = primitive.to_svg();
        assert!(svg.contains(r#"d="M0, 0 L500, 500 L1000, 1000""#), "{svg}");
        assert!(svg.contains(r##"stroke="#0000ff""##));
        assert!(svg.contains(r#"stroke-width="10.00""#));
    }

    #[test]
    fn test_pencil_curves() {
        let record =
            shape("pencil", "0,0,10,10,20,20,30,30,40,40,50,50").with("commands", "1,3,4");
        let primitive = render(&record, SQUARE).unwrap().unwrap();
        let svg = primitive.to_svg();
        assert!(
            svg.contains("M0, 0 Q100, 100, 200, 200 C300, 300, 400, 400, 500, 500"),
            "{svg}"
        );
    }

    #[test]
    fn test_pencil_point_underflow() {
        let record = shape("pencil", "0,0,50,50").with("commands", "1,2,2");
        assert_eq!(
            render(&record, SQUARE).unwrap_err(),
            GeometryError::PointUnderflow {
                position: 2,
                needed: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn test_pencil_unknown_command() {
        let record = shape("pencil", "0,0").with("commands", "1,9");
        assert!(matches!(
            render(&record, SQUARE).unwrap_err(),
            GeometryError::UnknownPathCommand { .. }
        ));
    }

    #[test]
    fn test_line_uses_implicit_commands() {
        let record = shape("line", "10,10,20,30");
        let svg = render(&record, SQUARE).unwrap().unwrap().to_svg();
        assert!(svg.contains(r#"d="M100, 100 L200, 300""#), "{svg}");
    }

    #[test]
    fn test_ellipse_center_and_radii() {
        let record = shape("ellipse", "0,0,50,100");
        assert_eq!(
            render(&record, SQUARE).unwrap().unwrap(),
            Primitive::Ellipse {
                cx: 250.0,
                cy: 500.0,
                rx: 250.0,
                ry: 500.0,
                stroke: Stroke {
                    color: 0xff,
                    width: 10.0
                },
            }
        );
    }

    #[test]
    fn test_triangle_outline() {
        let record = shape("triangle", "0,10,40,50");
        let svg = render(&record, SQUARE).unwrap().unwrap().to_svg();
        assert!(svg.contains(r#"d="M200, 100 L0, 500 L400, 500 Z""#), "{svg}");
    }

    #[test]
    fn test_bounding_shapes_need_two_points() {
        let record = shape("rectangle", "10,10");
        assert_eq!(
            render(&record, SQUARE).unwrap_err(),
            GeometryError::NotEnoughPoints {
                shape_type: ShapeType::Rectangle,
                needed: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_unknown_and_missing_type() {
        let record = shape("poll", "0,0");
        assert!(matches!(
            render(&record, SQUARE).unwrap_err(),
            GeometryError::UnsupportedShapeType { .. }
        ));
        assert_eq!(
            render(&ShapeRecord::default(), SQUARE).unwrap_err(),
            GeometryError::MissingType
        );
    }

    #[test]
    fn test_text_box_width_zero_draws_nothing() {
        assert_eq!(render(&text_shape("0"), SQUARE).unwrap(), None);

        let drawn = render(&text_shape("25"), SQUARE).unwrap().unwrap();
        let Primitive::Text { x, y, width, .. } = &drawn else {
            panic!("expected text, got {drawn:?}");
        };
        assert_eq!((*x, *y, *width), (100.0, 200.0, 250.0));
        assert!(drawn.to_svg().contains(">Hello &lt;world&gt;</text>"));
    }

    #[test]
    fn test_text_without_content_draws_nothing() {
        let record = ShapeRecord::default()
            .with("type", "text")
            .with("textBoxWidth", "25");
        assert_eq!(render(&record, SQUARE).unwrap(), None);
        let bare = ShapeRecord::default().with("type", "text");
        assert_eq!(render(&bare, Canvas::HD).unwrap(), None);
    }

    fn corner() -> impl Strategy<Value = (u32, u32)> {
        (0u32..=100, 0u32..=100)
    }

    proptest! {
        #[test]
        fn prop_swapping_corners_is_identical(
            a in corner(),
            b in corner(),
            kind in prop_oneof![Just("rectangle"), Just("ellipse")],
        ) {
            let canvas = Canvas::new(1920.0, 1080.0);
            let forward = shape(kind, &format!("{},{},{},{}", a.0, a.1, b.0, b.1));
            let backward = shape(kind, &format!("{},{},{},{}", b.0, b.1, a.0, a.1));
            let first = render(&forward, canvas).unwrap().unwrap();
            let second = render(&backward, canvas).unwrap().unwrap();
            prop_assert_eq!(&first, &second);

            match first {
                Primitive::Rect { width, height, .. } => {
                    prop_assert!(width >= 0.0 && height >= 0.0);
                }
                Primitive::Ellipse { rx, ry, .. } => {
                    prop_assert!(rx >= 0.0 && ry >= 0.0);
                }
                other => prop_assert!(false, "unexpected primitive {:?}", other),
            }
        }
    }
}
