//! Whiteboard identifiers and annotation shape records.
//!
//! A shape record is the payload of a completed add-shape event. It is kept
//! as the original field map so that a malformed shape only fails when it is
//! rendered; the typed accessors below do the parsing on demand.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of the annotation surface bound to one slide.
///
/// Serialized as `presentationId/slideNumber` with a 1-based slide number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WhiteboardId {
    presentation: String,
    slide: u32,
}

impl WhiteboardId {
    /// Create an id for a 1-based slide number.
    pub fn new(presentation: impl Into<String>, slide: u32) -> Self {
        Self {
            presentation: presentation.into(),
            slide,
        }
    }

    pub fn presentation(&self) -> &str {
        &self.presentation
    }

    /// 1-based slide number.
    pub fn slide(&self) -> u32 {
        self.slide
    }
}

impl fmt::Display for WhiteboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.presentation, self.slide)
    }
}

/// Error for ids that are not `presentation/slideNumber`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid whiteboard id {0:?}: expected <presentation>/<slide>")]
pub struct InvalidWhiteboardId(pub String);

impl FromStr for WhiteboardId {
    type Err = InvalidWhiteboardId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidWhiteboardId(s.to_string());
        let (presentation, slide) = s.rsplit_once('/').ok_or_else(invalid)?;
        if presentation.is_empty() {
            return Err(invalid());
        }
        let slide: u32 = slide.trim().parse().map_err(|_| invalid())?;
        if slide == 0 {
            return Err(invalid());
        }
        Ok(Self::new(presentation, slide))
    }
}

impl TryFrom<String> for WhiteboardId {
    type Error = InvalidWhiteboardId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WhiteboardId> for String {
    fn from(value: WhiteboardId) -> Self {
        value.to_string()
    }
}

/// A normalized point; `(0.0, 0.0)` is the top-left of the slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Problems found while reading a typed value out of a shape record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeFieldError {
    #[error("missing field {field}")]
    Missing { field: String },

    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("dataPoints has an odd number of coordinates ({count})")]
    OddCoordinateCount { count: usize },
}

/// Completed annotation payload, exactly as recorded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeRecord {
    fields: BTreeMap<String, String>,
}

impl ShapeRecord {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// The annotation grammar name (`pencil`, `line`, ...).
    pub fn shape_type(&self) -> Option<&str> {
        self.field("type")
    }

    pub fn required(&self, name: &str) -> Result<&str, ShapeFieldError> {
        self.field(name).ok_or_else(|| ShapeFieldError::Missing {
            field: name.to_string(),
        })
    }

    /// Parse a required floating point field.
    pub fn number(&self, name: &str) -> Result<f64, ShapeFieldError> {
        let raw = self.required(name)?;
        parse_number(name, raw)
    }

    /// Parse a packed `0xRRGGBB` integer color stored in decimal.
    pub fn color(&self, name: &str) -> Result<u32, ShapeFieldError> {
        let raw = self.required(name)?;
        let invalid = || ShapeFieldError::InvalidNumber {
            field: name.to_string(),
            value: raw.to_string(),
        };
        let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
        u32::try_from(value & 0xFF_FF_FF).map_err(|_| invalid())
    }

    /// Data points, converted from the 0–100 log scale to `[0, 1]`.
    pub fn data_points(&self) -> Result<Vec<Point2D>, ShapeFieldError> {
        let raw = self.required("dataPoints")?;
        let coords = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| parse_number("dataPoints", c).map(|v| v / 100.0))
            .collect::<Result<Vec<_>, _>>()?;

        if coords.len() % 2 != 0 {
            return Err(ShapeFieldError::OddCoordinateCount {
                count: coords.len(),
            });
        }

        Ok(coords
            .chunks_exact(2)
            .map(|pair| Point2D::new(pair[0], pair[1]))
            .collect())
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ShapeFieldError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShapeFieldError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whiteboard_id_parse_and_display() {
        let id: WhiteboardId = "d2d9a672040fbde2a47a10bf6c37b6a4b5ae187f-1600000000000/3"
            .parse()
            .unwrap();
        assert_eq!(
            id.presentation(),
            "d2d9a672040fbde2a47a10bf6c37b6a4b5ae187f-1600000000000"
        );
        assert_eq!(id.slide(), 3);
        assert_eq!(
            id.to_string(),
            "d2d9a672040fbde2a47a10bf6c37b6a4b5ae187f-1600000000000/3"
        );
    }

    #[test]
    fn test_whiteboard_id_rejects_malformed() {
        assert!("deck".parse::<WhiteboardId>().is_err());
        assert!("/2".parse::<WhiteboardId>().is_err());
        assert!("deck/zero".parse::<WhiteboardId>().is_err());
        assert!("deck/0".parse::<WhiteboardId>().is_err());
    }

    #[test]
    fn test_whiteboard_id_serde_as_string() {
        let id = WhiteboardId::new("deck", 2);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"deck/2\"");
        let parsed: WhiteboardId = serde_json::from_str("\"deck/2\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_data_points_are_normalized() {
        let shape = ShapeRecord::default().with("dataPoints", "0,0,50,50,100,100");
        let points = shape.data_points().unwrap();
        assert_eq!(
            points,
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(0.5, 0.5),
                Point2D::new(1.0, 1.0)
            ]
        );
    }

    #[test]
    fn test_data_points_rejects_odd_and_garbage() {
        let odd = ShapeRecord::default().with("dataPoints", "1,2,3");
        assert_eq!(
            odd.data_points().unwrap_err(),
            ShapeFieldError::OddCoordinateCount { count: 3 }
        );

        let garbage = ShapeRecord::default().with("dataPoints", "1,nope");
        assert!(matches!(
            garbage.data_points().unwrap_err(),
            ShapeFieldError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_color_parses_packed_decimal() {
        let shape = ShapeRecord::default().with("color", "16711680");
        assert_eq!(shape.color("color").unwrap(), 0xFF0000);
        assert!(matches!(
            shape.color("fontColor").unwrap_err(),
            ShapeFieldError::Missing { .. }
        ));
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let shape = ShapeRecord::default().with("thickness", "NaN");
        assert!(shape.number("thickness").is_err());
    }
}
