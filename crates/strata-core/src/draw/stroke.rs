//! Edge strokes.
//!
//! A correlation edge is drawn solid for a positive weight and dashed for a
//! negative one; [`StrokeDefinition::for_weight`] makes that choice.
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"gray"`, `0.5` |
//! | `width` | `stroke-width` | `0.5` |
//! | `style` | `stroke-dasharray` | `"5,5"` |

use crate::color::Color;

/// Visual pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Equal dash and gap lengths
    Dashed,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
        }
    }
}

/// Color, width and pattern of a line.
///
/// # Examples
///
/// ```
/// use strata_core::{color::Color, draw::{StrokeDefinition, StrokeStyle}};
///
/// let gray = Color::new("gray").unwrap();
/// let negative = StrokeDefinition::for_weight(gray, 0.5, -0.3);
/// assert_eq!(negative.style(), StrokeStyle::Dashed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            style: StrokeStyle::Dashed,
            ..Self::solid(color, width)
        }
    }

    /// Stroke of a correlation edge: dashed for a negative weight, solid otherwise.
    pub fn for_weight(color: Color, width: f32, weight: f64) -> Self {
        if weight < 0.0 {
            Self::dashed(color, width)
        } else {
            Self::solid(color, width)
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width and, for dashed strokes, the dash pattern.
///
/// # Examples
///
/// ```
/// use strata_core::{color::Color, draw::StrokeDefinition};
/// use svg::node::element::Line;
///
/// let stroke = StrokeDefinition::dashed(Color::new("gray").unwrap(), 0.5);
/// let line = strata_core::apply_stroke!(Line::new(), &stroke);
/// assert!(line.to_string().contains("stroke-dasharray"));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
