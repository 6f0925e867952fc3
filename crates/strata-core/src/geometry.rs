//! Geometric primitives for layouts and scenes.
//!
//! - [`Position3`]: a node position in layout space (`z` is the layer plane)
//! - [`Point`], [`Size`], [`Bounds`]: planar primitives used by the SVG renderers
//! - [`Projection`]: the fixed orthographic camera mapping layout space to the page

use serde::Deserialize;

/// A position in layout space.
///
/// `x` and `y` are the in-plane coordinates of a node; `z` is the height of the
/// plane its layer lives on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Position3 {
    /// Creates a new position from its three coordinates.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the z-coordinate (layer plane height).
    pub fn z(self) -> f32 {
        self.z
    }
}

/// A point on the rendered page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Axis-aligned rectangle described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from the two corner coordinates.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates zero-sized bounds located at `point`.
    pub fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the smallest bounds containing both `self` and `other`.
    pub fn merge(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns the smallest bounds containing `self` and `point`.
    pub fn include(&self, point: Point) -> Self {
        self.merge(&Self::from_point(point))
    }

    /// Grows the bounds on every side by `pad` times its own width/height.
    ///
    /// Degenerate (zero-width or zero-height) bounds stay degenerate along
    /// that axis.
    pub fn pad_relative(&self, pad: f32) -> Self {
        let dx = self.width() * pad;
        let dy = self.height() * pad;
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Grows the bounds on every side by a fixed amount.
    pub fn pad_uniform(&self, amount: f32) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

/// Fixed orthographic camera used by the static scene renderer.
///
/// Angles follow the usual 3D plotting convention: the azimuth rotates the
/// scene around the vertical axis, the elevation tilts the camera above the
/// `x/y` plane. `scale` is the page length of one layout unit and
/// `z_stretch` exaggerates the spacing between layer planes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Projection {
    elevation_deg: f32,
    azimuth_deg: f32,
    scale: f32,
    z_stretch: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            elevation_deg: 20.0,
            azimuth_deg: 30.0,
            scale: 120.0,
            z_stretch: 2.0,
        }
    }
}

impl Projection {
    pub fn new(elevation_deg: f32, azimuth_deg: f32, scale: f32, z_stretch: f32) -> Self {
        Self {
            elevation_deg,
            azimuth_deg,
            scale,
            z_stretch,
        }
    }

    pub fn elevation_deg(&self) -> f32 {
        self.elevation_deg
    }

    pub fn azimuth_deg(&self) -> f32 {
        self.azimuth_deg
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn z_stretch(&self) -> f32 {
        self.z_stretch
    }

    /// Projects a layout-space position onto the page.
    ///
    /// Page `y` grows downwards, so higher planes end up closer to the top.
    pub fn project(&self, position: Position3) -> Point {
        let azimuth = f64::from(self.azimuth_deg).to_radians();
        let elevation = f64::from(self.elevation_deg).to_radians();
        let (x, y, z) = (
            f64::from(position.x()),
            f64::from(position.y()),
            f64::from(position.z()) * f64::from(self.z_stretch),
        );

        let horizontal = -x * azimuth.sin() + y * azimuth.cos();
        let depth = x * azimuth.cos() + y * azimuth.sin();
        let vertical = z * elevation.cos() - depth * elevation.sin();

        let scale = f64::from(self.scale);
        Point::new((horizontal * scale) as f32, (-vertical * scale) as f32)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_bounds_merge_and_size() {
        let a = Bounds::new(0.0, 0.0, 2.0, 1.0);
        let b = Bounds::new(-1.0, 0.5, 1.0, 3.0);
        let merged = a.merge(&b);

        assert_eq!(merged, Bounds::new(-1.0, 0.0, 2.0, 3.0));
        assert_eq!(merged.to_size(), Size::new(3.0, 3.0));
    }

    #[test]
    fn test_bounds_pad_relative() {
        let padded = Bounds::new(-1.0, -2.0, 1.0, 2.0).pad_relative(0.1);
        assert!(approx_eq!(f32, padded.min_x(), -1.2, ulps = 4));
        assert!(approx_eq!(f32, padded.max_y(), 2.4, ulps = 4));
    }

    #[test]
    fn test_bounds_include_point() {
        let bounds = Bounds::from_point(Point::new(1.0, 1.0)).include(Point::new(-2.0, 4.0));
        assert_eq!(bounds, Bounds::new(-2.0, 1.0, 1.0, 4.0));
    }

    #[test]
    fn test_projection_origin_is_origin() {
        let projection = Projection::default();
        assert_eq!(projection.project(Position3::default()), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_projection_higher_planes_are_drawn_higher() {
        let projection = Projection::default();
        let low = projection.project(Position3::new(0.5, 0.5, 0.0));
        let high = projection.project(Position3::new(0.5, 0.5, 2.0));

        assert!(approx_eq!(f32, low.x(), high.x(), ulps = 4));
        assert!(high.y() < low.y());
    }

    #[test]
    fn test_projection_top_down_is_planar() {
        let projection = Projection::new(90.0, 0.0, 1.0, 1.0);
        let point = projection.project(Position3::new(0.0, 3.0, 0.0));
        assert!(approx_eq!(f32, point.x(), 3.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, point.y(), 0.0, epsilon = 1e-5));
    }
}
