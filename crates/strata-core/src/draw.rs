//! Drawing primitives shared by the SVG renderers.
//!
//! - [`StrokeDefinition`] and [`StrokeStyle`] describe how lines are stroked,
//!   including the dash pattern used for negative correlations.
//! - [`LayeredOutput`] collects SVG nodes by [`RenderLayer`] so that planes,
//!   edges, nodes and labels are emitted in a fixed paint order.

mod layer;
mod stroke;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
