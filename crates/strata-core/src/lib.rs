//! Strata Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Strata parser,
//! graph engine and renderers. It includes:
//!
//! - **Layers**: The closed set of layer tags and ordered layer sets ([`layer`] module)
//! - **Matrix**: Materialized correlation matrices and centrality maps ([`matrix`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Planar and spatial primitives plus the scene projection ([`geometry`] module)
//! - **Draw**: Stroke definitions and layered SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod layer;
pub mod matrix;
