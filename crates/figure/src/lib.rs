//! Choropleth figure description in Plotly's JSON schema.
//!
//! The server never renders pixels: it builds a [`Figure`] and the browser hands
//! it to Plotly.js.

pub mod colorscale;
pub mod map;
pub mod plotly;
pub mod projection;

pub use colorscale::{ClampRange, ColorScale};
pub use map::{FigureStyle, GeoStyle, MapSpec};
pub use plotly::*;
pub use projection::Projection;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FigureError {
    #[error("clamp range must be finite with min < max, got {min}..{max}")]
    InvalidClamp { min: f64, max: f64 },
    #[error("unknown colour scale {0:?}")]
    UnknownColorScale(String),
    #[error("unknown projection {0:?}")]
    UnknownProjection(String),
}
