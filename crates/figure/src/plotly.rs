//! Wire types mirroring the subset of Plotly's figure schema the dashboard emits.

use serde::Serialize;

use crate::colorscale::ColorScale;
use crate::projection::Projection;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ChoroplethTrace>,
    pub layout: Layout,
}

impl Figure {
    pub fn trace(&self) -> Option<&ChoroplethTrace> {
        self.data.first()
    }

    /// True when no location carries a value.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|t| t.locations.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Choropleth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationMode {
    #[serde(rename = "ISO-3")]
    Iso3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub locations: Vec<String>,
    pub locationmode: LocationMode,
    /// One entry per location; `null` where the dataset has no figure.
    pub z: Vec<Option<f64>>,
    /// Hover labels.
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmax: Option<f64>,
    pub colorscale: ColorScale,
    pub marker: Marker,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub geo: GeoLayout,
    pub transition: Transition,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    pub showframe: bool,
    pub showcoastlines: bool,
    pub showocean: bool,
    pub oceancolor: String,
    pub showlakes: bool,
    pub lakecolor: String,
    pub showrivers: bool,
    pub rivercolor: String,
    pub projection: GeoProjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoProjection {
    #[serde(rename = "type")]
    pub kind: Projection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Milliseconds.
    pub duration: u32,
    pub easing: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}
