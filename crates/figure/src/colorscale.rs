use std::str::FromStr;

use serde::Serialize;

use crate::FigureError;

/// Scales Plotly.js resolves by name on its own.
const BUILTIN: [&str; 18] = [
    "Blackbody", "Bluered", "Blues", "Cividis", "Earth", "Electric", "Greens", "Greys", "Hot",
    "Jet", "Picnic", "Portland", "Rainbow", "RdBu", "Reds", "Viridis", "YlGnBu", "YlOrRd",
];

/// CARTO sequential scales. Plotly.js does not ship these, so they travel as
/// explicit stops.
const CARTO: [(&str, [&str; 7]); 5] = [
    (
        "burgyl",
        [
            "rgb(251, 230, 197)",
            "rgb(245, 186, 152)",
            "rgb(238, 138, 130)",
            "rgb(220, 113, 118)",
            "rgb(200, 88, 108)",
            "rgb(156, 63, 93)",
            "rgb(112, 40, 74)",
        ],
    ),
    (
        "burg",
        [
            "rgb(255, 198, 196)",
            "rgb(244, 163, 168)",
            "rgb(227, 129, 145)",
            "rgb(204, 96, 125)",
            "rgb(173, 70, 108)",
            "rgb(139, 48, 88)",
            "rgb(103, 32, 68)",
        ],
    ),
    (
        "redor",
        [
            "rgb(246, 210, 169)",
            "rgb(245, 183, 142)",
            "rgb(241, 156, 124)",
            "rgb(234, 129, 113)",
            "rgb(221, 104, 108)",
            "rgb(202, 82, 104)",
            "rgb(177, 63, 100)",
        ],
    ),
    (
        "oryel",
        [
            "rgb(236, 218, 154)",
            "rgb(239, 196, 126)",
            "rgb(243, 173, 106)",
            "rgb(247, 148, 93)",
            "rgb(249, 123, 87)",
            "rgb(246, 99, 86)",
            "rgb(238, 77, 90)",
        ],
    ),
    (
        "teal",
        [
            "rgb(209, 238, 234)",
            "rgb(168, 219, 217)",
            "rgb(133, 196, 201)",
            "rgb(104, 171, 184)",
            "rgb(79, 144, 166)",
            "rgb(59, 117, 143)",
            "rgb(42, 86, 116)",
        ],
    ),
];

/// Colour scale as written into a trace: either a Plotly.js name or explicit
/// `[fraction, colour]` stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorScale {
    Named(String),
    Stops(Vec<(f64, String)>),
}

impl ColorScale {
    /// Evenly spaced stops from `colors`; a single colour becomes a flat scale.
    pub fn from_colors<S: AsRef<str>>(colors: &[S]) -> Self {
        let steps = colors.len().saturating_sub(1).max(1) as f64;
        let mut stops: Vec<(f64, String)> = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64 / steps, c.as_ref().to_string()))
            .collect();
        if let [(_, only)] = stops.as_slice() {
            let only = only.clone();
            stops.push((1.0, only));
        }
        ColorScale::Stops(stops)
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        "burgyl".parse().unwrap_or(ColorScale::Named("Reds".to_string()))
    }
}

impl FromStr for ColorScale {
    type Err = FigureError;

    /// Case-insensitive; a trailing `_r` reverses the scale.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };

        if let Some((_, colors)) = CARTO.iter().find(|(n, _)| n.eq_ignore_ascii_case(base)) {
            let mut colors = colors.to_vec();
            if reversed {
                colors.reverse();
            }
            return Ok(ColorScale::from_colors(colors.as_slice()));
        }

        if !reversed {
            if let Some(builtin) = BUILTIN.iter().find(|n| n.eq_ignore_ascii_case(base)) {
                return Ok(ColorScale::Named((*builtin).to_string()));
            }
        }

        Err(FigureError::UnknownColorScale(s.to_string()))
    }
}

/// Fixed colour bounds so intensity is comparable between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClampRange {
    min: f64,
    max: f64,
}

impl ClampRange {
    pub fn new(min: f64, max: f64) -> Result<Self, FigureError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(FigureError::InvalidClamp { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
