use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FigureError;

/// Map projections understood by Plotly's `geo` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    #[serde(rename = "equirectangular")]
    Equirectangular,
    #[serde(rename = "mercator")]
    Mercator,
    #[serde(rename = "orthographic")]
    Orthographic,
    #[serde(rename = "natural earth")]
    NaturalEarth,
    #[serde(rename = "kavrayskiy7")]
    Kavrayskiy7,
    #[serde(rename = "miller")]
    Miller,
    #[serde(rename = "robinson")]
    Robinson,
    #[serde(rename = "eckert4")]
    Eckert4,
    #[serde(rename = "azimuthal equal area")]
    AzimuthalEqualArea,
    #[serde(rename = "azimuthal equidistant")]
    AzimuthalEquidistant,
    #[serde(rename = "conic equal area")]
    ConicEqualArea,
    #[serde(rename = "conic conformal")]
    ConicConformal,
    #[serde(rename = "conic equidistant")]
    ConicEquidistant,
    #[serde(rename = "gnomonic")]
    Gnomonic,
    #[serde(rename = "stereographic")]
    Stereographic,
    #[serde(rename = "mollweide")]
    Mollweide,
    #[serde(rename = "hammer")]
    Hammer,
    #[serde(rename = "transverse mercator")]
    TransverseMercator,
    #[serde(rename = "albers usa")]
    AlbersUsa,
    #[serde(rename = "winkel tripel")]
    WinkelTripel,
    #[serde(rename = "aitoff")]
    Aitoff,
    #[serde(rename = "sinusoidal")]
    Sinusoidal,
}

impl Projection {
    pub const ALL: [Projection; 22] = [
        Projection::Equirectangular,
        Projection::Mercator,
        Projection::Orthographic,
        Projection::NaturalEarth,
        Projection::Kavrayskiy7,
        Projection::Miller,
        Projection::Robinson,
        Projection::Eckert4,
        Projection::AzimuthalEqualArea,
        Projection::AzimuthalEquidistant,
        Projection::ConicEqualArea,
        Projection::ConicConformal,
        Projection::ConicEquidistant,
        Projection::Gnomonic,
        Projection::Stereographic,
        Projection::Mollweide,
        Projection::Hammer,
        Projection::TransverseMercator,
        Projection::AlbersUsa,
        Projection::WinkelTripel,
        Projection::Aitoff,
        Projection::Sinusoidal,
    ];

    /// Plotly's name for the projection.
    pub fn name(self) -> &'static str {
        match self {
            Projection::Equirectangular => "equirectangular",
            Projection::Mercator => "mercator",
            Projection::Orthographic => "orthographic",
            Projection::NaturalEarth => "natural earth",
            Projection::Kavrayskiy7 => "kavrayskiy7",
            Projection::Miller => "miller",
            Projection::Robinson => "robinson",
            Projection::Eckert4 => "eckert4",
            Projection::AzimuthalEqualArea => "azimuthal equal area",
            Projection::AzimuthalEquidistant => "azimuthal equidistant",
            Projection::ConicEqualArea => "conic equal area",
            Projection::ConicConformal => "conic conformal",
            Projection::ConicEquidistant => "conic equidistant",
            Projection::Gnomonic => "gnomonic",
            Projection::Stereographic => "stereographic",
            Projection::Mollweide => "mollweide",
            Projection::Hammer => "hammer",
            Projection::TransverseMercator => "transverse mercator",
            Projection::AlbersUsa => "albers usa",
            Projection::WinkelTripel => "winkel tripel",
            Projection::Aitoff => "aitoff",
            Projection::Sinusoidal => "sinusoidal",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Projection {
    type Err = FigureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Projection::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| FigureError::UnknownProjection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Projection;

    #[test]
    fn names_match_serde_and_parse_back() {
        for p in Projection::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.name()));
            assert_eq!(p.name().parse::<Projection>().unwrap(), p);
        }
    }

    #[test]
    fn parse_is_lenient_about_separators() {
        assert_eq!(
            "natural_earth".parse::<Projection>().unwrap(),
            Projection::NaturalEarth
        );
        assert_eq!("Albers-USA".parse::<Projection>().unwrap(), Projection::AlbersUsa);
        assert!("flat".parse::<Projection>().is_err());
    }
}
