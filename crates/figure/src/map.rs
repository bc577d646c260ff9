use crate::colorscale::{ClampRange, ColorScale};
use crate::plotly::{
    ChoroplethTrace, ColorBar, Figure, GeoLayout, GeoProjection, Layout, Line, LocationMode,
    Margin, Marker, Title, TraceKind, Transition,
};
use crate::projection::Projection;

/// Fixed map styling: frame, coastlines and water bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoStyle {
    pub show_frame: bool,
    pub show_coastlines: bool,
    pub ocean_color: Option<String>,
    pub lake_color: Option<String>,
    pub river_color: Option<String>,
}

impl Default for GeoStyle {
    fn default() -> Self {
        Self {
            show_frame: true,
            show_coastlines: true,
            ocean_color: Some("LightBlue".to_string()),
            lake_color: Some("LightBlue".to_string()),
            river_color: Some("LightBlue".to_string()),
        }
    }
}

/// Everything about a figure that does not depend on the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub geo: GeoStyle,
    pub border_color: String,
    pub border_width: f64,
    pub transition_ms: u32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            geo: GeoStyle::default(),
            border_color: "rgb(12,12,12)".to_string(),
            border_width: 1.0,
            transition_ms: 500,
        }
    }
}

/// Per-redraw description of a choropleth: one value per location plus how to
/// colour and project it. Built fresh for each redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSpec {
    pub locations: Vec<String>,
    pub names: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub colorscale: ColorScale,
    pub clamp: Option<ClampRange>,
    pub projection: Projection,
    pub title: String,
    pub colorbar_title: String,
}

impl MapSpec {
    pub fn into_figure(self, style: &FigureStyle) -> Figure {
        debug_assert_eq!(self.locations.len(), self.values.len());

        let trace = ChoroplethTrace {
            kind: TraceKind::Choropleth,
            locations: self.locations,
            locationmode: LocationMode::Iso3,
            z: self.values,
            text: self.names,
            zmin: self.clamp.map(|c| c.min()),
            zmax: self.clamp.map(|c| c.max()),
            colorscale: self.colorscale,
            marker: Marker {
                line: Line {
                    color: style.border_color.clone(),
                    width: style.border_width,
                },
            },
            colorbar: ColorBar {
                title: Title::new(self.colorbar_title),
            },
        };

        let geo = &style.geo;
        let layout = Layout {
            title: Title::new(self.title),
            geo: GeoLayout {
                showframe: geo.show_frame,
                showcoastlines: geo.show_coastlines,
                showocean: geo.ocean_color.is_some(),
                oceancolor: geo.ocean_color.clone().unwrap_or_default(),
                showlakes: geo.lake_color.is_some(),
                lakecolor: geo.lake_color.clone().unwrap_or_default(),
                showrivers: geo.river_color.is_some(),
                rivercolor: geo.river_color.clone().unwrap_or_default(),
                projection: GeoProjection {
                    kind: self.projection,
                },
            },
            transition: Transition {
                duration: style.transition_ms,
                easing: "cubic-in-out",
            },
            margin: Margin {
                l: 0,
                r: 0,
                t: 48,
                b: 0,
            },
        };

        Figure {
            data: vec![trace],
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FigureStyle, GeoStyle, MapSpec};
    use crate::colorscale::{ClampRange, ColorScale};
    use crate::projection::Projection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec() -> MapSpec {
        MapSpec {
            locations: vec!["USA".to_string(), "CAN".to_string()],
            names: vec!["United States".to_string(), "Canada".to_string()],
            values: vec![Some(100.0), None],
            colorscale: ColorScale::Named("Reds".to_string()),
            clamp: None,
            projection: Projection::NaturalEarth,
            title: "COVID-19".to_string(),
            colorbar_title: "Total cases".to_string(),
        }
    }

    #[test]
    fn figure_json_matches_plotly_schema() {
        let figure = spec().into_figure(&FigureStyle::default());
        let v = serde_json::to_value(&figure).unwrap();
        let trace = &v["data"][0];
        assert_eq!(trace["type"], json!("choropleth"));
        assert_eq!(trace["locationmode"], json!("ISO-3"));
        assert_eq!(trace["locations"], json!(["USA", "CAN"]));
        assert_eq!(trace["z"], json!([100.0, null]));
        assert_eq!(trace["colorscale"], json!("Reds"));
        assert_eq!(trace["marker"]["line"]["color"], json!("rgb(12,12,12)"));
        assert_eq!(trace["colorbar"]["title"]["text"], json!("Total cases"));
        assert!(trace.get("zmin").is_none());

        let geo = &v["layout"]["geo"];
        assert_eq!(geo["projection"]["type"], json!("natural earth"));
        assert_eq!(geo["showframe"], json!(true));
        assert_eq!(geo["oceancolor"], json!("LightBlue"));
        assert_eq!(v["layout"]["transition"]["duration"], json!(500));
    }

    #[test]
    fn clamp_sets_bounds_without_touching_values() {
        let plain = spec().into_figure(&FigureStyle::default());
        let clamped = MapSpec {
            clamp: Some(ClampRange::new(0.0, 30_000_000.0).unwrap()),
            ..spec()
        }
        .into_figure(&FigureStyle::default());

        let (a, b) = (plain.trace().unwrap(), clamped.trace().unwrap());
        assert_eq!(a.z, b.z);
        assert_eq!(a.locations, b.locations);
        assert_eq!((b.zmin, b.zmax), (Some(0.0), Some(30_000_000.0)));
    }

    #[test]
    fn unset_water_colours_hide_layers() {
        let style = FigureStyle {
            geo: GeoStyle {
                ocean_color: None,
                river_color: None,
                ..GeoStyle::default()
            },
            ..FigureStyle::default()
        };
        let figure = spec().into_figure(&style);
        assert!(!figure.layout.geo.showocean);
        assert!(!figure.layout.geo.showrivers);
        assert!(figure.layout.geo.showlakes);
    }

    #[test]
    fn empty_spec_gives_empty_figure() {
        let figure = MapSpec {
            locations: vec![],
            names: vec![],
            values: vec![],
            ..spec()
        }
        .into_figure(&FigureStyle::default());
        assert!(figure.is_empty());
        assert_eq!(figure.data.len(), 1);
    }
}
