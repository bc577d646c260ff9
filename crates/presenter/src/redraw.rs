use std::sync::Arc;

use chrono::NaiveDate;
use dataset::{DateSelection, Metric};
use figure::{ClampRange, ColorScale, Figure, FigureStyle, MapSpec, Projection};
use foundation::DateParts;
use runtime::ControlValue;
use tracing::debug;

use crate::context::DataContext;
use crate::layout::{
    ControlKind, ControlSpec, DropdownOption, PageLayout, PickerMode, DATE_PICKER, DAY, GRAPH_ID,
    METRIC, MONTH, PROJECTION, YEAR,
};
use crate::selection::Selection;

/// Presentation defaults. None of these are contracts; the binary reads them from
/// the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterSettings {
    pub title: String,
    pub picker: PickerMode,
    /// Initially selected day; clamped into the data's range. `None` picks the
    /// first day with data.
    pub default_date: Option<NaiveDate>,
    pub projection: Projection,
    pub metric: Metric,
    pub colorscale: ColorScale,
    pub clamp: Option<ClampRange>,
    pub style: FigureStyle,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            title: "COVID-19 Data Visualization".to_string(),
            picker: PickerMode::Date,
            default_date: NaiveDate::from_ymd_opt(2020, 1, 22),
            projection: Projection::Equirectangular,
            metric: Metric::TotalCases,
            colorscale: ColorScale::default(),
            clamp: None,
            style: FigureStyle::default(),
        }
    }
}

/// Owns the redraw function and the page declaration for one loaded dataset.
#[derive(Debug)]
pub struct Presenter {
    context: Arc<DataContext>,
    settings: PresenterSettings,
    layout: PageLayout,
}

impl Presenter {
    pub fn new(context: Arc<DataContext>, settings: PresenterSettings) -> Self {
        let layout = build_layout(&context, &settings);
        Self {
            context,
            settings,
            layout,
        }
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    pub fn settings(&self) -> &PresenterSettings {
        &self.settings
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn default_date(&self) -> NaiveDate {
        initial_day(&self.context, &self.settings)
    }

    pub fn default_selection(&self) -> Selection {
        let day = self.default_date();
        let date = match self.settings.picker {
            PickerMode::Date => DateSelection::Exact(day),
            PickerMode::Calendar => DateSelection::Parts(DateParts::from_date(day)),
        };
        Selection {
            date,
            projection: self.settings.projection,
            metric: self.settings.metric,
        }
    }

    fn empty_spec(&self, projection: Projection, metric: Metric) -> MapSpec {
        MapSpec {
            locations: Vec::new(),
            names: Vec::new(),
            values: Vec::new(),
            colorscale: self.settings.colorscale.clone(),
            clamp: self.settings.clamp,
            projection,
            title: self.settings.title.clone(),
            colorbar_title: metric.label().to_string(),
        }
    }

    /// Rows matching the selection, reduced to one value per location.
    pub fn map_spec(&self, selection: &Selection) -> MapSpec {
        let rows = self.context.table().matching(&selection.date);

        let mut spec = self.empty_spec(selection.projection, selection.metric);
        spec.locations.reserve(rows.len());
        spec.names.reserve(rows.len());
        spec.values.reserve(rows.len());
        for row in rows {
            spec.locations.push(row.location.to_string());
            spec.names.push(row.name.clone());
            spec.values.push(row.value(selection.metric));
        }
        spec
    }

    /// Styled map with no locations, shown before any selection is applied.
    /// Does not touch the table.
    pub fn blank_figure(&self) -> Figure {
        self.empty_spec(self.settings.projection, self.settings.metric)
            .into_figure(&self.settings.style)
    }

    /// Pure: the same selection always gives the same figure.
    pub fn redraw(&self, selection: &Selection) -> Figure {
        let spec = self.map_spec(selection);
        debug!(
            date = ?selection.date,
            projection = %selection.projection,
            metric = %selection.metric,
            rows = spec.locations.len(),
            "redraw"
        );
        spec.into_figure(&self.settings.style)
    }
}

fn initial_day(context: &DataContext, settings: &PresenterSettings) -> NaiveDate {
    let bounds = context.bounds();
    settings
        .default_date
        .map_or(bounds.start, |d| bounds.clamp(d))
}

fn build_layout(context: &DataContext, settings: &PresenterSettings) -> PageLayout {
    let bounds = context.bounds();
    let day = initial_day(context, settings);

    let mut controls = Vec::new();
    match settings.picker {
        PickerMode::Date => controls.push(ControlSpec {
            id: DATE_PICKER,
            label: "Date",
            kind: ControlKind::DatePicker {
                min: bounds.start,
                max: bounds.end,
                initial_visible_month: day,
            },
            value: ControlValue::Date(day),
        }),
        PickerMode::Calendar => {
            let parts = DateParts::from_date(day);
            controls.push(ControlSpec {
                id: YEAR,
                label: "Year",
                kind: ControlKind::Dropdown {
                    options: context
                        .years()
                        .iter()
                        .map(|y| DropdownOption::number(y.to_string(), i64::from(*y)))
                        .collect(),
                },
                value: ControlValue::Number(i64::from(parts.year)),
            });
            controls.push(ControlSpec {
                id: MONTH,
                label: "Month",
                kind: ControlKind::Dropdown {
                    options: context
                        .months()
                        .iter()
                        .map(|m| DropdownOption::month(*m))
                        .collect(),
                },
                value: ControlValue::Number(i64::from(parts.month)),
            });
            controls.push(ControlSpec {
                id: DAY,
                label: "Day",
                kind: ControlKind::Slider {
                    min: 1,
                    max: 31,
                    step: 1,
                },
                value: ControlValue::Number(i64::from(parts.day)),
            });
        }
    }

    controls.push(ControlSpec {
        id: PROJECTION,
        label: "Projection",
        kind: ControlKind::Dropdown {
            options: Projection::ALL
                .into_iter()
                .map(|p| DropdownOption::text(p.name(), p.name()))
                .collect(),
        },
        value: ControlValue::Text(settings.projection.name().to_string()),
    });
    controls.push(ControlSpec {
        id: METRIC,
        label: "Metric",
        kind: ControlKind::Dropdown {
            options: Metric::ALL
                .into_iter()
                .map(|m| DropdownOption::text(m.label(), m.column()))
                .collect(),
        },
        value: ControlValue::Text(settings.metric.column().to_string()),
    });

    PageLayout {
        title: settings.title.clone(),
        graph_id: GRAPH_ID,
        picker: settings.picker,
        controls,
    }
}

#[cfg(test)]
mod tests {
    use super::{Presenter, PresenterSettings};
    use crate::context::DataContext;
    use crate::layout::{ControlKind, PickerMode, DATE_PICKER, DAY, MONTH, YEAR};
    use crate::selection::Selection;
    use chrono::NaiveDate;
    use dataset::{DateSelection, Metric, Record, RecordTable};
    use figure::{ClampRange, Projection};
    use foundation::{DateParts, IsoCode};
    use pretty_assertions::assert_eq;
    use runtime::ControlValue;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn presenter(settings: PresenterSettings) -> Presenter {
        let iso = |c: &str| IsoCode::parse(c).unwrap();
        let table = RecordTable::new(vec![
            Record::cases(iso("USA"), d(2020, 3, 1), 100.0),
            Record::cases(iso("CAN"), d(2020, 3, 1), 50.0),
            Record::cases(iso("USA"), d(2020, 3, 2), 150.0),
        ]);
        Presenter::new(Arc::new(DataContext::new(table).unwrap()), settings)
    }

    fn exact(date: NaiveDate) -> Selection {
        Selection {
            date: DateSelection::Exact(date),
            projection: Projection::Equirectangular,
            metric: Metric::TotalCases,
        }
    }

    #[test]
    fn redraw_plots_rows_of_the_selected_day() {
        let p = presenter(PresenterSettings::default());

        let figure = p.redraw(&exact(d(2020, 3, 1)));
        let trace = figure.trace().unwrap();
        assert_eq!(trace.locations, vec!["USA", "CAN"]);
        assert_eq!(trace.z, vec![Some(100.0), Some(50.0)]);

        let figure = p.redraw(&exact(d(2020, 3, 2)));
        let trace = figure.trace().unwrap();
        assert_eq!(trace.locations, vec!["USA"]);
        assert_eq!(trace.z, vec![Some(150.0)]);
    }

    #[test]
    fn day_without_data_gives_empty_figure() {
        let p = presenter(PresenterSettings::default());
        let figure = p.redraw(&exact(d(2021, 1, 1)));
        assert!(figure.is_empty());
        assert!(figure.trace().unwrap().z.is_empty());
    }

    #[test]
    fn blank_figure_matches_an_empty_day() {
        let p = presenter(PresenterSettings::default());
        let blank = p.blank_figure();
        assert!(blank.is_empty());
        assert_eq!(blank, p.redraw(&exact(d(2021, 1, 1))));
    }

    #[test]
    fn projection_only_changes_layout_projection() {
        let p = presenter(PresenterSettings::default());
        let base = p.redraw(&exact(d(2020, 3, 1)));
        let other = p.redraw(&Selection {
            projection: Projection::Orthographic,
            ..exact(d(2020, 3, 1))
        });

        assert_eq!(base.data, other.data);
        assert_eq!(other.layout.geo.projection.kind, Projection::Orthographic);
        let mut restored = other.layout.clone();
        restored.geo.projection.kind = base.layout.geo.projection.kind;
        assert_eq!(restored, base.layout);
    }

    #[test]
    fn clamp_is_applied_to_colour_bounds_only() {
        let clamped = presenter(PresenterSettings {
            clamp: Some(ClampRange::new(0.0, 30_000_000.0).unwrap()),
            ..PresenterSettings::default()
        });
        let plain = presenter(PresenterSettings::default());
        let sel = exact(d(2020, 3, 1));

        let a = plain.redraw(&sel);
        let b = clamped.redraw(&sel);
        assert_eq!(a.trace().unwrap().z, b.trace().unwrap().z);
        assert_eq!(b.trace().unwrap().zmin, Some(0.0));
        assert_eq!(b.trace().unwrap().zmax, Some(30_000_000.0));
        assert_eq!(a.trace().unwrap().zmax, None);
    }

    #[test]
    fn metric_without_values_keeps_locations() {
        let p = presenter(PresenterSettings::default());
        let figure = p.redraw(&Selection {
            metric: Metric::TotalDeaths,
            ..exact(d(2020, 3, 1))
        });
        let trace = figure.trace().unwrap();
        assert_eq!(trace.locations.len(), 2);
        assert_eq!(trace.z, vec![None, None]);
        assert_eq!(trace.colorbar.title.text, "Total deaths");
    }

    #[test]
    fn date_layout_is_bounded_by_data() {
        let p = presenter(PresenterSettings::default());
        let layout = p.layout();
        let picker = layout.control(DATE_PICKER).unwrap();
        assert_eq!(
            picker.kind,
            ControlKind::DatePicker {
                min: d(2020, 3, 1),
                max: d(2020, 3, 2),
                initial_visible_month: d(2020, 3, 1),
            }
        );
        // Configured default 2020-01-22 is clamped into the data range.
        assert_eq!(picker.value, ControlValue::Date(d(2020, 3, 1)));
        assert!(layout.control(YEAR).is_none());
        assert_eq!(layout.controls.len(), 3);
    }

    #[test]
    fn calendar_layout_enumerates_data() {
        let p = presenter(PresenterSettings {
            picker: PickerMode::Calendar,
            default_date: Some(d(2020, 3, 2)),
            ..PresenterSettings::default()
        });
        let layout = p.layout();
        let ControlKind::Dropdown { options } = &layout.control(YEAR).unwrap().kind else {
            panic!("year should be a dropdown");
        };
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, ControlValue::Number(2020));

        let ControlKind::Dropdown { options } = &layout.control(MONTH).unwrap().kind else {
            panic!("month should be a dropdown");
        };
        assert_eq!(options[0].label, "March");

        assert_eq!(layout.control(DAY).unwrap().value, ControlValue::Number(2));
        assert_eq!(
            p.default_selection().date,
            DateSelection::Parts(DateParts::new(2020, 3, 2))
        );
    }
}
