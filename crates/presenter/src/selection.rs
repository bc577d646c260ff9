use dataset::{DateSelection, Metric};
use figure::Projection;
use foundation::DateParts;
use runtime::{ControlSnapshot, ControlValue};
use thiserror::Error;

use crate::layout::{PickerMode, DATE_PICKER, DAY, METRIC, MONTH, PROJECTION, YEAR};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("control {0:?} has no value")]
    Missing(&'static str),
    #[error("control {id:?} holds unusable value {value}")]
    Invalid { id: &'static str, value: String },
}

/// Typed view of every control value a redraw depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub date: DateSelection,
    pub projection: Projection,
    pub metric: Metric,
}

impl Selection {
    pub fn from_snapshot(
        snapshot: &ControlSnapshot,
        mode: PickerMode,
    ) -> Result<Self, SelectionError> {
        let date = match mode {
            PickerMode::Date => {
                DateSelection::Exact(read(snapshot, DATE_PICKER, ControlValue::as_date)?)
            }
            PickerMode::Calendar => {
                let year = read(snapshot, YEAR, |v| {
                    v.as_number().and_then(|n| i32::try_from(n).ok())
                })?;
                let month = read(snapshot, MONTH, as_u32)?;
                let day = read(snapshot, DAY, as_u32)?;
                DateSelection::Parts(DateParts::new(year, month, day))
            }
        };
        let projection = read(snapshot, PROJECTION, |v| {
            v.as_text()?.parse::<Projection>().ok()
        })?;
        let metric = read(snapshot, METRIC, |v| v.as_text()?.parse::<Metric>().ok())?;

        Ok(Self {
            date,
            projection,
            metric,
        })
    }
}

fn as_u32(value: &ControlValue) -> Option<u32> {
    value.as_number().and_then(|n| u32::try_from(n).ok())
}

fn read<T>(
    snapshot: &ControlSnapshot,
    id: &'static str,
    convert: impl FnOnce(&ControlValue) -> Option<T>,
) -> Result<T, SelectionError> {
    let value = snapshot.get(id).ok_or(SelectionError::Missing(id))?;
    convert(value).ok_or_else(|| SelectionError::Invalid {
        id,
        value: value.to_string(),
    })
}
