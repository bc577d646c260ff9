//! Interactive presenter: declares the dashboard's controls and turns their
//! current values into a choropleth figure.
//!
//! Data flows one way. A [`DataContext`] is built once from the loaded table and
//! shared read-only; each [`Dashboard`] session owns a control board whose
//! observer re-runs [`Presenter::redraw`] with the full value set on every change.

pub mod context;
pub mod dashboard;
pub mod layout;
pub mod redraw;
pub mod selection;

pub use context::DataContext;
pub use dashboard::Dashboard;
pub use layout::{ControlKind, ControlSpec, DropdownOption, PageLayout, PickerMode};
pub use redraw::{Presenter, PresenterSettings};
pub use selection::{Selection, SelectionError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("dataset has no rows to present")]
    EmptyDataset,
    #[error(transparent)]
    Control(#[from] runtime::ControlError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}
