use std::sync::Arc;

use figure::Figure;
use runtime::{ControlBoard, ControlError, ControlObserver, ControlSnapshot, ControlValue};
use serde_json::Value;
use tracing::warn;

use crate::redraw::Presenter;
use crate::selection::Selection;
use crate::PresenterError;

/// Observer that re-runs the redraw on every snapshot and keeps the result.
///
/// Starts from a blank map; the board's initial notification draws the first
/// real figure.
#[derive(Debug)]
pub struct Redraw {
    presenter: Arc<Presenter>,
    figure: Figure,
    rows: usize,
    redraws: u64,
}

impl Redraw {
    fn new(presenter: Arc<Presenter>) -> Self {
        let figure = presenter.blank_figure();
        Self {
            presenter,
            figure,
            rows: 0,
            redraws: 0,
        }
    }
}

impl ControlObserver for Redraw {
    fn notify(&mut self, snapshot: &ControlSnapshot) {
        let mode = self.presenter.settings().picker;
        match Selection::from_snapshot(snapshot, mode) {
            Ok(selection) => {
                self.figure = self.presenter.redraw(&selection);
                self.rows = self.figure.trace().map_or(0, |t| t.locations.len());
                self.redraws += 1;
            }
            // Inputs are validated before publishing, so this means the layout and
            // the selection disagree on a control; keep the last good figure.
            Err(err) => warn!(revision = snapshot.revision, "redraw skipped: {err}"),
        }
    }
}

/// One viewer's state: the current control values and the figure they produce.
#[derive(Debug)]
pub struct Dashboard {
    board: ControlBoard<Redraw>,
}

impl Dashboard {
    pub fn new(presenter: Arc<Presenter>) -> Self {
        let initial = presenter.layout().initial_values();
        Self {
            board: ControlBoard::new(initial, Redraw::new(presenter)),
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.board.observer().figure
    }

    /// Rows plotted by the current figure.
    pub fn rows(&self) -> usize {
        self.board.observer().rows
    }

    pub fn redraws(&self) -> u64 {
        self.board.observer().redraws
    }

    pub fn snapshot(&self) -> &ControlSnapshot {
        self.board.snapshot()
    }

    /// Validates raw inputs from the page against the declared controls and
    /// publishes them as one change. Nothing is applied if any input is refused.
    pub fn input<'a>(
        &mut self,
        inputs: impl IntoIterator<Item = (&'a String, &'a Value)>,
    ) -> Result<&Figure, PresenterError> {
        let changes = {
            let layout = self.board.observer().presenter.layout();
            let mut changes: Vec<(String, ControlValue)> = Vec::new();
            for (id, raw) in inputs {
                let spec = layout
                    .control(id)
                    .ok_or_else(|| ControlError::UnknownControl(id.clone()))?;
                changes.push((id.clone(), spec.accept(raw)?));
            }
            changes
        };

        if !changes.is_empty() {
            self.board.publish_all(changes)?;
        }
        Ok(self.figure())
    }
}
