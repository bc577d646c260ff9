use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Current value published by one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlValue {
    Date(NaiveDate),
    Number(i64),
    Text(String),
}

impl ControlValue {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ControlValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ControlValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ControlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Date(d) => write!(f, "{d}"),
            ControlValue::Number(n) => write!(f, "{n}"),
            ControlValue::Text(s) => f.write_str(s),
        }
    }
}

/// Full value set of every registered control, keyed by control id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlSnapshot {
    /// Bumped once per notification.
    pub revision: u64,
    pub values: BTreeMap<String, ControlValue>,
}

impl ControlSnapshot {
    pub fn get(&self, id: &str) -> Option<&ControlValue> {
        self.values.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown control {0:?}")]
    UnknownControl(String),
    #[error("control {id:?} rejected value {value}: {reason}")]
    Rejected {
        id: String,
        value: String,
        reason: String,
    },
}

/// Receives the complete snapshot after every accepted change.
pub trait ControlObserver {
    fn notify(&mut self, snapshot: &ControlSnapshot);
}

impl<F: FnMut(&ControlSnapshot)> ControlObserver for F {
    fn notify(&mut self, snapshot: &ControlSnapshot) {
        self(snapshot)
    }
}

/// Holds the current value of each control and re-notifies its observer with the
/// full value set whenever one of them changes.
///
/// Controls are registered up front with their initial value; the set of ids is
/// fixed afterwards.
#[derive(Debug)]
pub struct ControlBoard<O> {
    snapshot: ControlSnapshot,
    observer: O,
}

impl<O: ControlObserver> ControlBoard<O> {
    /// Registers `initial` and notifies the observer once so it starts from a
    /// consistent state.
    pub fn new(initial: impl IntoIterator<Item = (String, ControlValue)>, observer: O) -> Self {
        let mut board = Self {
            snapshot: ControlSnapshot {
                revision: 0,
                values: initial.into_iter().collect(),
            },
            observer,
        };
        board.observer.notify(&board.snapshot);
        board
    }

    pub fn snapshot(&self) -> &ControlSnapshot {
        &self.snapshot
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn publish(&mut self, id: &str, value: ControlValue) -> Result<u64, ControlError> {
        self.publish_all([(id.to_string(), value)])
    }

    /// Applies every change, then notifies once. Nothing is applied if any id is
    /// unknown.
    pub fn publish_all(
        &mut self,
        changes: impl IntoIterator<Item = (String, ControlValue)>,
    ) -> Result<u64, ControlError> {
        let changes: Vec<_> = changes.into_iter().collect();
        if let Some((id, _)) = changes
            .iter()
            .find(|(id, _)| !self.snapshot.values.contains_key(id))
        {
            return Err(ControlError::UnknownControl(id.clone()));
        }

        for (id, value) in changes {
            self.snapshot.values.insert(id, value);
        }
        self.snapshot.revision += 1;
        self.observer.notify(&self.snapshot);
        Ok(self.snapshot.revision)
    }
}
