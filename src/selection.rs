use chrono::NaiveDate;
use derive_more::Constructor;

use crate::grid::MonthGrid;

/// The single day selection of a widget.
///
/// Clicking the stored day flips its flag, clicking another day moves the
/// selection there. Two clicks on the same day therefore deselect and then
/// reselect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Empty,
    Selected { date: NaiveDate, active: bool },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Empty
    }
}

/// Cell flag changes resulting from one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Toggle {
    pub cleared: Option<NaiveDate>,
    pub date: NaiveDate,
    pub selected: bool,
}

impl Toggle {
    pub fn apply(&self, grid: &mut MonthGrid) {
        if let Some(cell) = self.cleared.and_then(|prev| grid.cell_mut(prev)) {
            cell.unselect();
        }

        if let Some(cell) = grid.cell_mut(self.date) {
            cell.set_selected(self.selected);
        }
    }
}

impl Selection {
    pub fn click(&mut self, date: NaiveDate) -> Toggle {
        let toggle = match *self {
            Selection::Selected { date: prev, active } if prev == date => {
                Toggle::new(None, date, !active)
            }
            Selection::Selected { date: prev, .. } => Toggle::new(Some(prev), date, true),
            Selection::Empty => Toggle::new(None, date, true),
        };

        *self = Selection::Selected {
            date,
            active: toggle.selected,
        };

        toggle
    }

    pub fn clear(&mut self) {
        *self = Selection::Empty;
    }

    /// The stored day, regardless of whether its flag is currently set.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Selection::Selected { date, .. } => Some(*date),
            Selection::Empty => None,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            Selection::Selected { date, active: true } => Some(*date),
            _ => None,
        }
    }
}
