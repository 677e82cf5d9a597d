use std::fmt::{self, Display};
use termion::style;

use crate::grid::DayCell;
use crate::widget::RenderModel;

use super::Theme;

struct CellView<'a> {
    cell: &'a DayCell,
    theme: &'a Theme,
}

impl<'a> CellView<'a> {
    const CELL_WIDTH: usize = 4;
}

impl Display for CellView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cell.is_padding() {
            return write!(f, "{:width$}", "", width = Self::CELL_WIDTH);
        }

        let arg_today = if self.cell.is_today() {
            self.theme.today_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_focus = if self.cell.is_selected() {
            self.theme.focus_char.unwrap_or(' ')
        } else {
            ' '
        };

        let styled = self.theme.styled && (self.cell.is_selected() || self.cell.is_passed());
        if styled {
            if self.cell.is_selected() {
                write!(f, "{}", style::Invert)?;
            } else {
                write!(f, "{}", style::Faint)?;
            }
        }

        write!(f, "{}{}{:>2}", arg_today, arg_focus, self.cell.label())?;

        if styled {
            write!(f, "{}", style::Reset)?;
        }

        Ok(())
    }
}

/// Plain text rendering of one month: title, weekday header, week rows and
/// the optional footer.
pub struct MonthPane<'a> {
    model: &'a RenderModel,
    theme: &'a Theme,
}

impl<'a> MonthPane<'a> {
    const COLUMNS: usize = 7;

    pub fn new(model: &'a RenderModel, theme: &'a Theme) -> Self {
        MonthPane { model, theme }
    }
}

impl Display for MonthPane<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.model.visible {
            return Ok(());
        }

        let width = Self::COLUMNS * CellView::CELL_WIDTH;
        writeln!(f, "{:^width$}", self.model.title, width = width)?;

        for head in self.model.weekday_labels.iter() {
            write!(f, "{:>width$}", head, width = CellView::CELL_WIDTH)?;
        }
        writeln!(f)?;

        for row in self.model.grid.rows() {
            for cell in row {
                write!(
                    f,
                    "{}",
                    CellView {
                        cell,
                        theme: self.theme
                    }
                )?;
            }
            writeln!(f)?;
        }

        if let Some(footer) = &self.model.footer {
            writeln!(f, "{}", footer)?;
        }

        Ok(())
    }
}
