pub mod calendar;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod selection;
pub mod ui;
pub mod widget;

pub use calendar::{CalendarMonth, CalendarState, GridParams};
pub use grid::{DayCell, GridBuilder, MonthGrid};
pub use selection::Selection;
pub use widget::{Direction, RenderModel, Widget};
