use chrono::{Local, NaiveDate};
use std::sync::mpsc;

use crate::calendar::{self, CalendarMonth, CalendarState};
use crate::config::{TodayPolicy, WidgetConfig};
use crate::error::Result;
use crate::events::Event;
use crate::grid::{DayCell, GridBuilder, MonthGrid};
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn delta(&self) -> i32 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Everything a host needs to draw the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub title: String,
    pub weekday_labels: [String; 7],
    pub grid: MonthGrid,
    pub footer: Option<String>,
    pub visible: bool,
}

pub fn parse_seed(seed: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(seed.trim(), "%Y-%m-%d")?)
}

pub struct Widget {
    state: CalendarState,
    grid: MonthGrid,
    selection: Selection,
    today: NaiveDate,
    today_policy: TodayPolicy,
    footer_html: Option<String>,
    visible: bool,
    listeners: Vec<mpsc::Sender<Event>>,
}

impl Widget {
    /// Creates a widget showing the month of `seed`. A missing or malformed
    /// seed falls back to the current date.
    pub fn new(seed: Option<&str>, config: &WidgetConfig) -> Self {
        let seed = seed
            .and_then(|s| {
                parse_seed(s)
                    .map_err(|e| log::warn!("Ignoring seed date '{}': {}", s, e))
                    .ok()
            })
            .unwrap_or_else(calendar::reference_today);

        Self::with_state(CalendarState::new(seed), config)
    }

    pub fn with_state(state: CalendarState, config: &WidgetConfig) -> Self {
        let state = state
            .locale(config.locale.0)
            .first_weekday(config.first_weekday);
        let today = state.reference_today();
        let grid = GridBuilder::new(&state.params(), today).build();

        Widget {
            state,
            grid,
            selection: Selection::default(),
            today,
            today_policy: config.today,
            footer_html: config.footer_html.clone(),
            visible: true,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_month(&self) -> CalendarMonth {
        self.state.current()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn subscribe(&mut self, sink: mpsc::Sender<Event>) {
        self.listeners.push(sink);
    }

    fn emit(&mut self, event: Event) {
        self.listeners.retain(|sink| sink.send(event.clone()).is_ok());
    }

    fn rebuild(&mut self) {
        self.grid = GridBuilder::new(&self.state.params(), self.today).build();

        if let Some(cell) = self
            .selection
            .selected_date()
            .and_then(|date| self.grid.cell_mut(date))
        {
            cell.select();
        }
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.navigate_by(direction.delta());
    }

    /// Moves `delta` months, rebuilds once and clears the selection.
    pub fn navigate_by(&mut self, delta: i32) {
        self.state.advance_month(delta);
        self.selection.clear();
        self.rebuild();
    }

    pub fn go_to_today(&mut self) {
        self.state.reset_to_today();
        self.selection.clear();
        self.rebuild();
    }

    /// Handles a click on `cell`. Padding cells and cells of other months are
    /// ignored. Returns the clicked date.
    pub fn select_cell(&mut self, cell: &DayCell) -> Option<NaiveDate> {
        self.select_day(cell.date()?)
    }

    pub fn select_day(&mut self, date: NaiveDate) -> Option<NaiveDate> {
        if self.grid.cell(date).is_none() {
            log::debug!("{} is not part of the displayed month", date);
            return None;
        }

        let toggle = self.selection.click(date);
        toggle.apply(&mut self.grid);
        self.emit(Event::DaySelected(date));

        Some(date)
    }

    pub fn select_day_num(&mut self, day: u32) -> Option<NaiveDate> {
        self.select_day(self.state.current().day(day)?)
    }

    /// Re-reads the local date when the widget is configured to follow it.
    pub fn update(&mut self) {
        self.set_today(Local::now().date_naive());
    }

    /// Adopts `now` as today and reclassifies the grid, keeping the
    /// selection. Ignored under `TodayPolicy::Fixed`.
    pub fn set_today(&mut self, now: NaiveDate) {
        if self.today_policy == TodayPolicy::Fixed || now == self.today {
            return;
        }

        log::info!("Date changed to {}", now);
        self.today = now;
        self.rebuild();
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Detaches all listeners and hides the widget.
    pub fn destroy(&mut self) {
        log::debug!("Detaching {} listener(s)", self.listeners.len());
        self.listeners.clear();
        self.visible = false;
    }

    pub fn render(&self) -> RenderModel {
        RenderModel {
            title: format!("{} {}", self.state.month_name(), self.state.current().year()),
            weekday_labels: self.state.weekday_short_names(),
            grid: self.grid.clone(),
            footer: self.footer_html.clone(),
            visible: self.visible,
        }
    }
}
