use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use std::cmp::Ordering;

use crate::calendar::{CalendarMonth, GridParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    label: String,
    passed: bool,
    is_today: bool,
    selected: bool,
    date: Option<NaiveDate>,
}

impl DayCell {
    pub fn padding() -> Self {
        DayCell {
            label: String::new(),
            passed: false,
            is_today: false,
            selected: false,
            date: None,
        }
    }

    pub fn new(date: NaiveDate) -> Self {
        DayCell {
            label: date.day().to_string(),
            passed: false,
            is_today: false,
            selected: false,
            date: Some(date),
        }
    }

    pub fn passed(mut self, passed: bool) -> Self {
        self.passed = passed;
        self
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn unselect(&mut self) {
        self.selected = false;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn day_num(&self) -> Option<u32> {
        self.date.map(|d| d.day())
    }
}

/// A day lies in the past if its month is before today's month, or it is
/// an earlier day of today's month.
pub fn is_passed(month: CalendarMonth, day: u32, today: NaiveDate) -> bool {
    match month.cmp(&CalendarMonth::from(today)) {
        Ordering::Equal => day < today.day(),
        Ordering::Less => true,
        Ordering::Greater => false,
    }
}

/// Week rows of one month. Every row but the last holds exactly seven cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: CalendarMonth,
    rows: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn rows(&self) -> &[Vec<DayCell>] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flatten()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells().find(|cell| cell.date() == Some(date))
    }

    pub fn cell_mut(&mut self, date: NaiveDate) -> Option<&mut DayCell> {
        self.rows
            .iter_mut()
            .flatten()
            .find(|cell| cell.date() == Some(date))
    }

    pub fn selected(&self) -> Option<&DayCell> {
        self.cells().find(|cell| cell.is_selected())
    }
}

pub struct GridBuilder<'a> {
    params: &'a GridParams,
    today: NaiveDate,
}

impl<'a> GridBuilder<'a> {
    pub fn new(params: &'a GridParams, today: NaiveDate) -> Self {
        GridBuilder { params, today }
    }

    pub fn cells(&self) -> Vec<DayCell> {
        let offset = self.params.start_weekday;
        let month = self.params.month;

        (1..=(self.params.day_count + offset))
            .map(|slot| {
                if slot <= offset {
                    return DayCell::padding();
                }

                let day = slot - offset;
                match month.day(day) {
                    Some(date) => DayCell::new(date)
                        .passed(is_passed(month, day, self.today))
                        .today(date == self.today),
                    None => DayCell::padding(),
                }
            })
            .collect_vec()
    }

    pub fn build(&self) -> MonthGrid {
        let rows = self
            .cells()
            .chunks(MonthGrid::COLUMNS)
            .map(|row| row.to_vec())
            .collect_vec();

        MonthGrid {
            month: self.params.month,
            rows,
        }
    }
}
