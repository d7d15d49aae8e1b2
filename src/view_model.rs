//! Presentation-ready values, that UI bindings display as is

use std::fmt::{Display, Write};

use chrono::{Datelike, NaiveDate};

use crate::config;
use crate::day_key::{DayKey, MonthStart};
use crate::event::{Event, EventId};
use crate::event_index::EventIndex;

/// Render a chrono `format()` result, without panicking on a bogus user-provided format
fn render<D: Display>(formatted: D) -> String {
    let mut text = String::new();
    if write!(text, "{}", formatted).is_err() {
        log::warn!("Invalid date format in the configuration, some labels will be empty");
        text.clear();
    }
    text
}


/// The labels above the month grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthHeader {
    pub month: String,
    pub year: String,
}

impl MonthHeader {
    pub fn new(month: &MonthStart) -> Self {
        let month_format = config::read_format(&config::MONTH_FORMAT);
        let year_format = config::read_format(&config::YEAR_FORMAT);
        let first_day = month.first_day();

        Self {
            month: render(first_day.format(&month_format)),
            year: render(first_day.format(&year_format)),
        }
    }
}


/// A row of the event list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRow {
    pub id: EventId,
    pub title: String,
    pub start: String,
    /// For events that end on another day, this also tells the day
    pub end: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        let time_format = config::read_format(&config::TIME_FORMAT);
        let end_format = if event.is_multi_day() {
            config::read_format(&config::MULTI_DAY_TIME_FORMAT)
        } else {
            time_format.clone()
        };

        Self {
            id: event.id().clone(),
            title: event.title().to_string(),
            start: render(event.start().format(&time_format)),
            end: render(event.end().format(&end_format)),
        }
    }
}


/// A day in a month cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub key: DayKey,
    pub has_events: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Everything needed to draw the grid of a month
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthCells {
    pub month: MonthStart,
    /// Number of empty slots before the 1st, in a week that starts on Sunday
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthCells {
    pub fn build(month: MonthStart, index: &EventIndex, today: NaiveDate, selected: Option<DayKey>) -> Self {
        let with_events = index.days_with_events(&month);
        let today = DayKey::from(today);

        let days = (1..=month.days_in_month())
            .filter_map(|day| month.day(day))
            .map(|key| DayCell {
                key,
                has_events: with_events.contains(&key.day()),
                is_today: key == today,
                is_selected: Some(key) == selected,
            })
            .collect();

        Self {
            month,
            leading_blanks: month.first_day().weekday().num_days_from_sunday(),
            days,
        }
    }
}
