//! The form used to create or edit an event

use chrono::NaiveDate;

use crate::day_key::{start_of_day, Timestamp};
use crate::error::ValidationError;
use crate::event::Event;

/// What the user has typed in the event form so far
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventForm {
    pub title: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl EventForm {
    /// An empty form for a new event. Both pickers start on the selected day, if any.
    pub fn for_new(selected_day: Option<NaiveDate>) -> Self {
        let preset = selected_day.map(start_of_day);
        Self { title: None, start: preset, end: preset }
    }

    /// A form pre-filled with an existing event
    pub fn for_existing(event: &Event) -> Self {
        Self {
            title: Some(event.title().to_string()),
            start: Some(*event.start()),
            end: Some(*event.end()),
        }
    }

    /// Check the form, and build the event it describes.
    ///
    /// When `original` is given, the result keeps its ID (this is an edit), otherwise a new event is created.
    pub fn validate(&self, original: Option<&Event>) -> Result<Event, ValidationError> {
        let title = match &self.title {
            Some(title) if title.trim().is_empty() == false => title.clone(),
            _ => return Err(ValidationError::MissingTitle),
        };
        let start = self.start.ok_or(ValidationError::MissingStart)?;
        let end = self.end.ok_or(ValidationError::MissingEnd)?;

        match original {
            None => Event::new(title, start, end),
            Some(original) => {
                let mut edited = original.clone();
                edited.set_times(start, end)?;
                edited.set_title(title);
                Ok(edited)
            },
        }
    }
}
