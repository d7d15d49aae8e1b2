//! Calendar events

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::day_key::{DayKey, Timestamp};
use crate::error::ValidationError;

/// The identity of an event. It never changes, even when the event is edited.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    content: String,
}

impl EventId {
    /// Generate a random EventId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for EventId {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for EventId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// A calendar event.
///
/// Its start is always strictly before its end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    start: Timestamp,
    end: Timestamp,
}

impl Event {
    /// Create a brand new event, with a new random ID
    pub fn new(title: String, start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        Self::with_id(EventId::random(), title, start, end)
    }

    /// Create an event that already has an ID (e.g. because it comes from the store)
    pub fn with_id(id: EventId, title: String, start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        check_times(&start, &end)?;
        Ok(Self { id, title, start, end })
    }

    pub fn id(&self) -> &EventId      { &self.id    }
    pub fn title(&self) -> &str       { &self.title }
    pub fn start(&self) -> &Timestamp { &self.start }
    pub fn end(&self) -> &Timestamp   { &self.end   }

    /// The day this event is listed under. Multi-day events are only listed under their first day.
    pub fn day_key(&self) -> DayKey {
        DayKey::of(&self.start)
    }

    /// Whether this event ends on another local day than the one it starts on
    pub fn is_multi_day(&self) -> bool {
        DayKey::of(&self.start) != DayKey::of(&self.end)
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    /// Change both bounds at once. Nothing is changed if `start` is not before `end`.
    pub fn set_times(&mut self, start: Timestamp, end: Timestamp) -> Result<(), ValidationError> {
        check_times(&start, &end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }
}

fn check_times(start: &Timestamp, end: &Timestamp) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        Err(ValidationError::StartNotBeforeEnd)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn start_must_precede_end() {
        let nine = Local.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap();
        let quarter = Local.with_ymd_and_hms(2024, 3, 7, 9, 15, 0).unwrap();

        assert!(Event::new("Standup".to_string(), nine, quarter).is_ok());
        assert_eq!(Event::new("Standup".to_string(), nine, nine), Err(ValidationError::StartNotBeforeEnd));
        assert_eq!(Event::new("Standup".to_string(), quarter, nine), Err(ValidationError::StartNotBeforeEnd));

        let mut event = Event::new("Standup".to_string(), nine, quarter).unwrap();
        assert!(event.set_times(quarter, nine).is_err());
        assert_eq!(event.start(), &nine);
    }

    #[test]
    fn multi_day() {
        let start = Local.with_ymd_and_hms(2024, 3, 7, 22, 0, 0).unwrap();
        let end = Local.with_ymd_and_hms(2024, 3, 8, 2, 0, 0).unwrap();
        let event = Event::new("Night shift".to_string(), start, end).unwrap();

        assert!(event.is_multi_day());
        assert_eq!(event.day_key().to_string(), "2024-03-07");
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(EventId::random(), EventId::random());
    }
}
